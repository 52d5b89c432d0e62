//! Second pass: turns playlist shells into linked playlists.
//!
//! Runs after every section is loaded, so a playlist may name users and media
//! declared anywhere in the document.

use crate::diagnostics::DiagnosticsSink;
use crate::domain::{Library, Playlist, PlaylistShell};
use crate::loader::sections::quoted_list;

/// Resolves owners and members of every shell, in order.
///
/// Unresolved owners leave the playlist ownerless; unresolved members are
/// omitted. Both are reported as warnings, one per playlist and kind.
pub fn resolve_links(shells: Vec<PlaylistShell>, library: &mut Library, sink: &mut DiagnosticsSink) {
    for shell in shells {
        resolve_shell(shell, library, sink);
    }
}

fn resolve_shell(shell: PlaylistShell, library: &mut Library, sink: &mut DiagnosticsSink) {
    let PlaylistShell {
        name,
        owner_name,
        titles,
    } = shell;

    let owner = if owner_name.is_empty() {
        sink.warn(format!("playlist '{name}' has no owner"));
        None
    } else {
        let owner = library.user_registry().get(&owner_name);
        if owner.is_none() {
            sink.warn(format!(
                "playlist '{name}' references unknown user '{owner_name}'"
            ));
        }
        owner
    };

    let mut members = Vec::with_capacity(titles.len());
    let mut missing = Vec::new();
    for title in titles {
        match library.media_registry().get(&title) {
            Some(id) => members.push(id),
            None => missing.push(title),
        }
    }
    if !missing.is_empty() {
        sink.warn(format!(
            "playlist '{name}' contains unknown items {}; ignored",
            quoted_list(&missing)
        ));
    }

    let mut playlist = Playlist::new(name, owner_name);
    for member in members {
        playlist.attach_member(member);
    }
    if let Some(owner) = owner {
        playlist.set_owner(owner);
    }

    let member_count = playlist.len();
    let playlist_id = library.push_playlist(playlist);
    if let Some(owner) = owner
        && let Some(user) = library.user_mut(owner)
    {
        user.add_playlist(playlist_id);
    }

    tracing::debug!(
        playlist = %playlist_id,
        members = member_count,
        missing = missing.len(),
        owned = owner.is_some(),
        "Resolved playlist"
    );
}
