//! Playlists, before and after link resolution.

use serde::Serialize;

use crate::domain::{MediaId, UserId};

/// A playlist whose owner and members are still raw strings.
///
/// Produced by the section loader and consumed by the link resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistShell {
    pub name: String,
    pub owner_name: String,
    /// Member titles, deduplicated by natural key in first-seen order.
    pub titles: Vec<String>,
}

/// A resolved playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    name: String,
    owner_name: String,
    owner: Option<UserId>,
    members: Vec<MediaId>,
    play_count: u64,
}

impl Playlist {
    /// Creates an ownerless, empty playlist remembering the owner name it was
    /// declared with.
    pub fn new(name: impl Into<String>, owner_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner_name: owner_name.into(),
            owner: None,
            members: Vec::new(),
            play_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owner name as written in the source document.
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    /// Resolved owner, `None` when the declared owner is blank or unknown.
    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    pub fn members(&self) -> &[MediaId] {
        &self.members
    }

    pub fn play_count(&self) -> u64 {
        self.play_count
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn set_owner(&mut self, owner: UserId) {
        self.owner = Some(owner);
    }

    /// Appends a member unless it is already present.
    ///
    /// Returns true if the member was added.
    pub fn attach_member(&mut self, media: MediaId) -> bool {
        if self.members.contains(&media) {
            return false;
        }
        self.members.push(media);
        true
    }

    /// Removes a member, keeping the order of the rest.
    ///
    /// Returns true if the member was present.
    pub fn detach_member(&mut self, media: MediaId) -> bool {
        match self.members.iter().position(|member| *member == media) {
            Some(index) => {
                self.members.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn record_play(&mut self) {
        self.play_count = self.play_count.saturating_add(1);
    }

    pub(crate) fn add_plays(&mut self, plays: u64) {
        self.play_count = self.play_count.saturating_add(plays);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_member_skips_duplicates_and_keeps_order() {
        let mut playlist = Playlist::new("Mix", "Ana");
        assert!(playlist.attach_member(MediaId(2)));
        assert!(playlist.attach_member(MediaId(0)));
        assert!(!playlist.attach_member(MediaId(2)));
        assert_eq!(playlist.members(), &[MediaId(2), MediaId(0)]);
    }

    #[test]
    fn test_detach_member_keeps_remaining_order() {
        let mut playlist = Playlist::new("Mix", "Ana");
        for id in [3, 1, 2] {
            playlist.attach_member(MediaId(id));
        }
        assert!(playlist.detach_member(MediaId(1)));
        assert!(!playlist.detach_member(MediaId(1)));
        assert_eq!(playlist.members(), &[MediaId(3), MediaId(2)]);
    }

    #[test]
    fn test_new_playlist_is_ownerless() {
        let mut playlist = Playlist::new("Mix", "Ghost");
        assert_eq!(playlist.owner(), None);
        assert_eq!(playlist.owner_name(), "Ghost");
        playlist.set_owner(UserId(4));
        assert_eq!(playlist.owner(), Some(UserId(4)));
    }
}
