//! Listener accounts.

use serde::Serialize;

use crate::domain::PlaylistId;

/// A listener owning playlists and a play history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    name: String,
    playlists: Vec<PlaylistId>,
    history: Vec<String>,
}

impl User {
    /// Creates a user with no playlists and an empty history.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            playlists: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owned playlists in attachment order.
    pub fn playlists(&self) -> &[PlaylistId] {
        &self.playlists
    }

    /// Titles this user listened to, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Attaches an owned playlist. Attaching the same playlist twice is a no-op.
    pub fn add_playlist(&mut self, playlist: PlaylistId) {
        if !self.playlists.contains(&playlist) {
            self.playlists.push(playlist);
        }
    }

    pub(crate) fn record_listen(&mut self, title: &str) {
        self.history.push(title.to_string());
    }
}
