//! Catalog domain models: users, tracks, podcast episodes and playlists.
//!
//! Entities are stored in per-load arenas owned by [`Library`] and refer to each
//! other through typed indices, so one media item can sit in many playlists
//! without being duplicated.

pub mod library;
pub mod media;
pub mod playlist;
pub mod user;

use std::fmt;

use serde::Serialize;

pub use library::Library;
pub use media::{Episode, Media, MediaInfo, Track};
pub use playlist::{Playlist, PlaylistShell};
pub use user::User;

/// Position of a user inside a [`Library`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UserId(pub(crate) usize);

/// Position of a track or episode inside a [`Library`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MediaId(pub(crate) usize);

/// Position of a playlist inside a [`Library`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlaylistId(pub(crate) usize);

impl UserId {
    /// Returns the zero-based arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl MediaId {
    /// Returns the zero-based arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl PlaylistId {
    /// Returns the zero-based arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "media#{}", self.0)
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "playlist#{}", self.0)
    }
}

/// Normalized form of a user name or media title.
///
/// Every natural-key comparison in the crate goes through this type: the raw
/// text is trimmed and case-folded, so `" Yesterday "` and `"yesterday"` name
/// the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NaturalKey(String);

impl NaturalKey {
    /// Builds the key for a raw name or title.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Returns true if the raw text was blank.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised by domain operations on a loaded [`Library`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Rating {score} is outside the 0-5 range")]
    RatingOutOfRange { score: i64 },

    #[error("Media {id} is not a track")]
    NotATrack { id: MediaId },

    #[error("Unknown media {id}")]
    UnknownMedia { id: MediaId },

    #[error("Unknown user {id}")]
    UnknownUser { id: UserId },

    #[error("Unknown playlist {id}")]
    UnknownPlaylist { id: PlaylistId },
}

impl DomainError {
    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            DomainError::RatingOutOfRange { score } => {
                format!("Rating {score} is invalid (must be between 0 and 5)")
            }
            DomainError::NotATrack { .. } => "Only tracks can be rated".to_string(),
            DomainError::UnknownMedia { .. } => "Media item not found".to_string(),
            DomainError::UnknownUser { .. } => "User not found".to_string(),
            DomainError::UnknownPlaylist { .. } => "Playlist not found".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_key_trims_and_folds_case() {
        assert_eq!(NaturalKey::new("  Yesterday "), NaturalKey::new("yesterday"));
        assert_eq!(NaturalKey::new("ÁLBUM").as_str(), "álbum");
        assert!(NaturalKey::new("   ").is_empty());
    }

    #[test]
    fn test_ids_display_with_kind_prefix() {
        assert_eq!(UserId(3).to_string(), "user#3");
        assert_eq!(MediaId(0).to_string(), "media#0");
        assert_eq!(PlaylistId(7).to_string(), "playlist#7");
    }

    #[test]
    fn test_rating_error_message() {
        let error = DomainError::RatingOutOfRange { score: 9 };
        assert_eq!(error.to_string(), "Rating 9 is outside the 0-5 range");
        assert!(error.user_message().contains("between 0 and 5"));
    }
}
