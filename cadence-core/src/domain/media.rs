//! Media domain models representing music tracks and podcast episodes.

use std::fmt;

use serde::Serialize;

use crate::domain::DomainError;

/// Highest score accepted by [`Track::rate`].
pub const MAX_RATING: u8 = 5;

/// Genre stored when a track record leaves it blank.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Fields shared by every playable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaInfo {
    title: String,
    performer: String,
    duration_secs: u32,
    play_count: u64,
}

impl MediaInfo {
    /// Creates media info with a zero play count.
    ///
    /// Callers guarantee a non-empty title and a positive duration.
    pub fn new(title: impl Into<String>, performer: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            title: title.into(),
            performer: performer.into(),
            duration_secs,
            play_count: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn performer(&self) -> &str {
        &self.performer
    }
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
    pub fn play_count(&self) -> u64 {
        self.play_count
    }

    /// Formats the duration as `mm:ss`, or `h:mm:ss` from one hour up.
    pub fn formatted_duration(&self) -> String {
        let hours = self.duration_secs / 3600;
        let minutes = (self.duration_secs % 3600) / 60;
        let seconds = self.duration_secs % 60;
        if hours > 0 {
            format!("{hours}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes:02}:{seconds:02}")
        }
    }

    pub(crate) fn record_play(&mut self) {
        self.play_count = self.play_count.saturating_add(1);
    }
}

/// A music track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    #[serde(flatten)]
    info: MediaInfo,
    genre: String,
    ratings: Vec<u8>,
}

impl Track {
    /// Creates a track; a blank genre is stored as [`UNKNOWN_GENRE`].
    pub fn new(info: MediaInfo, genre: &str) -> Self {
        let genre = genre.trim();
        Self {
            info,
            genre: if genre.is_empty() {
                UNKNOWN_GENRE.to_string()
            } else {
                genre.to_string()
            },
            ratings: Vec::new(),
        }
    }

    pub fn info(&self) -> &MediaInfo {
        &self.info
    }
    pub fn genre(&self) -> &str {
        &self.genre
    }
    pub fn ratings(&self) -> &[u8] {
        &self.ratings
    }

    /// Adds a listener score between 0 and 5.
    ///
    /// # Errors
    ///
    /// - `DomainError::RatingOutOfRange` - If the score is outside 0..=5
    pub fn rate(&mut self, score: i64) -> Result<(), DomainError> {
        let score = u8::try_from(score)
            .ok()
            .filter(|s| *s <= MAX_RATING)
            .ok_or(DomainError::RatingOutOfRange { score })?;
        self.ratings.push(score);
        Ok(())
    }

    /// Mean of all scores, 0.0 when the track has never been rated.
    pub fn average_rating(&self) -> f64 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        let total: u32 = self.ratings.iter().map(|r| u32::from(*r)).sum();
        f64::from(total) / self.ratings.len() as f64
    }
}

/// A podcast episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    #[serde(flatten)]
    info: MediaInfo,
    season: String,
    number: u32,
    host: String,
}

impl Episode {
    pub fn new(info: MediaInfo, season: impl Into<String>, number: u32, host: impl Into<String>) -> Self {
        Self {
            info,
            season: season.into(),
            number,
            host: host.into(),
        }
    }

    pub fn info(&self) -> &MediaInfo {
        &self.info
    }
    pub fn season(&self) -> &str {
        &self.season
    }
    pub fn number(&self) -> u32 {
        self.number
    }
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Any playable item held by a library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Media {
    Track(Track),
    Episode(Episode),
}

impl Media {
    pub fn info(&self) -> &MediaInfo {
        match self {
            Media::Track(track) => &track.info,
            Media::Episode(episode) => &episode.info,
        }
    }

    pub(crate) fn info_mut(&mut self) -> &mut MediaInfo {
        match self {
            Media::Track(track) => &mut track.info,
            Media::Episode(episode) => &mut episode.info,
        }
    }

    pub fn title(&self) -> &str {
        self.info().title()
    }

    pub fn as_track(&self) -> Option<&Track> {
        match self {
            Media::Track(track) => Some(track),
            Media::Episode(_) => None,
        }
    }

    pub fn as_episode(&self) -> Option<&Episode> {
        match self {
            Media::Episode(episode) => Some(episode),
            Media::Track(_) => None,
        }
    }
}

impl fmt::Display for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Media::Track(track) => write!(
                f,
                "[Track] '{}' by {} | {} | {}",
                track.info.title,
                track.info.performer,
                track.genre,
                track.info.formatted_duration()
            ),
            Media::Episode(episode) => write!(
                f,
                "[Episode] '{}' | {} #{} hosted by {} | {}",
                episode.info.title,
                episode.season,
                episode.number,
                episode.host,
                episode.info.formatted_duration()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::new(MediaInfo::new("Yesterday", "The Beatles", 125), "rock")
    }

    #[test]
    fn test_blank_genre_defaults_to_unknown() {
        let track = Track::new(MediaInfo::new("Song", "Band", 10), "   ");
        assert_eq!(track.genre(), UNKNOWN_GENRE);
    }

    #[test]
    fn test_rate_accepts_bounds_and_rejects_outside() {
        let mut track = track();
        assert!(track.rate(0).is_ok());
        assert!(track.rate(5).is_ok());
        assert_eq!(
            track.rate(6),
            Err(DomainError::RatingOutOfRange { score: 6 })
        );
        assert_eq!(
            track.rate(-1),
            Err(DomainError::RatingOutOfRange { score: -1 })
        );
        assert_eq!(track.ratings(), &[0, 5]);
    }

    #[test]
    fn test_average_rating() {
        let mut track = track();
        assert_eq!(track.average_rating(), 0.0);
        track.rate(4).unwrap();
        track.rate(3).unwrap();
        assert!((track.average_rating() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_formatted_duration() {
        assert_eq!(MediaInfo::new("a", "b", 125).formatted_duration(), "02:05");
        assert_eq!(MediaInfo::new("a", "b", 3725).formatted_duration(), "1:02:05");
    }

    #[test]
    fn test_media_accessors_by_variant() {
        let media = Media::Episode(Episode::new(
            MediaInfo::new("Pilot", "Ana", 1800),
            "S1",
            1,
            "Ana",
        ));
        assert_eq!(media.title(), "Pilot");
        assert!(media.as_track().is_none());
        assert_eq!(media.as_episode().map(Episode::number), Some(1));
    }
}
