//! Per-section validation turning raw records into entities.
//!
//! Users and media are registered in the [`Library`] right away. Playlists
//! only become [`PlaylistShell`]s here; their references are resolved once
//! every section has been loaded.

use std::collections::HashSet;

use crate::diagnostics::DiagnosticsSink;
use crate::domain::{Episode, Library, Media, MediaInfo, NaturalKey, PlaylistShell, Track, User};
use crate::loader::record::RawRecord;

/// Episode number substituted for an invalid one under the lenient policy.
pub const DEFAULT_EPISODE_NUMBER: u32 = 0;

/// How invalid field values are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Invalid values drop the record with an error.
    Strict,
    /// Invalid values are reported as warnings; a default is used where one exists.
    Lenient,
}

impl ValidationPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ValidationPolicy::Strict
        } else {
            ValidationPolicy::Lenient
        }
    }

    pub fn is_strict(self) -> bool {
        self == ValidationPolicy::Strict
    }

    /// Reports an invalid value as an error (strict) or a warning (lenient).
    fn report(self, sink: &mut DiagnosticsSink, message: String, record: &RawRecord) {
        match self {
            ValidationPolicy::Strict => sink.error(message, record),
            ValidationPolicy::Lenient => sink.warn(message),
        }
    }
}

/// Registers users; the first record for a natural key wins.
pub fn load_users(records: &[RawRecord], library: &mut Library, sink: &mut DiagnosticsSink) {
    for record in records {
        let name = record.text("nome");
        if name.is_empty() {
            sink.error("user without a name; record skipped", record);
            continue;
        }
        if library.contains_user(name) {
            sink.warn(format!(
                "duplicate user '{name}'; keeping the first occurrence"
            ));
            continue;
        }
        if library.insert_user(User::new(name)).is_ok() {
            tracing::debug!(name, "Loaded user");
        }
    }
}

/// Registers tracks. Tracks without a positive duration are always dropped.
pub fn load_tracks(
    records: &[RawRecord],
    policy: ValidationPolicy,
    library: &mut Library,
    sink: &mut DiagnosticsSink,
) {
    for record in records {
        let Some(title) = media_title(record, "track", library, sink) else {
            continue;
        };

        let Some(duration) = parse_duration(record.text("duracao")) else {
            policy.report(
                sink,
                format!(
                    "invalid duration for track '{title}': {:?}; record skipped",
                    record.text("duracao")
                ),
                record,
            );
            continue;
        };

        let info = MediaInfo::new(title, record.text("artista"), duration);
        let track = Track::new(info, record.text("genero"));
        if library.insert_media(Media::Track(track)).is_ok() {
            tracing::debug!(title, duration, "Loaded track");
        }
    }
}

/// Registers podcast episodes.
///
/// An invalid episode number drops the record under [`ValidationPolicy::Strict`]
/// and becomes [`DEFAULT_EPISODE_NUMBER`] under [`ValidationPolicy::Lenient`].
pub fn load_episodes(
    records: &[RawRecord],
    policy: ValidationPolicy,
    library: &mut Library,
    sink: &mut DiagnosticsSink,
) {
    for record in records {
        let Some(title) = media_title(record, "episode", library, sink) else {
            continue;
        };

        let raw_number = record.text("episodio");
        let number = match raw_number.parse::<u32>() {
            Ok(number) => number,
            Err(_) if policy.is_strict() => {
                sink.error(
                    format!("invalid episode number for '{title}': {raw_number:?}; record skipped"),
                    record,
                );
                continue;
            }
            Err(_) => {
                sink.warn(format!(
                    "invalid episode number for '{title}': {raw_number:?}; using {DEFAULT_EPISODE_NUMBER}"
                ));
                DEFAULT_EPISODE_NUMBER
            }
        };

        let Some(duration) = parse_duration(record.text("duracao")) else {
            policy.report(
                sink,
                format!(
                    "invalid duration for episode '{title}': {:?}; record skipped",
                    record.text("duracao")
                ),
                record,
            );
            continue;
        };

        let host = record.text("host");
        let info = MediaInfo::new(title, host, duration);
        let episode = Episode::new(info, record.text("temporada"), number, host);
        if library.insert_media(Media::Episode(episode)).is_ok() {
            tracing::debug!(title, number, "Loaded episode");
        }
    }
}

/// Builds playlist shells, collapsing repeated member titles.
pub fn load_playlists(records: &[RawRecord], sink: &mut DiagnosticsSink) -> Vec<PlaylistShell> {
    let mut shells = Vec::with_capacity(records.len());

    for record in records {
        let name = record.text("nome");
        if name.is_empty() {
            sink.error("playlist without a name; record skipped", record);
            continue;
        }

        let (titles, repeated) = dedup_titles(record.list("itens"));
        if !repeated.is_empty() {
            sink.warn(format!(
                "playlist '{name}' lists repeated items {}; keeping the first occurrence of each",
                quoted_list(&repeated)
            ));
        }

        tracing::debug!(name, items = titles.len(), "Loaded playlist shell");
        shells.push(PlaylistShell {
            name: name.to_string(),
            owner_name: record.text("usuario").to_string(),
            titles,
        });
    }

    shells
}

/// Renders titles as `['A', 'B']` for diagnostics.
pub(crate) fn quoted_list(titles: &[String]) -> String {
    let quoted: Vec<String> = titles.iter().map(|t| format!("'{t}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Checks the shared title rules for tracks and episodes.
///
/// Returns the trimmed title when the record may proceed.
fn media_title<'r>(
    record: &'r RawRecord,
    label: &str,
    library: &Library,
    sink: &mut DiagnosticsSink,
) -> Option<&'r str> {
    let title = record.text("titulo");
    if title.is_empty() {
        sink.error(format!("{label} without a title; record skipped"), record);
        return None;
    }
    if library.contains_media(title) {
        sink.warn(format!(
            "duplicate media title '{title}'; keeping the first occurrence"
        ));
        return None;
    }
    Some(title)
}

/// Whole seconds, strictly positive.
fn parse_duration(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|seconds| *seconds > 0)
}

/// Keeps the first occurrence of each natural key, in order.
///
/// Blank titles are kept like any other, so the resolver reports them as
/// unknown items.
fn dedup_titles(titles: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(titles.len());
    let mut repeated = Vec::new();

    for title in titles {
        if seen.insert(NaturalKey::new(&title)) {
            unique.push(title);
        } else {
            repeated.push(title);
        }
    }

    (unique, repeated)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(lines: &[&str]) -> RawRecord {
        let mut record = RawRecord::new();
        for line in lines {
            record.insert_line(line);
        }
        record
    }

    #[test]
    fn test_duplicate_user_keeps_first() {
        let mut library = Library::new();
        let mut sink = DiagnosticsSink::new();
        load_users(
            &[record(&["nome: Ana"]), record(&["nome:  ana "]), record(&["nome: Bia"])],
            &mut library,
            &mut sink,
        );
        let names: Vec<&str> = library.users().iter().map(User::name).collect();
        assert_eq!(names, vec!["Ana", "Bia"]);
        assert_eq!(sink.warnings().len(), 1);
        assert!(sink.errors().is_empty());
    }

    #[test]
    fn test_user_without_name_is_an_error() {
        let mut library = Library::new();
        let mut sink = DiagnosticsSink::new();
        load_users(&[record(&["nome:   "])], &mut library, &mut sink);
        assert!(library.users().is_empty());
        assert_eq!(sink.errors().len(), 1);
        assert!(sink.errors()[0].record.is_some());
    }

    #[test]
    fn test_invalid_track_duration_by_policy() {
        for (policy, errors, warnings) in [
            (ValidationPolicy::Strict, 1, 0),
            (ValidationPolicy::Lenient, 0, 1),
        ] {
            let mut library = Library::new();
            let mut sink = DiagnosticsSink::new();
            load_tracks(
                &[record(&["titulo: Broken", "duracao: abc"])],
                policy,
                &mut library,
                &mut sink,
            );
            assert_eq!(library.tracks().count(), 0);
            assert_eq!(sink.errors().len(), errors);
            assert_eq!(sink.warnings().len(), warnings);
        }
    }

    #[test]
    fn test_zero_duration_is_invalid() {
        assert_eq!(parse_duration("0"), None);
        assert_eq!(parse_duration("-3"), None);
        assert_eq!(parse_duration("180"), Some(180));
    }

    #[test]
    fn test_track_fields() {
        let mut library = Library::new();
        let mut sink = DiagnosticsSink::new();
        load_tracks(
            &[record(&[
                "titulo: Yesterday",
                "artista: The Beatles",
                "genero: Rock",
                "duracao: 125",
            ])],
            ValidationPolicy::Strict,
            &mut library,
            &mut sink,
        );
        let track = library.tracks().next().unwrap();
        assert_eq!(track.info().title(), "Yesterday");
        assert_eq!(track.info().performer(), "The Beatles");
        assert_eq!(track.genre(), "Rock");
        assert_eq!(track.info().duration_secs(), 125);
        assert_eq!(track.info().play_count(), 0);
    }

    #[test]
    fn test_episode_number_default_under_lenient_policy() {
        let mut library = Library::new();
        let mut sink = DiagnosticsSink::new();
        load_episodes(
            &[record(&["titulo: Pilot", "episodio: -1", "host: Ana", "duracao: 1800"])],
            ValidationPolicy::Lenient,
            &mut library,
            &mut sink,
        );
        let episode = library.episodes().next().unwrap();
        assert_eq!(episode.number(), DEFAULT_EPISODE_NUMBER);
        assert_eq!(episode.info().performer(), "Ana");
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_episode_number_rejected_under_strict_policy() {
        let mut library = Library::new();
        let mut sink = DiagnosticsSink::new();
        load_episodes(
            &[record(&["titulo: Pilot", "episodio: one", "duracao: 1800"])],
            ValidationPolicy::Strict,
            &mut library,
            &mut sink,
        );
        assert_eq!(library.episodes().count(), 0);
        assert_eq!(sink.errors().len(), 1);
    }

    #[test]
    fn test_tracks_and_episodes_share_titles() {
        let mut library = Library::new();
        let mut sink = DiagnosticsSink::new();
        load_tracks(
            &[record(&["titulo: Pilot", "duracao: 100"])],
            ValidationPolicy::Strict,
            &mut library,
            &mut sink,
        );
        load_episodes(
            &[record(&["titulo: PILOT", "episodio: 1", "duracao: 1800"])],
            ValidationPolicy::Strict,
            &mut library,
            &mut sink,
        );
        assert_eq!(library.media().len(), 1);
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_playlist_dedup_reports_once() {
        let mut sink = DiagnosticsSink::new();
        let shells = load_playlists(
            &[record(&["nome: Mix", "usuario: Ana", "itens: [B, A, b, A, C]"])],
            &mut sink,
        );
        assert_eq!(shells.len(), 1);
        assert_eq!(shells[0].titles, vec!["B", "A", "C"]);
        assert_eq!(shells[0].owner_name, "Ana");
        assert_eq!(sink.warnings().len(), 1);
        assert!(sink.warnings()[0].message.contains("['b', 'A']"));
    }

    #[test]
    fn test_blank_items_survive_dedup() {
        let mut sink = DiagnosticsSink::new();
        let shells = load_playlists(&[record(&["nome: Mix", "itens: [A, , B, ]"])], &mut sink);
        assert_eq!(shells[0].titles, vec!["A", "", "B"]);
        assert_eq!(sink.warnings().len(), 1);
        assert!(sink.warnings()[0].message.contains("['']"));
    }

    #[test]
    fn test_playlist_without_name_is_an_error() {
        let mut sink = DiagnosticsSink::new();
        let shells = load_playlists(&[record(&["usuario: Ana"])], &mut sink);
        assert!(shells.is_empty());
        assert_eq!(sink.errors().len(), 1);
    }
}
