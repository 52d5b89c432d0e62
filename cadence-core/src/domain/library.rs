//! The loaded catalog and the operations callers run on it afterwards.

use serde::Serialize;

use crate::domain::{
    DomainError, Episode, Media, MediaId, NaturalKey, Playlist, PlaylistId, Track, User, UserId,
};
use crate::registry::Registry;

/// Every entity produced by one load, with its lookup registries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Library {
    users: Vec<User>,
    media: Vec<Media>,
    playlists: Vec<Playlist>,
    #[serde(skip)]
    user_index: Registry<UserId>,
    #[serde(skip)]
    media_index: Registry<MediaId>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(id.0)
    }

    /// Finds a user by natural key.
    pub fn user_by_name(&self, name: &str) -> Option<(UserId, &User)> {
        let id = self.user_index.get(name)?;
        self.user(id).map(|user| (id, user))
    }

    /// Tracks and episodes in load order.
    pub fn media(&self) -> &[Media] {
        &self.media
    }

    pub fn media_item(&self, id: MediaId) -> Option<&Media> {
        self.media.get(id.0)
    }

    /// Finds a track or episode by natural key.
    pub fn media_by_title(&self, title: &str) -> Option<(MediaId, &Media)> {
        let id = self.media_index.get(title)?;
        self.media_item(id).map(|media| (id, media))
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.media.iter().filter_map(Media::as_track)
    }

    pub fn episodes(&self) -> impl Iterator<Item = &Episode> {
        self.media.iter().filter_map(Media::as_episode)
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn playlist(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.get(id.0)
    }

    /// Ids of every playlist, in load order.
    pub fn playlist_ids(&self) -> impl Iterator<Item = PlaylistId> + use<> {
        (0..self.playlists.len()).map(PlaylistId)
    }

    /// Resolved members of a playlist, in playlist order.
    pub fn playlist_members(&self, id: PlaylistId) -> Vec<&Media> {
        self.playlist(id)
            .map(|playlist| {
                playlist
                    .members()
                    .iter()
                    .filter_map(|member| self.media_item(*member))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Increments the play count of one item.
    ///
    /// # Errors
    ///
    /// - `DomainError::UnknownMedia` - If the id does not belong to this library
    pub fn play_media(&mut self, id: MediaId) -> Result<(), DomainError> {
        let media = self
            .media
            .get_mut(id.0)
            .ok_or(DomainError::UnknownMedia { id })?;
        media.info_mut().record_play();
        tracing::debug!(title = media.title(), "Played media");
        Ok(())
    }

    /// Plays every member of a playlist once and counts one playlist play.
    ///
    /// # Errors
    ///
    /// - `DomainError::UnknownPlaylist` - If the id does not belong to this library
    pub fn play_playlist(&mut self, id: PlaylistId) -> Result<(), DomainError> {
        let playlist = self
            .playlists
            .get_mut(id.0)
            .ok_or(DomainError::UnknownPlaylist { id })?;
        playlist.record_play();
        let members = playlist.members().to_vec();
        for member in members {
            self.play_media(member)?;
        }
        Ok(())
    }

    /// Plays an item on behalf of a user and appends it to their history.
    ///
    /// # Errors
    ///
    /// - `DomainError::UnknownUser` - If the user id is not in this library
    /// - `DomainError::UnknownMedia` - If the media id is not in this library
    pub fn record_listen(&mut self, user: UserId, media: MediaId) -> Result<(), DomainError> {
        if self.user(user).is_none() {
            return Err(DomainError::UnknownUser { id: user });
        }
        self.play_media(media)?;
        let title = self.media[media.0].title().to_string();
        self.users[user.0].record_listen(&title);
        Ok(())
    }

    /// Adds a 0-5 score to a track.
    ///
    /// # Errors
    ///
    /// - `DomainError::UnknownMedia` - If the id is not in this library
    /// - `DomainError::NotATrack` - If the id names an episode
    /// - `DomainError::RatingOutOfRange` - If the score is outside 0..=5
    pub fn rate_track(&mut self, id: MediaId, score: i64) -> Result<(), DomainError> {
        match self.media.get_mut(id.0) {
            Some(Media::Track(track)) => track.rate(score),
            Some(Media::Episode(_)) => Err(DomainError::NotATrack { id }),
            None => Err(DomainError::UnknownMedia { id }),
        }
    }

    /// Appends the members of `other` to `target` and adds its play count.
    ///
    /// Members already in `target` are skipped; `other` is left unchanged.
    ///
    /// # Errors
    ///
    /// - `DomainError::UnknownPlaylist` - If either id is not in this library
    pub fn concat_playlists(
        &mut self,
        target: PlaylistId,
        other: PlaylistId,
    ) -> Result<(), DomainError> {
        let source = self
            .playlist(other)
            .ok_or(DomainError::UnknownPlaylist { id: other })?;
        let members = source.members().to_vec();
        let plays = source.play_count();

        let target_playlist = self
            .playlists
            .get_mut(target.0)
            .ok_or(DomainError::UnknownPlaylist { id: target })?;
        for member in members {
            target_playlist.attach_member(member);
        }
        target_playlist.add_plays(plays);
        Ok(())
    }

    /// Removes the first member of a playlist whose title matches `title` by
    /// natural key.
    ///
    /// Returns false when no member matches.
    ///
    /// # Errors
    ///
    /// - `DomainError::UnknownPlaylist` - If the id is not in this library
    pub fn remove_member(&mut self, id: PlaylistId, title: &str) -> Result<bool, DomainError> {
        let key = NaturalKey::new(title);
        let playlist = self
            .playlists
            .get(id.0)
            .ok_or(DomainError::UnknownPlaylist { id })?;
        let found = playlist.members().iter().copied().find(|member| {
            self.media_item(*member)
                .is_some_and(|media| NaturalKey::new(media.title()) == key)
        });

        let Some(member) = found else {
            return Ok(false);
        };
        let removed = self.playlists[id.0].detach_member(member);
        tracing::debug!(playlist = %id, %member, "Removed playlist member");
        Ok(removed)
    }

    /// Compares two playlists by natural-key name and owner name and by their
    /// member titles, ignoring member order.
    ///
    /// # Errors
    ///
    /// - `DomainError::UnknownPlaylist` - If either id is not in this library
    pub fn playlists_equivalent(&self, a: PlaylistId, b: PlaylistId) -> Result<bool, DomainError> {
        let first = self
            .playlist(a)
            .ok_or(DomainError::UnknownPlaylist { id: a })?;
        let second = self
            .playlist(b)
            .ok_or(DomainError::UnknownPlaylist { id: b })?;

        if NaturalKey::new(first.name()) != NaturalKey::new(second.name())
            || NaturalKey::new(first.owner_name()) != NaturalKey::new(second.owner_name())
        {
            return Ok(false);
        }
        Ok(self.member_keys(first) == self.member_keys(second))
    }

    /// Sorted natural keys of a playlist's member titles.
    fn member_keys(&self, playlist: &Playlist) -> Vec<NaturalKey> {
        let mut keys: Vec<NaturalKey> = playlist
            .members()
            .iter()
            .filter_map(|member| self.media_item(*member))
            .map(|media| NaturalKey::new(media.title()))
            .collect();
        keys.sort();
        keys
    }

    /// Registers a user. A natural-key clash returns the existing id.
    pub(crate) fn insert_user(&mut self, user: User) -> Result<UserId, UserId> {
        let id = UserId(self.users.len());
        self.user_index.insert(user.name(), id)?;
        self.users.push(user);
        Ok(id)
    }

    /// Registers a track or episode. A title clash returns the existing id.
    pub(crate) fn insert_media(&mut self, media: Media) -> Result<MediaId, MediaId> {
        let id = MediaId(self.media.len());
        self.media_index.insert(media.title(), id)?;
        self.media.push(media);
        Ok(id)
    }

    pub(crate) fn contains_media(&self, title: &str) -> bool {
        self.media_index.contains(title)
    }

    pub(crate) fn contains_user(&self, name: &str) -> bool {
        self.user_index.contains(name)
    }

    pub(crate) fn user_registry(&self) -> &Registry<UserId> {
        &self.user_index
    }

    pub(crate) fn media_registry(&self) -> &Registry<MediaId> {
        &self.media_index
    }

    pub(crate) fn push_playlist(&mut self, playlist: Playlist) -> PlaylistId {
        let id = PlaylistId(self.playlists.len());
        self.playlists.push(playlist);
        id
    }

    pub(crate) fn user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(id.0)
    }
}
