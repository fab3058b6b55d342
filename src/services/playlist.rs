use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::error::CatalogError;
use crate::services::require_bounded;

pub const MAX_NAME_LEN: usize = 100;

/// Typed input for playlist creation; validated before it touches the store.
#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub name: String,
    pub description: Option<String>,
}

/// A playlist together with its songs, ordered by (artist, title).
pub struct PlaylistDetail {
    pub playlist: entities::playlist::Model,
    pub songs: Vec<entities::song::Model>,
}

/// Why a song id in a batch add was not turned into an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotFound,
    AlreadyPresent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => write!(f, "not found"),
            SkipReason::AlreadyPresent => write!(f, "already present"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedSong {
    pub song_id: i64,
    pub reason: SkipReason,
}

#[derive(Debug, Default)]
pub struct AddSongsOutcome {
    pub added: usize,
    pub skipped: Vec<SkippedSong>,
}

pub struct PlaylistService {
    db: Arc<Database>,
}

impl PlaylistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewPlaylist) -> Result<entities::playlist::Model, CatalogError> {
        require_bounded("name", &input.name, MAX_NAME_LEN)?;

        let name = input.name.clone();
        let playlist = entities::playlist::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            ..entities::playlist::ActiveModel::new()
        };

        let model = playlist.insert(&self.db.conn).await.map_err(|e| {
            // The unique index on playlists.name is the authoritative guard
            if CatalogError::is_unique_violation(&e) {
                CatalogError::Conflict(format!("playlist name '{}' is already taken", name))
            } else {
                CatalogError::Persistence(e)
            }
        })?;

        log::info!("Playlist created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    pub async fn get(&self, id: i64) -> Result<entities::playlist::Model, CatalogError> {
        entities::playlist::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or_else(|| CatalogError::not_found("playlist", id))
    }

    pub async fn list(&self) -> Result<Vec<entities::playlist::Model>, CatalogError> {
        let playlists = entities::playlist::Entity::find()
            .order_by_asc(entities::playlist::Column::Name)
            .all(&self.db.conn)
            .await?;
        Ok(playlists)
    }

    /// Delete a playlist. Its associations go with it through the cascade
    /// rule on the join table; songs are untouched.
    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        let result = entities::playlist::Entity::delete_by_id(id)
            .exec(&self.db.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(CatalogError::not_found("playlist", id));
        }

        log::info!("Playlist deleted (ID: {})", id);
        Ok(())
    }

    /// The playlist together with its songs, ordered by (artist, title).
    pub async fn detail(&self, id: i64) -> Result<PlaylistDetail, CatalogError> {
        let detail = self
            .db
            .conn
            .transaction::<_, PlaylistDetail, CatalogError>(|txn| {
                Box::pin(async move {
                    let playlist = entities::playlist::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| CatalogError::not_found("playlist", id))?;

                    let song_ids: Vec<i64> = entities::playlist_song::Entity::find()
                        .filter(entities::playlist_song::Column::PlaylistId.eq(id))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|link| link.song_id)
                        .collect();

                    let songs = if song_ids.is_empty() {
                        Vec::new()
                    } else {
                        entities::song::Entity::find()
                            .filter(entities::song::Column::Id.is_in(song_ids))
                            .order_by_asc(entities::song::Column::Artist)
                            .order_by_asc(entities::song::Column::Title)
                            .all(txn)
                            .await?
                    };

                    Ok(PlaylistDetail { playlist, songs })
                })
            })
            .await?;

        Ok(detail)
    }

    /// Every song with no live association to the playlist, ordered by
    /// (artist, title). Computed against the association set in one
    /// transaction so a concurrent add can't slip between the two reads.
    pub async fn available_songs(
        &self,
        playlist_id: i64,
    ) -> Result<Vec<entities::song::Model>, CatalogError> {
        let songs = self
            .db
            .conn
            .transaction::<_, Vec<entities::song::Model>, CatalogError>(|txn| {
                Box::pin(async move {
                    entities::playlist::Entity::find_by_id(playlist_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| CatalogError::not_found("playlist", playlist_id))?;

                    let linked: Vec<i64> = entities::playlist_song::Entity::find()
                        .filter(entities::playlist_song::Column::PlaylistId.eq(playlist_id))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|link| link.song_id)
                        .collect();

                    let mut query = entities::song::Entity::find();
                    if !linked.is_empty() {
                        query = query.filter(entities::song::Column::Id.is_not_in(linked));
                    }

                    let songs = query
                        .order_by_asc(entities::song::Column::Artist)
                        .order_by_asc(entities::song::Column::Title)
                        .all(txn)
                        .await?;

                    Ok(songs)
                })
            })
            .await?;

        Ok(songs)
    }

    /// Add a batch of songs to a playlist in one transaction. Missing songs
    /// and already-linked songs are reported under `skipped`; any other
    /// storage failure rolls the whole batch back.
    pub async fn add_songs(
        &self,
        playlist_id: i64,
        song_ids: &[i64],
    ) -> Result<AddSongsOutcome, CatalogError> {
        // Set semantics: duplicate ids in the request collapse to one
        let mut seen = HashSet::new();
        let song_ids: Vec<i64> = song_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let outcome = self
            .db
            .conn
            .transaction::<_, AddSongsOutcome, CatalogError>(|txn| {
                Box::pin(async move {
                    let playlist = entities::playlist::Entity::find_by_id(playlist_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| CatalogError::not_found("playlist", playlist_id))?;

                    let mut outcome = AddSongsOutcome::default();

                    for song_id in song_ids {
                        let song = entities::song::Entity::find_by_id(song_id).one(txn).await?;
                        if song.is_none() {
                            outcome.skipped.push(SkippedSong {
                                song_id,
                                reason: SkipReason::NotFound,
                            });
                            continue;
                        }

                        // Check if the song is already in the playlist
                        let existing = entities::playlist_song::Entity::find()
                            .filter(
                                Condition::all()
                                    .add(
                                        entities::playlist_song::Column::PlaylistId
                                            .eq(playlist_id),
                                    )
                                    .add(entities::playlist_song::Column::SongId.eq(song_id)),
                            )
                            .one(txn)
                            .await?;

                        if existing.is_some() {
                            outcome.skipped.push(SkippedSong {
                                song_id,
                                reason: SkipReason::AlreadyPresent,
                            });
                            continue;
                        }

                        let link = entities::playlist_song::ActiveModel {
                            playlist_id: Set(playlist_id),
                            song_id: Set(song_id),
                            ..entities::playlist_song::ActiveModel::new()
                        };

                        match entities::playlist_song::Entity::insert(link).exec(txn).await {
                            Ok(_) => outcome.added += 1,
                            // A racing writer got there first; the composite
                            // key reports it as already present
                            Err(e) if CatalogError::is_unique_violation(&e) => {
                                outcome.skipped.push(SkippedSong {
                                    song_id,
                                    reason: SkipReason::AlreadyPresent,
                                });
                            }
                            Err(e) => return Err(CatalogError::Persistence(e)),
                        }
                    }

                    if outcome.added > 0 {
                        let mut playlist_model: entities::playlist::ActiveModel = playlist.into();
                        playlist_model.updated_at = Set(Utc::now());
                        playlist_model.update(txn).await?;
                    }

                    Ok(outcome)
                })
            })
            .await?;

        log::debug!(
            "Added {} song(s) to playlist {} ({} skipped)",
            outcome.added,
            playlist_id,
            outcome.skipped.len()
        );
        Ok(outcome)
    }

    /// Remove the association between a playlist and a song. A no-op when
    /// the association does not exist.
    pub async fn remove_song(&self, playlist_id: i64, song_id: i64) -> Result<(), CatalogError> {
        let result = entities::playlist_song::Entity::delete_many()
            .filter(
                Condition::all()
                    .add(entities::playlist_song::Column::PlaylistId.eq(playlist_id))
                    .add(entities::playlist_song::Column::SongId.eq(song_id)),
            )
            .exec(&self.db.conn)
            .await?;

        log::debug!(
            "Removed song {} from playlist {} ({} row(s))",
            song_id,
            playlist_id,
            result.rows_affected
        );
        Ok(())
    }
}
