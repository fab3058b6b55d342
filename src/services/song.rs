use std::sync::Arc;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::error::CatalogError;
use crate::services::require_bounded;

pub const MAX_TITLE_LEN: usize = 150;
pub const MAX_ARTIST_LEN: usize = 150;

/// Typed input for cataloging a song. `file_path` is an opaque,
/// already-validated storage reference supplied by the uploader.
#[derive(Debug, Clone)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub file_path: Option<String>,
}

/// A song together with the playlists that reference it, ordered by name.
pub struct SongDetail {
    pub song: entities::song::Model,
    pub playlists: Vec<entities::playlist::Model>,
}

pub struct SongService {
    db: Arc<Database>,
}

impl SongService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewSong) -> Result<entities::song::Model, CatalogError> {
        require_bounded("title", &input.title, MAX_TITLE_LEN)?;
        require_bounded("artist", &input.artist, MAX_ARTIST_LEN)?;

        let song = entities::song::ActiveModel {
            title: Set(input.title),
            artist: Set(input.artist),
            album: Set(input.album),
            file_path: Set(input.file_path),
            ..entities::song::ActiveModel::new()
        };

        let model = song.insert(&self.db.conn).await?;

        log::info!(
            "Song cataloged: '{}' by '{}' (ID: {})",
            model.title,
            model.artist,
            model.id
        );
        Ok(model)
    }

    pub async fn get(&self, id: i64) -> Result<entities::song::Model, CatalogError> {
        entities::song::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or_else(|| CatalogError::not_found("song", id))
    }

    pub async fn list(&self) -> Result<Vec<entities::song::Model>, CatalogError> {
        let songs = entities::song::Entity::find()
            .order_by_asc(entities::song::Column::Artist)
            .order_by_asc(entities::song::Column::Title)
            .all(&self.db.conn)
            .await?;
        Ok(songs)
    }

    /// Delete a song. Its associations go with it through the cascade rule
    /// on the join table; playlists are untouched.
    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        let result = entities::song::Entity::delete_by_id(id)
            .exec(&self.db.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(CatalogError::not_found("song", id));
        }

        log::info!("Song deleted (ID: {})", id);
        Ok(())
    }

    /// The song together with every playlist referencing it.
    pub async fn detail(&self, id: i64) -> Result<SongDetail, CatalogError> {
        let detail = self
            .db
            .conn
            .transaction::<_, SongDetail, CatalogError>(|txn| {
                Box::pin(async move {
                    let song = entities::song::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| CatalogError::not_found("song", id))?;

                    let playlist_ids: Vec<i64> = entities::playlist_song::Entity::find()
                        .filter(entities::playlist_song::Column::SongId.eq(id))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|link| link.playlist_id)
                        .collect();

                    let playlists = if playlist_ids.is_empty() {
                        Vec::new()
                    } else {
                        entities::playlist::Entity::find()
                            .filter(entities::playlist::Column::Id.is_in(playlist_ids))
                            .order_by_asc(entities::playlist::Column::Name)
                            .all(txn)
                            .await?
                    };

                    Ok(SongDetail { song, playlists })
                })
            })
            .await?;

        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::playlist::PlaylistService;
    use crate::test_utils::{insert_playlist, insert_song, test_db};
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let db = test_db().await;
        let service = SongService::new(db);

        let created = service
            .create(NewSong {
                title: "Go".into(),
                artist: "A".into(),
                album: Some("Singles".into()),
                file_path: Some("uploads/go.mp3".into()),
            })
            .await
            .unwrap();

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched.title, "Go");
        assert_eq!(fetched.artist, "A");
        assert_eq!(fetched.album.as_deref(), Some("Singles"));
        assert_eq!(fetched.file_path.as_deref(), Some("uploads/go.mp3"));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let db = test_db().await;
        let service = SongService::new(db);

        let err = service
            .create(NewSong {
                title: "".into(),
                artist: "X".into(),
                album: None,
                file_path: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation { field: "title", .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_overlong_title() {
        let db = test_db().await;
        let service = SongService::new(db);

        let err = service
            .create(NewSong {
                title: "T".repeat(MAX_TITLE_LEN + 1),
                artist: "X".into(),
                album: None,
                file_path: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation { field: "title", .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_artist() {
        let db = test_db().await;
        let service = SongService::new(db);

        let err = service
            .create(NewSong {
                title: "T".into(),
                artist: "   ".into(),
                album: None,
                file_path: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation { field: "artist", .. }));
    }

    #[tokio::test]
    async fn test_list_ordered_by_artist_then_title() {
        let db = test_db().await;
        insert_song(&db, "Stay", "B").await;
        insert_song(&db, "Zoom", "A").await;
        insert_song(&db, "Go", "A").await;

        let service = SongService::new(db);
        let songs = service.list().await.unwrap();
        let pairs: Vec<(&str, &str)> = songs
            .iter()
            .map(|s| (s.artist.as_str(), s.title.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "Go"), ("A", "Zoom"), ("B", "Stay")]);
    }

    #[tokio::test]
    async fn test_get_missing_song_is_not_found() {
        let db = test_db().await;
        let service = SongService::new(db);

        let err = service.get(999999).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound {
                entity: "song",
                id: 999999
            }
        ));
    }

    #[tokio::test]
    async fn test_detail_lists_referencing_playlists() {
        let db = test_db().await;
        let song = insert_song(&db, "Shared", "Band").await;
        let workout = insert_playlist(&db, "Workout").await;
        let chill = insert_playlist(&db, "Chill").await;

        let playlists = PlaylistService::new(db.clone());
        playlists.add_songs(workout.id, &[song.id]).await.unwrap();
        playlists.add_songs(chill.id, &[song.id]).await.unwrap();

        let service = SongService::new(db);
        let detail = service.detail(song.id).await.unwrap();
        assert_eq!(detail.song.id, song.id);
        let names: Vec<&str> = detail.playlists.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Chill", "Workout"]);
    }

    #[tokio::test]
    async fn test_delete_song_cascades_but_keeps_playlists() {
        let db = test_db().await;
        let song = insert_song(&db, "Doomed", "Band").await;
        let playlist = insert_playlist(&db, "Keeper").await;

        let playlists = PlaylistService::new(db.clone());
        playlists.add_songs(playlist.id, &[song.id]).await.unwrap();

        let service = SongService::new(db.clone());
        service.delete(song.id).await.unwrap();

        let links = entities::playlist_song::Entity::find()
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(links, 0);

        let detail = playlists.detail(playlist.id).await.unwrap();
        assert!(detail.songs.is_empty());
        assert_eq!(detail.playlist.name, "Keeper");
    }

    #[tokio::test]
    async fn test_delete_missing_song_is_not_found() {
        let db = test_db().await;
        let service = SongService::new(db);

        let err = service.delete(42).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: "song", .. }));
    }
}
