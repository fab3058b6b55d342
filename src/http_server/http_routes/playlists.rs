use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::entities;
use crate::http_server::error::ApiError;
use crate::http_server::http_routes::songs::SongResponse;
use crate::http_server::state::AppState;
use crate::services::playlist::{NewPlaylist, PlaylistService, SkippedSong};

#[derive(Serialize)]
pub struct PlaylistResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<entities::playlist::Model> for PlaylistResponse {
    fn from(model: entities::playlist::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

#[derive(Deserialize)]
pub struct CreatePlaylistRequest {
    name: String,
    description: Option<String>,
}

#[derive(Serialize)]
pub struct PlaylistDetailResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub songs: Vec<SongResponse>,
}

#[derive(Deserialize)]
pub struct AddSongsRequest {
    song_ids: Vec<i64>,
}

#[derive(Serialize)]
pub struct SkippedSongResponse {
    pub song_id: i64,
    pub reason: String,
}

impl From<SkippedSong> for SkippedSongResponse {
    fn from(skipped: SkippedSong) -> Self {
        Self {
            song_id: skipped.song_id,
            reason: skipped.reason.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct AddSongsResponse {
    pub added: usize,
    pub skipped: Vec<SkippedSongResponse>,
}

pub async fn list_playlists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlaylistResponse>>, ApiError> {
    let service = PlaylistService::new(state.db.clone());
    let playlists = service.list().await?;
    Ok(Json(playlists.into_iter().map(Into::into).collect()))
}

pub async fn create_playlist(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePlaylistRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = PlaylistService::new(state.db.clone());
    let playlist = service
        .create(NewPlaylist {
            name: request.name,
            description: request.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(PlaylistResponse::from(playlist))))
}

pub async fn playlist_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PlaylistDetailResponse>, ApiError> {
    let service = PlaylistService::new(state.db.clone());
    let detail = service.detail(id).await?;
    Ok(Json(PlaylistDetailResponse {
        id: detail.playlist.id,
        name: detail.playlist.name,
        description: detail.playlist.description,
        songs: detail.songs.into_iter().map(Into::into).collect(),
    }))
}

pub async fn delete_playlist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let service = PlaylistService::new(state.db.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every song not yet on the playlist, the candidate set for an add.
pub async fn available_songs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let service = PlaylistService::new(state.db.clone());
    let songs = service.available_songs(id).await?;
    Ok(Json(songs.into_iter().map(Into::into).collect()))
}

pub async fn add_songs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<AddSongsRequest>,
) -> Result<Json<AddSongsResponse>, ApiError> {
    let service = PlaylistService::new(state.db.clone());
    let outcome = service.add_songs(id, &request.song_ids).await?;
    Ok(Json(AddSongsResponse {
        added: outcome.added,
        skipped: outcome.skipped.into_iter().map(Into::into).collect(),
    }))
}

pub async fn remove_song(
    State(state): State<Arc<AppState>>,
    Path((id, song_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let service = PlaylistService::new(state.db.clone());
    service.remove_song(id, song_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
