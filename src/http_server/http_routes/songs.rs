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
use crate::http_server::http_routes::playlists::PlaylistResponse;
use crate::http_server::state::AppState;
use crate::services::song::{NewSong, SongService};

#[derive(Serialize)]
pub struct SongResponse {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub file_path: Option<String>,
}

impl From<entities::song::Model> for SongResponse {
    fn from(model: entities::song::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            artist: model.artist,
            album: model.album,
            file_path: model.file_path,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateSongRequest {
    title: String,
    artist: String,
    album: Option<String>,
    file_path: Option<String>,
}

#[derive(Serialize)]
pub struct SongDetailResponse {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub file_path: Option<String>,
    pub playlists: Vec<PlaylistResponse>,
}

pub async fn list_songs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let service = SongService::new(state.db.clone());
    let songs = service.list().await?;
    Ok(Json(songs.into_iter().map(Into::into).collect()))
}

pub async fn create_song(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateSongRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SongService::new(state.db.clone());
    let song = service
        .create(NewSong {
            title: request.title,
            artist: request.artist,
            album: request.album,
            file_path: request.file_path,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(SongResponse::from(song))))
}

pub async fn song_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SongDetailResponse>, ApiError> {
    let service = SongService::new(state.db.clone());
    let detail = service.detail(id).await?;
    Ok(Json(SongDetailResponse {
        id: detail.song.id,
        title: detail.song.title,
        artist: detail.song.artist,
        album: detail.song.album,
        file_path: detail.song.file_path,
        playlists: detail.playlists.into_iter().map(Into::into).collect(),
    }))
}

pub async fn delete_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let service = SongService::new(state.db.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
