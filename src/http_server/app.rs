use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::database::Database;
use crate::http_server::{http_routes, state::AppState};

async fn root() -> &'static str {
    "playlist-manager"
}

pub struct HttpServerConfig {
    pub port: u16,
    pub database: Database,
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState {
        db: Arc::new(config.database),
    });

    // Single-user catalog tool; browsers talking to localhost
    let cors_layer = CorsLayer::permissive();

    let app = Router::new()
        .route("/", get(root))
        .route(
            "/playlists",
            get(http_routes::playlists::list_playlists).post(http_routes::playlists::create_playlist),
        )
        .route(
            "/playlists/{id}",
            get(http_routes::playlists::playlist_detail)
                .delete(http_routes::playlists::delete_playlist),
        )
        .route(
            "/playlists/{id}/available-songs",
            get(http_routes::playlists::available_songs),
        )
        .route(
            "/playlists/{id}/songs",
            post(http_routes::playlists::add_songs),
        )
        .route(
            "/playlists/{id}/songs/{song_id}",
            delete(http_routes::playlists::remove_song),
        )
        .route(
            "/songs",
            get(http_routes::songs::list_songs).post(http_routes::songs::create_song),
        )
        .route(
            "/songs/{id}",
            get(http_routes::songs::song_detail).delete(http_routes::songs::delete_song),
        )
        .layer(ServiceBuilder::new().layer(cors_layer))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", config.port))?;
    log::info!("Listening on 0.0.0.0:{}", config.port);
    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}
