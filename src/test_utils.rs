use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectOptions, ConnectionTrait,
    Database as SeaDatabase, Set,
};

use crate::database::Database;
use crate::entities;

pub async fn test_db() -> Arc<Database> {
    // Single connection so the in-memory database and its pragma are shared
    // by every query in the test
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).sqlx_logging(false);

    let conn = SeaDatabase::connect(opt).await.unwrap();

    // Enable foreign keys
    conn.execute_unprepared("PRAGMA foreign_keys = ON")
        .await
        .unwrap();

    migration::Migrator::up(&conn, None).await.unwrap();

    Arc::new(Database { conn })
}

pub async fn insert_playlist(db: &Database, name: &str) -> entities::playlist::Model {
    let playlist = entities::playlist::ActiveModel {
        name: Set(name.into()),
        description: Set(None),
        ..entities::playlist::ActiveModel::new()
    };
    playlist.insert(&db.conn).await.unwrap()
}

pub async fn insert_song(db: &Database, title: &str, artist: &str) -> entities::song::Model {
    let song = entities::song::ActiveModel {
        title: Set(title.into()),
        artist: Set(artist.into()),
        album: Set(None),
        file_path: Set(None),
        ..entities::song::ActiveModel::new()
    };
    song.insert(&db.conn).await.unwrap()
}
