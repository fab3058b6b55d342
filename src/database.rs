use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Open or create a database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create database directory: {}",
                parent.display()
            ))?;
        }

        // Create SQLite connection URL
        let url = format!("sqlite://{}?mode=rwc", path.display());

        // Configure connection options
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(8))
            .max_lifetime(Duration::from_secs(8))
            .sqlx_logging(false);

        let conn = SeaDatabase::connect(opt)
            .await
            .context(format!("Failed to open database: {}", path.display()))?;

        // Cascade rules depend on foreign keys being enforced
        conn.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .context("Failed to enable foreign key enforcement")?;

        // Run migrations
        log::debug!("Running database migrations");
        migration::Migrator::up(&conn, None)
            .await
            .context("Failed to run database migrations")?;

        log::info!("Database ready at: {}", path.display());
        Ok(Database { conn })
    }
}
