use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create playlists table
        manager
            .create_table(
                Table::create()
                    .table("playlists")
                    .if_not_exists()
                    .col(
                        ColumnDef::new("id")
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new("name").string_len(100).not_null())
                    .col(ColumnDef::new("description").text())
                    .col(ColumnDef::new("created_at").timestamp().not_null())
                    .col(ColumnDef::new("updated_at").timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Playlist names are unique; the index is the authoritative guard,
        // duplicate inserts surface as a constraint violation.
        manager
            .create_index(
                Index::create()
                    .name("ux_playlists_name")
                    .table("playlists")
                    .col("name")
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Create songs table
        manager
            .create_table(
                Table::create()
                    .table("songs")
                    .if_not_exists()
                    .col(
                        ColumnDef::new("id")
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new("title").string_len(150).not_null())
                    .col(ColumnDef::new("artist").string_len(150).not_null())
                    .col(ColumnDef::new("album").string())
                    .col(ColumnDef::new("file_path").string())
                    .col(ColumnDef::new("created_at").timestamp().not_null())
                    .col(ColumnDef::new("updated_at").timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create playlist_songs junction table
        manager
            .create_table(
                Table::create()
                    .table("playlist_songs")
                    .if_not_exists()
                    .col(ColumnDef::new("playlist_id").integer().not_null())
                    .col(ColumnDef::new("song_id").integer().not_null())
                    .col(ColumnDef::new("created_at").timestamp().not_null())
                    .col(ColumnDef::new("updated_at").timestamp().not_null())
                    .primary_key(Index::create().col("playlist_id").col("song_id"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_playlist_songs_playlist_id")
                            .from("playlist_songs", "playlist_id")
                            .to("playlists", "id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_playlist_songs_song_id")
                            .from("playlist_songs", "song_id")
                            .to("songs", "id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order
        manager
            .drop_table(Table::drop().table("playlist_songs").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table("songs").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table("playlists").to_owned())
            .await?;

        Ok(())
    }
}
