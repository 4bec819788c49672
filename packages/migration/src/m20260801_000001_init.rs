use sea_orm::Statement;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::extension::postgres::Type as PgType;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Sub,
    Username,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    CreatedBy,
    Name,
    MinPlayers,
    MaxPlayers,
    PlaytimeMin,
    IsCoop,
    YearPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GameShares {
    Table,
    Id,
    GameId,
    OwnerId,
    SharedWithId,
    Permission,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Players {
    Table,
    Id,
    CreatedBy,
    Name,
    LinkedUserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PlayerShares {
    Table,
    Id,
    PlayerId,
    OwnerId,
    SharedWithId,
    Permission,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Matches {
    Table,
    Id,
    GameId,
    GameShareId,
    CreatedBy,
    Name,
    PlayedAt,
    DurationSec,
    Finished,
    Comment,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MatchPlayers {
    Table,
    Id,
    MatchId,
    PlayerId,
    Score,
    Placement,
    IsWinner,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Scoresheets {
    Table,
    Id,
    GameId,
    GameShareId,
    CreatedBy,
    Name,
    ScoringKind,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SharePermissionEnum {
    #[iden = "share_permission"]
    Type,
}

#[derive(Iden)]
enum ScoringKindEnum {
    #[iden = "scoring_kind"]
    Type,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Postgres enums first; SQLite stores them as TEXT
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                async fn enum_exists(
                    manager: &SchemaManager<'_>,
                    enum_name: &str,
                ) -> Result<bool, DbErr> {
                    let result = manager
                        .get_connection()
                        .query_one(Statement::from_string(
                            sea_orm::DatabaseBackend::Postgres,
                            format!("SELECT 1 FROM pg_type WHERE typname = '{}'", enum_name),
                        ))
                        .await?;
                    Ok(result.is_some())
                }

                if !enum_exists(manager, "share_permission").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(SharePermissionEnum::Type)
                                .values(["VIEW", "EDIT"])
                                .to_owned(),
                        )
                        .await?;
                }

                if !enum_exists(manager, "scoring_kind").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(ScoringKindEnum::Type)
                                .values(["AGGREGATE", "MANUAL", "COOP"])
                                .to_owned(),
                        )
                        .await?;
                }
            }
            sea_orm::DatabaseBackend::Sqlite => {}
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".into()));
            }
        }

        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Users::Sub).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Games::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Games::Name).string().not_null())
                    .col(ColumnDef::new(Games::MinPlayers).small_integer().not_null())
                    .col(ColumnDef::new(Games::MaxPlayers).small_integer().not_null())
                    .col(ColumnDef::new(Games::PlaytimeMin).integer().null())
                    .col(ColumnDef::new(Games::IsCoop).boolean().not_null())
                    .col(ColumnDef::new(Games::YearPublished).small_integer().null())
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_created_by")
                            .from(Games::Table, Games::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_games_created_by")
                    .table(Games::Table)
                    .col(Games::CreatedBy)
                    .to_owned(),
            )
            .await?;

        // game_shares
        manager
            .create_table(
                Table::create()
                    .table(GameShares::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameShares::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GameShares::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GameShares::OwnerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameShares::SharedWithId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameShares::Permission)
                            .custom(SharePermissionEnum::Type)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameShares::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameShares::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_shares_game_id")
                            .from(GameShares::Table, GameShares::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_shares_owner_id")
                            .from(GameShares::Table, GameShares::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_shares_shared_with_id")
                            .from(GameShares::Table, GameShares::SharedWithId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // one share per (game, recipient)
        manager
            .create_index(
                Index::create()
                    .name("ux_game_shares_game_recipient")
                    .table(GameShares::Table)
                    .col(GameShares::GameId)
                    .col(GameShares::SharedWithId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_game_shares_shared_with_id")
                    .table(GameShares::Table)
                    .col(GameShares::SharedWithId)
                    .to_owned(),
            )
            .await?;

        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Players::Name).string().not_null())
                    .col(ColumnDef::new(Players::LinkedUserId).big_integer().null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Players::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_created_by")
                            .from(Players::Table, Players::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_linked_user_id")
                            .from(Players::Table, Players::LinkedUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_players_created_by")
                    .table(Players::Table)
                    .col(Players::CreatedBy)
                    .to_owned(),
            )
            .await?;

        // player_shares
        manager
            .create_table(
                Table::create()
                    .table(PlayerShares::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerShares::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(PlayerShares::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerShares::OwnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerShares::SharedWithId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerShares::Permission)
                            .custom(SharePermissionEnum::Type)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerShares::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerShares::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_shares_player_id")
                            .from(PlayerShares::Table, PlayerShares::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_shares_owner_id")
                            .from(PlayerShares::Table, PlayerShares::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_shares_shared_with_id")
                            .from(PlayerShares::Table, PlayerShares::SharedWithId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_player_shares_player_recipient")
                    .table(PlayerShares::Table)
                    .col(PlayerShares::PlayerId)
                    .col(PlayerShares::SharedWithId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // matches
        //
        // Exactly one of game_id / game_share_id is set; the pair mirrors the
        // original/shared tag on the wire. Enforced in the repository layer.
        manager
            .create_table(
                Table::create()
                    .table(Matches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Matches::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Matches::GameId).big_integer().null())
                    .col(ColumnDef::new(Matches::GameShareId).big_integer().null())
                    .col(ColumnDef::new(Matches::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Matches::Name).string().null())
                    .col(
                        ColumnDef::new(Matches::PlayedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Matches::DurationSec).integer().null())
                    .col(ColumnDef::new(Matches::Finished).boolean().not_null())
                    .col(ColumnDef::new(Matches::Comment).text().null())
                    .col(
                        ColumnDef::new(Matches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Matches::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_game_id")
                            .from(Matches::Table, Matches::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_game_share_id")
                            .from(Matches::Table, Matches::GameShareId)
                            .to(GameShares::Table, GameShares::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_created_by")
                            .from(Matches::Table, Matches::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_matches_game_id")
                    .table(Matches::Table)
                    .col(Matches::GameId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_matches_game_share_id")
                    .table(Matches::Table)
                    .col(Matches::GameShareId)
                    .to_owned(),
            )
            .await?;

        // match_players
        manager
            .create_table(
                Table::create()
                    .table(MatchPlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MatchPlayers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(MatchPlayers::MatchId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchPlayers::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MatchPlayers::Score).integer().null())
                    .col(ColumnDef::new(MatchPlayers::Placement).integer().null())
                    .col(ColumnDef::new(MatchPlayers::IsWinner).boolean().not_null())
                    .col(
                        ColumnDef::new(MatchPlayers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchPlayers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_players_match_id")
                            .from(MatchPlayers::Table, MatchPlayers::MatchId)
                            .to(Matches::Table, Matches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_players_player_id")
                            .from(MatchPlayers::Table, MatchPlayers::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_match_players_match_player")
                    .table(MatchPlayers::Table)
                    .col(MatchPlayers::MatchId)
                    .col(MatchPlayers::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // scoresheets
        manager
            .create_table(
                Table::create()
                    .table(Scoresheets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scoresheets::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Scoresheets::GameId).big_integer().null())
                    .col(
                        ColumnDef::new(Scoresheets::GameShareId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Scoresheets::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Scoresheets::Name).string().not_null())
                    .col(
                        ColumnDef::new(Scoresheets::ScoringKind)
                            .custom(ScoringKindEnum::Type)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Scoresheets::IsDefault).boolean().not_null())
                    .col(
                        ColumnDef::new(Scoresheets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Scoresheets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scoresheets_game_id")
                            .from(Scoresheets::Table, Scoresheets::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scoresheets_game_share_id")
                            .from(Scoresheets::Table, Scoresheets::GameShareId)
                            .to(GameShares::Table, GameShares::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scoresheets_created_by")
                            .from(Scoresheets::Table, Scoresheets::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_scoresheets_game_id")
                    .table(Scoresheets::Table)
                    .col(Scoresheets::GameId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scoresheets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MatchPlayers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Matches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlayerShares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GameShares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .drop_type(PgType::drop().name(SharePermissionEnum::Type).to_owned())
                .await?;
            manager
                .drop_type(PgType::drop().name(ScoringKindEnum::Type).to_owned())
                .await?;
        }

        Ok(())
    }
}
