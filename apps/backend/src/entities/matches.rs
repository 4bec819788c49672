use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One recorded play of a game.
///
/// Exactly one of `game_id` / `game_share_id` is set, mirroring the
/// original/shared tag on the wire. The repository layer enforces the pair
/// invariant on insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_id")]
    pub game_id: Option<i64>,
    #[sea_orm(column_name = "game_share_id")]
    pub game_share_id: Option<i64>,
    #[sea_orm(column_name = "created_by")]
    pub created_by: i64,
    pub name: Option<String>,
    #[sea_orm(column_name = "played_at")]
    pub played_at: OffsetDateTime,
    #[sea_orm(column_name = "duration_sec")]
    pub duration_sec: Option<i32>,
    pub finished: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id"
    )]
    Game,
    #[sea_orm(
        belongs_to = "super::game_shares::Entity",
        from = "Column::GameShareId",
        to = "super::game_shares::Column::Id"
    )]
    GameShare,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::match_players::Entity")]
    MatchPlayers,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::game_shares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameShare.def()
    }
}

impl Related<super::match_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchPlayers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
