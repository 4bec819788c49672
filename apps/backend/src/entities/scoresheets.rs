use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Scoring model for a sheet. Mirrors the wire-level
/// `contract::scoresheets::ScoringKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "scoring_kind")]
pub enum ScoringKind {
    #[sea_orm(string_value = "AGGREGATE")]
    Aggregate,
    #[sea_orm(string_value = "MANUAL")]
    Manual,
    #[sea_orm(string_value = "COOP")]
    Coop,
}

impl From<ScoringKind> for contract::scoresheets::ScoringKind {
    fn from(k: ScoringKind) -> Self {
        match k {
            ScoringKind::Aggregate => contract::scoresheets::ScoringKind::Aggregate,
            ScoringKind::Manual => contract::scoresheets::ScoringKind::Manual,
            ScoringKind::Coop => contract::scoresheets::ScoringKind::Coop,
        }
    }
}

impl From<contract::scoresheets::ScoringKind> for ScoringKind {
    fn from(k: contract::scoresheets::ScoringKind) -> Self {
        match k {
            contract::scoresheets::ScoringKind::Aggregate => ScoringKind::Aggregate,
            contract::scoresheets::ScoringKind::Manual => ScoringKind::Manual,
            contract::scoresheets::ScoringKind::Coop => ScoringKind::Coop,
        }
    }
}

/// Scoring template attached to a game (original or shared; exactly one of
/// `game_id` / `game_share_id` is set).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scoresheets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_id")]
    pub game_id: Option<i64>,
    #[sea_orm(column_name = "game_share_id")]
    pub game_share_id: Option<i64>,
    #[sea_orm(column_name = "created_by")]
    pub created_by: i64,
    pub name: String,
    #[sea_orm(column_name = "scoring_kind")]
    pub scoring_kind: ScoringKind,
    #[sea_orm(column_name = "is_default")]
    pub is_default: bool,
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
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
