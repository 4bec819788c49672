use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "created_by")]
    pub created_by: i64,
    pub name: String,
    #[sea_orm(column_name = "min_players", column_type = "SmallInteger")]
    pub min_players: i16,
    #[sea_orm(column_name = "max_players", column_type = "SmallInteger")]
    pub max_players: i16,
    #[sea_orm(column_name = "playtime_min")]
    pub playtime_min: Option<i32>,
    #[sea_orm(column_name = "is_coop")]
    pub is_coop: bool,
    #[sea_orm(column_name = "year_published", column_type = "SmallInteger")]
    pub year_published: Option<i16>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::game_shares::Entity")]
    GameShares,
    #[sea_orm(has_many = "super::matches::Entity")]
    Matches,
    #[sea_orm(has_many = "super::scoresheets::Entity")]
    Scoresheets,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::game_shares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameShares.def()
    }
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
