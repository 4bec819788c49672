use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Access level stored on share rows. Mirrors the wire-level
/// `contract::SharePermission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "share_permission")]
pub enum SharePermission {
    #[sea_orm(string_value = "VIEW")]
    View,
    #[sea_orm(string_value = "EDIT")]
    Edit,
}

impl SharePermission {
    /// Whether this permission grants write access. Mirrors
    /// [`contract::SharePermission::can_edit`].
    pub fn can_edit(&self) -> bool {
        matches!(self, SharePermission::Edit)
    }
}

impl From<SharePermission> for contract::SharePermission {
    fn from(p: SharePermission) -> Self {
        match p {
            SharePermission::View => contract::SharePermission::View,
            SharePermission::Edit => contract::SharePermission::Edit,
        }
    }
}

impl From<contract::SharePermission> for SharePermission {
    fn from(p: contract::SharePermission) -> Self {
        match p {
            contract::SharePermission::View => SharePermission::View,
            contract::SharePermission::Edit => SharePermission::Edit,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_shares")]
pub struct Model {
    /// This id is the `sharedGameId` clients use in `GameRef::Shared`.
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_id")]
    pub game_id: i64,
    #[sea_orm(column_name = "owner_id")]
    pub owner_id: i64,
    #[sea_orm(column_name = "shared_with_id")]
    pub shared_with_id: i64,
    pub permission: SharePermission,
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
        belongs_to = "super::users::Entity",
        from = "Column::SharedWithId",
        to = "super::users::Column::Id"
    )]
    Recipient,
    #[sea_orm(has_many = "super::matches::Entity")]
    Matches,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
