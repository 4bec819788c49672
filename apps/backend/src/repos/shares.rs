//! Share repository functions for games and players.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::game_shares::{self, SharePermission};
use crate::entities::player_shares;
use crate::errors::domain::DomainError;
use crate::infra::db_errors;

/// Game share domain model. `id` is the `sharedGameId` on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct GameShare {
    pub id: i64,
    pub game_id: i64,
    pub owner_id: i64,
    pub shared_with_id: i64,
    pub permission: SharePermission,
}

impl From<game_shares::Model> for GameShare {
    fn from(m: game_shares::Model) -> Self {
        Self {
            id: m.id,
            game_id: m.game_id,
            owner_id: m.owner_id,
            shared_with_id: m.shared_with_id,
            permission: m.permission,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerShare {
    pub id: i64,
    pub player_id: i64,
    pub owner_id: i64,
    pub shared_with_id: i64,
    pub permission: SharePermission,
}

impl From<player_shares::Model> for PlayerShare {
    fn from(m: player_shares::Model) -> Self {
        Self {
            id: m.id,
            player_id: m.player_id,
            owner_id: m.owner_id,
            shared_with_id: m.shared_with_id,
            permission: m.permission,
        }
    }
}

/// Lookup by share id alone; recipient scoping is the caller's concern
/// (resolution distinguishes "no such share" from "not your share").
pub async fn find_game_share_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    share_id: i64,
) -> Result<Option<GameShare>, DomainError> {
    let share = game_shares::Entity::find()
        .filter(game_shares::Column::Id.eq(share_id))
        .one(conn)
        .await
        .map_err(db_errors::map_db_err)?;
    Ok(share.map(GameShare::from))
}

/// All game shares addressed to `user_id`.
pub async fn game_shares_for_recipient<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<GameShare>, DomainError> {
    let shares = game_shares::Entity::find()
        .filter(game_shares::Column::SharedWithId.eq(user_id))
        .all(conn)
        .await
        .map_err(db_errors::map_db_err)?;
    Ok(shares.into_iter().map(GameShare::from).collect())
}

pub async fn create_game_share<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    owner_id: i64,
    shared_with_id: i64,
    permission: SharePermission,
) -> Result<GameShare, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let share = game_shares::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        owner_id: Set(owner_id),
        shared_with_id: Set(shared_with_id),
        permission: Set(permission),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(db_errors::map_db_err)?;

    Ok(GameShare::from(share))
}

/// All player shares addressed to `user_id`.
pub async fn player_shares_for_recipient<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<PlayerShare>, DomainError> {
    let shares = player_shares::Entity::find()
        .filter(player_shares::Column::SharedWithId.eq(user_id))
        .all(conn)
        .await
        .map_err(db_errors::map_db_err)?;
    Ok(shares.into_iter().map(PlayerShare::from).collect())
}

pub async fn create_player_share<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    owner_id: i64,
    shared_with_id: i64,
    permission: SharePermission,
) -> Result<PlayerShare, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let share = player_shares::ActiveModel {
        id: NotSet,
        player_id: Set(player_id),
        owner_id: Set(owner_id),
        shared_with_id: Set(shared_with_id),
        permission: Set(permission),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(db_errors::map_db_err)?;

    Ok(PlayerShare::from(share))
}
