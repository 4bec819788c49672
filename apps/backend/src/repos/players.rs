//! Player repository functions.

use std::collections::BTreeMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::game_shares::SharePermission;
use crate::entities::{match_players, matches, players};
use crate::errors::domain::DomainError;
use crate::infra::db_errors;
use crate::repos::games::GameScope;
use crate::repos::shares;

/// Player domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i64,
    pub created_by: i64,
    pub name: String,
    pub linked_user_id: Option<i64>,
}

impl From<players::Model> for Player {
    fn from(m: players::Model) -> Self {
        Self {
            id: m.id,
            created_by: m.created_by,
            name: m.name,
            linked_user_id: m.linked_user_id,
        }
    }
}

/// A player visible to the actor: owned directly, or reaching them through a
/// share (in which case the grant rides along).
#[derive(Debug, Clone, PartialEq)]
pub struct VisiblePlayer {
    pub player: Player,
    pub shared_as: Option<(i64, SharePermission)>,
}

#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub created_by: i64,
    pub name: String,
    pub linked_user_id: Option<i64>,
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<Player, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let player = players::ActiveModel {
        id: NotSet,
        created_by: Set(dto.created_by),
        name: Set(dto.name),
        linked_user_id: Set(dto.linked_user_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(db_errors::map_db_err)?;

    Ok(Player::from(player))
}

/// Players the actor owns plus players shared with them, owned first.
pub async fn list_visible<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<VisiblePlayer>, DomainError> {
    let owned = players::Entity::find()
        .filter(players::Column::CreatedBy.eq(user_id))
        .order_by_asc(players::Column::Id)
        .all(conn)
        .await
        .map_err(db_errors::map_db_err)?;

    let mut out: Vec<VisiblePlayer> = owned
        .into_iter()
        .map(|m| VisiblePlayer {
            player: Player::from(m),
            shared_as: None,
        })
        .collect();

    for grant in shares::player_shares_for_recipient(conn, user_id).await? {
        let Some(model) = players::Entity::find_by_id(grant.player_id)
            .one(conn)
            .await
            .map_err(db_errors::map_db_err)?
        else {
            continue; // share row outlived the player; skip rather than fail the listing
        };
        out.push(VisiblePlayer {
            player: Player::from(model),
            shared_as: Some((grant.id, grant.permission)),
        });
    }

    Ok(out)
}

/// Whether `player_id` is usable by the actor when recording a match:
/// owned directly or shared with them.
pub async fn find_usable_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    user_id: i64,
) -> Result<Option<Player>, DomainError> {
    let Some(model) = players::Entity::find_by_id(player_id)
        .one(conn)
        .await
        .map_err(db_errors::map_db_err)?
    else {
        return Ok(None);
    };

    if model.created_by == user_id {
        return Ok(Some(Player::from(model)));
    }

    let shared = shares::player_shares_for_recipient(conn, user_id)
        .await?
        .into_iter()
        .any(|grant| grant.player_id == player_id);
    if shared {
        Ok(Some(Player::from(model)))
    } else {
        Ok(None)
    }
}

/// Distinct players with at least one recorded match in the scope, ordered by
/// player id. The scope has already been authorized by game-ref resolution.
pub async fn players_for_scope<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scope: GameScope,
) -> Result<Vec<Player>, DomainError> {
    let match_filter = match scope {
        GameScope::Original { game_id } => matches::Column::GameId.eq(game_id),
        GameScope::Shared { game_share_id } => matches::Column::GameShareId.eq(game_share_id),
    };

    let match_ids: Vec<i64> = matches::Entity::find()
        .filter(match_filter)
        .all(conn)
        .await
        .map_err(db_errors::map_db_err)?
        .into_iter()
        .map(|m| m.id)
        .collect();

    if match_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = match_players::Entity::find()
        .filter(match_players::Column::MatchId.is_in(match_ids))
        .find_also_related(players::Entity)
        .all(conn)
        .await
        .map_err(db_errors::map_db_err)?;

    // Dedup by player id, keep deterministic order
    let mut by_id: BTreeMap<i64, Player> = BTreeMap::new();
    for (_, player) in rows {
        if let Some(model) = player {
            by_id.entry(model.id).or_insert_with(|| Player::from(model));
        }
    }
    Ok(by_id.into_values().collect())
}
