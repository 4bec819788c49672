//! Handlers for the `player` namespace.

use contract::players::{CreatePlayer, PlayerOut};
use contract::{GameRef, NoInput, PlayerRef};
use sea_orm::DatabaseTransaction;

use crate::error::AppError;
use crate::repos::games;
use crate::repos::players::{self, Player, VisiblePlayer};
use crate::rpc::context::Ctx;

fn owned_out(player: Player) -> PlayerOut {
    PlayerOut {
        player_ref: PlayerRef::Original { id: player.id },
        name: player.name,
        linked_user_id: player.linked_user_id,
        permission: None,
    }
}

fn visible_out(visible: VisiblePlayer) -> PlayerOut {
    match visible.shared_as {
        None => owned_out(visible.player),
        Some((share_id, permission)) => PlayerOut {
            player_ref: PlayerRef::Shared {
                shared_player_id: share_id,
            },
            name: visible.player.name,
            linked_user_id: visible.player.linked_user_id,
            permission: Some(permission.into()),
        },
    }
}

pub async fn create(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    input: CreatePlayer,
) -> Result<PlayerOut, AppError> {
    let player = players::create_player(
        txn,
        players::PlayerCreate {
            created_by: ctx.user_id,
            name: input.name,
            linked_user_id: input.linked_user_id,
        },
    )
    .await?;

    Ok(owned_out(player))
}

pub async fn list(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    _input: NoInput,
) -> Result<Vec<PlayerOut>, AppError> {
    let visible = players::list_visible(txn, ctx.user_id).await?;
    Ok(visible.into_iter().map(visible_out).collect())
}

/// Players with at least one recorded match in the referenced game. Unknown
/// references yield an empty collection.
pub async fn get_for_game(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    input: GameRef,
) -> Result<Vec<PlayerOut>, AppError> {
    let Some(resolved) = games::resolve_game_ref(txn, input, ctx.user_id).await? else {
        return Ok(Vec::new());
    };

    let found = players::players_for_scope(txn, resolved.scope()).await?;
    Ok(found.into_iter().map(owned_out).collect())
}
