//! Handlers for the `game` namespace.

use contract::games::{CreateGame, GameListItem, GameOut};
use contract::scoresheets::ScoresheetOut;
use contract::stats::{GameStatsOut, PlayerStatsRow};
use contract::{GameRef, NoInput};
use sea_orm::DatabaseTransaction;

use crate::error::AppError;
use crate::repos::games::{self, ResolvedGame};
use crate::repos::scoresheets::{self, Scoresheet};
use crate::repos::stats;
use crate::rpc::context::Ctx;

fn to_game_out(resolved: ResolvedGame) -> GameOut {
    GameOut {
        game_ref: resolved.game_ref,
        name: resolved.game.name,
        min_players: resolved.game.min_players,
        max_players: resolved.game.max_players,
        playtime_min: resolved.game.playtime_min,
        is_coop: resolved.game.is_coop,
        year_published: resolved.game.year_published,
        permission: resolved.permission.map(Into::into),
        created_at: resolved.game.created_at,
    }
}

fn to_scoresheet_out(sheet: Scoresheet) -> ScoresheetOut {
    ScoresheetOut {
        id: sheet.id,
        game: sheet.scope.to_ref(),
        name: sheet.name,
        scoring_kind: sheet.scoring_kind.into(),
        is_default: sheet.is_default,
        created_at: sheet.created_at,
    }
}

pub async fn create(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    input: CreateGame,
) -> Result<GameOut, AppError> {
    let game = games::create_game(
        txn,
        games::GameCreate {
            created_by: ctx.user_id,
            name: input.name,
            min_players: input.min_players,
            max_players: input.max_players,
            playtime_min: input.playtime_min,
            is_coop: input.is_coop,
            year_published: input.year_published,
        },
    )
    .await?;

    let game_ref = GameRef::Original { id: game.id };
    Ok(to_game_out(ResolvedGame {
        game,
        game_ref,
        permission: None,
    }))
}

pub async fn list(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    _input: NoInput,
) -> Result<Vec<GameListItem>, AppError> {
    let mut items: Vec<GameListItem> = games::list_owned(txn, ctx.user_id)
        .await?
        .into_iter()
        .map(|game| GameListItem {
            game_ref: GameRef::Original { id: game.id },
            name: game.name,
            min_players: game.min_players,
            max_players: game.max_players,
            is_coop: game.is_coop,
            year_published: game.year_published,
            permission: None,
        })
        .collect();

    for (grant, game) in games::list_shared_with(txn, ctx.user_id).await? {
        items.push(GameListItem {
            game_ref: GameRef::Shared {
                shared_game_id: grant.id,
            },
            name: game.name,
            min_players: game.min_players,
            max_players: game.max_players,
            is_coop: game.is_coop,
            year_published: game.year_published,
            permission: Some(grant.permission.into()),
        });
    }

    Ok(items)
}

/// Absence is a `null` result here; the caller decides whether that is an
/// error.
pub async fn get(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    input: GameRef,
) -> Result<Option<GameOut>, AppError> {
    let resolved = games::resolve_game_ref(txn, input, ctx.user_id).await?;
    Ok(resolved.map(to_game_out))
}

/// Scoresheets for a game. An unknown reference yields an empty collection,
/// matching the sentinel policy for collection reads.
pub async fn get_scoresheets(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    input: GameRef,
) -> Result<Vec<ScoresheetOut>, AppError> {
    let Some(resolved) = games::resolve_game_ref(txn, input, ctx.user_id).await? else {
        return Ok(Vec::new());
    };

    let sheets = scoresheets::list_for_scope(txn, resolved.scope()).await?;
    Ok(sheets.into_iter().map(to_scoresheet_out).collect())
}

pub async fn get_player_stats(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    input: GameRef,
) -> Result<Option<GameStatsOut>, AppError> {
    let Some(resolved) = games::resolve_game_ref(txn, input, ctx.user_id).await? else {
        return Ok(None);
    };

    let aggregated = stats::game_player_stats(txn, resolved.scope()).await?;
    Ok(Some(GameStatsOut {
        game_ref: resolved.game_ref,
        match_count: aggregated.match_count,
        players: aggregated
            .players
            .into_iter()
            .map(|p| {
                let avg_placement = p.avg_placement();
                PlayerStatsRow {
                    player_id: p.player_id,
                    player_name: p.player_name,
                    plays: p.plays,
                    wins: p.wins,
                    best_score: p.best_score,
                    total_score: p.total_score,
                    avg_placement,
                }
            })
            .collect(),
    }))
}
