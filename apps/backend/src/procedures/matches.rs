//! Handlers for the `match` namespace.

use contract::matches::{
    CreateMatch, MatchDetail, MatchId, MatchOut, MatchPlayerOut, PlacementsUpdated,
};
use contract::GameRef;
use sea_orm::DatabaseTransaction;

use crate::error::AppError;
use crate::errors::domain::{DomainError, ForbiddenKind, NotFoundKind};
use crate::repos::games::{self, ResolvedGame};
use crate::repos::matches::{self, Match, MatchWithPlayers};
use crate::repos::players;
use crate::rpc::context::Ctx;

fn to_match_out(m: Match) -> MatchOut {
    MatchOut {
        id: m.id,
        game: m.scope.to_ref(),
        name: m.name,
        played_at: m.played_at,
        duration_sec: m.duration_sec,
        finished: m.finished,
        comment: m.comment,
        created_at: m.created_at,
    }
}

fn to_detail(detail: MatchWithPlayers) -> MatchDetail {
    MatchDetail {
        summary: to_match_out(detail.match_),
        players: detail
            .players
            .into_iter()
            .map(|row| MatchPlayerOut {
                player_id: row.player_id,
                player_name: row.player_name,
                score: row.score,
                placement: row.placement,
                is_winner: row.is_winner,
            })
            .collect(),
    }
}

/// Writes need a resolvable target: absence is an error here, unlike reads.
async fn resolve_for_write(
    txn: &DatabaseTransaction,
    game_ref: GameRef,
    ctx: Ctx,
) -> Result<ResolvedGame, AppError> {
    let resolved = games::resolve_game_ref(txn, game_ref, ctx.user_id)
        .await?
        .ok_or_else(|| {
            let kind = match game_ref {
                GameRef::Original { .. } => NotFoundKind::Game,
                GameRef::Shared { .. } => NotFoundKind::GameShare,
            };
            AppError::from(DomainError::not_found(
                kind,
                format!("{game_ref:?} does not resolve for this user"),
            ))
        })?;

    if !resolved.can_write() {
        return Err(DomainError::forbidden(
            ForbiddenKind::ViewOnlyShare,
            "share grants VIEW; recording matches requires EDIT".to_string(),
        )
        .into());
    }

    Ok(resolved)
}

pub async fn create(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    input: CreateMatch,
) -> Result<MatchOut, AppError> {
    let resolved = resolve_for_write(txn, input.game, ctx).await?;

    // Every listed player must be visible to the actor before anything is
    // written.
    for entry in &input.players {
        if players::find_usable_by_id(txn, entry.player_id, ctx.user_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found(
                NotFoundKind::Player,
                format!("player {} does not resolve for this user", entry.player_id),
            )
            .into());
        }
    }

    let created = matches::create_match(
        txn,
        matches::MatchCreate {
            scope: resolved.scope(),
            created_by: ctx.user_id,
            game_is_coop: resolved.game.is_coop,
            name: input.name,
            played_at: input
                .played_at
                .unwrap_or_else(time::OffsetDateTime::now_utc),
            duration_sec: input.duration_sec,
            finished: input.finished,
            comment: input.comment,
            players: input
                .players
                .into_iter()
                .map(|p| matches::MatchPlayerCreate {
                    player_id: p.player_id,
                    score: p.score,
                    is_winner: p.is_winner,
                })
                .collect(),
        },
    )
    .await?;

    Ok(to_match_out(created))
}

pub async fn get(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    input: MatchId,
) -> Result<Option<MatchDetail>, AppError> {
    let detail = matches::find_detail_by_id(txn, input.id, ctx.user_id).await?;
    Ok(detail.map(to_detail))
}

/// Bulk recompute of placements for every finished match of the referenced
/// game. Runs inside the request transaction, so the caller observes either
/// the full rewrite or none of it.
pub async fn update_all_placements(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    input: GameRef,
) -> Result<PlacementsUpdated, AppError> {
    let resolved = resolve_for_write(txn, input, ctx).await?;

    let (matches_seen, rows_changed) =
        matches::update_all_placements(txn, resolved.scope(), resolved.game.is_coop).await?;

    Ok(PlacementsUpdated {
        matches_seen,
        rows_changed,
    })
}
