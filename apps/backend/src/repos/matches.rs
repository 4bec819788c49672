//! Match repository functions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::domain::placements::{rank_by_score, RankedEntry, ScoredEntry};
use crate::entities::{match_players, matches, players};
use crate::errors::domain::{DomainError, ForbiddenKind, InfraErrorKind};
use crate::infra::db_errors;
use crate::repos::games::GameScope;

/// Match domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: i64,
    pub scope: GameScope,
    pub created_by: i64,
    pub name: Option<String>,
    pub played_at: time::OffsetDateTime,
    pub duration_sec: Option<i32>,
    pub finished: bool,
    pub comment: Option<String>,
    pub created_at: time::OffsetDateTime,
}

/// One participant row, joined with the player's name.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPlayerRow {
    pub row_id: i64,
    pub player_id: i64,
    pub player_name: String,
    pub score: Option<i32>,
    pub placement: Option<i32>,
    pub is_winner: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchWithPlayers {
    pub match_: Match,
    pub players: Vec<MatchPlayerRow>,
}

fn scope_of(model: &matches::Model) -> Result<GameScope, DomainError> {
    match (model.game_id, model.game_share_id) {
        (Some(game_id), None) => Ok(GameScope::Original { game_id }),
        (None, Some(game_share_id)) => Ok(GameScope::Shared { game_share_id }),
        _ => Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("match {} violates the game/share pair invariant", model.id),
        )),
    }
}

fn to_domain(model: matches::Model) -> Result<Match, DomainError> {
    let scope = scope_of(&model)?;
    Ok(Match {
        id: model.id,
        scope,
        created_by: model.created_by,
        name: model.name,
        played_at: model.played_at,
        duration_sec: model.duration_sec,
        finished: model.finished,
        comment: model.comment,
        created_at: model.created_at,
    })
}

#[derive(Debug, Clone)]
pub struct MatchPlayerCreate {
    pub player_id: i64,
    pub score: Option<i32>,
    /// Explicit winner override; `None` derives the flag from scores.
    pub is_winner: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct MatchCreate {
    pub scope: GameScope,
    pub created_by: i64,
    /// Needed to pick the winner-derivation rule; cooperative games never
    /// rank by score.
    pub game_is_coop: bool,
    pub name: Option<String>,
    pub played_at: time::OffsetDateTime,
    pub duration_sec: Option<i32>,
    pub finished: bool,
    pub comment: Option<String>,
    pub players: Vec<MatchPlayerCreate>,
}

/// Insert a match plus its participant rows.
///
/// Placements are derived from scores for finished competitive matches.
/// Explicit `is_winner` flags take precedence over derivation; for
/// cooperative games they are the only winner source.
pub async fn create_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MatchCreate,
) -> Result<Match, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let (game_id, game_share_id) = match dto.scope {
        GameScope::Original { game_id } => (Some(game_id), None),
        GameScope::Shared { game_share_id } => (None, Some(game_share_id)),
    };

    let inserted = matches::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        game_share_id: Set(game_share_id),
        created_by: Set(dto.created_by),
        name: Set(dto.name.clone()),
        played_at: Set(dto.played_at),
        duration_sec: Set(dto.duration_sec),
        finished: Set(dto.finished),
        comment: Set(dto.comment.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(db_errors::map_db_err)?;

    let derive_from_scores = dto.finished && !dto.game_is_coop;
    let has_explicit_winners = dto.players.iter().any(|p| p.is_winner.is_some());

    let ranked: Vec<RankedEntry> = if derive_from_scores {
        let entries: Vec<ScoredEntry> = dto
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| ScoredEntry {
                row_id: i as i64,
                score: p.score,
            })
            .collect();
        rank_by_score(&entries)
    } else {
        dto.players
            .iter()
            .enumerate()
            .map(|(i, _)| RankedEntry {
                row_id: i as i64,
                placement: None,
                is_winner: false,
            })
            .collect()
    };

    for (entry, rank) in dto.players.iter().zip(ranked.iter()) {
        let is_winner = match (has_explicit_winners, entry.is_winner) {
            (true, flag) => flag.unwrap_or(false),
            (false, _) => rank.is_winner,
        };
        let placement = if dto.game_is_coop { None } else { rank.placement };

        match_players::ActiveModel {
            id: NotSet,
            match_id: Set(inserted.id),
            player_id: Set(entry.player_id),
            score: Set(entry.score),
            placement: Set(placement),
            is_winner: Set(is_winner),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(db_errors::map_db_err)?;
    }

    to_domain(inserted)
}

/// Load one match the actor created, with participant rows. A match created
/// by someone else is Forbidden, not a miss.
pub async fn find_detail_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    user_id: i64,
) -> Result<Option<MatchWithPlayers>, DomainError> {
    let Some(model) = matches::Entity::find_by_id(match_id)
        .one(conn)
        .await
        .map_err(db_errors::map_db_err)?
    else {
        return Ok(None);
    };

    if model.created_by != user_id {
        return Err(DomainError::forbidden(
            ForbiddenKind::NotOwner,
            format!("match {match_id} was recorded by a different user"),
        ));
    }

    let match_ = to_domain(model)?;
    let players = player_rows(conn, match_id).await?;
    Ok(Some(MatchWithPlayers { match_, players }))
}

async fn player_rows<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<MatchPlayerRow>, DomainError> {
    let rows = match_players::Entity::find()
        .filter(match_players::Column::MatchId.eq(match_id))
        .order_by_asc(match_players::Column::Id)
        .find_also_related(players::Entity)
        .all(conn)
        .await
        .map_err(db_errors::map_db_err)?;

    rows.into_iter()
        .map(|(row, player)| {
            let player_name = player.map(|p| p.name).ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("match_players row {} has no player", row.id),
                )
            })?;
            Ok(MatchPlayerRow {
                row_id: row.id,
                player_id: row.player_id,
                player_name,
                score: row.score,
                placement: row.placement,
                is_winner: row.is_winner,
            })
        })
        .collect()
}

/// All matches recorded under the scope, oldest first.
pub async fn matches_in_scope<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scope: GameScope,
) -> Result<Vec<Match>, DomainError> {
    let filter = match scope {
        GameScope::Original { game_id } => matches::Column::GameId.eq(game_id),
        GameScope::Shared { game_share_id } => matches::Column::GameShareId.eq(game_share_id),
    };

    let rows = matches::Entity::find()
        .filter(filter)
        .order_by_asc(matches::Column::Id)
        .all(conn)
        .await
        .map_err(db_errors::map_db_err)?;

    rows.into_iter().map(to_domain).collect()
}

/// Recompute placements and winners from scores for every finished match in
/// the scope. Returns `(matches_seen, rows_changed)`.
///
/// Cooperative games keep their explicit winner flags and carry no
/// placements; competitive games are re-ranked from scores. Rows already
/// agreeing with the derivation are left untouched, so re-running against
/// unchanged data reports zero changes.
pub async fn update_all_placements<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scope: GameScope,
    game_is_coop: bool,
) -> Result<(u64, u64), DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let mut matches_seen = 0u64;
    let mut rows_changed = 0u64;

    for match_ in matches_in_scope(conn, scope).await? {
        if !match_.finished {
            continue;
        }
        matches_seen += 1;

        let rows = match_players::Entity::find()
            .filter(match_players::Column::MatchId.eq(match_.id))
            .order_by_asc(match_players::Column::Id)
            .all(conn)
            .await
            .map_err(db_errors::map_db_err)?;

        let targets: Vec<(i64, Option<i32>, bool)> = if game_is_coop {
            // Coop: no placements, winner flags stay as recorded
            rows.iter().map(|r| (r.id, None, r.is_winner)).collect()
        } else {
            let entries: Vec<ScoredEntry> = rows
                .iter()
                .map(|r| ScoredEntry {
                    row_id: r.id,
                    score: r.score,
                })
                .collect();
            rank_by_score(&entries)
                .into_iter()
                .map(|r| (r.row_id, r.placement, r.is_winner))
                .collect()
        };

        for (row, (row_id, placement, is_winner)) in rows.into_iter().zip(targets) {
            debug_assert_eq!(row.id, row_id);
            if row.placement == placement && row.is_winner == is_winner {
                continue;
            }
            let mut active = row.into_active_model();
            active.placement = Set(placement);
            active.is_winner = Set(is_winner);
            active.updated_at = Set(now);
            active.update(conn).await.map_err(db_errors::map_db_err)?;
            rows_changed += 1;
        }
    }

    Ok((matches_seen, rows_changed))
}
