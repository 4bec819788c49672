//! Per-game player statistics.
//!
//! Aggregates are computed over finished matches only; an in-progress match
//! contributes neither plays nor scores.

use std::collections::BTreeMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{match_players, players};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::infra::db_errors;
use crate::repos::games::GameScope;
use crate::repos::matches::matches_in_scope;

/// Aggregates for one player across the scope's finished matches.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAggregate {
    pub player_id: i64,
    pub player_name: String,
    pub plays: u32,
    pub wins: u32,
    pub best_score: Option<i32>,
    pub total_score: Option<i64>,
    pub placement_sum: i64,
    pub placement_count: u32,
}

impl PlayerAggregate {
    pub fn avg_placement(&self) -> Option<f64> {
        if self.placement_count == 0 {
            None
        } else {
            Some(self.placement_sum as f64 / self.placement_count as f64)
        }
    }
}

/// Statistics for a resolved game scope.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStats {
    pub match_count: u32,
    pub players: Vec<PlayerAggregate>,
}

/// Aggregate stats for every player appearing in the scope's finished
/// matches. Ordered by player id.
pub async fn game_player_stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scope: GameScope,
) -> Result<GameStats, DomainError> {
    let finished_ids: Vec<i64> = matches_in_scope(conn, scope)
        .await?
        .into_iter()
        .filter(|m| m.finished)
        .map(|m| m.id)
        .collect();

    let match_count = finished_ids.len() as u32;
    if finished_ids.is_empty() {
        return Ok(GameStats {
            match_count,
            players: Vec::new(),
        });
    }

    let rows = match_players::Entity::find()
        .filter(match_players::Column::MatchId.is_in(finished_ids))
        .find_also_related(players::Entity)
        .all(conn)
        .await
        .map_err(db_errors::map_db_err)?;

    let mut by_player: BTreeMap<i64, PlayerAggregate> = BTreeMap::new();
    for (row, player) in rows {
        let player_name = player.map(|p| p.name).ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("match_players row {} has no player", row.id),
            )
        })?;

        let agg = by_player
            .entry(row.player_id)
            .or_insert_with(|| PlayerAggregate {
                player_id: row.player_id,
                player_name,
                plays: 0,
                wins: 0,
                best_score: None,
                total_score: None,
                placement_sum: 0,
                placement_count: 0,
            });

        agg.plays += 1;
        if row.is_winner {
            agg.wins += 1;
        }
        if let Some(score) = row.score {
            agg.best_score = Some(agg.best_score.map_or(score, |best| best.max(score)));
            agg.total_score = Some(agg.total_score.unwrap_or(0) + i64::from(score));
        }
        if let Some(placement) = row.placement {
            agg.placement_sum += i64::from(placement);
            agg.placement_count += 1;
        }
    }

    Ok(GameStats {
        match_count,
        players: by_player.into_values().collect(),
    })
}
