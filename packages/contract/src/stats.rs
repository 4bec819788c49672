//! Per-game player statistics shapes.

use serde::{Deserialize, Serialize};

use crate::refs::GameRef;

/// Aggregates for one player across all finished matches of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsRow {
    pub player_id: i64,
    pub player_name: String,
    pub plays: u32,
    pub wins: u32,
    pub best_score: Option<i32>,
    pub total_score: Option<i64>,
    pub avg_placement: Option<f64>,
}

/// Output of `game.getPlayerStats`. `None` on the wire means the referenced
/// game does not exist for this actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatsOut {
    #[serde(rename = "ref")]
    pub game_ref: GameRef,
    pub match_count: u32,
    pub players: Vec<PlayerStatsRow>,
}
