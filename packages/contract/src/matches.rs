//! Match procedures and wire shapes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::procedure::{Procedure, ValidateInput, ValidationErrors};
use crate::refs::GameRef;

/// One participant in a match being recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchPlayerEntry {
    pub player_id: i64,
    #[serde(default)]
    pub score: Option<i32>,
    /// Explicit winner override; when absent the server derives winners from
    /// scores (or from `finished` for cooperative games).
    #[serde(default)]
    pub is_winner: Option<bool>,
}

/// Insert payload for a recorded play of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMatch {
    pub game: GameRef,
    #[serde(default)]
    pub name: Option<String>,
    /// Defaults to the server clock when absent.
    #[serde(default)]
    pub played_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub duration_sec: Option<i32>,
    #[serde(default = "default_finished")]
    pub finished: bool,
    #[serde(default)]
    pub comment: Option<String>,
    pub players: Vec<MatchPlayerEntry>,
}

fn default_finished() -> bool {
    true
}

impl ValidateInput for CreateMatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        self.game.validate().unwrap_or_else(|game_errs| {
            errs.violations.extend(game_errs.violations);
        });
        if self.players.is_empty() {
            errs.push("players", "must contain at least one player");
        }
        let mut seen = HashSet::new();
        for entry in &self.players {
            if entry.player_id <= 0 {
                errs.push("players.playerId", "must be a positive id");
            }
            if !seen.insert(entry.player_id) {
                errs.push(
                    "players.playerId",
                    format!("player {} listed more than once", entry.player_id),
                );
            }
        }
        if let Some(duration) = self.duration_sec {
            if duration < 0 {
                errs.push("durationSec", "must not be negative");
            }
        }
        if let Some(name) = &self.name {
            if name.len() > 256 {
                errs.push("name", "must be at most 256 characters");
            }
        }
        errs.into_result()
    }
}

/// Lookup input for a single match owned by the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchId {
    pub id: i64,
}

impl ValidateInput for MatchId {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        if self.id <= 0 {
            errs.push("id", "must be a positive id");
        }
        errs.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOut {
    pub id: i64,
    pub game: GameRef,
    pub name: Option<String>,
    pub played_at: OffsetDateTime,
    pub duration_sec: Option<i32>,
    pub finished: bool,
    pub comment: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPlayerOut {
    pub player_id: i64,
    pub player_name: String,
    pub score: Option<i32>,
    pub placement: Option<i32>,
    pub is_winner: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(flatten)]
    pub summary: MatchOut,
    pub players: Vec<MatchPlayerOut>,
}

/// Result of the bulk placement recomputation. Re-running against unchanged
/// data reports `rows_changed == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementsUpdated {
    pub matches_seen: u64,
    pub rows_changed: u64,
}

pub struct MatchCreate;

impl Procedure for MatchCreate {
    const NAME: &'static str = "match.create";
    type Input = CreateMatch;
    type Output = MatchOut;
}

pub struct MatchGet;

impl Procedure for MatchGet {
    const NAME: &'static str = "match.get";
    type Input = MatchId;
    type Output = Option<MatchDetail>;
}

/// Recompute placements and winners from scores for every finished match of
/// the referenced game. Idempotent by construction.
pub struct MatchUpdateAllPlacements;

impl Procedure for MatchUpdateAllPlacements {
    const NAME: &'static str = "match.updateAllPlacements";
    type Input = GameRef;
    type Output = PlacementsUpdated;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_match() -> CreateMatch {
        CreateMatch {
            game: GameRef::Original { id: 1 },
            name: None,
            played_at: None,
            duration_sec: Some(3600),
            finished: true,
            comment: None,
            players: vec![
                MatchPlayerEntry {
                    player_id: 1,
                    score: Some(52),
                    is_winner: None,
                },
                MatchPlayerEntry {
                    player_id: 2,
                    score: Some(47),
                    is_winner: None,
                },
            ],
        }
    }

    #[test]
    fn create_match_accepts_valid_payload() {
        assert!(valid_match().validate().is_ok());
    }

    #[test]
    fn create_match_rejects_empty_player_list() {
        let mut m = valid_match();
        m.players.clear();
        let errs = m.validate().unwrap_err();
        assert!(errs.violations.iter().any(|v| v.field == "players"));
    }

    #[test]
    fn create_match_rejects_duplicate_players() {
        let mut m = valid_match();
        m.players[1].player_id = m.players[0].player_id;
        assert!(m.validate().is_err());
    }

    #[test]
    fn finished_defaults_to_true() {
        let json = r#"{"game":{"type":"original","id":1},"players":[{"playerId":1}]}"#;
        let m: CreateMatch = serde_json::from_str(json).unwrap();
        assert!(m.finished);
    }

    #[test]
    fn match_detail_flattens_summary() {
        let detail = MatchDetail {
            summary: MatchOut {
                id: 5,
                game: GameRef::Original { id: 1 },
                name: None,
                played_at: OffsetDateTime::UNIX_EPOCH,
                duration_sec: None,
                finished: true,
                comment: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
            },
            players: vec![],
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], 5);
        assert!(value["players"].is_array());
    }
}
