//! Game procedures and wire shapes.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::procedure::{NoInput, Procedure, ValidateInput, ValidationErrors};
use crate::refs::{GameRef, SharePermission};
use crate::scoresheets::ScoresheetOut;
use crate::stats::GameStatsOut;

/// Insert payload for a new game.
///
/// Server-assigned fields (`id`, `createdAt`, `updatedAt`) are not part of
/// this shape; `deny_unknown_fields` turns an attempt to supply them into a
/// validation error before anything runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateGame {
    pub name: String,
    pub min_players: i16,
    pub max_players: i16,
    #[serde(default)]
    pub playtime_min: Option<i32>,
    #[serde(default)]
    pub is_coop: bool,
    #[serde(default)]
    pub year_published: Option<i16>,
}

impl ValidateInput for CreateGame {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errs.push("name", "must not be empty");
        }
        if self.name.len() > 256 {
            errs.push("name", "must be at most 256 characters");
        }
        if self.min_players < 1 {
            errs.push("minPlayers", "must be at least 1");
        }
        if self.max_players < self.min_players {
            errs.push("maxPlayers", "must be >= minPlayers");
        }
        if let Some(playtime) = self.playtime_min {
            if playtime <= 0 {
                errs.push("playtimeMin", "must be positive when present");
            }
        }
        if let Some(year) = self.year_published {
            if !(0..=3000).contains(&year) {
                errs.push("yearPublished", "must be a plausible year");
            }
        }
        errs.into_result()
    }
}

/// A game after variant dispatch has resolved: one shape for both the
/// original and the shared case, tagged with the reference it answers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOut {
    #[serde(rename = "ref")]
    pub game_ref: GameRef,
    pub name: String,
    pub min_players: i16,
    pub max_players: i16,
    pub playtime_min: Option<i32>,
    pub is_coop: bool,
    pub year_published: Option<i16>,
    /// Present only for the shared variant.
    pub permission: Option<SharePermission>,
    pub created_at: OffsetDateTime,
}

/// Row of `game.list`: the actor's own games plus games shared with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameListItem {
    #[serde(rename = "ref")]
    pub game_ref: GameRef,
    pub name: String,
    pub min_players: i16,
    pub max_players: i16,
    pub is_coop: bool,
    pub year_published: Option<i16>,
    pub permission: Option<SharePermission>,
}

pub struct GameCreate;

impl Procedure for GameCreate {
    const NAME: &'static str = "game.create";
    type Input = CreateGame;
    type Output = GameOut;
}

pub struct GameList;

impl Procedure for GameList {
    const NAME: &'static str = "game.list";
    type Input = NoInput;
    type Output = Vec<GameListItem>;
}

/// Lookup by reference. Absence is a legitimate `null` result, not an error;
/// escalating it is a call-site decision.
pub struct GameGet;

impl Procedure for GameGet {
    const NAME: &'static str = "game.get";
    type Input = GameRef;
    type Output = Option<GameOut>;
}

pub struct GameScoresheets;

impl Procedure for GameScoresheets {
    const NAME: &'static str = "game.getScoresheets";
    type Input = GameRef;
    type Output = Vec<ScoresheetOut>;
}

pub struct GamePlayerStats;

impl Procedure for GamePlayerStats {
    const NAME: &'static str = "game.getPlayerStats";
    type Input = GameRef;
    type Output = Option<GameStatsOut>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_game() -> CreateGame {
        CreateGame {
            name: "Brass: Birmingham".to_string(),
            min_players: 2,
            max_players: 4,
            playtime_min: Some(120),
            is_coop: false,
            year_published: Some(2018),
        }
    }

    #[test]
    fn create_game_accepts_valid_payload() {
        assert!(valid_game().validate().is_ok());
    }

    #[test]
    fn create_game_rejects_server_assigned_fields() {
        let json = r#"{"name":"Azul","minPlayers":2,"maxPlayers":4,"id":9}"#;
        assert!(serde_json::from_str::<CreateGame>(json).is_err());

        let json = r#"{"name":"Azul","minPlayers":2,"maxPlayers":4,"createdAt":"2024-01-01"}"#;
        assert!(serde_json::from_str::<CreateGame>(json).is_err());
    }

    #[test]
    fn create_game_rejects_inverted_player_range() {
        let mut game = valid_game();
        game.min_players = 4;
        game.max_players = 2;
        let errs = game.validate().unwrap_err();
        assert!(errs.violations.iter().any(|v| v.field == "maxPlayers"));
    }

    #[test]
    fn create_game_rejects_blank_name() {
        let mut game = valid_game();
        game.name = "   ".to_string();
        assert!(game.validate().is_err());
    }
}
