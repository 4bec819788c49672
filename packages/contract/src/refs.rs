//! Tagged references to entities that exist in an original and a shared
//! variant.
//!
//! Ids are not unique across variants: original game 42 and shared game 42
//! are unrelated rows. Callers therefore always say which table they mean,
//! and dispatch matches exhaustively — a mismatched tag/id pair is a
//! construction-time error, not a runtime one.

use serde::{Deserialize, Serialize};

use crate::procedure::{ValidateInput, ValidationErrors};

/// Reference to a game: either a game the actor owns, or a game shared with
/// the actor through a share row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameRef {
    #[serde(rename_all = "camelCase")]
    Original { id: i64 },
    #[serde(rename_all = "camelCase")]
    Shared { shared_game_id: i64 },
}

impl GameRef {
    /// The id carried by whichever variant this is. Only meaningful together
    /// with the tag; use the enum itself for dispatch.
    pub fn raw_id(&self) -> i64 {
        match self {
            GameRef::Original { id } => *id,
            GameRef::Shared { shared_game_id } => *shared_game_id,
        }
    }
}

impl ValidateInput for GameRef {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        match self {
            GameRef::Original { id } if *id <= 0 => {
                errs.push("id", "must be a positive id");
            }
            GameRef::Shared { shared_game_id } if *shared_game_id <= 0 => {
                errs.push("sharedGameId", "must be a positive id");
            }
            _ => {}
        }
        errs.into_result()
    }
}

/// Reference to a player, same shape as [`GameRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerRef {
    #[serde(rename_all = "camelCase")]
    Original { id: i64 },
    #[serde(rename_all = "camelCase")]
    Shared { shared_player_id: i64 },
}

/// Access level granted by a share row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SharePermission {
    View,
    Edit,
}

impl SharePermission {
    pub fn can_edit(&self) -> bool {
        matches!(self, SharePermission::Edit)
    }
}
