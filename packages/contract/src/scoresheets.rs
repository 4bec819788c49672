//! Scoresheet procedures and wire shapes.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::procedure::{Procedure, ValidateInput, ValidationErrors};
use crate::refs::GameRef;

/// How a scoresheet turns per-player entries into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoringKind {
    /// Sum of round scores decides the result.
    Aggregate,
    /// Scores are recorded but the result is entered by hand.
    Manual,
    /// Cooperative: the table wins or loses together.
    Coop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateScoresheet {
    pub game: GameRef,
    pub name: String,
    pub scoring_kind: ScoringKind,
    #[serde(default)]
    pub is_default: bool,
}

impl ValidateInput for CreateScoresheet {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        self.game.validate().unwrap_or_else(|game_errs| {
            errs.violations.extend(game_errs.violations);
        });
        if self.name.trim().is_empty() {
            errs.push("name", "must not be empty");
        }
        if self.name.len() > 256 {
            errs.push("name", "must be at most 256 characters");
        }
        errs.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoresheetOut {
    pub id: i64,
    pub game: GameRef,
    pub name: String,
    pub scoring_kind: ScoringKind,
    pub is_default: bool,
    pub created_at: OffsetDateTime,
}

pub struct ScoresheetCreate;

impl Procedure for ScoresheetCreate {
    const NAME: &'static str = "scoresheet.create";
    type Input = CreateScoresheet;
    type Output = ScoresheetOut;
}
