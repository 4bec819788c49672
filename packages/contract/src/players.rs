//! Player procedures and wire shapes.

use serde::{Deserialize, Serialize};

use crate::procedure::{NoInput, Procedure, ValidateInput, ValidationErrors};
use crate::refs::{GameRef, PlayerRef, SharePermission};

/// Insert payload for a new player. Same omission contract as
/// [`crate::games::CreateGame`]: no server-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePlayer {
    pub name: String,
    /// Optional link to a registered user account.
    #[serde(default)]
    pub linked_user_id: Option<i64>,
}

impl ValidateInput for CreatePlayer {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errs.push("name", "must not be empty");
        }
        if self.name.len() > 256 {
            errs.push("name", "must be at most 256 characters");
        }
        if let Some(user_id) = self.linked_user_id {
            if user_id <= 0 {
                errs.push("linkedUserId", "must be a positive id");
            }
        }
        errs.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOut {
    #[serde(rename = "ref")]
    pub player_ref: PlayerRef,
    pub name: String,
    pub linked_user_id: Option<i64>,
    /// Present only for players reaching the actor through a share.
    pub permission: Option<SharePermission>,
}

pub struct PlayerCreate;

impl Procedure for PlayerCreate {
    const NAME: &'static str = "player.create";
    type Input = CreatePlayer;
    type Output = PlayerOut;
}

pub struct PlayerList;

impl Procedure for PlayerList {
    const NAME: &'static str = "player.list";
    type Input = NoInput;
    type Output = Vec<PlayerOut>;
}

/// Players that have at least one recorded match in the referenced game.
pub struct PlayerForGame;

impl Procedure for PlayerForGame {
    const NAME: &'static str = "player.getForGame";
    type Input = GameRef;
    type Output = Vec<PlayerOut>;
}
