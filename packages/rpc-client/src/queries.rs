//! Per-procedure query functions.
//!
//! This is where the per-call-site sentinel policy lives. `game_stats`
//! narrows the server's `null` into [`ClientError::MissingData`] because its
//! callers address a game they already hold a reference to; `game` and
//! `match_detail` pass the `Option` through because their callers render a
//! "not found" state. The policy is deliberately per function, not
//! centralized.

use contract::games::{
    CreateGame, GameCreate, GameGet, GameList, GameListItem, GameOut, GamePlayerStats,
    GameScoresheets,
};
use contract::matches::{
    CreateMatch, MatchCreate, MatchDetail, MatchGet, MatchId, MatchOut,
    MatchUpdateAllPlacements, PlacementsUpdated,
};
use contract::players::{CreatePlayer, PlayerCreate, PlayerForGame, PlayerList, PlayerOut};
use contract::scoresheets::{CreateScoresheet, ScoresheetCreate, ScoresheetOut};
use contract::stats::GameStatsOut;
use contract::{GameRef, NoInput, Procedure};

use crate::client::RpcClient;
use crate::error::ClientError;

impl RpcClient {
    // ---- reads (cached, coalesced) ----

    /// `game.get`, sentinel passed through: absence is the caller's concern.
    pub async fn game(&self, game: GameRef) -> Result<Option<GameOut>, ClientError> {
        self.query::<GameGet>(&game).await
    }

    pub async fn games(&self) -> Result<Vec<GameListItem>, ClientError> {
        self.query::<GameList>(&NoInput {}).await
    }

    /// `game.getPlayerStats`, narrowed: callers hold a reference to a game
    /// they believe exists, so `null` becomes an error here rather than at
    /// every render site.
    pub async fn game_stats(&self, game: GameRef) -> Result<GameStatsOut, ClientError> {
        self.query::<GamePlayerStats>(&game)
            .await?
            .ok_or(ClientError::MissingData {
                procedure: GamePlayerStats::NAME,
            })
    }

    pub async fn game_scoresheets(&self, game: GameRef) -> Result<Vec<ScoresheetOut>, ClientError> {
        self.query::<GameScoresheets>(&game).await
    }

    pub async fn players(&self) -> Result<Vec<PlayerOut>, ClientError> {
        self.query::<PlayerList>(&NoInput {}).await
    }

    pub async fn players_for_game(&self, game: GameRef) -> Result<Vec<PlayerOut>, ClientError> {
        self.query::<PlayerForGame>(&game).await
    }

    /// `match.get`, sentinel passed through.
    pub async fn match_detail(&self, id: i64) -> Result<Option<MatchDetail>, ClientError> {
        self.query::<MatchGet>(&MatchId { id }).await
    }

    // ---- mutations (uncached, cache-invalidating) ----

    pub async fn create_game(&self, input: &CreateGame) -> Result<GameOut, ClientError> {
        self.call::<GameCreate>(input).await
    }

    pub async fn create_player(&self, input: &CreatePlayer) -> Result<PlayerOut, ClientError> {
        self.call::<PlayerCreate>(input).await
    }

    pub async fn create_match(&self, input: &CreateMatch) -> Result<MatchOut, ClientError> {
        self.call::<MatchCreate>(input).await
    }

    pub async fn create_scoresheet(
        &self,
        input: &CreateScoresheet,
    ) -> Result<ScoresheetOut, ClientError> {
        self.call::<ScoresheetCreate>(input).await
    }

    pub async fn update_all_placements(
        &self,
        game: GameRef,
    ) -> Result<PlacementsUpdated, ClientError> {
        self.call::<MatchUpdateAllPlacements>(&game).await
    }
}
