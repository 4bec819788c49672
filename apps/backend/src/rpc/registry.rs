//! Procedure registry and dispatch.
//!
//! Every wire name maps to exactly one typed handler. Dispatch is a closed
//! match: adding a procedure means adding it to the contract crate, the
//! handler module, and this table. Input parsing and validation happen here,
//! before the handler runs, so a rejected input provably causes no side
//! effect.

use std::future::Future;

use contract::games::{GameCreate, GameGet, GameList, GamePlayerStats, GameScoresheets};
use contract::matches::{MatchCreate, MatchGet, MatchUpdateAllPlacements};
use contract::players::{PlayerCreate, PlayerForGame, PlayerList};
use contract::scoresheets::ScoresheetCreate;
use contract::{Procedure, ValidateInput};
use sea_orm::DatabaseTransaction;
use serde_json::Value;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::procedures;
use crate::rpc::context::Ctx;

/// Wire names of every registered procedure, in dispatch order.
pub const PROCEDURE_NAMES: &[&str] = &[
    GameCreate::NAME,
    GameList::NAME,
    GameGet::NAME,
    GameScoresheets::NAME,
    GamePlayerStats::NAME,
    PlayerCreate::NAME,
    PlayerList::NAME,
    PlayerForGame::NAME,
    MatchCreate::NAME,
    MatchGet::NAME,
    MatchUpdateAllPlacements::NAME,
    ScoresheetCreate::NAME,
];

/// Route a raw call to its handler.
pub async fn dispatch(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    name: &str,
    raw: Value,
) -> Result<Value, AppError> {
    match name {
        GameCreate::NAME => {
            run::<GameCreate, _, _>(raw, |input| procedures::games::create(txn, ctx, input)).await
        }
        GameList::NAME => {
            run::<GameList, _, _>(raw, |input| procedures::games::list(txn, ctx, input)).await
        }
        GameGet::NAME => {
            run::<GameGet, _, _>(raw, |input| procedures::games::get(txn, ctx, input)).await
        }
        GameScoresheets::NAME => {
            run::<GameScoresheets, _, _>(raw, |input| {
                procedures::games::get_scoresheets(txn, ctx, input)
            })
            .await
        }
        GamePlayerStats::NAME => {
            run::<GamePlayerStats, _, _>(raw, |input| {
                procedures::games::get_player_stats(txn, ctx, input)
            })
            .await
        }
        PlayerCreate::NAME => {
            run::<PlayerCreate, _, _>(raw, |input| procedures::players::create(txn, ctx, input))
                .await
        }
        PlayerList::NAME => {
            run::<PlayerList, _, _>(raw, |input| procedures::players::list(txn, ctx, input)).await
        }
        PlayerForGame::NAME => {
            run::<PlayerForGame, _, _>(raw, |input| {
                procedures::players::get_for_game(txn, ctx, input)
            })
            .await
        }
        MatchCreate::NAME => {
            run::<MatchCreate, _, _>(raw, |input| procedures::matches::create(txn, ctx, input))
                .await
        }
        MatchGet::NAME => {
            run::<MatchGet, _, _>(raw, |input| procedures::matches::get(txn, ctx, input)).await
        }
        MatchUpdateAllPlacements::NAME => {
            run::<MatchUpdateAllPlacements, _, _>(raw, |input| {
                procedures::matches::update_all_placements(txn, ctx, input)
            })
            .await
        }
        ScoresheetCreate::NAME => {
            run::<ScoresheetCreate, _, _>(raw, |input| {
                procedures::scoresheets::create(txn, ctx, input)
            })
            .await
        }
        _ => Err(AppError::not_found(
            ErrorCode::UnknownProcedure,
            format!("no procedure named '{name}'"),
        )),
    }
}

/// Parse, validate, call, serialize — in that order. The handler is not
/// reached unless the input deserializes into the procedure's declared shape
/// and passes its own validation rules.
async fn run<P, F, Fut>(raw: Value, handler: F) -> Result<Value, AppError>
where
    P: Procedure,
    F: FnOnce(P::Input) -> Fut,
    Fut: Future<Output = Result<P::Output, AppError>>,
{
    let input: P::Input = serde_json::from_value(raw).map_err(|e| {
        AppError::bad_request(
            ErrorCode::BadRequest,
            format!("invalid input for {}: {}", P::NAME, classify_shape_error(&e)),
        )
    })?;
    input.validate()?;

    let output = handler(input).await?;

    serde_json::to_value(output).map_err(|e| {
        AppError::internal(format!("failed to serialize {} output: {e}", P::NAME))
    })
}

/// Sanitized shape-mismatch description; never echoes payload contents.
fn classify_shape_error(error: &serde_json::Error) -> String {
    match error.classify() {
        serde_json::error::Category::Data => {
            "wrong or missing fields for the declared input shape".to_string()
        }
        serde_json::error::Category::Eof => "unexpected end of input".to_string(),
        serde_json::error::Category::Syntax => "malformed JSON".to_string(),
        serde_json::error::Category::Io => "I/O error while reading input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedure_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for name in PROCEDURE_NAMES {
            assert!(seen.insert(*name), "duplicate procedure name: {name}");
        }
    }

    #[test]
    fn procedure_names_are_namespaced() {
        for name in PROCEDURE_NAMES {
            let parts: Vec<&str> = name.split('.').collect();
            assert_eq!(parts.len(), 2, "{name} must be namespace.method");
            assert!(!parts[0].is_empty() && !parts[1].is_empty());
        }
    }
}
