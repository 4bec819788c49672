//! Handlers for the `scoresheet` namespace.

use contract::scoresheets::{CreateScoresheet, ScoresheetOut};
use sea_orm::DatabaseTransaction;

use crate::error::AppError;
use crate::errors::domain::{DomainError, ForbiddenKind, NotFoundKind};
use crate::repos::games;
use crate::repos::scoresheets;
use crate::rpc::context::Ctx;

pub async fn create(
    txn: &DatabaseTransaction,
    ctx: Ctx,
    input: CreateScoresheet,
) -> Result<ScoresheetOut, AppError> {
    let resolved = games::resolve_game_ref(txn, input.game, ctx.user_id)
        .await?
        .ok_or_else(|| {
            AppError::from(DomainError::not_found(
                NotFoundKind::Game,
                format!("{:?} does not resolve for this user", input.game),
            ))
        })?;

    if !resolved.can_write() {
        return Err(DomainError::forbidden(
            ForbiddenKind::ViewOnlyShare,
            "share grants VIEW; creating scoresheets requires EDIT".to_string(),
        )
        .into());
    }

    let sheet = scoresheets::create_scoresheet(
        txn,
        scoresheets::ScoresheetCreate {
            scope: resolved.scope(),
            created_by: ctx.user_id,
            name: input.name,
            scoring_kind: input.scoring_kind.into(),
            is_default: input.is_default,
        },
    )
    .await?;

    Ok(ScoresheetOut {
        id: sheet.id,
        game: sheet.scope.to_ref(),
        name: sheet.name,
        scoring_kind: sheet.scoring_kind.into(),
        is_default: sheet.is_default,
        created_at: sheet.created_at,
    })
}
