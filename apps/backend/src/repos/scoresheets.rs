//! Scoresheet repository functions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::scoresheets::{self, ScoringKind};
use crate::errors::domain::DomainError;
use crate::infra::db_errors;
use crate::repos::games::GameScope;

/// Scoresheet domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Scoresheet {
    pub id: i64,
    pub scope: GameScope,
    pub created_by: i64,
    pub name: String,
    pub scoring_kind: ScoringKind,
    pub is_default: bool,
    pub created_at: time::OffsetDateTime,
}

fn to_domain(model: scoresheets::Model) -> Option<Scoresheet> {
    let scope = match (model.game_id, model.game_share_id) {
        (Some(game_id), None) => GameScope::Original { game_id },
        (None, Some(game_share_id)) => GameScope::Shared { game_share_id },
        _ => return None,
    };
    Some(Scoresheet {
        id: model.id,
        scope,
        created_by: model.created_by,
        name: model.name,
        scoring_kind: model.scoring_kind,
        is_default: model.is_default,
        created_at: model.created_at,
    })
}

#[derive(Debug, Clone)]
pub struct ScoresheetCreate {
    pub scope: GameScope,
    pub created_by: i64,
    pub name: String,
    pub scoring_kind: ScoringKind,
    pub is_default: bool,
}

fn scope_filter(scope: GameScope) -> sea_orm::sea_query::SimpleExpr {
    match scope {
        GameScope::Original { game_id } => scoresheets::Column::GameId.eq(game_id),
        GameScope::Shared { game_share_id } => {
            scoresheets::Column::GameShareId.eq(game_share_id)
        }
    }
}

/// Insert a scoresheet. At most one sheet per scope is the default; creating
/// a new default demotes the previous one.
pub async fn create_scoresheet<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ScoresheetCreate,
) -> Result<Scoresheet, DomainError> {
    let now = time::OffsetDateTime::now_utc();

    if dto.is_default {
        let current_defaults = scoresheets::Entity::find()
            .filter(scope_filter(dto.scope))
            .filter(scoresheets::Column::IsDefault.eq(true))
            .all(conn)
            .await
            .map_err(db_errors::map_db_err)?;
        for row in current_defaults {
            let mut active = row.into_active_model();
            active.is_default = Set(false);
            active.updated_at = Set(now);
            active.update(conn).await.map_err(db_errors::map_db_err)?;
        }
    }

    let (game_id, game_share_id) = match dto.scope {
        GameScope::Original { game_id } => (Some(game_id), None),
        GameScope::Shared { game_share_id } => (None, Some(game_share_id)),
    };

    let inserted = scoresheets::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        game_share_id: Set(game_share_id),
        created_by: Set(dto.created_by),
        name: Set(dto.name),
        scoring_kind: Set(dto.scoring_kind),
        is_default: Set(dto.is_default),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(db_errors::map_db_err)?;

    to_domain(inserted).ok_or_else(|| {
        DomainError::infra(
            crate::errors::domain::InfraErrorKind::DataCorruption,
            "inserted scoresheet violates the game/share pair invariant".to_string(),
        )
    })
}

/// All scoresheets attached to the scope, defaults first.
pub async fn list_for_scope<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scope: GameScope,
) -> Result<Vec<Scoresheet>, DomainError> {
    let rows = scoresheets::Entity::find()
        .filter(scope_filter(scope))
        .order_by_desc(scoresheets::Column::IsDefault)
        .order_by_asc(scoresheets::Column::Id)
        .all(conn)
        .await
        .map_err(db_errors::map_db_err)?;

    Ok(rows.into_iter().filter_map(to_domain).collect())
}
