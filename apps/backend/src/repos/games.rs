//! Game repository functions, including the original/shared dispatch.
//!
//! `resolve_game_ref` is the single place the two `GameRef` variants fan out
//! to their backing queries. Everything downstream of it sees one normalized
//! shape ([`ResolvedGame`]), so shared games never grow parallel code paths
//! in the procedure layer.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use contract::GameRef;

use crate::entities::game_shares::SharePermission;
use crate::entities::games;
use crate::errors::domain::{DomainError, ForbiddenKind, NotFoundKind};
use crate::infra::db_errors;
use crate::repos::shares;

/// Game domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: i64,
    pub created_by: i64,
    pub name: String,
    pub min_players: i16,
    pub max_players: i16,
    pub playtime_min: Option<i32>,
    pub is_coop: bool,
    pub year_published: Option<i16>,
    pub created_at: time::OffsetDateTime,
}

impl From<games::Model> for Game {
    fn from(m: games::Model) -> Self {
        Self {
            id: m.id,
            created_by: m.created_by,
            name: m.name,
            min_players: m.min_players,
            max_players: m.max_players,
            playtime_min: m.playtime_min,
            is_coop: m.is_coop,
            year_published: m.year_published,
            created_at: m.created_at,
        }
    }
}

/// Which matches/scoresheets column a game reference scopes to. Original and
/// shared ids live in different tables, so the two variants can never alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameScope {
    Original { game_id: i64 },
    Shared { game_share_id: i64 },
}

impl GameScope {
    /// The wire reference this scope answers to.
    pub fn to_ref(self) -> GameRef {
        match self {
            GameScope::Original { game_id } => GameRef::Original { id: game_id },
            GameScope::Shared { game_share_id } => GameRef::Shared {
                shared_game_id: game_share_id,
            },
        }
    }
}

/// The normalized result of variant dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGame {
    pub game: Game,
    pub game_ref: GameRef,
    /// Present only when resolved through a share.
    pub permission: Option<SharePermission>,
}

impl ResolvedGame {
    pub fn scope(&self) -> GameScope {
        match self.game_ref {
            GameRef::Original { id } => GameScope::Original { game_id: id },
            GameRef::Shared { shared_game_id } => GameScope::Shared {
                game_share_id: shared_game_id,
            },
        }
    }

    /// Whether the actor may record or rewrite matches under this reference.
    pub fn can_write(&self) -> bool {
        match self.permission {
            None => true,
            Some(p) => p.can_edit(),
        }
    }
}

/// Typed insert payload; server-assigned fields are absent by construction.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub created_by: i64,
    pub name: String,
    pub min_players: i16,
    pub max_players: i16,
    pub playtime_min: Option<i32>,
    pub is_coop: bool,
    pub year_published: Option<i16>,
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<Game, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let game = games::ActiveModel {
        id: NotSet,
        created_by: Set(dto.created_by),
        name: Set(dto.name),
        min_players: Set(dto.min_players),
        max_players: Set(dto.max_players),
        playtime_min: Set(dto.playtime_min),
        is_coop: Set(dto.is_coop),
        year_published: Set(dto.year_published),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(db_errors::map_db_err)?;

    Ok(Game::from(game))
}

/// Find a game the actor owns. A row owned by someone else is Forbidden, not
/// a silent miss; "doesn't exist" and "not yours" stay distinguishable.
pub async fn find_owned_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Option<Game>, DomainError> {
    let game = games::Entity::find()
        .filter(games::Column::Id.eq(game_id))
        .one(conn)
        .await
        .map_err(db_errors::map_db_err)?;

    match game {
        None => Ok(None),
        Some(g) if g.created_by != user_id => Err(DomainError::forbidden(
            ForbiddenKind::NotOwner,
            format!("game {game_id} belongs to a different user"),
        )),
        Some(g) => Ok(Some(Game::from(g))),
    }
}

/// All games the actor owns, newest first.
pub async fn list_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<Game>, DomainError> {
    let rows = games::Entity::find()
        .filter(games::Column::CreatedBy.eq(user_id))
        .order_by_desc(games::Column::CreatedAt)
        .all(conn)
        .await
        .map_err(db_errors::map_db_err)?;
    Ok(rows.into_iter().map(Game::from).collect())
}

/// Games shared with the actor, paired with the grant they arrive through.
pub async fn list_shared_with<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<(shares::GameShare, Game)>, DomainError> {
    let grants = shares::game_shares_for_recipient(conn, user_id).await?;
    let mut out = Vec::with_capacity(grants.len());
    for grant in grants {
        let game = games::Entity::find_by_id(grant.game_id)
            .one(conn)
            .await
            .map_err(db_errors::map_db_err)?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Game,
                    format!("game {} behind share {} is gone", grant.game_id, grant.id),
                )
            })?;
        out.push((grant, Game::from(game)));
    }
    Ok(out)
}

/// Resolve a `GameRef` for the acting user.
///
/// Returns `Ok(None)` when the referenced row does not exist (sentinel
/// not-found, a legitimate result for reads). Returns `Forbidden` when the
/// row exists but the actor has no claim on it.
pub async fn resolve_game_ref<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_ref: GameRef,
    user_id: i64,
) -> Result<Option<ResolvedGame>, DomainError> {
    match game_ref {
        GameRef::Original { id } => {
            let game = find_owned_by_id(conn, id, user_id).await?;
            Ok(game.map(|game| ResolvedGame {
                game,
                game_ref,
                permission: None,
            }))
        }
        GameRef::Shared { shared_game_id } => {
            let share = match shares::find_game_share_by_id(conn, shared_game_id).await? {
                None => return Ok(None),
                Some(share) => share,
            };
            if share.shared_with_id != user_id {
                return Err(DomainError::forbidden(
                    ForbiddenKind::NotShareRecipient,
                    format!("share {shared_game_id} is addressed to a different user"),
                ));
            }
            let game = games::Entity::find_by_id(share.game_id)
                .one(conn)
                .await
                .map_err(db_errors::map_db_err)?
                .ok_or_else(|| {
                    DomainError::not_found(
                        NotFoundKind::Game,
                        format!("game {} behind share {} is gone", share.game_id, share.id),
                    )
                })?;
            Ok(Some(ResolvedGame {
                game: Game::from(game),
                game_ref,
                permission: Some(share.permission),
            }))
        }
    }
}
