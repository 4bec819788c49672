//! User repository functions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::users;
use crate::errors::domain::DomainError;
use crate::infra::db_errors;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub sub: String,
    pub username: String,
}

impl From<users::Model> for User {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            sub: m.sub,
            username: m.username,
        }
    }
}

pub async fn find_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<User>, DomainError> {
    let user = users::Entity::find()
        .filter(users::Column::Sub.eq(sub))
        .one(conn)
        .await
        .map_err(db_errors::map_db_err)?;
    Ok(user.map(User::from))
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
    username: &str,
) -> Result<User, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let user = users::ActiveModel {
        id: NotSet,
        sub: Set(sub.to_string()),
        username: Set(username.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(db_errors::map_db_err)?;

    Ok(User::from(user))
}
