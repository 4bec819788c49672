use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// A shared transaction wrapper that can be injected into request extensions.
///
/// Integration tests open one of these, seed data through it, and inject it
/// into requests; `with_txn` then reuses it instead of opening (and
/// committing) its own, so each test stays isolated and rolls back on drop.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    pub async fn open(db: &DatabaseConnection) -> Result<Self, AppError> {
        let txn = db.begin().await?;
        Ok(Self(Arc::new(txn)))
    }

    /// Get a reference to the underlying database transaction
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    pub fn from_req(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<SharedTxn>().cloned()
    }
}

/// Boxed future returned by `with_txn` closures; borrows the transaction.
pub type TxnFuture<'c, R> =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<R, AppError>> + 'c>>;

/// Execute a function within a database transaction
///
/// 1) If a SharedTxn is in request extensions → use it (no commit/rollback here)
/// 2) Otherwise → begin txn, run closure, commit on Ok / rollback on Err
///
/// Bulk writes inside the closure are therefore atomic from the caller's
/// perspective: partial application cannot be observed.
pub async fn with_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, R>,
{
    // Extract any SharedTxn out of request extensions *before* awaiting to
    // avoid holding a RefCell borrow across an await point.
    let shared_txn: Option<SharedTxn> = req.and_then(SharedTxn::from_req);

    if let Some(shared) = shared_txn {
        return f(shared.transaction()).await;
    }

    let db = require_db(state)?;
    let txn = db.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve original error
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
