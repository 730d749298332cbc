//! Case and report workflows.
//!
//! `plan` decides, `cases` and `reports` write. Every write of one
//! operation shares a transaction; email goes out after commit.

pub mod cases;
pub mod plan;
pub mod reports;

use shared_types::AppError;
use sqlx::{Pool, Postgres, Transaction};

use crate::error_convert::SqlxErrorExt;

pub(crate) async fn begin(pool: &Pool<Postgres>) -> Result<Transaction<'static, Postgres>, AppError> {
    pool.begin().await.map_err(SqlxErrorExt::into_app_error)
}

pub(crate) async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), AppError> {
    tx.commit().await.map_err(SqlxErrorExt::into_app_error)
}
