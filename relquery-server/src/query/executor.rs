//! Query executor
//!
//! Stateless: every call resolves, renders and runs one statement against
//! the pool it was given. Nothing is shared between calls except the
//! read-only catalog.

use sqlx::SqlitePool;

use crate::catalog::Catalog;
use crate::error::{GatewayError, Result};

use super::raw::{self, RawStatement};
use super::{Plan, QueryDescriptor, Record};

/// Runs descriptors, resolved plans and raw statements.
pub struct QueryExecutor<'a> {
    pool: &'a SqlitePool,
    catalog: &'a Catalog,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(pool: &'a SqlitePool, catalog: &'a Catalog) -> Self {
        Self { pool, catalog }
    }

    /// Resolve and execute a descriptor.
    pub async fn execute(&self, descriptor: &QueryDescriptor) -> Result<Vec<Record>> {
        let plan = self.catalog.resolve(descriptor)?;
        self.execute_plan(&plan).await
    }

    /// Execute an already resolved plan.
    pub async fn execute_plan(&self, plan: &Plan) -> Result<Vec<Record>> {
        let mut qb = plan.to_query();
        tracing::debug!(entity = plan.entity(), sql = qb.sql(), "executing plan");

        let rows = qb.build().fetch_all(self.pool).await?;
        let records = rows
            .iter()
            .map(|row| plan.decode(row))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(entity = plan.entity(), rows = records.len(), "plan executed");
        Ok(records)
    }

    /// Execute a raw statement with its bound parameters.
    ///
    /// Placeholder/parameter mismatches fail before the database is touched.
    /// Errors reported by the database (syntax, unknown table) surface as
    /// `GatewayError::Query`; connectivity failures stay `Storage`.
    pub async fn execute_raw(&self, statement: &RawStatement) -> Result<Vec<Record>> {
        statement.validate()?;
        tracing::debug!(
            sql = statement.sql(),
            params = statement.params().len(),
            "executing raw statement"
        );

        let rows = statement
            .to_query()
            .fetch_all(self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) => GatewayError::Query(db.message().to_owned()),
                other => GatewayError::Storage(other),
            })?;

        rows.iter().map(raw::decode_row).collect()
    }
}
