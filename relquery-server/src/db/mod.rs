//! Database layer - connection pool, schema bootstrap and demo data
//!
//! The pool is created once and handed to every executor explicitly;
//! there is no global connection.

pub mod migrations;
pub mod pool;
pub mod seed;

pub use pool::{create_pool, create_pool_with_options};

/// In-memory pool with the storefront schema and demo rows loaded.
#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = create_pool("sqlite::memory:").await.expect("pool creation failed");
    migrations::run(&pool).await.expect("migrations failed");
    seed::run(&pool).await.expect("seed failed");
    pool
}
