//! Schema bootstrap for the storefront tables
//!
//! Idempotent: every statement is `CREATE TABLE IF NOT EXISTS`.

use sqlx::SqlitePool;

use crate::Result;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        username TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        price REAL NOT NULL,
        category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoice_products (
        id INTEGER PRIMARY KEY,
        customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
        product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        qty INTEGER NOT NULL,
        sale_price REAL NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_categories_owner ON categories(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_id)",
    "CREATE INDEX IF NOT EXISTS idx_invoice_products_customer ON invoice_products(customer_id)",
    "CREATE INDEX IF NOT EXISTS idx_invoice_products_product ON invoice_products(product_id)",
];

/// Run all storefront migrations
pub async fn run(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Running storefront migrations...");

    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!("Storefront migrations complete");
    Ok(())
}
