//! Demo dataset for the storefront endpoints
//!
//! User 11 owns the categories the `/select_data/` default filters on.
//! The "Toys" category has no products so the outer join has an
//! unmatched row to show.

use sqlx::SqlitePool;

use crate::Result;

const USERS: &[(i64, &str)] = &[(1, "admin"), (11, "shopkeeper")];

const CATEGORIES: &[(i64, &str, i64)] = &[
    (1, "Tools", 11),
    (2, "Garden", 11),
    (3, "Books", 1),
    (4, "Toys", 1),
];

const PRODUCTS: &[(i64, &str, f64, i64)] = &[
    (1, "Widget", 9.99, 1),
    (2, "Hammer", 24.5, 1),
    (3, "Rake", 15.0, 2),
    (4, "Atlas", 32.0, 3),
];

const CUSTOMERS: &[(i64, &str, &str)] = &[
    (1, "Ada Lovelace", "ada@example.com"),
    (2, "Alan Turing", "alan@example.com"),
    (3, "Grace Hopper", "grace@example.com"),
];

const INVOICE_PRODUCTS: &[(i64, i64, i64, i64, f64)] = &[
    (1, 1, 1, 3, 9.99),
    (2, 1, 3, 1, 14.0),
    (3, 2, 2, 2, 24.5),
];

/// Insert the demo rows unless the database already has users.
///
/// Returns `true` when rows were inserted.
pub async fn run(pool: &SqlitePool) -> Result<bool> {
    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::debug!(users = existing, "Database already populated, skipping seed");
        return Ok(false);
    }

    let mut tx = pool.begin().await?;

    for &(id, username) in USERS {
        sqlx::query("INSERT INTO users (id, username) VALUES (?, ?)")
            .bind(id)
            .bind(username)
            .execute(&mut *tx)
            .await?;
    }
    for &(id, name, owner_id) in CATEGORIES {
        sqlx::query("INSERT INTO categories (id, name, owner_id) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
    }
    for &(id, name, price, category_id) in PRODUCTS {
        sqlx::query("INSERT INTO products (id, name, price, category_id) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(price)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
    }
    for &(id, name, email) in CUSTOMERS {
        sqlx::query("INSERT INTO customers (id, name, email) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(email)
            .execute(&mut *tx)
            .await?;
    }
    for &(id, customer_id, product_id, qty, sale_price) in INVOICE_PRODUCTS {
        sqlx::query(
            "INSERT INTO invoice_products (id, customer_id, product_id, qty, sale_price) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(customer_id)
        .bind(product_id)
        .bind(qty)
        .bind(sale_price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        products = PRODUCTS.len(),
        customers = CUSTOMERS.len(),
        "Seeded storefront demo data"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, migrations};

    #[tokio::test]
    async fn seed_runs_once() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        migrations::run(&pool).await.unwrap();

        assert!(run(&pool).await.unwrap());
        assert!(!run(&pool).await.unwrap());

        let (products,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(products, PRODUCTS.len() as i64);
    }
}
