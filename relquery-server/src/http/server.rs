//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::prepared::PreparedPlans;
use super::routes;
use crate::catalog::Catalog;
use crate::config::{GatewayConfig, QueryDefaults};
use crate::error::GatewayError;
use crate::query::QueryExecutor;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Filter values for requests that omit them
    pub defaults: QueryDefaults,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&GatewayConfig::default())
    }
}

impl From<&GatewayConfig> for ServerConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            bind_addr: config.server.bind,
            cors_permissive: config.server.cors_permissive,
            defaults: config.defaults,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub pool: SqlitePool,
    pub catalog: Catalog,
    pub plans: PreparedPlans,
    pub defaults: QueryDefaults,
}

impl AppState {
    /// Resolve the endpoint plans against `catalog`.
    pub fn new(
        pool: SqlitePool,
        catalog: Catalog,
        defaults: QueryDefaults,
    ) -> Result<Self, GatewayError> {
        let plans = PreparedPlans::resolve(&catalog)?;
        Ok(Self {
            pool,
            catalog,
            plans,
            defaults,
        })
    }

    pub fn executor(&self) -> QueryExecutor<'_> {
        QueryExecutor::new(&self.pool, &self.catalog)
    }
}

/// Build the application router with all routes
pub fn build_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        // Localhost only
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://localhost:8000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
                HeaderValue::from_static("http://127.0.0.1:8000"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::index::router())
        .merge(routes::products::router())
        .merge(routes::joins::router())
        .merge(routes::lookups::router())
        .merge(routes::raw::router())
        .merge(routes::query::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let catalog = storefront::catalog()?;
/// run_server(pool, catalog, ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    pool: SqlitePool,
    catalog: Catalog,
    config: ServerConfig,
) -> Result<(), ServerError> {
    let state = AppState::new(pool, catalog, config.defaults)?;
    tracing::info!(
        entities = state.catalog.entities().count(),
        relationships = state.catalog.relationships().len(),
        "Catalog resolved"
    );

    let app = build_router(Arc::new(state), config.cors_permissive);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::catalog::storefront;
    use crate::db::test_pool;

    async fn app() -> Router {
        let state = AppState::new(
            test_pool().await,
            storefront::catalog().unwrap(),
            QueryDefaults::default(),
        )
        .unwrap();
        build_router(Arc::new(state), false)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn post_query(app: &Router, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/query/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(!config.cors_permissive);
        assert_eq!(config.defaults.owner_id, 11);
    }

    #[tokio::test]
    async fn index_is_alive() {
        let app = app().await;
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn products_lists_each_product_once() {
        let app = app().await;
        let (status, body) = get(&app, "/products/").await;
        assert_eq!(status, StatusCode::OK);

        let products = body["products"].as_array().unwrap();
        assert_eq!(products.len(), 4);
        let mut ids: Vec<i64> = products.iter().map(|p| p["id"].as_i64().unwrap()).collect();
        ids.dedup();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(
            products[0],
            json!({"id": 1, "name": "Widget", "price": 9.99, "category_id": 1})
        );
    }

    #[tokio::test]
    async fn serialdata_uses_document_shape() {
        let app = app().await;
        let (status, body) = get(&app, "/serialdata").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["products"][0],
            json!({
                "model": "relational_query.product",
                "pk": 1,
                "fields": {"name": "Widget", "price": 9.99, "category": 1}
            })
        );
    }

    #[tokio::test]
    async fn inner_join_flattens_category() {
        let app = app().await;
        let (status, body) = get(&app, "/inner_join/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["products"][0],
            json!({
                "id": 1,
                "name": "Widget",
                "price": 9.99,
                "category__id": 1,
                "category__name": "Tools"
            })
        );
    }

    #[tokio::test]
    async fn outer_join_includes_empty_category() {
        let app = app().await;
        let (_, inner) = get(&app, "/inner_join/").await;
        let (status, body) = get(&app, "/outer_join/").await;
        assert_eq!(status, StatusCode::OK);

        let rows = body["categories"].as_array().unwrap();
        assert!(inner["products"].as_array().unwrap().len() <= rows.len());

        let toys: Vec<_> = rows.iter().filter(|r| r["name"] == "Toys").collect();
        assert_eq!(toys.len(), 1);
        assert!(toys[0]["products__id"].is_null());
        assert!(toys[0]["products__name"].is_null());
        assert!(toys[0]["products__price"].is_null());
    }

    #[tokio::test]
    async fn select_data_filters_by_owner() {
        let app = app().await;
        let (status, body) = get(&app, "/select_data/").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body["categories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["Tools", "Garden"]);

        let (_, body) = get(&app, "/select_data/?owner_id=1").await;
        assert_eq!(body["categories"].as_array().unwrap().len(), 2);

        let (status, body) = get(&app, "/select_data/?owner_id=eleven").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn forenkey_lookup_projects_qty_and_price() {
        let app = app().await;
        let (status, body) = get(&app, "/forenkey_lookup/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["invoice_products"],
            json!([{"qty": 3, "sale_price": 9.99}, {"qty": 1, "sale_price": 14.0}])
        );

        let (_, body) = get(&app, "/forenkey_lookup/?customer_id=3").await;
        assert_eq!(body["invoice_products"], json!([]));
    }

    #[tokio::test]
    async fn row_sql_returns_name_and_email() {
        let app = app().await;
        let (status, body) = get(&app, "/row_sql/").await;
        assert_eq!(status, StatusCode::OK);
        let customers = body["customers"].as_array().unwrap();
        assert_eq!(customers.len(), 3);
        assert_eq!(
            customers[0],
            json!({"name": "Ada Lovelace", "email": "ada@example.com"})
        );

        let (_, body) = get(&app, "/row_sql/?after_id=2").await;
        assert_eq!(body["customers"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn query_endpoint_runs_descriptors() {
        let app = app().await;
        let (status, body) = post_query(
            &app,
            json!({
                "entity": "Product",
                "join": {"relationship": "category"},
                "filter": {"field": "price", "op": "gt", "value": 20},
                "fields": ["name", "category__name"]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["records"],
            json!([
                {"name": "Hammer", "category__name": "Tools"},
                {"name": "Atlas", "category__name": "Books"}
            ])
        );
    }

    #[tokio::test]
    async fn query_endpoint_reports_descriptor_errors() {
        let app = app().await;

        let cases = [
            (json!({"entity": "Product", "fields": ["colour"]}), "unknown_field"),
            (
                json!({"entity": "Product", "join": {"relationship": "supplier"}}),
                "relationship_not_found",
            ),
            (
                json!({
                    "entity": "Product",
                    "filter": {"field": "name", "op": "regex", "value": "W.*"}
                }),
                "unsupported_predicate",
            ),
            (
                json!({
                    "entity": "Category",
                    "filter": {"field": "owner_id", "op": "eq", "value": "x"}
                }),
                "type_mismatch",
            ),
            (json!({"entity": "Supplier"}), "unknown_entity"),
        ];

        for (descriptor, kind) in cases {
            let (status, body) = post_query(&app, descriptor).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{kind}");
            assert_eq!(body["error"], kind);
        }

        let (status, body) = post_query(&app, json!({"fields": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}
