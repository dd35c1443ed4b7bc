//! Product listings

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use super::Collection;
use crate::catalog::storefront::{APP_LABEL, PRODUCT};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::query::{to_documents, Document, Record};

/// GET /products/ - every product, flat
async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Collection<Record>, ApiError> {
    let records = state.executor().execute_plan(&state.plans.products).await?;
    Ok(Collection::new("products", records))
}

/// GET /serialdata - every product as a `{model, pk, fields}` document
async fn serial_data(
    State(state): State<Arc<AppState>>,
) -> Result<Collection<Document>, ApiError> {
    let records = state.executor().execute_plan(&state.plans.products).await?;
    let documents = to_documents(&state.catalog, APP_LABEL, PRODUCT, records)?;
    Ok(Collection::new("products", documents))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products/", get(list_products))
        .route("/serialdata", get(serial_data))
}
