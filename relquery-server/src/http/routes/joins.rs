//! Join demonstrations
//!
//! `/inner_join/` drops products without a category; `/outer_join/` keeps
//! categories without products and fills the product columns with null.

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use super::Collection;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::query::Record;

/// GET /inner_join/ - products with their category name
async fn inner_join(State(state): State<Arc<AppState>>) -> Result<Collection<Record>, ApiError> {
    let records = state
        .executor()
        .execute_plan(&state.plans.inner_join)
        .await?;
    Ok(Collection::new("products", records))
}

/// GET /outer_join/ - categories with their products, if any
async fn outer_join(State(state): State<Arc<AppState>>) -> Result<Collection<Record>, ApiError> {
    let records = state
        .executor()
        .execute_plan(&state.plans.outer_join)
        .await?;
    Ok(Collection::new("categories", records))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/inner_join/", get(inner_join))
        .route("/outer_join/", get(outer_join))
}
