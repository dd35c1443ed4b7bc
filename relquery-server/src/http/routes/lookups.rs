//! Filtered lookups by foreign key
//!
//! The filter value comes from the query string, falling back to the
//! configured defaults.

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};
use serde::Deserialize;

use super::Collection;
use crate::http::error::ApiError;
use crate::http::extractors::ApiQuery;
use crate::http::server::AppState;
use crate::query::Record;

#[derive(Debug, Default, Deserialize)]
pub struct OwnerParams {
    pub owner_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomerParams {
    pub customer_id: Option<i64>,
}

/// GET /select_data/?owner_id= - categories owned by one user
async fn select_data(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<OwnerParams>,
) -> Result<Collection<Record>, ApiError> {
    let owner_id = params.owner_id.unwrap_or(state.defaults.owner_id);
    let plan = state.plans.categories_by_owner.bind_filter(owner_id)?;
    let records = state.executor().execute_plan(&plan).await?;
    Ok(Collection::new("categories", records))
}

/// GET /forenkey_lookup/?customer_id= - quantity and price of a customer's invoice lines
async fn forenkey_lookup(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<CustomerParams>,
) -> Result<Collection<Record>, ApiError> {
    let customer_id = params.customer_id.unwrap_or(state.defaults.customer_id);
    let plan = state
        .plans
        .invoice_lines_by_customer
        .bind_filter(customer_id)?;
    let records = state.executor().execute_plan(&plan).await?;
    Ok(Collection::new("invoice_products", records))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/select_data/", get(select_data))
        .route("/forenkey_lookup/", get(forenkey_lookup))
}
