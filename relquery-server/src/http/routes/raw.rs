//! Raw SQL endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};
use serde::Deserialize;

use super::Collection;
use crate::http::error::ApiError;
use crate::http::extractors::ApiQuery;
use crate::http::server::AppState;
use crate::query::{RawStatement, Record};

const CUSTOMERS_AFTER: &str = "SELECT name, email FROM customers WHERE id > ? ORDER BY id";

#[derive(Debug, Default, Deserialize)]
pub struct AfterParams {
    pub after_id: Option<i64>,
}

/// GET /row_sql/?after_id= - customer names and emails via a raw statement
async fn row_sql(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<AfterParams>,
) -> Result<Collection<Record>, ApiError> {
    let statement = RawStatement::new(CUSTOMERS_AFTER).bind(params.after_id.unwrap_or(0));
    let records = state.executor().execute_raw(&statement).await?;
    Ok(Collection::new("customers", records))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/row_sql/", get(row_sql))
}
