//! Ad-hoc descriptor queries

use std::sync::Arc;

use axum::{extract::State, routing::post, Router};

use super::Collection;
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::query::{QueryDescriptor, Record};

/// POST /query/ - resolve and run a descriptor from the request body
async fn run_query(
    State(state): State<Arc<AppState>>,
    ApiJson(descriptor): ApiJson<QueryDescriptor>,
) -> Result<Collection<Record>, ApiError> {
    tracing::debug!(entity = %descriptor.entity, "running descriptor");
    let records = state.executor().execute(&descriptor).await?;
    Ok(Collection::new("records", records))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/query/", post(run_query))
}
