//! Cache introspection routes

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;

use super::AppState;

/// GET /cache/stats
pub async fn stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
}

/// POST /cache/reset?context=
///
/// With a context, evicts just that entry; without, clears the cache and
/// zeroes the counters.
pub async fn reset(
    State(state): State<AppState>,
    Query(query): Query<ResetQuery>,
) -> Json<ResetResponse> {
    state.cache.reset(query.context.as_deref());
    Json(ResetResponse { success: true })
}
