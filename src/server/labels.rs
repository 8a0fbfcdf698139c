//! Label index route

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;

use crate::error::ApiError;
use crate::labels::{LabelGroup, LabeledResource, gather_labeled_resources, search_by_selector};

use super::{AppState, ResourceQuery};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelsResponse {
    pub labels: Vec<LabelGroup>,
    pub resources: Vec<LabeledResource>,
    pub total_resources: usize,
}

/// GET /labels?namespace=&context=&selector=
///
/// Indexes the labels of a namespace's resources, optionally filtered by a
/// selector expression first.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<LabelsResponse>, ApiError> {
    let namespace = state.namespace(query.namespace.as_deref());

    let resources =
        gather_labeled_resources(&state.cache, namespace, query.context.as_deref())
            .await
            .map_err(|e| ApiError::new("labels", e))?;

    let filtered = match query.selector.as_deref() {
        Some(selector) => search_by_selector(&resources, selector),
        None => resources,
    };

    let labels = crate::labels::index_labels(&filtered);

    Ok(Json(LabelsResponse {
        labels,
        total_resources: filtered.len(),
        resources: filtered,
    }))
}
