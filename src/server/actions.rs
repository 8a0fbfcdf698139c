//! Mutating pod and deployment actions

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::fetch;

use super::{AppState, ResourceQuery};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodRestartResponse {
    pub success: bool,
    pub message: String,
    pub pod_name: String,
    pub namespace: String,
}

/// POST /resources/pods/{name}/restart?namespace=&context=
///
/// Restarts a pod by deleting it. Only pods managed by a controller come
/// back; standalone pods are permanently deleted.
pub async fn restart_pod(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<PodRestartResponse>, ApiError> {
    let namespace = state.namespace(query.namespace.as_deref()).to_string();

    fetch::restart_pod(&state.cache, &name, &namespace, query.context.as_deref())
        .await
        .map_err(|e| ApiError::new("pods", e))?;

    Ok(Json(PodRestartResponse {
        success: true,
        message: format!(
            "Pod {} deletion initiated. If managed by a controller, it will be recreated automatically.",
            name
        ),
        pod_name: name,
        namespace,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRestartResponse {
    pub success: bool,
    pub message: String,
    pub deployment_name: String,
    pub namespace: String,
}

/// POST /resources/deployments/{name}/restart?namespace=&context=
///
/// Rollout-restarts a deployment by stamping its pod template annotation.
pub async fn restart_deployment(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<DeploymentRestartResponse>, ApiError> {
    let namespace = state.namespace(query.namespace.as_deref()).to_string();

    fetch::restart_deployment(&state.cache, &name, &namespace, query.context.as_deref())
        .await
        .map_err(|e| ApiError::new("deployments", e))?;

    Ok(Json(DeploymentRestartResponse {
        success: true,
        message: format!("Rollout restart of deployment {} initiated.", name),
        deployment_name: name,
        namespace,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub namespace: Option<String>,
    pub context: Option<String>,
    pub container: Option<String>,
    pub tail: Option<i64>,
    #[serde(default)]
    pub previous: bool,
}

/// GET /resources/pods/{name}/logs?namespace=&container=&tail=&previous=
pub async fn pod_logs(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Result<String, ApiError> {
    let namespace = state.namespace(query.namespace.as_deref());

    fetch::pod_logs(
        &state.cache,
        &name,
        namespace,
        query.context.as_deref(),
        query.container.as_deref(),
        query.tail.unwrap_or(100),
        query.previous,
    )
    .await
    .map_err(|e| ApiError::new("pods", e))
}
