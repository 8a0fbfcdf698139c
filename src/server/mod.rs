//! HTTP surface
//!
//! Thin JSON layer over the fetchers. Handlers parse query parameters, call
//! into the fetch layer with (namespace, context), and serialize records;
//! every error funnels through the classifier in `crate::error`.

mod actions;
mod introspect;
mod labels;
mod resources;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use k8s_openapi::api::core::v1::Namespace;
use kube::Api;
use kube::api::ListParams;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use crate::cache::ClientCache;
use crate::config::Config;
use crate::error::ApiError;
use crate::kube::KubeconfigResolver;

/// Shared handler state: the injected client cache plus configuration
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ClientCache>,
    pub config: Arc<Config>,
}

/// Query parameters common to resource routes
#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    pub namespace: Option<String>,
    pub context: Option<String>,
    pub selector: Option<String>,
}

impl AppState {
    /// The namespace to query: explicit parameter or the configured default
    fn namespace<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.config.default_namespace)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/contexts", get(contexts))
        .route("/resources/{kind}", get(resources::list))
        .route("/resources/{kind}/{name}", get(resources::get_one))
        .route("/resources/{kind}/{name}/yaml", get(resources::manifest))
        .route("/resources/{kind}/{name}/events", get(resources::events))
        .route("/resources/pods/{name}/logs", get(actions::pod_logs))
        .route("/resources/pods/{name}/restart", post(actions::restart_pod))
        .route(
            "/resources/deployments/{name}/restart",
            post(actions::restart_deployment),
        )
        .route("/resources/nodes/{name}/pods", get(resources::node_pods))
        .route("/labels", get(labels::index))
        .route("/cache/stats", get(introspect::stats))
        .route("/cache/reset", post(introspect::reset))
        .with_state(state)
}

/// Run the server until ctrl-c
pub async fn serve(config: Config) -> Result<()> {
    let timeout = config.request_timeout_secs.map(Duration::from_secs);
    let resolver = KubeconfigResolver::new(timeout);
    let cache = Arc::new(ClientCache::new(Box::new(resolver), &config.cache));
    let sweeper = Arc::clone(&cache).spawn_sweeper();

    let state = AppState {
        cache,
        config: Arc::new(config),
    };

    let listener = TcpListener::bind(&state.config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", state.config.bind))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    sweeper.abort();
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
}

/// Connection check: resolve the current context and issue a minimal list
async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let healthy = match state.cache.client(None).await {
        Ok(client) => {
            let api: Api<Namespace> = Api::all(client);
            api.list(&ListParams::default().limit(1)).await.is_ok()
        }
        Err(_) => false,
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthResponse { ok: healthy }))
}

#[derive(Debug, Serialize)]
struct ContextsResponse {
    contexts: Vec<String>,
    current: Option<String>,
}

async fn contexts(State(_state): State<AppState>) -> Result<Json<ContextsResponse>, ApiError> {
    let contexts =
        crate::kube::list_contexts().map_err(|e| ApiError::new("contexts", e))?;
    let current =
        crate::kube::current_context().map_err(|e| ApiError::new("contexts", e))?;

    Ok(Json(ContextsResponse { contexts, current }))
}
