//! Generic resource routes
//!
//! Dispatches `/resources/{kind}` to the matching fetcher and serializes the
//! records. Unknown kinds are a 404; get-by-name absence is a 404 produced
//! here, never by the fetcher.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, Error};
use crate::fetch;
use crate::models::ResourceKind;

use super::{AppState, ResourceQuery};

fn parse_kind(segment: &str) -> Result<ResourceKind, ApiError> {
    ResourceKind::from_str_case_insensitive(segment)
        .ok_or_else(|| ApiError::not_found("resources", segment))
}

fn to_value<T: Serialize>(kind: ResourceKind, items: T) -> Result<Value, ApiError> {
    serde_json::to_value(items)
        .map_err(|e| ApiError::new(kind.as_str(), Error::Other(e.into())))
}

/// GET /resources/{kind}?namespace=&context=&selector=
pub async fn list(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&kind)?;
    let cache = &state.cache;
    let namespace = state.namespace(query.namespace.as_deref());
    let context = query.context.as_deref();
    let selector = query.selector.as_deref();

    macro_rules! list_records {
        ($fut:expr) => {
            to_value(kind, $fut.await.map_err(|e| ApiError::new(kind.as_str(), e))?)?
        };
    }

    let value = match kind {
        ResourceKind::Pod => {
            list_records!(fetch::list_pods(cache, namespace, context, selector))
        }
        ResourceKind::Deployment => {
            list_records!(fetch::list_deployments(cache, namespace, context))
        }
        ResourceKind::StatefulSet => {
            list_records!(fetch::list_statefulsets(cache, namespace, context))
        }
        ResourceKind::DaemonSet => {
            list_records!(fetch::list_daemonsets(cache, namespace, context))
        }
        ResourceKind::Job => list_records!(fetch::list_jobs(cache, namespace, context)),
        ResourceKind::CronJob => list_records!(fetch::list_cronjobs(cache, namespace, context)),
        ResourceKind::Service => list_records!(fetch::list_services(cache, namespace, context)),
        ResourceKind::Ingress => list_records!(fetch::list_ingresses(cache, namespace, context)),
        ResourceKind::ConfigMap => {
            list_records!(fetch::list_config_maps(cache, namespace, context))
        }
        ResourceKind::Secret => list_records!(fetch::list_secrets(cache, namespace, context)),
        ResourceKind::ResourceQuota => {
            list_records!(fetch::list_resource_quotas(cache, namespace, context))
        }
        ResourceKind::LimitRange => {
            list_records!(fetch::list_limit_ranges(cache, namespace, context))
        }
        ResourceKind::Node => list_records!(fetch::list_nodes(cache, context)),
        ResourceKind::Namespace => list_records!(fetch::list_namespaces(cache, context)),
        ResourceKind::Event => {
            list_records!(fetch::list_events(cache, Some(namespace), context, 24))
        }
        ResourceKind::HorizontalPodAutoscaler => {
            list_records!(fetch::list_hpas(cache, namespace, context))
        }
        ResourceKind::PersistentVolume => {
            list_records!(fetch::list_persistent_volumes(cache, context))
        }
        ResourceKind::PersistentVolumeClaim => {
            list_records!(fetch::list_persistent_volume_claims(cache, namespace, context))
        }
    };

    Ok(Json(value))
}

/// GET /resources/{kind}/{name}?namespace=&context=
pub async fn get_one(
    State(state): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&kind)?;
    let cache = &state.cache;
    let namespace = state.namespace(query.namespace.as_deref());
    let context = query.context.as_deref();

    macro_rules! get_record {
        ($fut:expr) => {{
            let record = $fut
                .await
                .map_err(|e| ApiError::new(kind.as_str(), e))?
                .ok_or_else(|| ApiError::not_found(kind.as_str(), &name))?;
            to_value(kind, record)?
        }};
    }

    let value = match kind {
        ResourceKind::Pod => get_record!(fetch::get_pod(cache, &name, namespace, context)),
        ResourceKind::Deployment => {
            get_record!(fetch::get_deployment(cache, &name, namespace, context))
        }
        ResourceKind::StatefulSet => {
            get_record!(fetch::get_statefulset(cache, &name, namespace, context))
        }
        ResourceKind::DaemonSet => {
            get_record!(fetch::get_daemonset(cache, &name, namespace, context))
        }
        ResourceKind::Job => get_record!(fetch::get_job(cache, &name, namespace, context)),
        ResourceKind::CronJob => {
            get_record!(fetch::get_cronjob(cache, &name, namespace, context))
        }
        ResourceKind::Service => {
            get_record!(fetch::get_service(cache, &name, namespace, context))
        }
        ResourceKind::Ingress => {
            get_record!(fetch::get_ingress(cache, &name, namespace, context))
        }
        ResourceKind::ConfigMap => {
            get_record!(fetch::get_config_map(cache, &name, namespace, context))
        }
        ResourceKind::Secret => get_record!(fetch::get_secret(cache, &name, namespace, context)),
        ResourceKind::ResourceQuota => {
            get_record!(fetch::get_resource_quota(cache, &name, namespace, context))
        }
        ResourceKind::LimitRange => {
            get_record!(fetch::get_limit_range(cache, &name, namespace, context))
        }
        ResourceKind::Node => get_record!(fetch::get_node(cache, &name, context)),
        ResourceKind::Namespace => get_record!(fetch::get_namespace(cache, &name, context)),
        // List-only kinds have no detail view
        ResourceKind::Event
        | ResourceKind::HorizontalPodAutoscaler
        | ResourceKind::PersistentVolume
        | ResourceKind::PersistentVolumeClaim => {
            return Err(ApiError::not_found(kind.as_str(), &name));
        }
    };

    Ok(Json(value))
}

#[derive(Debug, Serialize)]
pub struct ManifestResponse {
    pub kind: String,
    pub name: String,
    pub yaml: String,
}

/// GET /resources/{kind}/{name}/yaml?namespace=&context=
pub async fn manifest(
    State(state): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<ManifestResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let namespace = state.namespace(query.namespace.as_deref());
    let context = query.context.as_deref();

    let yaml = fetch::resource_yaml(&state.cache, kind, namespace, &name, context)
        .await
        .map_err(|e| ApiError::new(kind.as_str(), e))?
        .ok_or_else(|| ApiError::not_found(kind.as_str(), &name))?;

    Ok(Json(ManifestResponse {
        kind: kind.as_str().to_string(),
        name,
        yaml,
    }))
}

/// GET /resources/{kind}/{name}/events?namespace=&context=
pub async fn events(
    State(state): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&kind)?;
    let namespace = state.namespace(query.namespace.as_deref());
    let context = query.context.as_deref();

    let events =
        fetch::list_resource_events(&state.cache, kind.as_str(), &name, namespace, context)
            .await
            .map_err(|e| ApiError::new(kind.as_str(), e))?;

    to_value(kind, events).map(Json)
}

/// GET /resources/nodes/{name}/pods?namespace=&context=
pub async fn node_pods(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Value>, ApiError> {
    let pods = fetch::list_node_pods(
        &state.cache,
        &name,
        query.namespace.as_deref(),
        query.context.as_deref(),
    )
    .await
    .map_err(|e| ApiError::new("nodes", e))?;

    serde_json::to_value(pods)
        .map(Json)
        .map_err(|e| ApiError::new("nodes", Error::Other(e.into())))
}
