//! Pod fetching and projection

use k8s_openapi::api::core::v1::{ContainerStatus, Pod};
use kube::Api;
use kube::api::{DeleteParams, ListParams, LogParams};

use crate::cache::ClientCache;
use crate::error::Error;
use crate::models::{ContainerRecord, PodRecord};

use super::{config_map_refs, format_age, secret_refs};

/// List pods in a namespace, optionally narrowed by a label selector
pub async fn list_pods(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
    label_selector: Option<&str>,
) -> Result<Vec<PodRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Pod> = Api::namespaced(client, namespace);

    let mut params = ListParams::default();
    if let Some(selector) = label_selector {
        params = params.labels(selector);
    }

    let pods = api.list(&params).await?;
    Ok(pods.items.iter().map(map_pod).collect())
}

/// Get a single pod by name; `None` when it does not exist
pub async fn get_pod(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<PodRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Pod> = Api::namespaced(client, namespace);

    Ok(api.get_opt(name).await?.as_ref().map(map_pod))
}

/// Fetch pod logs (most recent `tail` lines, timestamped)
pub async fn pod_logs(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
    container: Option<&str>,
    tail: i64,
    previous: bool,
) -> Result<String, Error> {
    let client = cache.client(context).await?;
    let api: Api<Pod> = Api::namespaced(client, namespace);

    let params = LogParams {
        container: container.map(String::from),
        tail_lines: Some(tail),
        timestamps: true,
        previous,
        ..Default::default()
    };

    Ok(api.logs(name, &params).await?)
}

/// Restart a pod by deleting it. Controller-managed pods are recreated;
/// standalone pods are simply gone.
pub async fn restart_pod(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<(), Error> {
    let client = cache.client(context).await?;
    let api: Api<Pod> = Api::namespaced(client, namespace);

    api.delete(name, &DeleteParams::default()).await?;
    Ok(())
}

/// List the pods scheduled onto a node, scoped to one namespace.
///
/// Listing across all namespaces commonly fails on restricted clusters, so
/// a namespace is required and a 403 degrades to an empty list instead of
/// an error.
pub async fn list_node_pods(
    cache: &ClientCache,
    node_name: &str,
    namespace: Option<&str>,
    context: Option<&str>,
) -> Result<Vec<PodRecord>, Error> {
    let Some(namespace) = namespace else {
        tracing::warn!(node = %node_name, "cannot list node pods without a namespace");
        return Ok(Vec::new());
    };

    let client = cache.client(context).await?;
    let api: Api<Pod> = Api::namespaced(client, namespace);
    let params = ListParams::default().fields(&format!("spec.nodeName={}", node_name));

    match api.list(&params).await {
        Ok(pods) => Ok(pods.items.iter().map(map_pod).collect()),
        Err(kube::Error::Api(resp)) if resp.code == 403 => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Project a pod wire object into its display record
pub fn map_pod(pod: &Pod) -> PodRecord {
    let meta = &pod.metadata;
    let status = pod.status.as_ref();
    let statuses: &[ContainerStatus] = status
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or(&[]);

    let restart_count = statuses.iter().map(|cs| cs.restart_count).sum();

    PodRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        status: pod_status(pod),
        node_name: pod
            .spec
            .as_ref()
            .and_then(|s| s.node_name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        ip: status
            .and_then(|s| s.pod_ip.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        restart_count,
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
        containers: statuses
            .iter()
            .map(|cs| ContainerRecord {
                name: cs.name.clone(),
                image: cs.image.clone(),
                ready: cs.ready,
                restart_count: cs.restart_count,
            })
            .collect(),
        config_maps: pod.spec.as_ref().map(config_map_refs).unwrap_or_default(),
        secrets: pod.spec.as_ref().map(secret_refs).unwrap_or_default(),
    }
}

/// Pod display status: the phase, overridden to CrashLoopBackOff when a
/// container keeps dying with that reason.
pub fn pod_status(pod: &Pod) -> String {
    let status = pod.status.as_ref();
    let phase = status
        .and_then(|s| s.phase.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let crash_looping = status
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or(&[])
        .iter()
        .any(|cs| {
            cs.restart_count > 0
                && cs
                    .last_state
                    .as_ref()
                    .and_then(|s| s.terminated.as_ref())
                    .and_then(|t| t.reason.as_deref())
                    == Some("CrashLoopBackOff")
        });

    if crash_looping {
        "CrashLoopBackOff".to_string()
    } else {
        phase
    }
}
