//! Horizontal pod autoscalers

use k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscaler;
use kube::Api;
use kube::api::ListParams;

use crate::cache::ClientCache;
use crate::error::Error;
use crate::models::HpaRecord;

use super::format_age;

/// List horizontal pod autoscalers in a namespace
pub async fn list_hpas(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<HpaRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<HorizontalPodAutoscaler> = Api::namespaced(client, namespace);
    let hpas = api.list(&ListParams::default()).await?;
    Ok(hpas.items.iter().map(map_hpa).collect())
}

pub fn map_hpa(hpa: &HorizontalPodAutoscaler) -> HpaRecord {
    let meta = &hpa.metadata;
    let spec = hpa.spec.as_ref();
    let status = hpa.status.as_ref();

    // The dashboard surfaces CPU utilization only; other metric types are
    // visible through the raw manifest view
    let cpu_target_percent = spec
        .and_then(|s| s.metrics.as_ref())
        .and_then(|metrics| {
            metrics.iter().find_map(|m| {
                m.resource
                    .as_ref()
                    .filter(|r| m.type_ == "Resource" && r.name == "cpu")
                    .and_then(|r| r.target.average_utilization)
            })
        });

    let cpu_current_percent = status
        .and_then(|s| s.current_metrics.as_ref())
        .and_then(|metrics| {
            metrics.iter().find_map(|m| {
                m.resource
                    .as_ref()
                    .filter(|r| m.type_ == "Resource" && r.name == "cpu")
                    .and_then(|r| r.current.average_utilization)
            })
        });

    HpaRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        target_kind: spec
            .map(|s| s.scale_target_ref.kind.clone())
            .unwrap_or_default(),
        target_name: spec
            .map(|s| s.scale_target_ref.name.clone())
            .unwrap_or_default(),
        min_replicas: spec.and_then(|s| s.min_replicas).unwrap_or(1),
        max_replicas: spec.map(|s| s.max_replicas).unwrap_or(1),
        current_replicas: status.and_then(|s| s.current_replicas).unwrap_or(0),
        desired_replicas: status.map(|s| s.desired_replicas).unwrap_or(0),
        cpu_target_percent,
        cpu_current_percent,
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
    }
}
