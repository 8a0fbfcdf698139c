//! Raw manifest fetching
//!
//! Serves any supported kind as a YAML document for the manifest viewer.

use anyhow::Context;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscaler;
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{
    ConfigMap, Event, LimitRange, Namespace, Node, PersistentVolume, PersistentVolumeClaim, Pod,
    ResourceQuota, Secret, Service,
};
use k8s_openapi::api::networking::v1::Ingress;
use kube::Api;

use crate::cache::ClientCache;
use crate::error::Error;
use crate::models::ResourceKind;

/// Fetch a resource manifest as a YAML string; `None` when the object does
/// not exist.
pub async fn resource_yaml(
    cache: &ClientCache,
    kind: ResourceKind,
    namespace: &str,
    name: &str,
    context: Option<&str>,
) -> Result<Option<String>, Error> {
    let client = cache.client(context).await?;

    // Match the kind to its typed API and render the object
    macro_rules! namespaced_manifest {
        ($type:ty) => {{
            let api: Api<$type> = Api::namespaced(client.clone(), namespace);
            match api.get_opt(name).await? {
                Some(obj) => Some(to_yaml(&obj)?),
                None => None,
            }
        }};
    }
    macro_rules! cluster_manifest {
        ($type:ty) => {{
            let api: Api<$type> = Api::all(client.clone());
            match api.get_opt(name).await? {
                Some(obj) => Some(to_yaml(&obj)?),
                None => None,
            }
        }};
    }

    let yaml = match kind {
        ResourceKind::Pod => namespaced_manifest!(Pod),
        ResourceKind::Deployment => namespaced_manifest!(Deployment),
        ResourceKind::StatefulSet => namespaced_manifest!(StatefulSet),
        ResourceKind::DaemonSet => namespaced_manifest!(DaemonSet),
        ResourceKind::Job => namespaced_manifest!(Job),
        ResourceKind::CronJob => namespaced_manifest!(CronJob),
        ResourceKind::Service => namespaced_manifest!(Service),
        ResourceKind::Ingress => namespaced_manifest!(Ingress),
        ResourceKind::ConfigMap => namespaced_manifest!(ConfigMap),
        ResourceKind::Secret => namespaced_manifest!(Secret),
        ResourceKind::ResourceQuota => namespaced_manifest!(ResourceQuota),
        ResourceKind::LimitRange => namespaced_manifest!(LimitRange),
        ResourceKind::Event => namespaced_manifest!(Event),
        ResourceKind::HorizontalPodAutoscaler => {
            namespaced_manifest!(HorizontalPodAutoscaler)
        }
        ResourceKind::PersistentVolumeClaim => namespaced_manifest!(PersistentVolumeClaim),
        ResourceKind::Node => cluster_manifest!(Node),
        ResourceKind::Namespace => cluster_manifest!(Namespace),
        ResourceKind::PersistentVolume => cluster_manifest!(PersistentVolume),
    };

    Ok(yaml)
}

fn to_yaml<T: serde::Serialize>(obj: &T) -> Result<String, Error> {
    // Drop the noisy managedFields block before rendering
    let mut value = serde_json::to_value(obj)
        .context("serializing resource for manifest view")
        .map_err(Error::Other)?;
    if let Some(metadata) = value.get_mut("metadata").and_then(|m| m.as_object_mut()) {
        metadata.remove("managedFields");
    }

    serde_yaml::to_string(&value)
        .context("rendering resource manifest as YAML")
        .map_err(Error::Other)
}
