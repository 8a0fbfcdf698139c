//! Persistent volumes and claims

use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeClaim};
use kube::Api;
use kube::api::ListParams;

use crate::cache::ClientCache;
use crate::error::Error;
use crate::models::{PersistentVolumeClaimRecord, PersistentVolumeRecord};

use super::format_age;

/// List the cluster's persistent volumes
pub async fn list_persistent_volumes(
    cache: &ClientCache,
    context: Option<&str>,
) -> Result<Vec<PersistentVolumeRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<PersistentVolume> = Api::all(client);
    let volumes = api.list(&ListParams::default()).await?;
    Ok(volumes.items.iter().map(map_persistent_volume).collect())
}

pub fn map_persistent_volume(volume: &PersistentVolume) -> PersistentVolumeRecord {
    let meta = &volume.metadata;
    let spec = volume.spec.as_ref();

    let claim = spec
        .and_then(|s| s.claim_ref.as_ref())
        .map(|claim| {
            format!(
                "{}/{}",
                claim.namespace.clone().unwrap_or_default(),
                claim.name.clone().unwrap_or_default()
            )
        })
        .unwrap_or_default();

    PersistentVolumeRecord {
        name: meta.name.clone().unwrap_or_default(),
        capacity: spec
            .and_then(|s| s.capacity.as_ref())
            .and_then(|c| c.get("storage"))
            .map(|q| q.0.clone())
            .unwrap_or_else(|| "0".to_string()),
        access_modes: spec.and_then(|s| s.access_modes.clone()).unwrap_or_default(),
        reclaim_policy: spec
            .and_then(|s| s.persistent_volume_reclaim_policy.clone())
            .unwrap_or_else(|| "Retain".to_string()),
        status: volume
            .status
            .as_ref()
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        claim,
        storage_class: spec
            .and_then(|s| s.storage_class_name.clone())
            .unwrap_or_default(),
        age: format_age(meta.creation_timestamp.as_ref()),
    }
}

/// List persistent volume claims in a namespace
pub async fn list_persistent_volume_claims(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<PersistentVolumeClaimRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<PersistentVolumeClaim> = Api::namespaced(client, namespace);
    let claims = api.list(&ListParams::default()).await?;
    Ok(claims
        .items
        .iter()
        .map(map_persistent_volume_claim)
        .collect())
}

pub fn map_persistent_volume_claim(
    claim: &PersistentVolumeClaim,
) -> PersistentVolumeClaimRecord {
    let meta = &claim.metadata;
    let spec = claim.spec.as_ref();
    let status = claim.status.as_ref();

    PersistentVolumeClaimRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        status: status
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        volume: spec.and_then(|s| s.volume_name.clone()).unwrap_or_default(),
        capacity: status
            .and_then(|s| s.capacity.as_ref())
            .and_then(|c| c.get("storage"))
            .map(|q| q.0.clone())
            .unwrap_or_else(|| "0".to_string()),
        access_modes: spec.and_then(|s| s.access_modes.clone()).unwrap_or_default(),
        storage_class: spec
            .and_then(|s| s.storage_class_name.clone())
            .unwrap_or_default(),
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
    }
}
