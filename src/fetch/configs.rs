//! ConfigMaps, secrets, resource quotas and limit ranges

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use k8s_openapi::api::core::v1::{ConfigMap, LimitRange, ResourceQuota, Secret};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::Api;
use kube::api::ListParams;

use crate::cache::ClientCache;
use crate::error::Error;
use crate::models::{
    ConfigMapRecord, LimitRangeItemRecord, LimitRangeRecord, ResourceQuotaRecord, SecretRecord,
};

use super::format_age;

/// List configmaps in a namespace
pub async fn list_config_maps(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<ConfigMapRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<ConfigMap> = Api::namespaced(client, namespace);
    let config_maps = api.list(&ListParams::default()).await?;
    Ok(config_maps.items.iter().map(map_config_map).collect())
}

/// Get a single configmap by name; `None` when it does not exist
pub async fn get_config_map(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<ConfigMapRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<ConfigMap> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(map_config_map))
}

pub fn map_config_map(config_map: &ConfigMap) -> ConfigMapRecord {
    let meta = &config_map.metadata;
    ConfigMapRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        data: config_map.data.clone().unwrap_or_default(),
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
    }
}

/// List secrets in a namespace. List views never carry payloads, only keys
/// with empty placeholder values.
pub async fn list_secrets(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<SecretRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Secret> = Api::namespaced(client, namespace);
    let secrets = api.list(&ListParams::default()).await?;
    Ok(secrets
        .items
        .iter()
        .map(|s| map_secret(s, false))
        .collect())
}

/// Get a single secret by name with its base64 payloads; `None` when it does
/// not exist
pub async fn get_secret(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<SecretRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Secret> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(|s| map_secret(s, true)))
}

pub fn map_secret(secret: &Secret, include_data: bool) -> SecretRecord {
    let meta = &secret.metadata;
    let keys: Vec<String> = secret
        .data
        .as_ref()
        .map(|data| data.keys().cloned().collect())
        .unwrap_or_default();

    let data = secret
        .data
        .as_ref()
        .map(|data| {
            data.iter()
                .map(|(key, value)| {
                    let rendered = if include_data {
                        BASE64.encode(&value.0)
                    } else {
                        String::new()
                    };
                    (key.clone(), rendered)
                })
                .collect()
        })
        .unwrap_or_default();

    SecretRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        secret_type: secret
            .type_
            .clone()
            .unwrap_or_else(|| "Opaque".to_string()),
        keys,
        data,
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
    }
}

/// List resource quotas in a namespace
pub async fn list_resource_quotas(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<ResourceQuotaRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<ResourceQuota> = Api::namespaced(client, namespace);
    let quotas = api.list(&ListParams::default()).await?;
    Ok(quotas.items.iter().map(map_resource_quota).collect())
}

/// Get a single resource quota by name; `None` when it does not exist
pub async fn get_resource_quota(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<ResourceQuotaRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<ResourceQuota> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(map_resource_quota))
}

pub fn map_resource_quota(quota: &ResourceQuota) -> ResourceQuotaRecord {
    let meta = &quota.metadata;
    let status = quota.status.as_ref();

    ResourceQuotaRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        hard: quantity_map(status.and_then(|s| s.hard.as_ref())),
        used: quantity_map(status.and_then(|s| s.used.as_ref())),
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
    }
}

/// List limit ranges in a namespace
pub async fn list_limit_ranges(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<LimitRangeRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<LimitRange> = Api::namespaced(client, namespace);
    let limit_ranges = api.list(&ListParams::default()).await?;
    Ok(limit_ranges.items.iter().map(map_limit_range).collect())
}

/// Get a single limit range by name; `None` when it does not exist
pub async fn get_limit_range(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<LimitRangeRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<LimitRange> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(map_limit_range))
}

pub fn map_limit_range(limit_range: &LimitRange) -> LimitRangeRecord {
    let meta = &limit_range.metadata;

    let limits = limit_range
        .spec
        .as_ref()
        .map(|spec| {
            spec.limits
                .iter()
                .map(|item| LimitRangeItemRecord {
                    limit_type: item.type_.clone(),
                    max: item.max.as_ref().map(|m| quantity_map(Some(m))),
                    min: item.min.as_ref().map(|m| quantity_map(Some(m))),
                    default: item.default.as_ref().map(|m| quantity_map(Some(m))),
                    default_request: item
                        .default_request
                        .as_ref()
                        .map(|m| quantity_map(Some(m))),
                    max_limit_request_ratio: item
                        .max_limit_request_ratio
                        .as_ref()
                        .map(|m| quantity_map(Some(m))),
                })
                .collect()
        })
        .unwrap_or_default();

    LimitRangeRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        limits,
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
    }
}

pub(crate) fn quantity_map(
    quantities: Option<&BTreeMap<String, Quantity>>,
) -> BTreeMap<String, String> {
    quantities
        .map(|map| {
            map.iter()
                .map(|(key, value)| (key.clone(), value.0.clone()))
                .collect()
        })
        .unwrap_or_default()
}
