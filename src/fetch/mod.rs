//! Resource fetchers
//!
//! One fetch operation per resource kind, all the same shape: obtain a client
//! from the cache, issue a single list or get call, and project each wire
//! object into its display record. Projection is a pure function of the wire
//! snapshot, so two fetches against unchanged cluster state yield identical
//! records.
//!
//! Listing never fails on zero items. Get-by-name signals absence with
//! `None`; every other failure propagates untouched for the caller's error
//! classifier to deal with.

pub mod autoscaling;
pub mod cluster;
pub mod configs;
pub mod networking;
pub mod pods;
pub mod storage;
pub mod workloads;
pub mod yaml;

pub use autoscaling::*;
pub use cluster::*;
pub use configs::*;
pub use networking::*;
pub use pods::*;
pub use storage::*;
pub use workloads::*;
pub use yaml::*;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

/// Compact age the way `kubectl get` renders it: "12m", "3h", "5d".
pub(crate) fn format_age(timestamp: Option<&Time>) -> String {
    match timestamp {
        Some(t) => format_age_at(&t.0, Utc::now()),
        None => "Unknown".to_string(),
    }
}

pub(crate) fn format_age_at(created: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*created);
    let days = elapsed.num_days();
    if days > 0 {
        return format!("{}d", days);
    }
    let hours = elapsed.num_hours();
    if hours > 0 {
        return format!("{}h", hours);
    }
    format!("{}m", elapsed.num_minutes().max(0))
}

/// Elapsed run time between two instants, e.g. "2h 5m", "3m 20s", "45s".
pub(crate) fn format_duration_between(start: &DateTime<Utc>, end: DateTime<Utc>) -> String {
    let seconds = end.signed_duration_since(*start).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

/// ConfigMap names a pod spec references via env, envFrom and volumes
pub(crate) fn config_map_refs(spec: &PodSpec) -> Vec<String> {
    let mut names = BTreeSet::new();

    for container in &spec.containers {
        for env_from in container.env_from.as_deref().unwrap_or(&[]) {
            if let Some(name) = env_from.config_map_ref.as_ref().map(|r| r.name.clone()) {
                names.insert(name);
            }
        }
        for env in container.env.as_deref().unwrap_or(&[]) {
            if let Some(name) = env
                .value_from
                .as_ref()
                .and_then(|v| v.config_map_key_ref.as_ref())
                .map(|r| r.name.clone())
            {
                names.insert(name);
            }
        }
    }

    for volume in spec.volumes.as_deref().unwrap_or(&[]) {
        if let Some(name) = volume.config_map.as_ref().map(|cm| cm.name.clone()) {
            names.insert(name);
        }
    }

    names.into_iter().collect()
}

/// Secret names a pod spec references via env, envFrom, volumes and image
/// pull secrets
pub(crate) fn secret_refs(spec: &PodSpec) -> Vec<String> {
    let mut names = BTreeSet::new();

    for container in &spec.containers {
        for env_from in container.env_from.as_deref().unwrap_or(&[]) {
            if let Some(name) = env_from.secret_ref.as_ref().map(|r| r.name.clone()) {
                names.insert(name);
            }
        }
        for env in container.env.as_deref().unwrap_or(&[]) {
            if let Some(name) = env
                .value_from
                .as_ref()
                .and_then(|v| v.secret_key_ref.as_ref())
                .map(|r| r.name.clone())
            {
                names.insert(name);
            }
        }
    }

    for volume in spec.volumes.as_deref().unwrap_or(&[]) {
        if let Some(name) = volume.secret.as_ref().and_then(|s| s.secret_name.clone()) {
            names.insert(name);
        }
    }

    for pull_secret in spec.image_pull_secrets.as_deref().unwrap_or(&[]) {
        names.insert(pull_secret.name.clone());
    }

    names.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_age_at() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

        let five_days = Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap();
        assert_eq!(format_age_at(&five_days, now), "5d");

        let three_hours = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        assert_eq!(format_age_at(&three_hours, now), "3h");

        let twelve_minutes = Utc.with_ymd_and_hms(2024, 6, 10, 11, 48, 0).unwrap();
        assert_eq!(format_age_at(&twelve_minutes, now), "12m");

        // Clock skew must not render negative ages
        let future = Utc.with_ymd_and_hms(2024, 6, 10, 12, 5, 0).unwrap();
        assert_eq!(format_age_at(&future, now), "0m");
    }

    #[test]
    fn test_format_age_missing_timestamp() {
        assert_eq!(format_age(None), "Unknown");
    }

    #[test]
    fn test_format_duration_between() {
        let start = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

        let end = Utc.with_ymd_and_hms(2024, 6, 10, 14, 5, 0).unwrap();
        assert_eq!(format_duration_between(&start, end), "2h 5m");

        let end = Utc.with_ymd_and_hms(2024, 6, 10, 12, 3, 20).unwrap();
        assert_eq!(format_duration_between(&start, end), "3m 20s");

        let end = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 45).unwrap();
        assert_eq!(format_duration_between(&start, end), "45s");
    }
}
