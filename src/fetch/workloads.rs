//! Workload controllers: deployments, statefulsets, daemonsets, jobs and
//! cronjobs

use chrono::Utc;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use kube::Api;
use kube::api::{ListParams, Patch, PatchParams};

use crate::cache::ClientCache;
use crate::error::Error;
use crate::models::{
    CronJobRecord, DaemonSetRecord, DeploymentRecord, JobConditionRecord, JobRecord,
    ReplicaCounts, StatefulSetRecord, StatefulSetReplicas,
};

use super::{config_map_refs, format_age, format_duration_between, secret_refs};

/// List deployments in a namespace
pub async fn list_deployments(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<DeploymentRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Deployment> = Api::namespaced(client, namespace);
    let deployments = api.list(&ListParams::default()).await?;
    Ok(deployments.items.iter().map(map_deployment).collect())
}

/// Get a single deployment by name; `None` when it does not exist
pub async fn get_deployment(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<DeploymentRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Deployment> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(map_deployment))
}

/// Trigger a rollout restart by stamping the pod template, the same way
/// `kubectl rollout restart` does.
pub async fn restart_deployment(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<(), Error> {
    let client = cache.client(context).await?;
    let api: Api<Deployment> = Api::namespaced(client, namespace);

    let patch = serde_json::json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": {
                        "kubectl.kubernetes.io/restartedAt": Utc::now().to_rfc3339(),
                    }
                }
            }
        }
    });

    api.patch(name, &PatchParams::default(), &Patch::Strategic(patch))
        .await?;
    Ok(())
}

/// Project a deployment wire object into its display record
pub fn map_deployment(deployment: &Deployment) -> DeploymentRecord {
    let meta = &deployment.metadata;
    let spec = deployment.spec.as_ref();
    let status = deployment.status.as_ref();

    DeploymentRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        status: deployment_status(deployment),
        replicas: ReplicaCounts {
            desired: spec.and_then(|s| s.replicas).unwrap_or(0),
            ready: status.and_then(|s| s.ready_replicas).unwrap_or(0),
            available: status.and_then(|s| s.available_replicas).unwrap_or(0),
            unavailable: status.and_then(|s| s.unavailable_replicas).unwrap_or(0),
            updated: status.and_then(|s| s.updated_replicas).unwrap_or(0),
        },
        strategy: spec
            .and_then(|s| s.strategy.as_ref())
            .and_then(|s| s.type_.clone())
            .unwrap_or_else(|| "RollingUpdate".to_string()),
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
        selector: spec
            .and_then(|s| s.selector.match_labels.clone())
            .unwrap_or_default(),
        config_maps: pod_template_config_maps(spec.map(|s| &s.template)),
        secrets: pod_template_secrets(spec.map(|s| &s.template)),
    }
}

/// Deployment display status.
///
/// Available when every desired replica is available, Progressing while an
/// update is still rolling replicas forward, Degraded otherwise.
pub fn deployment_status(deployment: &Deployment) -> String {
    let desired = deployment.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
    let status = deployment.status.as_ref();
    let available = status.and_then(|s| s.available_replicas).unwrap_or(0);
    let updated = status.and_then(|s| s.updated_replicas).unwrap_or(0);

    if available >= desired {
        "Available".to_string()
    } else if updated < desired {
        "Progressing".to_string()
    } else {
        "Degraded".to_string()
    }
}

/// List statefulsets in a namespace
pub async fn list_statefulsets(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<StatefulSetRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<StatefulSet> = Api::namespaced(client, namespace);
    let statefulsets = api.list(&ListParams::default()).await?;
    Ok(statefulsets.items.iter().map(map_statefulset).collect())
}

/// Get a single statefulset by name; `None` when it does not exist
pub async fn get_statefulset(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<StatefulSetRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<StatefulSet> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(map_statefulset))
}

pub fn map_statefulset(statefulset: &StatefulSet) -> StatefulSetRecord {
    let meta = &statefulset.metadata;
    let spec = statefulset.spec.as_ref();
    let status = statefulset.status.as_ref();

    let pvc_names = spec
        .and_then(|s| s.volume_claim_templates.as_ref())
        .map(|templates| {
            templates
                .iter()
                .filter_map(|t| t.metadata.name.clone())
                .collect()
        })
        .unwrap_or_default();

    StatefulSetRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        status: statefulset_status(statefulset),
        replicas: StatefulSetReplicas {
            desired: spec.and_then(|s| s.replicas).unwrap_or(0),
            ready: status.and_then(|s| s.ready_replicas).unwrap_or(0),
            current: status.and_then(|s| s.current_replicas).unwrap_or(0),
            updated: status.and_then(|s| s.updated_replicas).unwrap_or(0),
        },
        service_name: spec.and_then(|s| s.service_name.clone()).unwrap_or_default(),
        update_strategy: spec
            .and_then(|s| s.update_strategy.as_ref())
            .and_then(|s| s.type_.clone())
            .unwrap_or_else(|| "RollingUpdate".to_string()),
        pod_management_policy: spec
            .and_then(|s| s.pod_management_policy.clone())
            .unwrap_or_else(|| "OrderedReady".to_string()),
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
        selector: spec
            .and_then(|s| s.selector.match_labels.clone())
            .unwrap_or_default(),
        persistent_volume_claims: pvc_names,
        config_maps: pod_template_config_maps(spec.map(|s| &s.template)),
        secrets: pod_template_secrets(spec.map(|s| &s.template)),
    }
}

pub fn statefulset_status(statefulset: &StatefulSet) -> String {
    let desired = statefulset.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
    let ready = statefulset
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);

    if desired > 0 && ready == 0 {
        "Degraded".to_string()
    } else if ready < desired {
        "Progressing".to_string()
    } else {
        "Available".to_string()
    }
}

/// List daemonsets in a namespace
pub async fn list_daemonsets(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<DaemonSetRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<DaemonSet> = Api::namespaced(client, namespace);
    let daemonsets = api.list(&ListParams::default()).await?;
    Ok(daemonsets.items.iter().map(map_daemonset).collect())
}

/// Get a single daemonset by name; `None` when it does not exist
pub async fn get_daemonset(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<DaemonSetRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<DaemonSet> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(map_daemonset))
}

pub fn map_daemonset(daemonset: &DaemonSet) -> DaemonSetRecord {
    let meta = &daemonset.metadata;
    let spec = daemonset.spec.as_ref();
    let status = daemonset.status.as_ref();

    DaemonSetRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        status: daemonset_status(daemonset),
        desired: status.map(|s| s.desired_number_scheduled).unwrap_or(0),
        current: status.map(|s| s.current_number_scheduled).unwrap_or(0),
        ready: status.map(|s| s.number_ready).unwrap_or(0),
        up_to_date: status.and_then(|s| s.updated_number_scheduled).unwrap_or(0),
        available: status.and_then(|s| s.number_available).unwrap_or(0),
        update_strategy: spec
            .and_then(|s| s.update_strategy.as_ref())
            .and_then(|s| s.type_.clone())
            .unwrap_or_else(|| "RollingUpdate".to_string()),
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
        selector: spec
            .and_then(|s| s.selector.match_labels.clone())
            .unwrap_or_default(),
        config_maps: pod_template_config_maps(spec.map(|s| &s.template)),
        secrets: pod_template_secrets(spec.map(|s| &s.template)),
    }
}

pub fn daemonset_status(daemonset: &DaemonSet) -> String {
    let status = daemonset.status.as_ref();
    let desired = status.map(|s| s.desired_number_scheduled).unwrap_or(0);
    let ready = status.map(|s| s.number_ready).unwrap_or(0);

    if desired > 0 && ready == 0 {
        "Degraded".to_string()
    } else if ready < desired {
        "Progressing".to_string()
    } else {
        "Available".to_string()
    }
}

/// List jobs in a namespace
pub async fn list_jobs(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<JobRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Job> = Api::namespaced(client, namespace);
    let jobs = api.list(&ListParams::default()).await?;
    Ok(jobs.items.iter().map(map_job).collect())
}

/// Get a single job by name; `None` when it does not exist
pub async fn get_job(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<JobRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Job> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(map_job))
}

pub fn map_job(job: &Job) -> JobRecord {
    let meta = &job.metadata;
    let status = job.status.as_ref();

    let start_time = status.and_then(|s| s.start_time.as_ref());
    let completion_time = status.and_then(|s| s.completion_time.as_ref());
    let duration = start_time.map(|start| {
        let end = completion_time.map(|t| t.0).unwrap_or_else(Utc::now);
        format_duration_between(&start.0, end)
    });

    JobRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        status: job_status(job),
        completions: job.spec.as_ref().and_then(|s| s.completions).unwrap_or(1),
        succeeded: status.and_then(|s| s.succeeded).unwrap_or(0),
        failed: status.and_then(|s| s.failed).unwrap_or(0),
        active: status.and_then(|s| s.active).unwrap_or(0),
        start_time: start_time.map(|t| t.0.to_rfc3339()),
        completion_time: completion_time.map(|t| t.0.to_rfc3339()),
        duration,
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
        conditions: status
            .and_then(|s| s.conditions.as_ref())
            .map(|conditions| {
                conditions
                    .iter()
                    .map(|c| JobConditionRecord {
                        condition_type: c.type_.clone(),
                        status: c.status.clone(),
                        reason: c.reason.clone(),
                        message: c.message.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

pub fn job_status(job: &Job) -> String {
    let status = job.status.as_ref();
    let conditions = status.and_then(|s| s.conditions.as_deref()).unwrap_or(&[]);
    let succeeded = status.and_then(|s| s.succeeded).unwrap_or(0);
    let failed = status.and_then(|s| s.failed).unwrap_or(0);
    let active = status.and_then(|s| s.active).unwrap_or(0);

    let has_condition = |kind: &str| {
        conditions
            .iter()
            .any(|c| c.type_ == kind && c.status == "True")
    };

    if has_condition("Complete") {
        "Complete".to_string()
    } else if has_condition("Failed") {
        "Failed".to_string()
    } else if active > 0 {
        "Running".to_string()
    } else if succeeded == 0 && failed == 0 {
        "Pending".to_string()
    } else {
        "Unknown".to_string()
    }
}

/// List cronjobs in a namespace
pub async fn list_cronjobs(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<CronJobRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<CronJob> = Api::namespaced(client, namespace);
    let cronjobs = api.list(&ListParams::default()).await?;
    Ok(cronjobs.items.iter().map(map_cronjob).collect())
}

/// Get a single cronjob by name; `None` when it does not exist
pub async fn get_cronjob(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<CronJobRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<CronJob> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(map_cronjob))
}

pub fn map_cronjob(cronjob: &CronJob) -> CronJobRecord {
    let meta = &cronjob.metadata;
    let spec = cronjob.spec.as_ref();
    let status = cronjob.status.as_ref();

    CronJobRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        schedule: spec.map(|s| s.schedule.clone()).unwrap_or_default(),
        suspend: spec.and_then(|s| s.suspend).unwrap_or(false),
        active: status.and_then(|s| s.active.as_ref()).map(|a| a.len()).unwrap_or(0),
        last_schedule: status
            .and_then(|s| s.last_schedule_time.as_ref())
            .map(|t| t.0.to_rfc3339()),
        last_successful_time: status
            .and_then(|s| s.last_successful_time.as_ref())
            .map(|t| t.0.to_rfc3339()),
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
    }
}

fn pod_template_config_maps(
    template: Option<&k8s_openapi::api::core::v1::PodTemplateSpec>,
) -> Vec<String> {
    template
        .and_then(|t| t.spec.as_ref())
        .map(config_map_refs)
        .unwrap_or_default()
}

fn pod_template_secrets(
    template: Option<&k8s_openapi::api::core::v1::PodTemplateSpec>,
) -> Vec<String> {
    template
        .and_then(|t| t.spec.as_ref())
        .map(secret_refs)
        .unwrap_or_default()
}
