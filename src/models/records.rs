//! Display-oriented resource records
//!
//! Flat projections of cluster objects, shaped for the dashboard's JSON
//! surface. Records are rebuilt fresh on every fetch and never mutated;
//! identity is the (kind, namespace, name) tuple.

use std::collections::BTreeMap;

use serde::Serialize;

/// Labels as served to the UI
pub type LabelMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub name: String,
    pub image: String,
    pub ready: bool,
    pub restart_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodRecord {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub node_name: String,
    pub ip: String,
    pub restart_count: i32,
    pub age: String,
    pub labels: LabelMap,
    pub containers: Vec<ContainerRecord>,
    pub config_maps: Vec<String>,
    pub secrets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaCounts {
    pub desired: i32,
    pub ready: i32,
    pub available: i32,
    pub unavailable: i32,
    pub updated: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub replicas: ReplicaCounts,
    pub strategy: String,
    pub age: String,
    pub labels: LabelMap,
    pub selector: LabelMap,
    pub config_maps: Vec<String>,
    pub secrets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSetReplicas {
    pub desired: i32,
    pub ready: i32,
    pub current: i32,
    pub updated: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSetRecord {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub replicas: StatefulSetReplicas,
    pub service_name: String,
    pub update_strategy: String,
    pub pod_management_policy: String,
    pub age: String,
    pub labels: LabelMap,
    pub selector: LabelMap,
    pub persistent_volume_claims: Vec<String>,
    pub config_maps: Vec<String>,
    pub secrets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonSetRecord {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub desired: i32,
    pub current: i32,
    pub ready: i32,
    pub up_to_date: i32,
    pub available: i32,
    pub update_strategy: String,
    pub age: String,
    pub labels: LabelMap,
    pub selector: LabelMap,
    pub config_maps: Vec<String>,
    pub secrets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConditionRecord {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub completions: i32,
    pub succeeded: i32,
    pub failed: i32,
    pub active: i32,
    pub start_time: Option<String>,
    pub completion_time: Option<String>,
    pub duration: Option<String>,
    pub age: String,
    pub labels: LabelMap,
    pub conditions: Vec<JobConditionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJobRecord {
    pub name: String,
    pub namespace: String,
    pub schedule: String,
    pub suspend: bool,
    pub active: usize,
    pub last_schedule: Option<String>,
    pub last_successful_time: Option<String>,
    pub age: String,
    pub labels: LabelMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePortRecord {
    pub name: Option<String>,
    pub protocol: String,
    pub port: i32,
    pub target_port: String,
    pub node_port: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub cluster_ip: String,
    pub external_ips: Vec<String>,
    pub ports: Vec<ServicePortRecord>,
    pub selector: LabelMap,
    pub age: String,
    pub labels: LabelMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressPathRecord {
    pub path: String,
    pub path_type: String,
    pub service: String,
    pub port: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRuleRecord {
    pub host: Option<String>,
    pub paths: Vec<IngressPathRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressTlsRecord {
    pub hosts: Vec<String>,
    pub secret_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRecord {
    pub name: String,
    pub namespace: String,
    pub class_name: Option<String>,
    pub hosts: Vec<String>,
    pub rules: Vec<IngressRuleRecord>,
    pub tls: Vec<IngressTlsRecord>,
    pub age: String,
    pub labels: LabelMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapRecord {
    pub name: String,
    pub namespace: String,
    pub data: BTreeMap<String, String>,
    pub age: String,
    pub labels: LabelMap,
}

/// Secret projection; list views carry empty placeholder values, detail views
/// carry the base64 payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRecord {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub secret_type: String,
    pub keys: Vec<String>,
    pub data: BTreeMap<String, String>,
    pub age: String,
    pub labels: LabelMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResources {
    pub cpu: String,
    pub memory: String,
    pub pods: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConditionRecord {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    pub reason: String,
    pub message: String,
    pub last_transition_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub name: String,
    pub status: String,
    pub roles: Vec<String>,
    pub version: String,
    pub capacity: NodeResources,
    pub allocatable: NodeResources,
    pub age: String,
    pub labels: LabelMap,
    pub conditions: Vec<NodeConditionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceRecord {
    pub name: String,
    pub status: String,
    pub age: String,
    pub labels: LabelMap,
    pub annotations: LabelMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub event_type: String,
    pub reason: String,
    pub message: String,
    pub kind: String,
    pub name: String,
    pub namespace: String,
    pub count: i32,
    pub first_timestamp: String,
    pub last_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HpaRecord {
    pub name: String,
    pub namespace: String,
    pub target_kind: String,
    pub target_name: String,
    pub min_replicas: i32,
    pub max_replicas: i32,
    pub current_replicas: i32,
    pub desired_replicas: i32,
    pub cpu_target_percent: Option<i32>,
    pub cpu_current_percent: Option<i32>,
    pub age: String,
    pub labels: LabelMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeRecord {
    pub name: String,
    pub capacity: String,
    pub access_modes: Vec<String>,
    pub reclaim_policy: String,
    pub status: String,
    pub claim: String,
    pub storage_class: String,
    pub age: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaimRecord {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub volume: String,
    pub capacity: String,
    pub access_modes: Vec<String>,
    pub storage_class: String,
    pub age: String,
    pub labels: LabelMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuotaRecord {
    pub name: String,
    pub namespace: String,
    pub hard: BTreeMap<String, String>,
    pub used: BTreeMap<String, String>,
    pub age: String,
    pub labels: LabelMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitRangeItemRecord {
    #[serde(rename = "type")]
    pub limit_type: String,
    pub max: Option<BTreeMap<String, String>>,
    pub min: Option<BTreeMap<String, String>>,
    pub default: Option<BTreeMap<String, String>>,
    pub default_request: Option<BTreeMap<String, String>>,
    pub max_limit_request_ratio: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitRangeRecord {
    pub name: String,
    pub namespace: String,
    pub limits: Vec<LimitRangeItemRecord>,
    pub age: String,
    pub labels: LabelMap,
}
