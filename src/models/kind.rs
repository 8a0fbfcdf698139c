//! Resource kind definitions
//!
//! Central enum for every resource kind the dashboard serves. This eliminates
//! hardcoded strings in route dispatch and provides type safety for kind
//! references.

use std::fmt;
use std::str::FromStr;

/// Enumeration of the resource kinds served by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    // Core workloads
    Pod,
    Deployment,
    StatefulSet,
    DaemonSet,
    Job,
    CronJob,
    // Networking
    Service,
    Ingress,
    // Configuration
    ConfigMap,
    Secret,
    ResourceQuota,
    LimitRange,
    // Cluster-level
    Node,
    Namespace,
    Event,
    // Autoscaling
    HorizontalPodAutoscaler,
    // Storage
    PersistentVolume,
    PersistentVolumeClaim,
}

impl ResourceKind {
    /// Get the display name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pod => "Pod",
            ResourceKind::Deployment => "Deployment",
            ResourceKind::StatefulSet => "StatefulSet",
            ResourceKind::DaemonSet => "DaemonSet",
            ResourceKind::Job => "Job",
            ResourceKind::CronJob => "CronJob",
            ResourceKind::Service => "Service",
            ResourceKind::Ingress => "Ingress",
            ResourceKind::ConfigMap => "ConfigMap",
            ResourceKind::Secret => "Secret",
            ResourceKind::ResourceQuota => "ResourceQuota",
            ResourceKind::LimitRange => "LimitRange",
            ResourceKind::Node => "Node",
            ResourceKind::Namespace => "Namespace",
            ResourceKind::Event => "Event",
            ResourceKind::HorizontalPodAutoscaler => "HorizontalPodAutoscaler",
            ResourceKind::PersistentVolume => "PersistentVolume",
            ResourceKind::PersistentVolumeClaim => "PersistentVolumeClaim",
        }
    }

    /// Whether objects of this kind live inside a namespace
    pub fn namespaced(&self) -> bool {
        !matches!(
            self,
            ResourceKind::Node | ResourceKind::Namespace | ResourceKind::PersistentVolume
        )
    }

    /// Get all served resource kinds
    pub fn all() -> &'static [Self] {
        &[
            ResourceKind::Pod,
            ResourceKind::Deployment,
            ResourceKind::StatefulSet,
            ResourceKind::DaemonSet,
            ResourceKind::Job,
            ResourceKind::CronJob,
            ResourceKind::Service,
            ResourceKind::Ingress,
            ResourceKind::ConfigMap,
            ResourceKind::Secret,
            ResourceKind::ResourceQuota,
            ResourceKind::LimitRange,
            ResourceKind::Node,
            ResourceKind::Namespace,
            ResourceKind::Event,
            ResourceKind::HorizontalPodAutoscaler,
            ResourceKind::PersistentVolume,
            ResourceKind::PersistentVolumeClaim,
        ]
    }

    /// Try to parse a string into a ResourceKind, returning None if invalid
    pub fn parse_optional(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Parse a route segment (case-insensitive, singular/plural/short forms)
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pod" | "pods" | "po" => Some(ResourceKind::Pod),
            "deployment" | "deployments" | "deploy" => Some(ResourceKind::Deployment),
            "statefulset" | "statefulsets" | "sts" => Some(ResourceKind::StatefulSet),
            "daemonset" | "daemonsets" | "ds" => Some(ResourceKind::DaemonSet),
            "job" | "jobs" => Some(ResourceKind::Job),
            "cronjob" | "cronjobs" | "cj" => Some(ResourceKind::CronJob),
            "service" | "services" | "svc" => Some(ResourceKind::Service),
            "ingress" | "ingresses" | "ing" => Some(ResourceKind::Ingress),
            "configmap" | "configmaps" | "cm" => Some(ResourceKind::ConfigMap),
            "secret" | "secrets" => Some(ResourceKind::Secret),
            "resourcequota" | "resourcequotas" | "quota" | "quotas" => {
                Some(ResourceKind::ResourceQuota)
            }
            "limitrange" | "limitranges" | "limits" => Some(ResourceKind::LimitRange),
            "node" | "nodes" | "no" => Some(ResourceKind::Node),
            "namespace" | "namespaces" | "ns" => Some(ResourceKind::Namespace),
            "event" | "events" | "ev" => Some(ResourceKind::Event),
            "horizontalpodautoscaler" | "horizontalpodautoscalers" | "hpa" | "hpas" => {
                Some(ResourceKind::HorizontalPodAutoscaler)
            }
            "persistentvolume" | "persistentvolumes" | "pv" | "pvs" => {
                Some(ResourceKind::PersistentVolume)
            }
            "persistentvolumeclaim" | "persistentvolumeclaims" | "pvc" | "pvcs" => {
                Some(ResourceKind::PersistentVolumeClaim)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pod" => Ok(ResourceKind::Pod),
            "Deployment" => Ok(ResourceKind::Deployment),
            "StatefulSet" => Ok(ResourceKind::StatefulSet),
            "DaemonSet" => Ok(ResourceKind::DaemonSet),
            "Job" => Ok(ResourceKind::Job),
            "CronJob" => Ok(ResourceKind::CronJob),
            "Service" => Ok(ResourceKind::Service),
            "Ingress" => Ok(ResourceKind::Ingress),
            "ConfigMap" => Ok(ResourceKind::ConfigMap),
            "Secret" => Ok(ResourceKind::Secret),
            "ResourceQuota" => Ok(ResourceKind::ResourceQuota),
            "LimitRange" => Ok(ResourceKind::LimitRange),
            "Node" => Ok(ResourceKind::Node),
            "Namespace" => Ok(ResourceKind::Namespace),
            "Event" => Ok(ResourceKind::Event),
            "HorizontalPodAutoscaler" => Ok(ResourceKind::HorizontalPodAutoscaler),
            "PersistentVolume" => Ok(ResourceKind::PersistentVolume),
            "PersistentVolumeClaim" => Ok(ResourceKind::PersistentVolumeClaim),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}
