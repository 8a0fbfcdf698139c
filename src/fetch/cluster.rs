//! Cluster-scoped resources: nodes, namespaces and events

use chrono::{DateTime, Duration, Utc};
use k8s_openapi::api::core::v1::{Event, Namespace, Node};
use kube::Api;
use kube::api::ListParams;

use crate::cache::ClientCache;
use crate::error::Error;
use crate::models::{
    EventRecord, NamespaceRecord, NodeConditionRecord, NodeRecord, NodeResources,
};

use super::format_age;

const NODE_ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";

/// List the cluster's nodes
pub async fn list_nodes(
    cache: &ClientCache,
    context: Option<&str>,
) -> Result<Vec<NodeRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Node> = Api::all(client);
    let nodes = api.list(&ListParams::default()).await?;
    Ok(nodes.items.iter().map(map_node).collect())
}

/// Get a single node by name; `None` when it does not exist
pub async fn get_node(
    cache: &ClientCache,
    name: &str,
    context: Option<&str>,
) -> Result<Option<NodeRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Node> = Api::all(client);
    Ok(api.get_opt(name).await?.as_ref().map(map_node))
}

pub fn map_node(node: &Node) -> NodeRecord {
    let meta = &node.metadata;
    let status = node.status.as_ref();
    let labels = meta.labels.clone().unwrap_or_default();

    let mut roles: Vec<String> = labels
        .keys()
        .filter_map(|label| label.strip_prefix(NODE_ROLE_LABEL_PREFIX))
        .map(String::from)
        .collect();
    if roles.is_empty() {
        roles.push("<none>".to_string());
    }

    let conditions = status
        .and_then(|s| s.conditions.as_ref())
        .map(|conditions| {
            conditions
                .iter()
                .map(|c| NodeConditionRecord {
                    condition_type: c.type_.clone(),
                    status: c.status.clone(),
                    reason: c.reason.clone().unwrap_or_default(),
                    message: c.message.clone().unwrap_or_default(),
                    last_transition_time: c
                        .last_transition_time
                        .as_ref()
                        .map(|t| t.0.to_rfc3339())
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    NodeRecord {
        name: meta.name.clone().unwrap_or_default(),
        status: node_status(node),
        roles,
        version: status
            .and_then(|s| s.node_info.as_ref())
            .map(|info| info.kubelet_version.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        capacity: node_resources(status.and_then(|s| s.capacity.as_ref())),
        allocatable: node_resources(status.and_then(|s| s.allocatable.as_ref())),
        age: format_age(meta.creation_timestamp.as_ref()),
        labels,
        conditions,
    }
}

/// Node display status from its Ready condition
pub fn node_status(node: &Node) -> String {
    let ready = node
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_deref())
        .unwrap_or(&[])
        .iter()
        .find(|c| c.type_ == "Ready");

    match ready {
        Some(condition) if condition.status == "True" => "Ready".to_string(),
        Some(_) => "NotReady".to_string(),
        None => "Unknown".to_string(),
    }
}

fn node_resources(
    quantities: Option<&std::collections::BTreeMap<String, k8s_openapi::apimachinery::pkg::api::resource::Quantity>>,
) -> NodeResources {
    let get = |key: &str| {
        quantities
            .and_then(|map| map.get(key))
            .map(|q| q.0.clone())
            .unwrap_or_else(|| "0".to_string())
    };
    NodeResources {
        cpu: get("cpu"),
        memory: get("memory"),
        pods: get("pods"),
    }
}

/// List the cluster's namespaces
pub async fn list_namespaces(
    cache: &ClientCache,
    context: Option<&str>,
) -> Result<Vec<NamespaceRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Namespace> = Api::all(client);
    let namespaces = api.list(&ListParams::default()).await?;
    Ok(namespaces.items.iter().map(map_namespace).collect())
}

/// Get a single namespace by name; `None` when it does not exist
pub async fn get_namespace(
    cache: &ClientCache,
    name: &str,
    context: Option<&str>,
) -> Result<Option<NamespaceRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Namespace> = Api::all(client);
    Ok(api.get_opt(name).await?.as_ref().map(map_namespace))
}

pub fn map_namespace(namespace: &Namespace) -> NamespaceRecord {
    let meta = &namespace.metadata;
    let phase = namespace
        .status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        .unwrap_or("Unknown");

    let status = match phase {
        "Active" => "Active",
        "Terminating" => "Terminating",
        _ => "Unknown",
    };

    NamespaceRecord {
        name: meta.name.clone().unwrap_or_default(),
        status: status.to_string(),
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
        annotations: meta.annotations.clone().unwrap_or_default(),
    }
}

/// List recent events, namespace-scoped or cluster-wide, most recent first.
/// Events older than `time_range_hours` are dropped.
pub async fn list_events(
    cache: &ClientCache,
    namespace: Option<&str>,
    context: Option<&str>,
    time_range_hours: i64,
) -> Result<Vec<EventRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Event> = match namespace {
        Some(ns) => Api::namespaced(client, ns),
        None => Api::all(client),
    };

    let events = api.list(&ListParams::default()).await?;
    let cutoff = Utc::now() - Duration::hours(time_range_hours);

    let mut recent: Vec<&Event> = events
        .items
        .iter()
        .filter(|event| event_timestamp(event).is_some_and(|ts| ts >= cutoff))
        .collect();
    recent.sort_by_key(|event| std::cmp::Reverse(event_timestamp(event)));

    Ok(recent.into_iter().map(map_event).collect())
}

/// List the events attached to one object, oldest first as the apiserver
/// returns them. Restricted clusters commonly deny event reads; a 403
/// degrades to an empty list.
pub async fn list_resource_events(
    cache: &ClientCache,
    kind: &str,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<EventRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Event> = Api::namespaced(client, namespace);
    let params = ListParams::default().fields(&format!(
        "involvedObject.kind={},involvedObject.name={}",
        kind, name
    ));

    match api.list(&params).await {
        Ok(events) => Ok(events.items.iter().map(map_event).collect()),
        Err(kube::Error::Api(resp)) if resp.code == 403 => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

pub fn map_event(event: &Event) -> EventRecord {
    EventRecord {
        event_type: event
            .type_
            .clone()
            .unwrap_or_else(|| "Normal".to_string()),
        reason: event.reason.clone().unwrap_or_default(),
        message: event.message.clone().unwrap_or_default(),
        kind: event.involved_object.kind.clone().unwrap_or_default(),
        name: event.involved_object.name.clone().unwrap_or_default(),
        namespace: event.involved_object.namespace.clone().unwrap_or_default(),
        count: event.count.unwrap_or(1),
        first_timestamp: event
            .first_timestamp
            .as_ref()
            .map(|t| t.0.to_rfc3339())
            .unwrap_or_default(),
        last_timestamp: event
            .last_timestamp
            .as_ref()
            .map(|t| t.0.to_rfc3339())
            .unwrap_or_default(),
    }
}

fn event_timestamp(event: &Event) -> Option<DateTime<Utc>> {
    event
        .last_timestamp
        .as_ref()
        .map(|t| t.0)
        .or_else(|| event.event_time.as_ref().map(|t| t.0))
}
