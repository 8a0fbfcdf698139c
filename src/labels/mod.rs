//! Label indexing and selector search
//!
//! Builds a value-frequency index over the labels of a namespace's resources
//! and filters resource sets with the usual selector grammar subset:
//! `key=value`, `key!=value`, `key in (a,b)`, bare `key` existence and
//! `!key` absence. Clauses are ANDed. Selector text comes straight from a
//! search box, so malformed clauses are skipped rather than failing the
//! whole query.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::cache::ClientCache;
use crate::error::Error;
use crate::fetch;
use crate::models::LabelMap;

/// A resource projected down to its identity and label map
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledResource {
    pub name: String,
    pub namespace: String,
    pub kind: String,
    pub labels: LabelMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelValue {
    pub value: String,
    pub count: usize,
}

/// Frequency entry for one label key across a resource set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelGroup {
    pub key: String,
    pub values: Vec<LabelValue>,
    pub total_count: usize,
    pub resource_types: Vec<String>,
}

/// Fetch the labeled workload and config kinds of a namespace concurrently
/// and flatten them into one resource set.
pub async fn gather_labeled_resources(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<LabeledResource>, Error> {
    let (
        deployments,
        statefulsets,
        daemonsets,
        pods,
        services,
        configmaps,
        secrets,
        jobs,
        cronjobs,
        ingresses,
    ) = futures::try_join!(
        fetch::list_deployments(cache, namespace, context),
        fetch::list_statefulsets(cache, namespace, context),
        fetch::list_daemonsets(cache, namespace, context),
        fetch::list_pods(cache, namespace, context, None),
        fetch::list_services(cache, namespace, context),
        fetch::list_config_maps(cache, namespace, context),
        fetch::list_secrets(cache, namespace, context),
        fetch::list_jobs(cache, namespace, context),
        fetch::list_cronjobs(cache, namespace, context),
        fetch::list_ingresses(cache, namespace, context),
    )?;

    let mut resources = Vec::new();
    let mut push = |name: &str, namespace: &str, kind: &str, labels: &LabelMap| {
        resources.push(LabeledResource {
            name: name.to_string(),
            namespace: namespace.to_string(),
            kind: kind.to_string(),
            labels: labels.clone(),
        });
    };

    for r in &deployments {
        push(&r.name, &r.namespace, "Deployment", &r.labels);
    }
    for r in &statefulsets {
        push(&r.name, &r.namespace, "StatefulSet", &r.labels);
    }
    for r in &daemonsets {
        push(&r.name, &r.namespace, "DaemonSet", &r.labels);
    }
    for r in &pods {
        push(&r.name, &r.namespace, "Pod", &r.labels);
    }
    for r in &services {
        push(&r.name, &r.namespace, "Service", &r.labels);
    }
    for r in &configmaps {
        push(&r.name, &r.namespace, "ConfigMap", &r.labels);
    }
    for r in &secrets {
        push(&r.name, &r.namespace, "Secret", &r.labels);
    }
    for r in &jobs {
        push(&r.name, &r.namespace, "Job", &r.labels);
    }
    for r in &cronjobs {
        push(&r.name, &r.namespace, "CronJob", &r.labels);
    }
    for r in &ingresses {
        push(&r.name, &r.namespace, "Ingress", &r.labels);
    }

    Ok(resources)
}

/// Build the frequency index over a resource set.
///
/// Keys are ordered by descending total occurrence count, ties broken
/// alphabetically; values within a key by descending count, ties broken by
/// value. Identical input always yields identical output.
pub fn index_labels(resources: &[LabeledResource]) -> Vec<LabelGroup> {
    let mut index: BTreeMap<String, (BTreeMap<String, usize>, BTreeSet<String>)> = BTreeMap::new();

    for resource in resources {
        for (key, value) in &resource.labels {
            let (values, kinds) = index.entry(key.clone()).or_default();
            *values.entry(value.clone()).or_insert(0) += 1;
            kinds.insert(resource.kind.clone());
        }
    }

    let mut groups: Vec<LabelGroup> = index
        .into_iter()
        .map(|(key, (values, kinds))| {
            let total_count = values.values().sum();
            let mut values: Vec<LabelValue> = values
                .into_iter()
                .map(|(value, count)| LabelValue { value, count })
                .collect();
            values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

            LabelGroup {
                key,
                values,
                total_count,
                resource_types: kinds.into_iter().collect(),
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| a.key.cmp(&b.key))
    });
    groups
}

/// One parsed selector clause
#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Eq(String, String),
    Ne(String, String),
    In(String, Vec<String>),
    Exists(String),
    NotExists(String),
}

impl Clause {
    fn matches(&self, labels: &LabelMap) -> bool {
        match self {
            Clause::Eq(key, value) => labels.get(key).map(String::as_str) == Some(value),
            Clause::Ne(key, value) => labels.get(key).map(String::as_str) != Some(value),
            Clause::In(key, values) => labels
                .get(key)
                .is_some_and(|actual| values.iter().any(|v| v == actual)),
            Clause::Exists(key) => labels.contains_key(key),
            Clause::NotExists(key) => !labels.contains_key(key),
        }
    }
}

/// Filter a resource set by a selector expression.
///
/// An empty selector returns the input unchanged. Malformed clauses are
/// dropped; the remaining clauses still apply.
pub fn search_by_selector(
    resources: &[LabeledResource],
    selector: &str,
) -> Vec<LabeledResource> {
    if selector.trim().is_empty() {
        return resources.to_vec();
    }

    let clauses: Vec<Clause> = split_clauses(selector)
        .iter()
        .filter_map(|clause| parse_clause(clause))
        .collect();

    resources
        .iter()
        .filter(|resource| clauses.iter().all(|clause| clause.matches(&resource.labels)))
        .cloned()
        .collect()
}

/// Split on commas outside parentheses, so `env in (prod,dev)` stays one
/// clause.
fn split_clauses(selector: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut current = String::new();
    let mut depth = 0u32;

    for c in selector.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                clauses.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    clauses.push(current);
    clauses
}

fn parse_clause(clause: &str) -> Option<Clause> {
    let clause = clause.trim();
    if clause.is_empty() {
        return None;
    }

    if let Some(key) = clause.strip_prefix('!') {
        let key = key.trim();
        return (!key.is_empty() && is_bare_key(key)).then(|| Clause::NotExists(key.to_string()));
    }

    if let Some((key, value)) = clause.split_once("!=") {
        let key = key.trim();
        let value = value.trim();
        return (!key.is_empty()).then(|| Clause::Ne(key.to_string(), value.to_string()));
    }

    if let Some((key, rest)) = clause.split_once(" in ") {
        let key = key.trim();
        let rest = rest.trim();
        if key.is_empty() || !rest.starts_with('(') || !rest.ends_with(')') {
            return None;
        }
        let values: Vec<String> = rest[1..rest.len() - 1]
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            return None;
        }
        return Some(Clause::In(key.to_string(), values));
    }

    if let Some((key, value)) = clause.split_once('=') {
        let key = key.trim();
        // Tolerate the == spelling
        let value = value.strip_prefix('=').unwrap_or(value).trim();
        return (!key.is_empty()).then(|| Clause::Eq(key.to_string(), value.to_string()));
    }

    is_bare_key(clause).then(|| Clause::Exists(clause.to_string()))
}

fn is_bare_key(s: &str) -> bool {
    !s.contains(char::is_whitespace) && !s.contains('(') && !s.contains(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, kind: &str, labels: &[(&str, &str)]) -> LabeledResource {
        LabeledResource {
            name: name.to_string(),
            namespace: "default".to_string(),
            kind: kind.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn fixture() -> Vec<LabeledResource> {
        vec![
            resource("web", "Deployment", &[("app", "nginx"), ("tier", "frontend")]),
            resource("web-0", "Pod", &[("app", "nginx"), ("tier", "frontend")]),
            resource("api", "Deployment", &[("app", "api"), ("tier", "backend")]),
            resource("db", "StatefulSet", &[("app", "postgres")]),
            resource("plain", "ConfigMap", &[]),
        ]
    }

    #[test]
    fn test_index_empty_input() {
        assert!(index_labels(&[]).is_empty());
    }

    #[test]
    fn test_index_totals_and_order() {
        let groups = index_labels(&fixture());

        // "app" appears on 4 resources, "tier" on 3
        assert_eq!(groups[0].key, "app");
        assert_eq!(groups[0].total_count, 4);
        assert_eq!(groups[1].key, "tier");
        assert_eq!(groups[1].total_count, 3);

        // Value counts within a key sum to the key total
        for group in &groups {
            let sum: usize = group.values.iter().map(|v| v.count).sum();
            assert_eq!(sum, group.total_count);
        }

        // nginx carries the highest count under "app"
        assert_eq!(groups[0].values[0].value, "nginx");
        assert_eq!(groups[0].values[0].count, 2);
    }

    #[test]
    fn test_index_resource_types() {
        let groups = index_labels(&fixture());
        let app = groups.iter().find(|g| g.key == "app").unwrap();
        assert_eq!(
            app.resource_types,
            vec!["Deployment".to_string(), "Pod".to_string(), "StatefulSet".to_string()]
        );
    }

    #[test]
    fn test_index_is_deterministic() {
        let resources = fixture();
        assert_eq!(index_labels(&resources), index_labels(&resources));
    }

    #[test]
    fn test_selector_equality() {
        let matched = search_by_selector(&fixture(), "app=nginx");
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|r| r.labels["app"] == "nginx"));
    }

    #[test]
    fn test_selector_inequality() {
        let matched = search_by_selector(&fixture(), "app!=nginx");
        // Resources without the key also differ from the value
        assert_eq!(matched.len(), 3);
    }

    #[test]
    fn test_selector_in_set() {
        let matched = search_by_selector(&fixture(), "app in (nginx, postgres)");
        assert_eq!(matched.len(), 3);
    }

    #[test]
    fn test_selector_existence_and_absence() {
        assert_eq!(search_by_selector(&fixture(), "tier").len(), 3);
        assert_eq!(search_by_selector(&fixture(), "!tier").len(), 2);
    }

    #[test]
    fn test_selector_clauses_are_anded() {
        let matched = search_by_selector(&fixture(), "app=nginx,tier=frontend");
        assert_eq!(matched.len(), 2);

        let matched = search_by_selector(&fixture(), "app=nginx,tier=backend");
        assert!(matched.is_empty());
    }

    #[test]
    fn test_selector_empty_returns_all() {
        assert_eq!(search_by_selector(&fixture(), "").len(), 5);
        assert_eq!(search_by_selector(&fixture(), "   ").len(), 5);
    }

    #[test]
    fn test_selector_double_equals() {
        let matched = search_by_selector(&fixture(), "app==nginx");
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_malformed_clause_is_skipped() {
        // The broken clause drops out; the valid one still applies
        let matched = search_by_selector(&fixture(), "app=nginx,=, in (");
        assert_eq!(matched.len(), 2);

        // An entirely malformed selector filters nothing
        let matched = search_by_selector(&fixture(), "( , )");
        assert_eq!(matched.len(), 5);
    }

    #[test]
    fn test_in_clause_with_spaces() {
        let matched = search_by_selector(&fixture(), "tier in ( frontend , backend )");
        assert_eq!(matched.len(), 3);
    }
}
