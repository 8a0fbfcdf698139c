//! Services and ingresses

use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::Api;
use kube::api::ListParams;

use crate::cache::ClientCache;
use crate::error::Error;
use crate::models::{
    IngressPathRecord, IngressRecord, IngressRuleRecord, IngressTlsRecord, ServicePortRecord,
    ServiceRecord,
};

use super::format_age;

/// List services in a namespace
pub async fn list_services(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<ServiceRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Service> = Api::namespaced(client, namespace);
    let services = api.list(&ListParams::default()).await?;
    Ok(services.items.iter().map(map_service).collect())
}

/// Get a single service by name; `None` when it does not exist
pub async fn get_service(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<ServiceRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Service> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(map_service))
}

pub fn map_service(service: &Service) -> ServiceRecord {
    let meta = &service.metadata;
    let spec = service.spec.as_ref();

    let ports = spec
        .and_then(|s| s.ports.as_ref())
        .map(|ports| {
            ports
                .iter()
                .map(|p| ServicePortRecord {
                    name: p.name.clone(),
                    protocol: p.protocol.clone().unwrap_or_else(|| "TCP".to_string()),
                    port: p.port,
                    target_port: p
                        .target_port
                        .as_ref()
                        .map(int_or_string)
                        .unwrap_or_else(|| p.port.to_string()),
                    node_port: p.node_port,
                })
                .collect()
        })
        .unwrap_or_default();

    ServiceRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        service_type: spec
            .and_then(|s| s.type_.clone())
            .unwrap_or_else(|| "ClusterIP".to_string()),
        cluster_ip: spec.and_then(|s| s.cluster_ip.clone()).unwrap_or_default(),
        external_ips: spec
            .and_then(|s| s.external_ips.clone())
            .unwrap_or_default(),
        ports,
        selector: spec.and_then(|s| s.selector.clone()).unwrap_or_default(),
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
    }
}

/// List ingresses in a namespace
pub async fn list_ingresses(
    cache: &ClientCache,
    namespace: &str,
    context: Option<&str>,
) -> Result<Vec<IngressRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Ingress> = Api::namespaced(client, namespace);
    let ingresses = api.list(&ListParams::default()).await?;
    Ok(ingresses.items.iter().map(map_ingress).collect())
}

/// Get a single ingress by name; `None` when it does not exist
pub async fn get_ingress(
    cache: &ClientCache,
    name: &str,
    namespace: &str,
    context: Option<&str>,
) -> Result<Option<IngressRecord>, Error> {
    let client = cache.client(context).await?;
    let api: Api<Ingress> = Api::namespaced(client, namespace);
    Ok(api.get_opt(name).await?.as_ref().map(map_ingress))
}

pub fn map_ingress(ingress: &Ingress) -> IngressRecord {
    let meta = &ingress.metadata;
    let spec = ingress.spec.as_ref();

    let mut hosts = Vec::new();
    let rules = spec
        .and_then(|s| s.rules.as_ref())
        .map(|rules| {
            rules
                .iter()
                .map(|rule| {
                    if let Some(host) = &rule.host {
                        hosts.push(host.clone());
                    }

                    let paths = rule
                        .http
                        .as_ref()
                        .map(|http| {
                            http.paths
                                .iter()
                                .map(|path| {
                                    let service = path.backend.service.as_ref();
                                    IngressPathRecord {
                                        path: path
                                            .path
                                            .clone()
                                            .unwrap_or_else(|| "/".to_string()),
                                        path_type: path.path_type.clone(),
                                        service: service
                                            .map(|s| s.name.clone())
                                            .unwrap_or_default(),
                                        port: service
                                            .and_then(|s| s.port.as_ref())
                                            .map(|p| {
                                                p.number
                                                    .map(|n| n.to_string())
                                                    .or_else(|| p.name.clone())
                                                    .unwrap_or_default()
                                            })
                                            .unwrap_or_default(),
                                    }
                                })
                                .collect()
                        })
                        .unwrap_or_default();

                    IngressRuleRecord {
                        host: rule.host.clone(),
                        paths,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let tls = spec
        .and_then(|s| s.tls.as_ref())
        .map(|tls| {
            tls.iter()
                .map(|t| IngressTlsRecord {
                    hosts: t.hosts.clone().unwrap_or_default(),
                    secret_name: t.secret_name.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    IngressRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        class_name: spec.and_then(|s| s.ingress_class_name.clone()),
        hosts,
        rules,
        tls,
        age: format_age(meta.creation_timestamp.as_ref()),
        labels: meta.labels.clone().unwrap_or_default(),
    }
}

fn int_or_string(value: &IntOrString) -> String {
    match value {
        IntOrString::Int(i) => i.to_string(),
        IntOrString::String(s) => s.clone(),
    }
}
