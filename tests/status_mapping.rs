//! Status derivation and record mapping tests
//!
//! Builds wire objects from JSON snapshots and checks the projected records.
//! Mapping must be a pure function: the same snapshot always produces the
//! same record.

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Node, Pod, Service};
use serde_json::json;

use kubedeck::fetch::{
    daemonset_status, deployment_status, job_status, map_deployment, map_pod, map_service,
    node_status, pod_status, statefulset_status,
};

fn pod_with_phase(name: &str, phase: &str) -> Pod {
    serde_json::from_value(json!({
        "metadata": { "name": name, "namespace": "default" },
        "status": { "phase": phase }
    }))
    .unwrap()
}

fn deployment_with_replicas(desired: i32, available: i32, updated: i32) -> Deployment {
    serde_json::from_value(json!({
        "metadata": { "name": "web", "namespace": "default" },
        "spec": {
            "replicas": desired,
            "selector": { "matchLabels": { "app": "web" } },
            "template": {}
        },
        "status": {
            "availableReplicas": available,
            "readyReplicas": available,
            "updatedReplicas": updated
        }
    }))
    .unwrap()
}

#[test]
fn test_pod_status_follows_phase() {
    for phase in ["Running", "Pending", "Failed", "Succeeded"] {
        let pod = pod_with_phase("p", phase);
        assert_eq!(pod_status(&pod), phase);
    }
}

#[test]
fn test_pod_phases_map_in_order() {
    let pods: Vec<Pod> = ["Running", "Pending", "Failed"]
        .iter()
        .enumerate()
        .map(|(i, phase)| pod_with_phase(&format!("pod-{}", i), phase))
        .collect();

    let statuses: Vec<String> = pods.iter().map(map_pod).map(|r| r.status).collect();
    assert_eq!(statuses, vec!["Running", "Pending", "Failed"]);
}

#[test]
fn test_pod_crashloop_overrides_phase() {
    let pod: Pod = serde_json::from_value(json!({
        "metadata": { "name": "web-0", "namespace": "default" },
        "status": {
            "phase": "Running",
            "containerStatuses": [{
                "name": "app",
                "image": "app:1.0",
                "imageID": "sha256:abc",
                "ready": false,
                "restartCount": 7,
                "lastState": {
                    "terminated": {
                        "exitCode": 1,
                        "reason": "CrashLoopBackOff"
                    }
                }
            }]
        }
    }))
    .unwrap();

    assert_eq!(pod_status(&pod), "CrashLoopBackOff");
    assert_eq!(map_pod(&pod).status, "CrashLoopBackOff");
    assert_eq!(map_pod(&pod).restart_count, 7);
}

#[test]
fn test_pod_crashloop_requires_restarts() {
    // Same terminated reason but zero restarts keeps the phase
    let pod: Pod = serde_json::from_value(json!({
        "metadata": { "name": "web-0" },
        "status": {
            "phase": "Running",
            "containerStatuses": [{
                "name": "app",
                "image": "app:1.0",
                "imageID": "sha256:abc",
                "ready": true,
                "restartCount": 0,
                "lastState": {
                    "terminated": { "exitCode": 1, "reason": "CrashLoopBackOff" }
                }
            }]
        }
    }))
    .unwrap();

    assert_eq!(pod_status(&pod), "Running");
}

#[test]
fn test_pod_missing_status_is_unknown() {
    let pod: Pod = serde_json::from_value(json!({
        "metadata": { "name": "fresh" }
    }))
    .unwrap();

    let record = map_pod(&pod);
    assert_eq!(record.status, "Unknown");
    assert_eq!(record.node_name, "Unknown");
    assert_eq!(record.ip, "Unknown");
    assert_eq!(record.age, "Unknown");
}

#[test]
fn test_pod_config_and_secret_refs() {
    let pod: Pod = serde_json::from_value(json!({
        "metadata": { "name": "web-0" },
        "spec": {
            "containers": [{
                "name": "app",
                "envFrom": [
                    { "configMapRef": { "name": "app-config" } },
                    { "secretRef": { "name": "app-secret" } }
                ],
                "env": [{
                    "name": "TOKEN",
                    "valueFrom": { "secretKeyRef": { "name": "token-secret", "key": "token" } }
                }]
            }],
            "volumes": [
                { "name": "cfg", "configMap": { "name": "volume-config" } },
                { "name": "creds", "secret": { "secretName": "volume-secret" } }
            ],
            "imagePullSecrets": [{ "name": "registry-cred" }]
        }
    }))
    .unwrap();

    let record = map_pod(&pod);
    assert_eq!(record.config_maps, vec!["app-config", "volume-config"]);
    assert_eq!(
        record.secrets,
        vec!["app-secret", "registry-cred", "token-secret", "volume-secret"]
    );
}

#[test]
fn test_deployment_fully_available() {
    let deployment = deployment_with_replicas(3, 3, 3);
    assert_eq!(deployment_status(&deployment), "Available");
}

#[test]
fn test_deployment_degraded_when_replicas_unavailable() {
    let deployment = deployment_with_replicas(3, 1, 3);
    assert_eq!(deployment_status(&deployment), "Degraded");
}

#[test]
fn test_deployment_progressing_during_rollout() {
    let deployment = deployment_with_replicas(3, 2, 1);
    assert_eq!(deployment_status(&deployment), "Progressing");
}

#[test]
fn test_deployment_zero_replicas_is_available() {
    let deployment = deployment_with_replicas(0, 0, 0);
    assert_eq!(deployment_status(&deployment), "Available");
}

#[test]
fn test_deployment_record_fields() {
    let deployment = deployment_with_replicas(3, 3, 3);
    let record = map_deployment(&deployment);

    assert_eq!(record.name, "web");
    assert_eq!(record.replicas.desired, 3);
    assert_eq!(record.replicas.available, 3);
    assert_eq!(record.strategy, "RollingUpdate");
    assert_eq!(record.selector.get("app").map(String::as_str), Some("web"));
}

#[test]
fn test_mapping_is_idempotent() {
    let deployment = deployment_with_replicas(3, 2, 2);
    assert_eq!(map_deployment(&deployment), map_deployment(&deployment));

    let pod = pod_with_phase("web-0", "Running");
    assert_eq!(map_pod(&pod), map_pod(&pod));
}

#[test]
fn test_statefulset_statuses() {
    let make = |desired: i32, ready: i32| -> StatefulSet {
        serde_json::from_value(json!({
            "metadata": { "name": "db" },
            "spec": {
                "replicas": desired,
                "selector": {},
                "serviceName": "db",
                "template": {}
            },
            "status": { "replicas": desired, "readyReplicas": ready }
        }))
        .unwrap()
    };

    assert_eq!(statefulset_status(&make(3, 3)), "Available");
    assert_eq!(statefulset_status(&make(3, 1)), "Progressing");
    assert_eq!(statefulset_status(&make(3, 0)), "Degraded");
    assert_eq!(statefulset_status(&make(0, 0)), "Available");
}

#[test]
fn test_daemonset_statuses() {
    let make = |desired: i32, ready: i32| -> DaemonSet {
        serde_json::from_value(json!({
            "metadata": { "name": "agent" },
            "spec": { "selector": {}, "template": {} },
            "status": {
                "currentNumberScheduled": desired,
                "desiredNumberScheduled": desired,
                "numberMisscheduled": 0,
                "numberReady": ready
            }
        }))
        .unwrap()
    };

    assert_eq!(daemonset_status(&make(5, 5)), "Available");
    assert_eq!(daemonset_status(&make(5, 3)), "Progressing");
    assert_eq!(daemonset_status(&make(5, 0)), "Degraded");
}

#[test]
fn test_job_statuses() {
    let make = |conditions: serde_json::Value, active: i32, succeeded: i32| -> Job {
        serde_json::from_value(json!({
            "metadata": { "name": "migrate" },
            "spec": { "template": {} },
            "status": {
                "conditions": conditions,
                "active": active,
                "succeeded": succeeded
            }
        }))
        .unwrap()
    };

    let complete = make(
        json!([{ "type": "Complete", "status": "True" }]),
        0,
        1,
    );
    assert_eq!(job_status(&complete), "Complete");

    let failed = make(json!([{ "type": "Failed", "status": "True" }]), 0, 0);
    assert_eq!(job_status(&failed), "Failed");

    let running = make(json!([]), 2, 0);
    assert_eq!(job_status(&running), "Running");

    let pending = make(json!([]), 0, 0);
    assert_eq!(job_status(&pending), "Pending");
}

#[test]
fn test_node_ready_condition() {
    let make = |status: serde_json::Value| -> Node {
        serde_json::from_value(json!({
            "metadata": { "name": "node-1" },
            "status": status
        }))
        .unwrap()
    };

    let ready = make(json!({ "conditions": [{ "type": "Ready", "status": "True" }] }));
    assert_eq!(node_status(&ready), "Ready");

    let not_ready = make(json!({ "conditions": [{ "type": "Ready", "status": "False" }] }));
    assert_eq!(node_status(&not_ready), "NotReady");

    let unknown = make(json!({ "conditions": [] }));
    assert_eq!(node_status(&unknown), "Unknown");
}

#[test]
fn test_node_roles_from_labels() {
    let node: Node = serde_json::from_value(json!({
        "metadata": {
            "name": "cp-1",
            "labels": {
                "node-role.kubernetes.io/control-plane": "",
                "kubernetes.io/os": "linux"
            }
        }
    }))
    .unwrap();

    let record = kubedeck::fetch::map_node(&node);
    assert_eq!(record.roles, vec!["control-plane"]);

    let plain: Node = serde_json::from_value(json!({ "metadata": { "name": "w-1" } })).unwrap();
    assert_eq!(kubedeck::fetch::map_node(&plain).roles, vec!["<none>"]);
}

#[test]
fn test_service_ports_and_type() {
    let service: Service = serde_json::from_value(json!({
        "metadata": { "name": "web", "namespace": "default" },
        "spec": {
            "type": "NodePort",
            "clusterIP": "10.0.0.10",
            "ports": [{
                "name": "http",
                "port": 80,
                "targetPort": 8080,
                "nodePort": 30080
            }, {
                "port": 443,
                "targetPort": "https"
            }]
        }
    }))
    .unwrap();

    let record = map_service(&service);
    assert_eq!(record.service_type, "NodePort");
    assert_eq!(record.cluster_ip, "10.0.0.10");
    assert_eq!(record.ports.len(), 2);
    assert_eq!(record.ports[0].target_port, "8080");
    assert_eq!(record.ports[0].node_port, Some(30080));
    assert_eq!(record.ports[1].target_port, "https");
    assert_eq!(record.ports[1].protocol, "TCP");
}
