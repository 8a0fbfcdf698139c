//! End-to-end fetcher tests against a mock apiserver
//!
//! A tower mock service stands in for the cluster; the resolver hands the
//! cache a client wired to it, so requests flow through the real cache and
//! fetch path.

use async_trait::async_trait;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use serde_json::json;

use kubedeck::config::CacheConfig;
use kubedeck::error::{Error, ErrorClass};
use kubedeck::fetch;
use kubedeck::kube::ContextResolver;
use kubedeck::ClientCache;

type MockHandle = tower_test::mock::Handle<Request<Body>, Response<Body>>;

struct MockResolver {
    client: Client,
}

#[async_trait]
impl ContextResolver for MockResolver {
    async fn client_for(&self, _context: Option<&str>) -> Result<Client, Error> {
        Ok(self.client.clone())
    }
}

/// Cache whose every context resolves to a client talking to the mock
fn mock_cache() -> (ClientCache, MockHandle) {
    let (mock_service, handle) =
        tower_test::mock::pair::<Request<Body>, Response<Body>>();
    let client = Client::new(mock_service, "default");
    let cache = ClientCache::new(
        Box::new(MockResolver { client }),
        &CacheConfig::default(),
    );
    (cache, handle)
}

fn json_response(status: u16, body: serde_json::Value) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn status_body(code: u16, reason: &str, message: &str) -> serde_json::Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
}

/// Answer exactly one request with the given response
fn respond_once(
    mut handle: MockHandle,
    response: Response<Body>,
) -> tokio::task::JoinHandle<Request<Body>> {
    tokio::spawn(async move {
        let (request, send) = handle.next_request().await.expect("service not called");
        send.send_response(response);
        request
    })
}

#[tokio::test]
async fn test_list_pods_maps_phases_in_server_order() {
    let (cache, handle) = mock_cache();

    let pod_list = json!({
        "kind": "PodList",
        "apiVersion": "v1",
        "metadata": { "resourceVersion": "1" },
        "items": [
            { "metadata": { "name": "a", "namespace": "team" }, "status": { "phase": "Running" } },
            { "metadata": { "name": "b", "namespace": "team" }, "status": { "phase": "Pending" } },
            { "metadata": { "name": "c", "namespace": "team" }, "status": { "phase": "Failed" } }
        ]
    });
    let server = respond_once(handle, json_response(200, pod_list));

    let pods = fetch::list_pods(&cache, "team", None, None).await.unwrap();

    let statuses: Vec<&str> = pods.iter().map(|p| p.status.as_str()).collect();
    assert_eq!(statuses, vec!["Running", "Pending", "Failed"]);
    assert_eq!(pods[0].name, "a");
    assert_eq!(pods[0].namespace, "team");

    let request = server.await.unwrap();
    assert_eq!(request.method(), http::Method::GET);
    assert!(request.uri().path().contains("/namespaces/team/pods"));
}

#[tokio::test]
async fn test_list_pods_empty_result_is_ok() {
    let (cache, handle) = mock_cache();

    let empty = json!({
        "kind": "PodList",
        "apiVersion": "v1",
        "metadata": { "resourceVersion": "1" },
        "items": []
    });
    let server = respond_once(handle, json_response(200, empty));

    let pods = fetch::list_pods(&cache, "team", None, None).await.unwrap();
    assert!(pods.is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn test_list_pods_passes_label_selector() {
    let (cache, handle) = mock_cache();

    let empty = json!({
        "kind": "PodList",
        "apiVersion": "v1",
        "metadata": { "resourceVersion": "1" },
        "items": []
    });
    let server = respond_once(handle, json_response(200, empty));

    fetch::list_pods(&cache, "team", None, Some("app=nginx"))
        .await
        .unwrap();

    let request = server.await.unwrap();
    let query = request.uri().query().unwrap_or_default();
    assert!(query.contains("labelSelector=app%3Dnginx"));
}

#[tokio::test]
async fn test_get_pod_absent_returns_none() {
    let (cache, handle) = mock_cache();

    let server = respond_once(
        handle,
        json_response(404, status_body(404, "NotFound", "pods \"ghost\" not found")),
    );

    let pod = fetch::get_pod(&cache, "ghost", "team", None).await.unwrap();
    assert!(pod.is_none());
    server.await.unwrap();
}

#[tokio::test]
async fn test_forbidden_list_classifies_as_forbidden() {
    let (cache, handle) = mock_cache();

    let server = respond_once(
        handle,
        json_response(
            403,
            status_body(403, "Forbidden", "pods is forbidden: no list access"),
        ),
    );

    let err = fetch::list_pods(&cache, "team", None, None)
        .await
        .unwrap_err();
    assert_eq!(err.classify(), ErrorClass::Forbidden);
    server.await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_list_classifies_as_unauthorized() {
    let (cache, handle) = mock_cache();

    let server = respond_once(
        handle,
        json_response(401, status_body(401, "Unauthorized", "Unauthorized")),
    );

    let err = fetch::list_deployments(&cache, "team", None)
        .await
        .unwrap_err();
    assert_eq!(err.classify(), ErrorClass::Unauthorized);
    server.await.unwrap();
}

#[tokio::test]
async fn test_deployment_list_derives_status() {
    let (cache, handle) = mock_cache();

    let deployments = json!({
        "kind": "DeploymentList",
        "apiVersion": "apps/v1",
        "metadata": { "resourceVersion": "1" },
        "items": [{
            "metadata": { "name": "web", "namespace": "team" },
            "spec": {
                "replicas": 3,
                "selector": { "matchLabels": { "app": "web" } },
                "template": {}
            },
            "status": {
                "availableReplicas": 3,
                "readyReplicas": 3,
                "updatedReplicas": 3
            }
        }]
    });
    let server = respond_once(handle, json_response(200, deployments));

    let records = fetch::list_deployments(&cache, "team", None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, "Available");
    assert_eq!(records[0].replicas.desired, 3);
    server.await.unwrap();
}

#[tokio::test]
async fn test_node_pods_forbidden_degrades_to_empty() {
    let (cache, handle) = mock_cache();

    let server = respond_once(
        handle,
        json_response(
            403,
            status_body(403, "Forbidden", "pods is forbidden: no list access"),
        ),
    );

    let pods = fetch::list_node_pods(&cache, "node-1", Some("team"), None)
        .await
        .unwrap();
    assert!(pods.is_empty());

    let request = server.await.unwrap();
    let query = request.uri().query().unwrap_or_default();
    assert!(query.contains("fieldSelector=spec.nodeName%3Dnode-1"));
}

#[tokio::test]
async fn test_repeated_fetches_share_one_client() {
    let (cache, mut handle) = mock_cache();

    let server = tokio::spawn(async move {
        for _ in 0..2 {
            let (_request, send) = handle.next_request().await.expect("service not called");
            send.send_response(json_response(
                200,
                json!({
                    "kind": "PodList",
                    "apiVersion": "v1",
                    "metadata": { "resourceVersion": "1" },
                    "items": []
                }),
            ));
        }
    });

    fetch::list_pods(&cache, "team", None, None).await.unwrap();
    fetch::list_pods(&cache, "team", None, None).await.unwrap();
    server.await.unwrap();

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}
