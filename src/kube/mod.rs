//! Cluster connection handling
//!
//! Resolves a named kubeconfig context into connection parameters and builds
//! an API client from them. Resolution sits behind a trait so the client
//! cache can be exercised against fixtures instead of a live kubeconfig.

use std::time::Duration;

use async_trait::async_trait;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use url::Url;

use crate::error::Error;

/// Turns a context name into a ready API client.
///
/// `None` (or an empty name at the call site) means the kubeconfig's current
/// context. Implementations must fail with `Error::Configuration` when the
/// context cannot be resolved into usable connection parameters.
#[async_trait]
pub trait ContextResolver: Send + Sync {
    async fn client_for(&self, context: Option<&str>) -> Result<Client, Error>;
}

/// Default resolver: kubeconfig file first, in-cluster config as fallback
/// when no explicit context was requested.
pub struct KubeconfigResolver {
    request_timeout: Option<Duration>,
}

impl KubeconfigResolver {
    pub fn new(request_timeout: Option<Duration>) -> Self {
        Self { request_timeout }
    }
}

#[async_trait]
impl ContextResolver for KubeconfigResolver {
    async fn client_for(&self, context: Option<&str>) -> Result<Client, Error> {
        let config = resolve_config(context, self.request_timeout).await?;
        Client::try_from(config).map_err(Error::Kube)
    }
}

/// Resolve connection parameters for a context.
///
/// Loading strategy mirrors `kubectl`:
/// 1. KUBECONFIG environment variable / ~/.kube/config
/// 2. In-cluster service account (only when no context was named)
pub async fn resolve_config(
    context: Option<&str>,
    request_timeout: Option<Duration>,
) -> Result<Config, Error> {
    let options = KubeConfigOptions {
        context: context.map(String::from),
        ..Default::default()
    };

    let mut config = match Config::from_kubeconfig(&options).await {
        Ok(config) => config,
        Err(kubeconfig_err) => {
            if let Some(name) = context {
                return Err(Error::Configuration(format!(
                    "cannot resolve context '{}': {}",
                    name, kubeconfig_err
                )));
            }
            Config::incluster().map_err(|incluster_err| {
                Error::Configuration(format!(
                    "no usable kubeconfig ({}) and not running in-cluster ({})",
                    kubeconfig_err, incluster_err
                ))
            })?
        }
    };

    // A context entry without a reachable server URL is a configuration
    // error, not a transport error
    let server = config.cluster_url.to_string();
    let url = Url::parse(&server)
        .map_err(|e| Error::Configuration(format!("invalid cluster server URL {}: {}", server, e)))?;
    if url.host_str().is_none() {
        return Err(Error::Configuration(format!(
            "cluster server URL has no host: {}",
            server
        )));
    }

    if let Some(timeout) = request_timeout {
        config.connect_timeout = Some(timeout);
        config.read_timeout = Some(timeout);
    }

    Ok(config)
}

/// List the context names in the active kubeconfig
pub fn list_contexts() -> Result<Vec<String>, Error> {
    let kubeconfig = Kubeconfig::read()
        .map_err(|e| Error::Configuration(format!("failed to read kubeconfig: {}", e)))?;

    Ok(kubeconfig.contexts.into_iter().map(|c| c.name).collect())
}

/// Get the current context name, if the kubeconfig names one
pub fn current_context() -> Result<Option<String>, Error> {
    let kubeconfig = Kubeconfig::read()
        .map_err(|e| Error::Configuration(format!("failed to read kubeconfig: {}", e)))?;

    Ok(kubeconfig.current_context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_context_is_configuration_error() {
        // A context name that no kubeconfig plausibly contains
        let err = resolve_config(Some("kubedeck-test-no-such-context"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_timeout_applied_when_configured() {
        // Only run the assertion when a kubeconfig is actually present;
        // otherwise resolution already failed with a configuration error.
        if let Ok(config) = resolve_config(None, Some(Duration::from_secs(7))).await {
            assert_eq!(config.connect_timeout, Some(Duration::from_secs(7)));
            assert_eq!(config.read_timeout, Some(Duration::from_secs(7)));
        }
    }
}
