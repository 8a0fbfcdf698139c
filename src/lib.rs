//! kubedeck library
//!
//! Backend for a Kubernetes web dashboard: a context-keyed client cache,
//! per-kind resource fetchers that project wire objects into flat display
//! records, label indexing/search, and the JSON HTTP surface over them.
//! The binary is a thin wrapper; everything here is usable as a library.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod kube;
pub mod labels;
pub mod models;
pub mod server;

// Re-export commonly used types for convenience
pub use crate::cache::{CacheStats, ClientCache};
pub use crate::config::{CacheConfig, Config, ConfigLoader};
pub use crate::error::{ApiError, Error, ErrorClass};
pub use crate::kube::{ContextResolver, KubeconfigResolver};
pub use crate::labels::{LabeledResource, index_labels, search_by_selector};
pub use crate::models::ResourceKind;
