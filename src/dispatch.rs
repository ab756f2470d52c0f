//! Resource dispatch.
//!
//! Maps a resource name to the backing strategy that serves it. The mapping
//! is a closed registry resolved from static configuration: the specialized
//! read-only names go to their remote collections, every other name goes to
//! a file collection under `<data_base_path>/<name>`.

use std::sync::Arc;

use crate::core::RemoteCollection;
use crate::provider::{DataProvider, EntityProvider, RemoteCollectionProvider};
use crate::store::RemoteStore;

/// Which backing strategy serves a resource name
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceBinding {
    /// Read-only adapter over the CI pipeline collection
    Pipelines,
    /// Read-only adapter over the repository's branch list
    Branches,
    /// Read-only adapter over the repository's commit log
    Commits,
    /// Generic file collection rooted at the contained base path
    Files(String),
}

/// Resolve a resource name against static configuration.
///
/// Pure: the same name and base path always yield the same binding, with no
/// per-request state involved.
pub fn resolve(resource: &str, data_base_path: &str) -> ResourceBinding {
    match resource {
        "pipelines" => ResourceBinding::Pipelines,
        "branches" => ResourceBinding::Branches,
        "commits" => ResourceBinding::Commits,
        other => ResourceBinding::Files(format!("{}/{}", data_base_path, other)),
    }
}

/// Hands out the provider instance backing each named resource
pub struct ResourceDispatcher {
    store: Arc<dyn RemoteStore>,
    data_base_path: String,
}

impl ResourceDispatcher {
    /// Create a dispatcher over the given store.
    ///
    /// `data_base_path` is the directory prefix file-collection resources
    /// live under.
    pub fn new(store: Arc<dyn RemoteStore>, data_base_path: impl Into<String>) -> Self {
        Self {
            store,
            data_base_path: data_base_path.into(),
        }
    }

    /// The binding a resource name resolves to
    pub fn resolve(&self, resource: &str) -> ResourceBinding {
        resolve(resource, &self.data_base_path)
    }

    /// The provider serving `resource`
    pub fn provider(&self, resource: &str) -> Box<dyn DataProvider> {
        match self.resolve(resource) {
            ResourceBinding::Pipelines => Box::new(RemoteCollectionProvider::new(
                self.store.clone(),
                RemoteCollection::Pipelines,
            )),
            ResourceBinding::Branches => Box::new(RemoteCollectionProvider::new(
                self.store.clone(),
                RemoteCollection::Branches,
            )),
            ResourceBinding::Commits => Box::new(RemoteCollectionProvider::new(
                self.store.clone(),
                RemoteCollection::Commits,
            )),
            ResourceBinding::Files(base_path) => {
                Box::new(EntityProvider::new(self.store.clone(), base_path))
            }
        }
    }
}
