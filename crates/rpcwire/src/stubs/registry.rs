// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Namespace-keyed registry of codec sets.
//!
//! Registration is append-only and serialized by a mutex; lookups go straight
//! to the concurrent map and never block on each other.

use super::ServiceStubs;
use crate::error::{Error, Result};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<Arc<StubRegistry>> = OnceLock::new();

/// Split `namespace.Type` at the last separator.
///
/// Namespaces may themselves contain dots (`org.example.Type` belongs to
/// `org.example`).
pub fn split_qualified(qualified: &str) -> Result<(&str, &str)> {
    match qualified.rsplit_once('.') {
        Some((namespace, local)) if !namespace.is_empty() && !local.is_empty() => {
            Ok((namespace, local))
        }
        _ => Err(Error::ServiceTypeNotFound(qualified.to_string())),
    }
}

/// Registry of service codec sets keyed by namespace.
pub struct StubRegistry {
    services: DashMap<String, Arc<dyn ServiceStubs>>,
    registration: Mutex<()>,
}

impl StubRegistry {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
            registration: Mutex::new(()),
        }
    }

    /// Node-global registry.
    pub fn global() -> Arc<StubRegistry> {
        GLOBAL_REGISTRY
            .get_or_init(|| Arc::new(StubRegistry::new()))
            .clone()
    }

    /// Register the codec set of a namespace. Duplicates are rejected.
    pub fn register(&self, stubs: Arc<dyn ServiceStubs>) -> Result<()> {
        let namespace = stubs.namespace().to_string();
        if namespace.is_empty() {
            return Err(Error::ServiceTypeNotFound(namespace));
        }

        let _guard = self.registration.lock();
        if self.services.contains_key(&namespace) {
            return Err(Error::DuplicateNamespace(namespace));
        }
        log::debug!("Stub registry: registered namespace '{}'", namespace);
        self.services.insert(namespace, stubs);
        Ok(())
    }

    /// Codec set registered for `namespace`.
    pub fn get_namespace_registry(&self, namespace: &str) -> Result<Arc<dyn ServiceStubs>> {
        self.services
            .get(namespace)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::ServiceTypeNotFound(namespace.to_string()))
    }

    /// Split a qualified name, failing unless its namespace is registered.
    pub fn resolve<'a>(&self, qualified: &'a str) -> Result<(&'a str, &'a str)> {
        let (namespace, local) = split_qualified(qualified)?;
        if !self.services.contains_key(namespace) {
            return Err(Error::ServiceTypeNotFound(qualified.to_string()));
        }
        Ok((namespace, local))
    }

    /// Registered namespaces, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn is_registered(&self, namespace: &str) -> bool {
        self.services.contains_key(namespace)
    }
}

impl Default for StubRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StubRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubRegistry")
            .field("namespaces", &self.namespaces())
            .finish()
    }
}
