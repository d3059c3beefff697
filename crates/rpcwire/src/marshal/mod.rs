// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-directed dispatcher.
//!
//! [`Marshaller::pack`] walks a [`Value`](crate::types::Value) under a
//! [`TypeDescriptor`](crate::types::TypeDescriptor) and produces an
//! [`Element`](crate::wire::Element); [`Marshaller::unpack`] consumes an
//! element and rebuilds the value or fails without returning anything partial.
//!
//! User-defined types are routed through the stub of their owning namespace:
//! the marshaller's own codec set when the namespace matches, otherwise the
//! node registry's entry for the foreign namespace.
//!
//! # Example
//!
//! ```rust
//! use rpcwire::marshal::Marshaller;
//! use rpcwire::types::{TypeDescriptor, Value};
//! use rpcwire::wire::ScalarKind;
//! use std::collections::BTreeMap;
//!
//! let marshaller = Marshaller::new();
//! let mut table = BTreeMap::new();
//! table.insert("gain".to_string(), Value::from(vec![0.5f64, 0.25]));
//! let value = Value::Dictionary(table);
//! let descriptor = TypeDescriptor::dictionary(TypeDescriptor::array(ScalarKind::Double));
//!
//! let element = marshaller.pack("settings", &value, &descriptor).unwrap();
//! assert_eq!(marshaller.unpack(element, &descriptor).unwrap(), value);
//! ```

mod pack;
mod unpack;
mod var;


pub use var::descriptor_of;

use crate::error::{Error, Result};
use crate::stubs::{
    split_qualified, NamedArrayStub, PodStub, ServiceStubs, StructureStub, StubRegistry,
};
use std::sync::Arc;

/// Encoder/decoder bound to a stub registry and, optionally, a local service.
#[derive(Clone)]
pub struct Marshaller {
    service: Option<Arc<dyn ServiceStubs>>,
    registry: Arc<StubRegistry>,
}

impl Marshaller {
    /// Node-level marshaller over the global registry.
    pub fn new() -> Self {
        Self::with_registry(StubRegistry::global())
    }

    /// Node-level marshaller over `registry`.
    pub fn with_registry(registry: Arc<StubRegistry>) -> Self {
        Self {
            service: None,
            registry,
        }
    }

    /// Marshaller for a namespace registered in `registry`.
    pub fn for_service(registry: Arc<StubRegistry>, namespace: &str) -> Result<Self> {
        let service = registry.get_namespace_registry(namespace)?;
        log::debug!("Marshaller: bound to namespace '{}'", namespace);
        Ok(Self {
            service: Some(service),
            registry,
        })
    }

    /// Marshaller with an explicit local codec set, registered or not.
    pub fn with_service(registry: Arc<StubRegistry>, service: Arc<dyn ServiceStubs>) -> Self {
        log::debug!("Marshaller: bound to namespace '{}'", service.namespace());
        Self {
            service: Some(service),
            registry,
        }
    }

    /// Namespace of the local codec set.
    pub fn namespace(&self) -> Option<&str> {
        self.service.as_deref().map(|s| s.namespace())
    }

    pub fn registry(&self) -> &Arc<StubRegistry> {
        &self.registry
    }

    /// Codec set owning `qualified`, plus the local type name.
    fn owner<'a>(&self, qualified: &'a str) -> Result<(Arc<dyn ServiceStubs>, &'a str)> {
        let (namespace, local) = split_qualified(qualified)?;
        match &self.service {
            Some(service) if service.namespace() == namespace => Ok((Arc::clone(service), local)),
            _ => self
                .registry
                .get_namespace_registry(namespace)
                .map(|service| (service, local))
                .map_err(|_| Error::ServiceTypeNotFound(qualified.to_string())),
        }
    }

    pub fn structure_stub(&self, qualified: &str) -> Result<Arc<dyn StructureStub>> {
        let (service, local) = self.owner(qualified)?;
        service
            .find_structure_stub(local)
            .ok_or_else(|| Error::ServiceTypeNotFound(qualified.to_string()))
    }

    pub fn pod_stub(&self, qualified: &str) -> Result<Arc<dyn PodStub>> {
        let (service, local) = self.owner(qualified)?;
        service
            .find_pod_stub(local)
            .ok_or_else(|| Error::ServiceTypeNotFound(qualified.to_string()))
    }

    pub fn named_array_stub(&self, qualified: &str) -> Result<Arc<dyn NamedArrayStub>> {
        let (service, local) = self.owner(qualified)?;
        service
            .find_named_array_stub(local)
            .ok_or_else(|| Error::ServiceTypeNotFound(qualified.to_string()))
    }
}

impl Default for Marshaller {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Marshaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marshaller")
            .field("namespace", &self.namespace())
            .field("registry", &self.registry)
            .finish()
    }
}

fn check_type_name(expected: &str, found: &str) -> Result<()> {
    if expected != found {
        return Err(Error::mismatch(expected, found));
    }
    Ok(())
}
