// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec set assembled from stubs at runtime.

use super::{split_qualified, NamedArrayStub, PodStub, ServiceStubs, StructureStub};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Codec set of one namespace, keyed by local type name.
pub struct ServiceDef {
    namespace: String,
    structures: HashMap<String, Arc<dyn StructureStub>>,
    pods: HashMap<String, Arc<dyn PodStub>>,
    named_arrays: HashMap<String, Arc<dyn NamedArrayStub>>,
}

impl ServiceDef {
    pub fn builder(namespace: impl Into<String>) -> ServiceDefBuilder {
        ServiceDefBuilder {
            namespace: namespace.into(),
            structures: Vec::new(),
            pods: Vec::new(),
            named_arrays: Vec::new(),
        }
    }
}

impl ServiceStubs for ServiceDef {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn find_structure_stub(&self, local_name: &str) -> Option<Arc<dyn StructureStub>> {
        self.structures.get(local_name).cloned()
    }

    fn find_pod_stub(&self, local_name: &str) -> Option<Arc<dyn PodStub>> {
        self.pods.get(local_name).cloned()
    }

    fn find_named_array_stub(&self, local_name: &str) -> Option<Arc<dyn NamedArrayStub>> {
        self.named_arrays.get(local_name).cloned()
    }
}

impl std::fmt::Debug for ServiceDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDef")
            .field("namespace", &self.namespace)
            .field("structures", &self.structures.keys().collect::<Vec<_>>())
            .field("pods", &self.pods.keys().collect::<Vec<_>>())
            .field("named_arrays", &self.named_arrays.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Fluent builder for [`ServiceDef`].
pub struct ServiceDefBuilder {
    namespace: String,
    structures: Vec<Arc<dyn StructureStub>>,
    pods: Vec<Arc<dyn PodStub>>,
    named_arrays: Vec<Arc<dyn NamedArrayStub>>,
}

impl ServiceDefBuilder {
    pub fn structure(mut self, stub: impl StructureStub + 'static) -> Self {
        self.structures.push(Arc::new(stub));
        self
    }

    pub fn pod(mut self, stub: impl PodStub + 'static) -> Self {
        self.pods.push(Arc::new(stub));
        self
    }

    pub fn named_array(mut self, stub: impl NamedArrayStub + 'static) -> Self {
        self.named_arrays.push(Arc::new(stub));
        self
    }

    /// Build the codec set; every type must live in this namespace.
    pub fn build(self) -> Result<ServiceDef> {
        let namespace = self.namespace;
        Ok(ServiceDef {
            structures: index_by_local_name(&namespace, self.structures, |s| s.type_name())?,
            pods: index_by_local_name(&namespace, self.pods, |s| s.type_name())?,
            named_arrays: index_by_local_name(&namespace, self.named_arrays, |s| s.type_name())?,
            namespace,
        })
    }
}

fn index_by_local_name<S: ?Sized>(
    namespace: &str,
    stubs: Vec<Arc<S>>,
    type_name: impl Fn(&S) -> &str,
) -> Result<HashMap<String, Arc<S>>> {
    let mut by_name = HashMap::with_capacity(stubs.len());
    for stub in stubs {
        let qualified = type_name(&*stub);
        let (owner, local) = split_qualified(qualified)?;
        if owner != namespace {
            return Err(Error::mismatch(
                format!("type in namespace {}", namespace),
                qualified,
            ));
        }
        if by_name.contains_key(local) {
            return Err(Error::DuplicateKey(qualified.to_string()));
        }
        by_name.insert(local.to_string(), Arc::clone(&stub));
    }
    Ok(by_name)
}
