// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # rpcwire - value marshaling core for cross-language RPC
//!
//! Converts typed values to and from a self-describing wire tree, routes
//! user-defined types to per-namespace codecs, and moves large memory regions
//! across a size-limited transport in chunks.
//!
//! ## Quick Start
//!
//! ```rust
//! use rpcwire::stubs::{PodDef, ServiceDef, StubRegistry};
//! use rpcwire::types::{PodValue, Shape, TypeDescriptor, Value};
//! use rpcwire::wire::ScalarKind;
//! use rpcwire::Marshaller;
//! use std::sync::Arc;
//!
//! fn main() -> rpcwire::Result<()> {
//!     let sample = PodDef::builder("sensors.Sample")
//!         .scalar("id", ScalarKind::UInt32)
//!         .scalar("celsius", ScalarKind::Double)
//!         .build()?;
//!     let registry = Arc::new(StubRegistry::new());
//!     registry.register(Arc::new(ServiceDef::builder("sensors").pod(sample).build()?))?;
//!
//!     let marshaller = Marshaller::for_service(Arc::clone(&registry), "sensors")?;
//!     let descriptor = TypeDescriptor::Pod("sensors.Sample".into(), Shape::Scalar);
//!     let value = Value::Pod(
//!         PodValue::new("sensors.Sample")
//!             .with("id", 3u32)
//!             .with("celsius", 19.5f64),
//!     );
//!
//!     let element = marshaller.pack("reading", &value, &descriptor)?;
//!     assert_eq!(marshaller.unpack(element, &descriptor)?, value);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  memory   Local / Remote / AsyncRemote regions, chunk planner       |
//! +---------------------------------------------------------------------+
//! |  marshal  Marshaller: typed pack/unpack, variant ("any") path       |
//! +---------------------------------------------------------------------+
//! |  stubs    StubRegistry, ServiceStubs, Struct/Pod/NamedArray codecs  |
//! +---------------------------------------------------------------------+
//! |  types    Value, TypeDescriptor         wire   Element, TypeTag     |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`wire`] - Wire value tree and type tags
//! - [`types`] - Value model and runtime type descriptors
//! - [`stubs`] - Per-namespace codecs and the stub registry
//! - [`marshal`] - Type-directed dispatcher
//! - [`memory`] - Memory regions and chunked transfer
//! - [`config`] - Transport limit configuration

pub mod config;
pub mod error;
pub mod marshal;
pub mod memory;
pub mod stubs;
pub mod types;
pub mod wire;

pub use config::{ConfigError, TransferConfig, TransferSettings};
pub use error::{Error, Result};
pub use marshal::{descriptor_of, Marshaller};
pub use memory::{
    ArrayMemory, CancelToken, LocalArrayMemory, LocalMultiDimArrayMemory, MemoryTransport,
    MultiDimArrayMemory, RemoteArrayMemory, RemoteMultiDimArrayMemory,
};
pub use stubs::{ServiceDef, ServiceStubs, StubRegistry};
pub use types::{FromValue, IntoValue, TypeDescriptor, Value};
pub use wire::{Element, Identity, NestedList, ScalarKind, TypeTag};
