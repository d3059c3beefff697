// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Types owned by one namespace embedded in another's structures. The `geo`
// codec set is written by hand against the stub traits, the way generated
// code would be; `fleet` is schema-driven.

use rpcwire::stubs::{NamedArrayStub, PodStub, StructDef, StructureStub};
use rpcwire::types::StructValue;
use rpcwire::wire::shape::NamedElements;
use rpcwire::wire::{ContainerKind, NestedList};
use rpcwire::{
    Error, Marshaller, Result, ServiceDef, ServiceStubs, StubRegistry, TypeDescriptor, Value,
};
use std::sync::Arc;
use std::thread;

const FIX: &str = "geo.Fix";

struct FixStub;

impl StructureStub for FixStub {
    fn type_name(&self) -> &str {
        FIX
    }

    fn pack_structure(&self, value: &StructValue, marshaller: &Marshaller) -> Result<NestedList> {
        let elements = vec![
            marshaller.pack_scalar("lat", value.get::<f64>("lat")?),
            marshaller.pack_scalar("lon", value.get::<f64>("lon")?),
        ];
        NestedList::typed(ContainerKind::Structure, FIX, elements)
    }

    fn unpack_structure(&self, list: NestedList, marshaller: &Marshaller) -> Result<StructValue> {
        let mut fields = NamedElements::new(list.into_elements())?;
        let lat: f64 = marshaller.unpack_scalar(fields.take("lat")?)?;
        let lon: f64 = marshaller.unpack_scalar(fields.take("lon")?)?;
        fields.finish()?;
        Ok(StructValue::new(FIX).with("lat", lat).with("lon", lon))
    }
}

struct Geo;

impl ServiceStubs for Geo {
    fn namespace(&self) -> &str {
        "geo"
    }

    fn find_structure_stub(&self, local_name: &str) -> Option<Arc<dyn StructureStub>> {
        match local_name {
            "Fix" => Some(Arc::new(FixStub)),
            _ => None,
        }
    }

    fn find_pod_stub(&self, _: &str) -> Option<Arc<dyn PodStub>> {
        None
    }

    fn find_named_array_stub(&self, _: &str) -> Option<Arc<dyn NamedArrayStub>> {
        None
    }
}

fn fleet() -> ServiceDef {
    let truck = StructDef::builder("fleet.Truck")
        .field("id", TypeDescriptor::String)
        .field("position", TypeDescriptor::Structure(FIX.into()))
        .field("route", TypeDescriptor::list(TypeDescriptor::Structure(FIX.into())))
        .build()
        .unwrap();
    ServiceDef::builder("fleet").structure(truck).build().unwrap()
}

fn fix(lat: f64, lon: f64) -> Value {
    Value::Structure(StructValue::new(FIX).with("lat", lat).with("lon", lon))
}

fn truck(id: &str) -> Value {
    Value::Structure(
        StructValue::new("fleet.Truck")
            .with("id", id)
            .with("position", fix(48.85, 2.35))
            .with("route", Value::List(vec![fix(45.76, 4.83), fix(43.3, 5.37)])),
    )
}

fn truck_type() -> TypeDescriptor {
    TypeDescriptor::Structure("fleet.Truck".into())
}

#[test]
fn foreign_structure_routes_to_owner() {
    let registry = Arc::new(StubRegistry::new());
    registry.register(Arc::new(Geo)).unwrap();
    registry.register(Arc::new(fleet())).unwrap();
    let m = Marshaller::for_service(Arc::clone(&registry), "fleet").unwrap();

    let element = m.pack("t", &truck("T-1"), &truck_type()).unwrap();
    assert_eq!(m.unpack(element, &truck_type()).unwrap(), truck("T-1"));
}

#[test]
fn lookups_see_late_registration() {
    let registry = Arc::new(StubRegistry::new());
    registry.register(Arc::new(fleet())).unwrap();
    let m = Marshaller::for_service(Arc::clone(&registry), "fleet").unwrap();

    assert_eq!(
        m.pack("t", &truck("T-2"), &truck_type()),
        Err(Error::ServiceTypeNotFound(FIX.into()))
    );

    registry.register(Arc::new(Geo)).unwrap();
    assert!(m.pack("t", &truck("T-2"), &truck_type()).is_ok());
}

#[test]
fn node_marshaller_reaches_every_namespace() {
    let registry = Arc::new(StubRegistry::new());
    registry.register(Arc::new(Geo)).unwrap();
    registry.register(Arc::new(fleet())).unwrap();
    let m = Marshaller::with_registry(registry);
    assert_eq!(m.namespace(), None);

    let element = m.pack("f", &fix(1.0, 2.0), &TypeDescriptor::Structure(FIX.into())).unwrap();
    assert_eq!(element.tag(), rpcwire::TypeTag::Structure);
    assert!(matches!(
        m.structure_stub("geo.Route"),
        Err(Error::ServiceTypeNotFound(_))
    ));
}

#[test]
fn hand_written_stub_rejects_missing_field() {
    let registry = Arc::new(StubRegistry::new());
    registry.register(Arc::new(Geo)).unwrap();
    let m = Marshaller::for_service(registry, "geo").unwrap();
    let partial = Value::Structure(StructValue::new(FIX).with("lat", 1.0f64));
    assert!(m.pack("f", &partial, &TypeDescriptor::Structure(FIX.into())).is_err());
}

#[test]
fn shared_marshaller_across_threads() {
    let registry = Arc::new(StubRegistry::new());
    registry.register(Arc::new(Geo)).unwrap();
    registry.register(Arc::new(fleet())).unwrap();
    let m = Marshaller::for_service(registry, "fleet").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let m = m.clone();
            thread::spawn(move || {
                let value = truck(&format!("T-{}", i));
                let element = m.pack("t", &value, &truck_type()).unwrap();
                m.unpack(element, &truck_type()).unwrap() == value
            })
        })
        .collect();
    assert!(handles.into_iter().all(|h| h.join().unwrap()));
}
