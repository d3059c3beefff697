// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry and schema-driven stub tests.

use super::*;
use crate::types::{ArrayLength, NamedArrayValue, Shape, TypeDescriptor};

fn empty_service(namespace: &str) -> Arc<dyn ServiceStubs> {
    Arc::new(ServiceDef::builder(namespace).build().unwrap())
}

#[test]
fn test_register_and_lookup() {
    let registry = StubRegistry::new();
    registry.register(empty_service("alpha")).unwrap();
    registry.register(empty_service("org.beta")).unwrap();

    assert_eq!(registry.namespaces(), vec!["alpha", "org.beta"]);
    assert!(registry.is_registered("alpha"));
    assert_eq!(
        registry.get_namespace_registry("org.beta").unwrap().namespace(),
        "org.beta"
    );
    assert!(matches!(
        registry.get_namespace_registry("gamma"),
        Err(Error::ServiceTypeNotFound(_))
    ));
}

#[test]
fn test_duplicate_namespace_rejected() {
    let registry = StubRegistry::new();
    registry.register(empty_service("alpha")).unwrap();
    assert_eq!(
        registry.register(empty_service("alpha")),
        Err(Error::DuplicateNamespace("alpha".into()))
    );
    assert_eq!(registry.namespaces().len(), 1);
}

#[test]
fn test_resolve_requires_registered_namespace() {
    let registry = StubRegistry::new();
    registry.register(empty_service("org.beta")).unwrap();
    assert_eq!(
        registry.resolve("org.beta.Point").unwrap(),
        ("org.beta", "Point")
    );
    assert_eq!(
        registry.resolve("org.gamma.Point"),
        Err(Error::ServiceTypeNotFound("org.gamma.Point".into()))
    );
    assert!(registry.resolve("Point").is_err());
}

#[test]
fn test_concurrent_registration_is_serialized() {
    let registry = Arc::new(StubRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.register(empty_service("shared")).is_ok())
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&ok| ok)
        .count();
    assert_eq!(winners, 1);
}

#[test]
fn test_global_registry_is_shared() {
    let a = StubRegistry::global();
    let b = StubRegistry::global();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_pod_element_size() {
    let vec3 = NamedArrayDef::builder("geo.Vec3", ScalarKind::Single)
        .field("xyz", 3)
        .build()
        .unwrap();
    let inner = PodDef::builder("geo.Inner")
        .scalar("flag", ScalarKind::Bool)
        .scalar("count", ScalarKind::UInt16)
        .build()
        .unwrap();
    assert_eq!(inner.element_size(), 3);

    let outer = PodDef::builder("geo.Outer")
        .scalar("id", ScalarKind::UInt64)
        .array("samples", ScalarKind::Double, ArrayLength::Bounded(4))
        .multidim("grid", ScalarKind::Int8, vec![2, 3])
        .pod("inner", &inner, Shape::Array(ArrayLength::Fixed(2)))
        .named_array("pos", &vec3, Shape::Scalar)
        .build()
        .unwrap();
    assert_eq!(outer.element_size(), 8 + 4 * 8 + 6 + 2 * 3 + 12);
    assert_eq!(outer.fields().len(), 5);
}

#[test]
fn test_pod_requires_fixed_layout() {
    let err = PodDef::builder("geo.Loose")
        .array("samples", ScalarKind::Double, ArrayLength::Variable)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedShape(_)));

    assert!(PodDef::builder("Unqualified").build().is_err());
    assert_eq!(
        PodDef::builder("geo.Dup")
            .scalar("a", ScalarKind::Int8)
            .scalar("a", ScalarKind::Int8)
            .build()
            .unwrap_err(),
        Error::DuplicateKey("a".into())
    );
}

#[test]
fn test_struct_def_fields() {
    let def = StructDef::builder("geo.Track")
        .field("name", TypeDescriptor::String)
        .field("points", TypeDescriptor::list(TypeDescriptor::Any))
        .build()
        .unwrap();
    assert_eq!(def.type_name(), "geo.Track");
    assert_eq!(def.fields()[1].name, "points");
}

#[test]
fn test_named_array_fields() {
    let vec2 = NamedArrayDef::builder("geo.Vec2", ScalarKind::Int32)
        .field("x", 1)
        .field("y", 1)
        .build()
        .unwrap();
    let segment = NamedArrayDef::builder("geo.Segment", ScalarKind::Int32)
        .nested("from", &vec2)
        .unwrap()
        .nested("to", &vec2)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(segment.element_count(), 4);
    assert_eq!(segment.element_size(), 16);

    let value = segment
        .value(NumericArray::from(vec![1i32, 2, 3, 4]))
        .unwrap();
    assert_eq!(
        segment.get(&value, "to").unwrap(),
        NumericArray::from(vec![3i32, 4])
    );
    assert!(segment.get(&value, "mid").is_err());
    assert!(segment.value(NumericArray::from(vec![1i32, 2])).is_err());

    let wrong_kind = NamedArrayDef::builder("geo.F", ScalarKind::Double).nested("p", &vec2);
    assert!(wrong_kind.is_err());
}

#[test]
fn test_named_array_record_checks() {
    let vec2 = NamedArrayDef::builder("geo.Vec2", ScalarKind::Int32)
        .field("x", 1)
        .field("y", 1)
        .build()
        .unwrap();
    let other = NamedArrayValue::new("geo.Other", NumericArray::from(vec![1i32, 2]));
    assert!(vec2.check_record(&other).is_err());
    let float = NamedArrayValue::new("geo.Vec2", NumericArray::from(vec![1.0f64, 2.0]));
    assert!(vec2.check_record(&float).is_err());
}

#[test]
fn test_service_def_rejects_foreign_types() {
    let foreign = PodDef::builder("other.Thing")
        .scalar("a", ScalarKind::Int8)
        .build()
        .unwrap();
    assert!(ServiceDef::builder("mine").pod(foreign).build().is_err());

    let a = PodDef::builder("mine.Thing")
        .scalar("a", ScalarKind::Int8)
        .build()
        .unwrap();
    let service = ServiceDef::builder("mine").pod(a.clone()).build().unwrap();
    assert!(service.find_pod_stub("Thing").is_some());
    assert!(service.find_structure_stub("Thing").is_none());
    assert!(ServiceDef::builder("mine").pod(a.clone()).pod(a).build().is_err());
}

#[test]
fn test_scalar_unwrap_requires_single_record() {
    assert_eq!(single(vec![5]).unwrap(), 5);
    assert!(single(Vec::<i32>::new()).is_err());
    assert_eq!(
        single(vec![1, 2]),
        Err(Error::LengthMismatch {
            expected: 1,
            found: 2
        })
    );
}
