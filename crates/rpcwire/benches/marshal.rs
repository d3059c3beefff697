// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Marshaling Benchmark
//!
//! Measures:
//! - pack/unpack of numeric arrays of growing size
//! - pack/unpack of a pod array through the stub registry
//! - chunked remote reads against a local service at several limits

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rpcwire::config::{TransferConfig, TransferSettings};
use rpcwire::memory::{ArrayMemoryService, NumericChunkCodec};
use rpcwire::stubs::{PodDef, ServiceDef, StubRegistry};
use rpcwire::types::{ArrayLength, PodArray, PodValue, Shape};
use rpcwire::{
    ArrayMemory, LocalArrayMemory, Marshaller, RemoteArrayMemory, ScalarKind, TypeDescriptor,
    Value,
};
use std::hint::black_box as bb;
use std::sync::Arc;

const SIZES: [usize; 3] = [64, 4096, 262_144];

fn bench_numeric_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("numeric_array");
    let m = Marshaller::new();
    let descriptor = TypeDescriptor::array(ScalarKind::Double);

    for size in SIZES {
        let value = Value::from((0..size).map(|i| i as f64).collect::<Vec<_>>());
        group.throughput(Throughput::Bytes((size * 8) as u64));

        group.bench_with_input(BenchmarkId::new("pack", size), &value, |b, value| {
            b.iter(|| bb(m.pack("v", value, &descriptor).unwrap()));
        });

        let element = m.pack("v", &value, &descriptor).unwrap();
        group.bench_with_input(BenchmarkId::new("unpack", size), &element, |b, element| {
            b.iter(|| bb(m.unpack(element.clone(), &descriptor).unwrap()));
        });
    }
    group.finish();
}

fn bench_pod_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("pod_array");

    let sample = PodDef::builder("bench.Sample")
        .scalar("id", ScalarKind::UInt32)
        .scalar("value", ScalarKind::Double)
        .array("window", ScalarKind::Single, ArrayLength::Fixed(4))
        .build()
        .unwrap();
    let registry = Arc::new(StubRegistry::new());
    registry
        .register(Arc::new(ServiceDef::builder("bench").pod(sample).build().unwrap()))
        .unwrap();
    let m = Marshaller::for_service(registry, "bench").unwrap();
    let descriptor =
        TypeDescriptor::Pod("bench.Sample".into(), Shape::Array(ArrayLength::Variable));

    for count in [16usize, 1024] {
        let records = (0..count)
            .map(|i| {
                PodValue::new("bench.Sample")
                    .with("id", i as u32)
                    .with("value", i as f64 * 0.5)
                    .with("window", vec![0.0f32; 4])
            })
            .collect();
        let value = Value::PodArray(PodArray::new("bench.Sample", records));
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("round_trip", count), &value, |b, value| {
            b.iter(|| {
                let element = m.pack("p", value, &descriptor).unwrap();
                bb(m.unpack(element, &descriptor).unwrap())
            });
        });
    }
    group.finish();
}

fn bench_chunked_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunked_read");
    let len = 65_536usize;
    let local = Arc::new(LocalArrayMemory::new(vec![1.0f64; len]));
    group.throughput(Throughput::Bytes((len * 8) as u64));

    for limit in [4096usize, 65_536, 1 << 20] {
        let service = ArrayMemoryService::new(Arc::clone(&local), NumericChunkCodec::default());
        let config = Arc::new(TransferConfig::new(TransferSettings {
            max_transfer_bytes: limit,
        }));
        let remote = RemoteArrayMemory::new(service, NumericChunkCodec::<f64>::default())
            .with_config(config);
        let mut buffer = vec![0.0f64; len];

        group.bench_function(BenchmarkId::new("limit", limit), |b| {
            b.iter(|| {
                remote.read(0, &mut buffer, 0, len).unwrap();
                bb(buffer[len - 1])
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_numeric_arrays, bench_pod_arrays, bench_chunked_read);
criterion_main!(benches);
