// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Chunked transfer against a local service, checked with seeded random
// regions: whatever the limit, a chunked read must equal the direct read,
// every request must fit the limit, and the requests must tile the region.

use parking_lot::Mutex;
use rpcwire::config::{TransferConfig, TransferSettings};
use rpcwire::memory::{
    ArrayMemoryService, ChunkRequest, MultiDimArrayMemoryService, NumericChunkCodec,
};
use rpcwire::types::MultiDimArray;
use rpcwire::{
    ArrayMemory, Element, Error, LocalArrayMemory, LocalMultiDimArrayMemory, MemoryTransport,
    MultiDimArrayMemory, RemoteArrayMemory, RemoteMultiDimArrayMemory,
};
use std::sync::Arc;

const SEED: u64 = 0x5eed_c0de;

struct Tap<X> {
    inner: X,
    requests: Mutex<Vec<ChunkRequest>>,
}

impl<X> Tap<X> {
    fn new(inner: X) -> Self {
        Self {
            inner,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn take(&self) -> Vec<ChunkRequest> {
        std::mem::take(&mut *self.requests.lock())
    }
}

impl<X: MemoryTransport> MemoryTransport for Tap<X> {
    fn dimensions(&self) -> rpcwire::Result<Vec<u64>> {
        self.inner.dimensions()
    }

    fn read(&self, request: &ChunkRequest) -> rpcwire::Result<Element> {
        self.requests.lock().push(request.clone());
        self.inner.read(request)
    }

    fn write(&self, request: &ChunkRequest, data: Element) -> rpcwire::Result<()> {
        self.requests.lock().push(request.clone());
        self.inner.write(request, data)
    }
}

type IntCodec = NumericChunkCodec<i32>;
type GridCodec = NumericChunkCodec<u16>;
type Flat = RemoteArrayMemory<Tap<ArrayMemoryService<IntCodec>>, IntCodec>;
type Grid = RemoteMultiDimArrayMemory<Tap<MultiDimArrayMemoryService<GridCodec>>, GridCodec>;

fn limit(bytes: usize) -> Arc<TransferConfig> {
    Arc::new(TransferConfig::new(TransferSettings {
        max_transfer_bytes: bytes,
    }))
}

fn flat(values: Vec<i32>, config: Arc<TransferConfig>) -> (Arc<LocalArrayMemory<i32>>, Flat) {
    let local = Arc::new(LocalArrayMemory::new(values));
    let service = ArrayMemoryService::new(Arc::clone(&local), NumericChunkCodec::default());
    let remote = RemoteArrayMemory::new(Tap::new(service), NumericChunkCodec::default())
        .with_config(config);
    (local, remote)
}

fn grid(
    dims: &[u32],
    config: Arc<TransferConfig>,
) -> (Arc<LocalMultiDimArrayMemory<u16>>, Grid) {
    let n: u32 = dims.iter().product();
    let array = MultiDimArray::new(dims.to_vec(), (0..n).map(|v| v as u16).collect()).unwrap();
    let local = Arc::new(LocalMultiDimArrayMemory::new(array));
    let service = MultiDimArrayMemoryService::new(Arc::clone(&local), NumericChunkCodec::default());
    let remote = RemoteMultiDimArrayMemory::new(Tap::new(service), NumericChunkCodec::default())
        .with_config(config);
    (local, remote)
}

fn product(values: &[u64]) -> u64 {
    values.iter().product()
}

/// Column-major offset of `pos` in a region of `dims`.
fn linear(dims: &[u32], pos: &[u64]) -> u64 {
    let mut stride = 1;
    let mut at = 0;
    for (&d, &p) in dims.iter().zip(pos) {
        at += p * stride;
        stride *= u64::from(d);
    }
    at
}

#[test]
fn ten_int32_over_sixteen_bytes() {
    let (_, remote) = flat((0..10).collect(), limit(16));
    let mut buffer = vec![0; 10];
    remote.read(0, &mut buffer, 0, 10).unwrap();

    assert_eq!(buffer, (0..10).collect::<Vec<_>>());
    let counts: Vec<u64> = remote.transport().take().iter().map(|r| r.count[0]).collect();
    assert_eq!(counts, vec![4, 4, 2]);
}

#[test]
fn random_flat_reads_match_direct_reads() {
    let mut rng = fastrand::Rng::with_seed(SEED);
    for _ in 0..64 {
        let len = rng.usize(1..256);
        let bytes = rng.usize(4..128);
        let values: Vec<i32> = (0..len).map(|_| rng.i32(..)).collect();
        let (local, remote) = flat(values, limit(bytes));

        let pos = rng.usize(0..len);
        let count = rng.usize(0..=len - pos);
        let offset = rng.usize(0..8);
        let mut buffer = vec![0; offset + count];
        remote.read(pos as u64, &mut buffer, offset, count).unwrap();

        assert_eq!(buffer[offset..], local.read_vec(pos as u64, count as u64).unwrap()[..]);
        let requests = remote.transport().take();
        let mut next = pos as u64;
        for request in &requests {
            assert_eq!(request.pos[0], next);
            assert!(request.count[0] * 4 <= bytes as u64, "{:?} over {}", request, bytes);
            next += request.count[0];
        }
        assert_eq!(next, (pos + count) as u64);
    }
}

#[test]
fn random_flat_writes_land_in_place() {
    let mut rng = fastrand::Rng::with_seed(SEED ^ 1);
    for _ in 0..32 {
        let len = rng.usize(1..128);
        let (local, remote) = flat(vec![0; len], limit(rng.usize(4..64)));
        let pos = rng.usize(0..len);
        let count = rng.usize(0..=len - pos);
        let source: Vec<i32> = (1..=count as i32).collect();

        remote.write(pos as u64, &source, 0, count).unwrap();

        let mut expected = vec![0; len];
        expected[pos..pos + count].copy_from_slice(&source);
        assert_eq!(local.snapshot(), expected);
    }
}

#[test]
fn random_multidim_reads_match_direct_reads() {
    let mut rng = fastrand::Rng::with_seed(SEED ^ 2);
    for _ in 0..64 {
        let rank = rng.usize(1..=3);
        let dims: Vec<u32> = (0..rank).map(|_| rng.u32(1..=6)).collect();
        let bytes = rng.usize(2..96);
        let max = (bytes / 2) as u64;
        let (local, remote) = grid(&dims, limit(bytes));

        let pos: Vec<u64> = dims.iter().map(|&d| rng.u64(0..u64::from(d))).collect();
        let count: Vec<u64> = dims
            .iter()
            .zip(&pos)
            .map(|(&d, &p)| rng.u64(1..=u64::from(d) - p))
            .collect();
        let shape: Vec<u32> = count.iter().map(|&c| c as u32).collect();
        let mut buffer = MultiDimArray::new(shape, vec![0u16; product(&count) as usize]).unwrap();
        let zero = vec![0u64; rank];

        let total = product(&count);
        remote.read(&pos, &mut buffer, &zero, &count).unwrap();

        assert_eq!(buffer, local.read_region(&pos, &count).unwrap());
        let requests = remote.transport().take();
        let moved: u64 = requests.iter().map(|r| product(&r.count)).sum();
        assert_eq!(moved, total);
        for request in &requests {
            assert!(product(&request.count) <= max, "{:?} over {}", request, max);
        }
        let starts: Vec<u64> = requests.iter().map(|r| linear(&dims, &r.pos)).collect();
        assert!(starts.windows(2).all(|w| w[0] < w[1]), "{:?}", starts);
    }
}

#[test]
fn column_larger_than_limit_is_split_inside() {
    // one column holds 8 u16, the limit carries 4
    let (local, remote) = grid(&[8, 2], limit(8));
    let mut buffer = MultiDimArray::new(vec![8, 2], vec![0u16; 16]).unwrap();
    remote.read(&[0, 0], &mut buffer, &[0, 0], &[8, 2]).unwrap();

    assert_eq!(buffer, local.read_region(&[0, 0], &[8, 2]).unwrap());
    let requests = remote.transport().take();
    let counts: Vec<_> = requests.iter().map(|r| r.count.clone()).collect();
    assert_eq!(counts, vec![vec![4, 1]; 4]);
    let positions: Vec<_> = requests.iter().map(|r| r.pos.clone()).collect();
    assert_eq!(positions, vec![vec![0, 0], vec![4, 0], vec![0, 1], vec![4, 1]]);

    let block = MultiDimArray::new(vec![6, 2], (50..62u16).collect::<Vec<_>>()).unwrap();
    remote.write(&[1, 0], &block, &[0, 0], &[6, 2]).unwrap();
    assert_eq!(remote.transport().take().len(), 4);
    assert_eq!(local.read_region(&[1, 0], &[6, 2]).unwrap(), block);
}

#[test]
fn multidim_write_then_read_back() {
    let (local, remote) = grid(&[5, 4, 3], limit(12));
    let block = MultiDimArray::new(vec![2, 3, 2], (100..112u16).collect::<Vec<_>>()).unwrap();

    remote.write(&[3, 1, 1], &block, &[0, 0, 0], &[2, 3, 2]).unwrap();
    assert!(remote.transport().take().iter().all(|r| product(&r.count) <= 6));

    let mut back = MultiDimArray::new(vec![2, 3, 2], vec![0u16; 12]).unwrap();
    remote.read(&[3, 1, 1], &mut back, &[0, 0, 0], &[2, 3, 2]).unwrap();
    assert_eq!(back, block);
    assert_eq!(local.read_region(&[3, 1, 1], &[2, 3, 2]).unwrap(), block);
}

#[test]
fn limit_change_applies_to_the_next_call() {
    let config = limit(16);
    let (_, remote) = flat((0..12).collect(), Arc::clone(&config));
    let mut buffer = vec![0; 12];

    remote.read(0, &mut buffer, 0, 12).unwrap();
    assert_eq!(remote.transport().take().len(), 3);

    config.set_max_transfer_bytes(48).unwrap();
    remote.read(0, &mut buffer, 0, 12).unwrap();
    assert_eq!(remote.transport().take().len(), 1);
}

#[test]
fn out_of_range_read_sends_nothing() {
    let (local, remote) = flat(vec![7; 8], limit(16));
    let mut buffer = vec![0; 8];
    let err = remote.read(4, &mut buffer, 0, 8).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds(_)));
    assert!(err.is_data_type());
    assert!(remote.transport().take().is_empty());
    assert_eq!(local.snapshot(), vec![7; 8]);
}

#[test]
fn out_of_range_write_leaves_region_untouched() {
    // the first two chunks would fit, the third runs past the end
    let (local, remote) = flat(vec![0; 10], limit(16));
    let source: Vec<i32> = (1..=12).collect();
    let err = remote.write(0, &source, 0, 12).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds(_)));
    assert!(remote.transport().take().is_empty());
    assert_eq!(local.snapshot(), vec![0; 10]);

    let (local, remote) = grid(&[4, 3], limit(4));
    let before = local.read_region(&[0, 0], &[4, 3]).unwrap();
    let block = MultiDimArray::new(vec![2, 4], vec![9u16; 8]).unwrap();
    let err = remote.write(&[2, 0], &block, &[0, 0], &[2, 4]).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds(_)));
    assert!(remote.transport().take().is_empty());
    assert_eq!(local.read_region(&[0, 0], &[4, 3]).unwrap(), before);
}
