// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Async proxies: same chunking as the blocking ones, plus cooperative
// cancellation between chunks.

use async_trait::async_trait;
use rpcwire::config::{TransferConfig, TransferSettings};
use rpcwire::memory::{
    ArrayMemoryService, AsyncMemoryTransport, AsyncRemoteArrayMemory,
    AsyncRemoteMultiDimArrayMemory, BlockingTransport, ChunkRequest, MultiDimArrayMemoryService,
    NumericChunkCodec,
};
use rpcwire::types::MultiDimArray;
use rpcwire::{
    CancelToken, Element, Error, LocalArrayMemory, LocalMultiDimArrayMemory, MemoryTransport,
    Result,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Yields before every chunk and cancels `token` once `cancel_after` chunks
/// have gone through.
struct Yielding<X> {
    inner: X,
    chunks: AtomicUsize,
    cancel_after: Option<(usize, CancelToken)>,
}

impl<X> Yielding<X> {
    fn new(inner: X) -> Self {
        Self {
            inner,
            chunks: AtomicUsize::new(0),
            cancel_after: None,
        }
    }

    fn cancelling(inner: X, after: usize, token: CancelToken) -> Self {
        Self {
            cancel_after: Some((after, token)),
            ..Self::new(inner)
        }
    }

    fn chunks(&self) -> usize {
        self.chunks.load(Ordering::SeqCst)
    }

    fn count(&self) {
        let done = self.chunks.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, token)) = &self.cancel_after {
            if done == *after {
                token.cancel();
            }
        }
    }
}

#[async_trait]
impl<X: MemoryTransport> AsyncMemoryTransport for Yielding<X> {
    async fn dimensions(&self) -> Result<Vec<u64>> {
        self.inner.dimensions()
    }

    async fn read(&self, request: ChunkRequest) -> Result<Element> {
        tokio::task::yield_now().await;
        let element = self.inner.read(&request)?;
        self.count();
        Ok(element)
    }

    async fn write(&self, request: ChunkRequest, data: Element) -> Result<()> {
        tokio::task::yield_now().await;
        self.inner.write(&request, data)?;
        self.count();
        Ok(())
    }
}

type IntCodec = NumericChunkCodec<i32>;

fn limit(bytes: usize) -> Arc<TransferConfig> {
    Arc::new(TransferConfig::new(TransferSettings {
        max_transfer_bytes: bytes,
    }))
}

fn service(values: Vec<i32>) -> (Arc<LocalArrayMemory<i32>>, ArrayMemoryService<IntCodec>) {
    let local = Arc::new(LocalArrayMemory::new(values));
    let service = ArrayMemoryService::new(Arc::clone(&local), IntCodec::default());
    (local, service)
}

#[tokio::test]
async fn blocking_transport_adapts_a_sync_service() {
    let (_, service) = service((0..10).collect());
    let remote = AsyncRemoteArrayMemory::new(BlockingTransport::new(service), IntCodec::default())
        .with_config(limit(16));

    assert_eq!(remote.length().await.unwrap(), 10);
    let mut buffer = vec![0; 12];
    remote.read(0, &mut buffer, 2, 10, &CancelToken::new()).await.unwrap();
    assert_eq!(&buffer[2..], &(0..10).collect::<Vec<_>>()[..]);
}

#[tokio::test]
async fn cancel_between_chunks_keeps_applied_writes() {
    let (local, service) = service(vec![0; 10]);
    let token = CancelToken::new();
    let transport = Yielding::cancelling(service, 2, token.clone());
    let remote = AsyncRemoteArrayMemory::new(transport, IntCodec::default()).with_config(limit(16));

    let source: Vec<i32> = (1..=10).collect();
    let err = remote.write(0, &source, 0, 10, &token).await.unwrap_err();

    assert_eq!(err, Error::Cancelled { completed: 8 });
    assert!(!err.is_data_type());
    assert_eq!(remote.transport().chunks(), 2);
    assert_eq!(local.snapshot(), vec![1, 2, 3, 4, 5, 6, 7, 8, 0, 0]);
}

#[tokio::test]
async fn cancelled_token_sends_nothing() {
    let (_, service) = service(vec![5; 8]);
    let remote = AsyncRemoteArrayMemory::new(Yielding::new(service), IntCodec::default())
        .with_config(limit(16));
    let token = CancelToken::new();
    token.cancel();

    let mut buffer = vec![0; 8];
    let err = remote.read(0, &mut buffer, 0, 8, &token).await.unwrap_err();
    assert_eq!(err, Error::Cancelled { completed: 0 });
    assert_eq!(remote.transport().chunks(), 0);
    assert_eq!(buffer, vec![0; 8]);
}

#[tokio::test]
async fn out_of_range_write_sends_nothing() {
    let (local, service) = service(vec![0; 10]);
    let remote = AsyncRemoteArrayMemory::new(Yielding::new(service), IntCodec::default())
        .with_config(limit(16));

    let source: Vec<i32> = (1..=12).collect();
    let err = remote.write(0, &source, 0, 12, &CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::OutOfBounds(_)));
    assert_eq!(remote.transport().chunks(), 0);
    assert_eq!(local.snapshot(), vec![0; 10]);

    let grid = MultiDimArray::new(vec![2, 2], vec![0u16; 4]).unwrap();
    let local = Arc::new(LocalMultiDimArrayMemory::new(grid));
    let remote = AsyncRemoteMultiDimArrayMemory::new(
        Yielding::new(MultiDimArrayMemoryService::new(
            Arc::clone(&local),
            NumericChunkCodec::default(),
        )),
        NumericChunkCodec::<u16>::default(),
    )
    .with_config(limit(2));
    let block = MultiDimArray::new(vec![2, 3], vec![9u16; 6]).unwrap();
    let err = remote
        .write(&[0, 0], &block, &[0, 0], &[2, 3], &CancelToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OutOfBounds(_)));
    assert_eq!(remote.transport().chunks(), 0);
    assert!(local.read_region(&[0, 0], &[2, 2]).unwrap().values().iter().all(|&v| v == 0));
}

#[tokio::test]
async fn concurrent_reads_share_one_transport() {
    let (_, service) = service((0..64).collect());
    let remote = AsyncRemoteArrayMemory::new(Arc::new(Yielding::new(service)), IntCodec::default())
        .with_config(limit(32));
    let token = CancelToken::new();

    let mut low = vec![0; 32];
    let mut high = vec![0; 32];
    let (a, b) = tokio::join!(
        remote.read(0, &mut low, 0, 32, &token),
        remote.read(32, &mut high, 0, 32, &token),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(low, (0..32).collect::<Vec<_>>());
    assert_eq!(high, (32..64).collect::<Vec<_>>());
    assert_eq!(remote.transport().chunks(), 8);
}

#[tokio::test]
async fn multidim_attach_and_cancel() {
    let dims = vec![4u32, 3, 2];
    let array = MultiDimArray::new(dims, (0..24u16).collect::<Vec<_>>()).unwrap();
    let local = Arc::new(LocalMultiDimArrayMemory::new(array));
    let codec = || NumericChunkCodec::<u16>::default();

    let wrong = AsyncRemoteMultiDimArrayMemory::attach(
        BlockingTransport::new(MultiDimArrayMemoryService::new(Arc::clone(&local), codec())),
        codec(),
        &[4, 3],
    )
    .await;
    assert!(matches!(wrong, Err(Error::DimensionMismatch { .. })));

    let token = CancelToken::new();
    let transport = Yielding::cancelling(
        MultiDimArrayMemoryService::new(Arc::clone(&local), codec()),
        1,
        token.clone(),
    );
    let remote = AsyncRemoteMultiDimArrayMemory::attach(transport, codec(), &[4, 3, 2])
        .await
        .unwrap()
        .with_config(limit(24));
    assert_eq!(remote.dimensions().await.unwrap(), vec![4, 3, 2]);

    let mut buffer = MultiDimArray::new(vec![4, 3, 2], vec![0u16; 24]).unwrap();
    let err = remote
        .read(&[0, 0, 0], &mut buffer, &[0, 0, 0], &[4, 3, 2], &token)
        .await
        .unwrap_err();

    // 24 bytes hold 12 u16: one [4, 3, 1] slab arrived before the cancel
    assert_eq!(err, Error::Cancelled { completed: 12 });
    assert_eq!(&buffer.values()[..12], &(0..12).collect::<Vec<u16>>()[..]);
    assert!(buffer.values()[12..].iter().all(|&v| v == 0));
}
