use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use strata_dag::{ObjectReader, ObjectWriter, DEFAULT_CHUNK_SIZE};
use strata_store::BlockStore;
use strata_types::BlockCid;
use tokio::sync::mpsc;

use crate::error::{BoxError, EgressError, IngestError};
use crate::stream::CatStream;

/// Routing segment an egress path may carry in front of the CID.
const ROUTING_SEGMENT: &str = "blocks/";

/// Chunks buffered between the egress producer task and the consumer.
const EGRESS_CHANNEL_CAPACITY: usize = 2;

/// Result of an add call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOutcome {
    /// Caller-supplied name, echoed back. Not used for addressing.
    pub path: String,
    /// Canonical text form of the root CID.
    pub hash: String,
    /// Total size of the ingested content in bytes.
    pub size: u64,
}

/// The add/cat pipeline over a block store.
///
/// The store is injected at construction; the pipeline holds no other
/// state, so one instance can serve any number of concurrent calls.
pub struct Pipeline {
    store: Arc<dyn BlockStore>,
    chunk_size: usize,
}

impl Pipeline {
    /// Create a pipeline with the default chunk size.
    pub fn new(store: Arc<dyn BlockStore>) -> Self {
        Self::with_chunk_size(store, DEFAULT_CHUNK_SIZE)
    }

    /// Create a pipeline with an explicit chunk size.
    pub fn with_chunk_size(store: Arc<dyn BlockStore>, chunk_size: usize) -> Self {
        Self { store, chunk_size }
    }

    /// The underlying block store.
    pub fn store(&self) -> &Arc<dyn BlockStore> {
        &self.store
    }

    /// Ingest a byte stream and return its root CID and size.
    ///
    /// The stream is consumed to completion; bytes are chunked and stored
    /// as they arrive. An empty stream is valid and yields the CID of the
    /// empty byte sequence with size 0.
    pub async fn add<S, E>(&self, name: &str, content: S) -> Result<AddOutcome, IngestError>
    where
        S: Stream<Item = Result<Bytes, E>> + Send,
        E: Into<BoxError>,
    {
        let mut writer = ObjectWriter::with_chunk_size(Arc::clone(&self.store), self.chunk_size);
        let mut content = std::pin::pin!(content);
        while let Some(item) = content.next().await {
            let chunk = item.map_err(|e| IngestError::Read(e.into()))?;
            writer.push(&chunk).await?;
        }
        let (root, size) = writer.finish().await?;
        tracing::info!(cid = %root.short_text(), size, path = name, "content added");
        Ok(AddOutcome {
            path: name.to_string(),
            hash: root.to_canonical(),
            size,
        })
    }

    /// Ingest an in-memory byte slice.
    pub async fn add_bytes(&self, name: &str, data: &[u8]) -> Result<AddOutcome, IngestError> {
        let content = futures::stream::iter([Ok::<_, BoxError>(Bytes::copy_from_slice(data))]);
        self.add(name, content).await
    }

    /// Resolve an identifier and stream its content back.
    ///
    /// `path` may carry a leading `/blocks/` routing segment, which is
    /// stripped before CID parsing. Identifier validation and root
    /// resolution happen before the stream exists, so a malformed CID, an
    /// unknown root, or a failing backend surface as an `Err` return with
    /// no bytes emitted. Failures past the root (child blocks of a chunked
    /// object) are delivered once through the stream's error channel, after
    /// which the stream ends.
    pub async fn cat(&self, path: &str) -> Result<CatStream, EgressError> {
        let text = strip_routing_prefix(path);
        let cid = BlockCid::parse(text).map_err(|source| EgressError::InvalidCid {
            text: text.to_string(),
            source,
        })?;

        let reader = ObjectReader::open(Arc::clone(&self.store), cid)
            .await
            .map_err(EgressError::from)?;
        tracing::debug!(cid = %cid.short_text(), "egress stream opened");

        let (tx, rx) = mpsc::channel(EGRESS_CHANNEL_CAPACITY);
        tokio::spawn(pump(reader, tx));
        Ok(CatStream::new(rx))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

/// Drive the reader into the channel until done, error, or consumer drop.
async fn pump(mut reader: ObjectReader, tx: mpsc::Sender<Result<Bytes, EgressError>>) {
    while let Some(item) = reader.next_chunk().await {
        let failed = item.is_err();
        if tx.send(item.map_err(EgressError::from)).await.is_err() {
            // Consumer dropped the stream: stop issuing store reads.
            tracing::debug!("egress consumer went away, stream cancelled");
            return;
        }
        if failed {
            return;
        }
    }
}

fn strip_routing_prefix(path: &str) -> &str {
    let trimmed = path.trim_start_matches('/');
    trimmed.strip_prefix(ROUTING_SEGMENT).unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use strata_store::{
        BackendBlockStore, MemoryBlobBackend, MemoryBlockStore, StoreResult, TieredBlockStore,
    };

    fn memory_pipeline(chunk_size: usize) -> (Pipeline, Arc<MemoryBlockStore>) {
        let store = Arc::new(MemoryBlockStore::new());
        let pipeline =
            Pipeline::with_chunk_size(Arc::clone(&store) as Arc<dyn BlockStore>, chunk_size);
        (pipeline, store)
    }

    fn tiered_pipeline() -> (Pipeline, Arc<MemoryBlockStore>, Arc<MemoryBlobBackend>) {
        let cache = Arc::new(MemoryBlockStore::new());
        let backend = Arc::new(MemoryBlobBackend::new());
        let durable = Arc::new(BackendBlockStore::new(Arc::clone(&backend)));
        let tiered = TieredBlockStore::new(
            Arc::clone(&cache) as Arc<dyn BlockStore>,
            durable as Arc<dyn BlockStore>,
        );
        let pipeline = Pipeline::with_chunk_size(Arc::new(tiered) as Arc<dyn BlockStore>, 64);
        (pipeline, cache, backend)
    }

    async fn collect(mut stream: CatStream) -> Result<Vec<u8>, EgressError> {
        let mut out = Vec::new();
        while let Some(item) = stream.next().await {
            out.extend_from_slice(&item?);
        }
        Ok(out)
    }

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, BoxError>> {
        futures::stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(*p)))
                .collect::<Vec<_>>(),
        )
    }

    // -----------------------------------------------------------------------
    // add
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn add_returns_cid_and_size() {
        let (pipeline, _) = memory_pipeline(1024);
        let outcome = pipeline
            .add("greeting.txt", chunks(&[b"he", b"llo"]))
            .await
            .unwrap();

        assert_eq!(outcome.path, "greeting.txt");
        assert_eq!(outcome.size, 5);
        assert_eq!(outcome.hash, BlockCid::identify(b"hello").to_canonical());
    }

    #[tokio::test]
    async fn add_is_deterministic_across_pipelines() {
        let (p1, _) = memory_pipeline(1024);
        let (p2, _) = memory_pipeline(1024);
        let o1 = p1.add_bytes("a", b"hello").await.unwrap();
        let o2 = p2.add_bytes("b", b"hello").await.unwrap();
        assert_eq!(o1.hash, o2.hash);
    }

    #[tokio::test]
    async fn add_empty_stream_is_valid() {
        let (pipeline, _) = memory_pipeline(1024);
        let outcome = pipeline.add("empty", chunks(&[])).await.unwrap();

        assert_eq!(outcome.size, 0);
        BlockCid::parse(&outcome.hash).expect("hash should be a well-formed CID");
    }

    #[tokio::test]
    async fn add_failing_input_stream_is_a_read_error() {
        let (pipeline, _) = memory_pipeline(1024);
        let content = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err::<Bytes, BoxError>("connection reset".into()),
        ]);
        let err = pipeline.add("broken", content).await.unwrap_err();
        assert!(matches!(err, IngestError::Read(_)));
    }

    #[tokio::test]
    async fn add_with_unavailable_backend_is_a_store_error() {
        let (pipeline, _cache, backend) = tiered_pipeline();
        backend.set_unavailable(true);
        let err = pipeline.add_bytes("f", b"payload").await.unwrap_err();
        assert!(matches!(err, IngestError::Store(_)));
    }

    #[tokio::test]
    async fn concurrent_adds_of_identical_content_agree() {
        let (pipeline, _) = memory_pipeline(16);
        let pipeline = Arc::new(pipeline);
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let pipeline = Arc::clone(&pipeline);
                tokio::spawn(async move {
                    pipeline
                        .add_bytes(&format!("copy-{i}"), b"same bytes from many callers")
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut hashes = Vec::new();
        for h in handles {
            hashes.push(h.await.unwrap().hash);
        }
        hashes.dedup();
        assert_eq!(hashes.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_adds_of_different_content_differ() {
        let (pipeline, _) = memory_pipeline(16);
        let a = pipeline.add_bytes("a", b"first content").await.unwrap();
        let b = pipeline.add_bytes("b", b"second content").await.unwrap();
        assert_ne!(a.hash, b.hash);
    }

    // -----------------------------------------------------------------------
    // cat
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn cat_streams_back_what_add_stored() {
        let (pipeline, _) = memory_pipeline(1024);
        let outcome = pipeline.add_bytes("hello.txt", b"hello").await.unwrap();

        let stream = pipeline.cat(&outcome.hash).await.unwrap();
        assert_eq!(collect(stream).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn cat_multi_chunk_roundtrip() {
        let (pipeline, _) = memory_pipeline(32);
        let payload: Vec<u8> = (0..500u32).map(|i| (i % 251) as u8).collect();
        let outcome = pipeline
            .add("big", futures::stream::iter([Ok::<_, BoxError>(Bytes::from(payload.clone()))]))
            .await
            .unwrap();

        let stream = pipeline.cat(&outcome.hash).await.unwrap();
        assert_eq!(collect(stream).await.unwrap(), payload);
    }

    #[tokio::test]
    async fn cat_strips_routing_prefix() {
        let (pipeline, _) = memory_pipeline(1024);
        let outcome = pipeline.add_bytes("f", b"prefixed").await.unwrap();

        for path in [
            outcome.hash.clone(),
            format!("blocks/{}", outcome.hash),
            format!("/blocks/{}", outcome.hash),
        ] {
            let stream = pipeline.cat(&path).await.unwrap();
            assert_eq!(collect(stream).await.unwrap(), b"prefixed", "{path}");
        }
    }

    #[tokio::test]
    async fn cat_invalid_cid_fails_before_any_bytes() {
        let (pipeline, _) = memory_pipeline(1024);
        let err = pipeline.cat("not-a-valid-cid").await.unwrap_err();
        assert!(matches!(err, EgressError::InvalidCid { .. }));
    }

    #[tokio::test]
    async fn cat_unknown_cid_is_not_found() {
        let (pipeline, _) = memory_pipeline(1024);
        let unknown = BlockCid::identify(b"never added").to_canonical();
        let err = pipeline.cat(&unknown).await.unwrap_err();
        assert!(matches!(err, EgressError::NotFound(_)));
    }

    #[tokio::test]
    async fn cat_backend_outage_is_a_store_error_not_not_found() {
        let (pipeline, cache, backend) = tiered_pipeline();
        let outcome = pipeline.add_bytes("f", b"stored then lost").await.unwrap();
        cache.clear();
        backend.set_unavailable(true);

        let err = pipeline.cat(&outcome.hash).await.unwrap_err();
        assert!(matches!(err, EgressError::Store(_)));
    }

    #[tokio::test]
    async fn cat_mid_stream_failure_uses_the_error_channel() {
        let (pipeline, store) = memory_pipeline(32);
        let payload: Vec<u8> = (0..200u32).map(|i| i as u8).collect();
        let outcome = pipeline.add_bytes("doomed", &payload).await.unwrap();

        // Remove the second leaf so streaming fails after the first chunk.
        let root = BlockCid::parse(&outcome.hash).unwrap();
        let manifest_bytes = store.get(&root).await.unwrap();
        let manifest: serde_json::Value = serde_json::from_slice(&manifest_bytes).unwrap();
        let victim = BlockCid::parse(manifest["children"][1]["cid"].as_str().unwrap()).unwrap();
        assert!(store.remove(&victim));

        let mut stream = pipeline.cat(&outcome.hash).await.unwrap();
        let first = stream.next().await.unwrap();
        assert_eq!(first.unwrap(), &payload[..32]);

        let second = stream.next().await.unwrap();
        assert!(matches!(second.unwrap_err(), EgressError::NotFound(_)));
        assert!(stream.next().await.is_none());
    }

    // -----------------------------------------------------------------------
    // cancellation
    // -----------------------------------------------------------------------

    struct CountingStore {
        inner: MemoryBlockStore,
        gets: AtomicUsize,
    }

    #[async_trait]
    impl BlockStore for CountingStore {
        async fn get(&self, cid: &BlockCid) -> StoreResult<Bytes> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get(cid).await
        }

        async fn put(&self, cid: &BlockCid, data: Bytes) -> StoreResult<()> {
            self.inner.put(cid, data).await
        }

        async fn has(&self, cid: &BlockCid) -> StoreResult<bool> {
            self.inner.has(cid).await
        }
    }

    #[tokio::test]
    async fn dropping_the_stream_stops_store_reads() {
        let store = Arc::new(CountingStore {
            inner: MemoryBlockStore::new(),
            gets: AtomicUsize::new(0),
        });
        let pipeline = Pipeline::with_chunk_size(Arc::clone(&store) as Arc<dyn BlockStore>, 8);

        // 16 chunks of distinct content.
        let payload: Vec<u8> = (0..128u32).map(|i| i as u8).collect();
        let outcome = pipeline.add_bytes("big", &payload).await.unwrap();

        let mut stream = pipeline.cat(&outcome.hash).await.unwrap();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 8);
        drop(stream);

        // Let the producer observe the closed channel and stop.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let after_drop = store.gets.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.gets.load(Ordering::SeqCst), after_drop);

        // Root + first chunk + at most the channel's worth of readahead,
        // far short of the 17 reads a full stream would issue.
        assert!(after_drop < 8, "producer kept reading: {after_drop} gets");
    }
}
