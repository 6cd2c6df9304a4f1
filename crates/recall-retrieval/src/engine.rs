//! RetrievalEngine: the two entry points of the pipeline.
//!
//! `retrieve_context`: query → (hybrid) search → optional rerank → assemble.
//! `process_document`: text → chunks → batch embed → upsert per chunk.

use std::sync::Arc;
use std::time::Duration;

use recall_chunking::Chunker;
use recall_core::config::{HybridConfig, RecallConfig, RetrievalConfig};
use recall_core::constants::{
    DEFAULT_SOURCE_TYPE, META_CHUNK_INDEX, META_CONTENT, META_SOURCE_ID, META_SOURCE_TYPE,
    META_TOTAL_CHUNKS,
};
use recall_core::errors::{EmbeddingError, RecallError, RecallResult, RetrievalError};
use recall_core::models::{
    AssembledContext, ChunkResult, Metadata, ProcessResult, ScoredCandidate, StoreStats,
};
use recall_core::traits::{IGenerator, IQueryExpander, IRerankProvider, IVectorStore};
use recall_embeddings::Embedder;
use recall_observability::tracing_setup::events;
use recall_observability::DegradationTracker;
use recall_storage::SqliteVectorStore;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::context::ContextAssembler;
use crate::expansion::GeneratorQueryExpander;
use crate::ranking::{create_rerank_provider, Reranker};
use crate::search::{AccessNotifier, MultiQueryRetriever, SimilaritySearch};

/// The retrieval pipeline, bound to one store namespace.
pub struct RetrievalEngine {
    embedder: Arc<Embedder>,
    store: Arc<dyn IVectorStore>,
    search: Arc<SimilaritySearch>,
    reranker: Arc<Reranker>,
    expander: Option<Arc<dyn IQueryExpander>>,
    chunker: Chunker,
    hybrid: HybridConfig,
    rerank_timeout: Duration,
    namespace: String,
    tracker: Arc<DegradationTracker>,
}

impl RetrievalEngine {
    /// Build an engine around injected collaborators.
    ///
    /// Re-ranking and query expansion start disabled; see
    /// [`with_reranker`](Self::with_reranker) and
    /// [`with_expander`](Self::with_expander).
    pub fn new(config: &RecallConfig, embedder: Arc<Embedder>, store: Arc<dyn IVectorStore>) -> Self {
        let tracker = embedder.tracker().clone();
        let namespace = config.store.namespace.clone();
        let search = SimilaritySearch::new(embedder.clone(), store.clone(), namespace.clone())
            .with_notifier(AccessNotifier::spawn(store.clone()));

        Self {
            embedder,
            store,
            search: Arc::new(search),
            reranker: Arc::new(Reranker::disabled().with_tracker(tracker.clone())),
            expander: None,
            chunker: Chunker::new(config.chunking.clone()),
            hybrid: config.hybrid.clone(),
            rerank_timeout: Duration::from_millis(config.rerank.timeout_ms),
            namespace,
            tracker,
        }
    }

    /// Build everything from configuration: embedding provider, SQLite
    /// store and rerank provider.
    pub fn from_config(config: &RecallConfig) -> RecallResult<Self> {
        config.validate()?;
        let embedder = Arc::new(Embedder::from_config(config.embedding.clone())?);
        let store: Arc<dyn IVectorStore> = Arc::new(SqliteVectorStore::from_config(&config.store)?);
        let mut engine = Self::new(config, embedder, store);
        if let Some(provider) = create_rerank_provider(&config.rerank) {
            engine = engine.with_reranker(provider);
        }
        info!(
            namespace = %engine.namespace,
            embedding = engine.embedder.active_provider(),
            reranking = engine.reranker.is_enabled(),
            "retrieval engine ready"
        );
        Ok(engine)
    }

    pub fn with_reranker(mut self, provider: Arc<dyn IRerankProvider>) -> Self {
        self.reranker = Arc::new(
            Reranker::new(provider, self.rerank_timeout).with_tracker(self.tracker.clone()),
        );
        self
    }

    pub fn with_expander(mut self, expander: Arc<dyn IQueryExpander>) -> Self {
        self.expander = Some(expander);
        self
    }

    /// Use the downstream generator to paraphrase queries for hybrid search.
    pub fn with_generator(self, generator: Arc<dyn IGenerator>) -> Self {
        self.with_expander(Arc::new(GeneratorQueryExpander::new(generator)))
    }

    pub fn embedder(&self) -> &Arc<Embedder> {
        &self.embedder
    }

    pub fn search(&self) -> &Arc<SimilaritySearch> {
        &self.search
    }

    pub fn reranker(&self) -> &Arc<Reranker> {
        &self.reranker
    }

    /// Degradation events from every stage of this engine.
    pub fn tracker(&self) -> &Arc<DegradationTracker> {
        &self.tracker
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn multi_query(&self) -> MultiQueryRetriever {
        MultiQueryRetriever::new(
            self.search.clone(),
            self.expander.clone(),
            self.reranker.clone(),
            self.hybrid.clone(),
        )
        .with_tracker(self.tracker.clone())
    }

    /// Retrieve a bounded, cited context block for `query`.
    ///
    /// An empty result is not an error. Store failures of the initial
    /// search propagate, and so does an embedder whose dimension differs
    /// from the vectors already stored in the namespace.
    pub async fn retrieve_context(
        &self,
        query: &str,
        config: &RetrievalConfig,
    ) -> RecallResult<AssembledContext> {
        config.validate()?;
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery.into());
        }
        self.ensure_dimensions().await?;

        let candidates = self.candidates(query, config).await?;
        let context =
            ContextAssembler::assemble(&candidates, config.max_chunks, config.max_tokens);

        info!(
            candidates = candidates.len(),
            references = context.references.len(),
            hybrid = config.hybrid,
            "context retrieved"
        );
        Ok(context)
    }

    async fn candidates(
        &self,
        query: &str,
        config: &RetrievalConfig,
    ) -> RecallResult<Vec<ScoredCandidate>> {
        if config.hybrid {
            return self
                .multi_query()
                .hybrid_search(query, config.top_k, &config.filter, config.similarity_threshold)
                .await;
        }

        let candidates = self
            .search
            .search(query, config.top_k, &config.filter, config.similarity_threshold)
            .await?;

        if config.use_reranking {
            Ok(self
                .reranker
                .rerank_candidates(query, candidates, config.similarity_threshold)
                .await)
        } else {
            Ok(candidates)
        }
    }

    /// Chunk, embed and store a document.
    ///
    /// Chunk ids are `"{source_id}:{index}"`. A failed upsert is reported
    /// in its [`ChunkResult`] and does not stop the remaining chunks.
    pub async fn process_document(
        &self,
        text: &str,
        metadata: Metadata,
    ) -> RecallResult<ProcessResult> {
        if text.trim().is_empty() {
            return Err(RecallError::InvalidInput {
                reason: "document text is empty".to_string(),
            });
        }

        let source_id = metadata
            .get(META_SOURCE_ID)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| blake3::hash(text.as_bytes()).to_hex().to_string());

        let chunks = self.chunker.split(text);
        if chunks.is_empty() {
            warn!(source_id = %source_id, "document produced no chunks");
            return Ok(ProcessResult {
                source_id,
                chunk_count: 0,
                chunk_results: Vec::new(),
            });
        }

        self.ensure_dimensions().await?;
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        let mut chunk_results = Vec::with_capacity(chunks.len());
        for (chunk, vector) in chunks.iter().zip(&vectors) {
            let chunk_id = format!("{source_id}:{}", chunk.index);
            let mut meta = metadata.clone();
            meta.insert(META_SOURCE_ID.to_string(), Value::from(source_id.as_str()));
            meta.entry(META_SOURCE_TYPE.to_string())
                .or_insert_with(|| Value::from(DEFAULT_SOURCE_TYPE));
            meta.insert(META_CHUNK_INDEX.to_string(), Value::from(chunk.index));
            meta.insert(META_TOTAL_CHUNKS.to_string(), Value::from(chunk.total_chunks));
            meta.insert(META_CONTENT.to_string(), Value::from(chunk.text.as_str()));

            let result = match self.store.upsert(&self.namespace, &chunk_id, vector, &meta).await {
                Ok(()) => ChunkResult {
                    chunk_id,
                    index: chunk.index,
                    success: true,
                    error: None,
                },
                Err(e) => {
                    warn!(chunk_id = %chunk_id, error = %e, "chunk upsert failed");
                    ChunkResult {
                        chunk_id,
                        index: chunk.index,
                        success: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            chunk_results.push(result);
        }

        let result = ProcessResult {
            source_id,
            chunk_count: chunks.len(),
            chunk_results,
        };
        events::document_processed(&result.source_id, result.chunk_count, result.stored());
        Ok(result)
    }

    /// Fail fast when the namespace already holds vectors of a dimension
    /// other than the embedder's.
    async fn ensure_dimensions(&self) -> RecallResult<()> {
        let stats = self.store.describe_stats(&self.namespace).await?;
        match stats.dimensions {
            Some(stored) if stored != self.embedder.dimensions() => {
                warn!(
                    namespace = %self.namespace,
                    stored,
                    embedder = self.embedder.dimensions(),
                    "embedding dimension differs from stored vectors"
                );
                Err(EmbeddingError::DimensionMismatch {
                    expected: stored,
                    actual: self.embedder.dimensions(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }

    /// Delete the chunks `process_document` stored for `source_id`.
    pub async fn remove_document(&self, source_id: &str, chunk_count: usize) -> RecallResult<()> {
        for index in 0..chunk_count {
            self.store
                .delete(&self.namespace, &format!("{source_id}:{index}"))
                .await?;
        }
        debug!(source_id, chunk_count, "document removed");
        Ok(())
    }

    pub async fn store_stats(&self) -> RecallResult<StoreStats> {
        Ok(self.store.describe_stats(&self.namespace).await?)
    }
}
