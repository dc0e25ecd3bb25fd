//! In-memory chunk index with atomic reload.
//!
//! An [`Index`] is immutable once built. [`KnowledgeStore`] publishes a new
//! one by swapping an `Arc` under a lock, so a reader holding a snapshot
//! never sees a partially rebuilt index.

use crate::chunker::{self, ChunkingParams};
use crate::config::{KnowledgeBaseConfig, ScoringWeights};
use crate::corpus::{self, CorpusSource, TitleResolver};
use crate::rag::search;
use crate::types::{Chunk, Document, DocumentInfo, IndexStats, SearchResult};
use assist_core::AppResult;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// One generation of chunks with provenance.
#[derive(Debug, Clone)]
pub struct Index {
    generation: u64,
    loaded_at: DateTime<Utc>,
    chunks: Vec<Chunk>,
    /// Lower-cased chunk content, parallel to `chunks`
    lowered: Vec<String>,
    documents: Vec<DocumentInfo>,
    skipped: usize,
}

impl Index {
    /// An index with no chunks.
    pub fn empty(generation: u64) -> Self {
        Self {
            generation,
            loaded_at: Utc::now(),
            chunks: Vec::new(),
            lowered: Vec::new(),
            documents: Vec::new(),
            skipped: 0,
        }
    }

    /// Chunk every document, in order, tagging each chunk with the document
    /// title and a 1-based `Parte N` section label.
    pub fn build(documents: &[Document], params: ChunkingParams, generation: u64) -> Self {
        let mut index = Self::empty(generation);

        for document in documents {
            let pieces = chunker::split(&document.text, params);
            index.documents.push(DocumentInfo {
                filename: document.filename.clone(),
                title: document.title.clone(),
                chunk_count: pieces.len(),
            });

            for (ordinal, piece) in pieces.into_iter().enumerate() {
                index.lowered.push(piece.to_lowercase());
                index.chunks.push(Chunk {
                    content: piece.to_string(),
                    source: document.title.clone(),
                    section: Some(format!("Parte {}", ordinal + 1)),
                    filename: document.filename.clone(),
                    ordinal,
                });
            }
        }

        index
    }

    fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Chunks paired with their lower-cased content, in index order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&Chunk, &str)> {
        self.chunks
            .iter()
            .zip(self.lowered.iter().map(String::as_str))
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            generation: self.generation,
            documents: self.documents.len(),
            chunks: self.chunks.len(),
            skipped: self.skipped,
            loaded_at: self.loaded_at,
        }
    }
}

/// Owner of the current [`Index`] and of the corpus it is built from.
pub struct KnowledgeStore {
    source: Arc<dyn CorpusSource>,
    params: ChunkingParams,
    titles: TitleResolver,
    weights: ScoringWeights,
    current: RwLock<Arc<Index>>,
    next_generation: AtomicU64,
    reload_lock: Mutex<()>,
}

impl KnowledgeStore {
    /// Create a store holding an empty index. Call [`KnowledgeStore::reload`]
    /// to load the corpus.
    pub fn new(
        source: Arc<dyn CorpusSource>,
        params: ChunkingParams,
        titles: TitleResolver,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            source,
            params,
            titles,
            weights,
            current: RwLock::new(Arc::new(Index::empty(0))),
            next_generation: AtomicU64::new(1),
            reload_lock: Mutex::new(()),
        }
    }

    /// Create a store from configuration and perform the initial load.
    ///
    /// Invalid chunking parameters fail here. A corpus that cannot be loaded
    /// is logged and leaves the store empty.
    pub fn open(source: Arc<dyn CorpusSource>, config: &KnowledgeBaseConfig) -> AppResult<Self> {
        let params = ChunkingParams::new(config.chunk_size, config.chunk_overlap)?;
        let store = Self::new(
            source,
            params,
            TitleResolver::new(config.titles.clone()),
            config.scoring.clone(),
        );

        if let Err(e) = store.reload() {
            tracing::error!("Initial knowledge base load failed: {}", e);
        }

        Ok(store)
    }

    /// The index queries should read. Stays valid across reloads.
    pub fn snapshot(&self) -> Arc<Index> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Rebuild the index from the corpus and publish it.
    ///
    /// Unreadable documents are skipped. On error the previous index stays
    /// in place.
    pub fn reload(&self) -> AppResult<IndexStats> {
        let _reload = self.reload_lock.lock().unwrap_or_else(|e| e.into_inner());

        tracing::info!("Loading knowledge base from {}", self.source.describe());
        let loaded = corpus::load_documents(self.source.as_ref(), &self.titles)?;

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let index = Index::build(&loaded.documents, self.params, generation)
            .with_skipped(loaded.skipped.len());
        let stats = index.stats();

        {
            let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
            *current = Arc::new(index);
        }

        tracing::info!(
            "Loaded {} chunks from {} documents (generation {}, {} skipped)",
            stats.chunks,
            stats.documents,
            stats.generation,
            stats.skipped
        );

        Ok(stats)
    }

    /// Rank the current index against `query`.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        search::search(&self.snapshot(), query, &self.weights, top_k)
    }

    pub fn documents(&self) -> Vec<DocumentInfo> {
        self.snapshot().documents().to_vec()
    }

    pub fn stats(&self) -> IndexStats {
        self.snapshot().stats()
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }
}
