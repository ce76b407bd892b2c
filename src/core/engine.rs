use std::collections::BTreeMap;
use std::sync::Arc;

use crate::analysis::stopword::StopWordSet;
use crate::analysis::tokenizer::split_into_words;
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::stats::EngineStats;
use crate::core::types::{DocId, Document, DocumentStatus};
use crate::index::store::IndexStore;
use crate::query::parser::QueryParser;
use crate::search::matcher::MatchEngine;
use crate::search::ranker::Ranker;

/// The search engine facade: owns the stop word set and the indices, and
/// wires parsing, ranking, matching and removal together.
///
/// Mutations (`add_document`, `remove_document*`) take `&mut self` and so
/// exclude every other operation; all `&self` operations may run
/// concurrently with each other, including the internally parallel ones.
#[derive(Debug)]
pub struct SearchEngine {
    config: EngineConfig,
    stop_words: StopWordSet,
    store: IndexStore,
    ranker: Ranker,
    matcher: MatchEngine,
}

impl SearchEngine {
    /// Build from any sequence of stop words
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(stop_words, EngineConfig::default())
    }

    /// Build by tokenizing a single space-separated stop-words string
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    pub fn with_config<I, S>(stop_words: I, config: EngineConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = StopWordSet::new(stop_words)?;
        let ranker = Ranker::new(config.shard_count);
        Ok(SearchEngine {
            config,
            stop_words,
            store: IndexStore::new(),
            ranker,
            matcher: MatchEngine,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Index a document under `id`. See `IndexStore::add_document` for the
    /// validation and empty-document rules.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        self.store
            .add_document(id, text, status, ratings, &self.stop_words)
    }

    /// Top documents with status Actual
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_parallel(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_status_parallel(raw_query, DocumentStatus::Actual)
    }

    /// Top documents with the given status
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    pub fn find_top_documents_with_status_parallel(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by_parallel(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Top documents kept by an arbitrary predicate over id, status and
    /// rating
    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let query = QueryParser::new(&self.stop_words).parse(raw_query)?;
        Ok(self.ranker.find_top(&self.store, &query, predicate))
    }

    pub fn find_top_documents_by_parallel<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = QueryParser::new(&self.stop_words).parse(raw_query)?;
        Ok(self.ranker.find_top_parallel(&self.store, &query, predicate))
    }

    /// Which plus-terms of `raw_query` occur in document `id`, empty if
    /// any minus-term does
    pub fn match_document<'q>(
        &self,
        raw_query: &'q str,
        id: DocId,
    ) -> Result<(Vec<&'q str>, DocumentStatus)> {
        self.matcher
            .match_document(&self.store, &self.stop_words, raw_query, id)
    }

    pub fn match_document_parallel<'q>(
        &self,
        raw_query: &'q str,
        id: DocId,
    ) -> Result<(Vec<&'q str>, DocumentStatus)> {
        self.matcher
            .match_document_parallel(&self.store, &self.stop_words, raw_query, id)
    }

    /// Term frequencies of a document; empty for unknown ids
    pub fn word_frequencies(&self, id: DocId) -> &BTreeMap<Arc<str>, f64> {
        self.store.word_frequencies(id)
    }

    /// Remove a document; unknown ids are a no-op
    pub fn remove_document(&mut self, id: DocId) {
        self.store.remove_document(id);
    }

    pub fn remove_document_parallel(&mut self, id: DocId) {
        self.store.remove_document_parallel(id);
    }

    pub fn document_count(&self) -> usize {
        self.store.document_count()
    }

    /// Id of the document at `index` in insertion order
    pub fn document_id_at(&self, index: usize) -> Result<DocId> {
        self.store.document_id_at(index)
    }

    /// Live ids in insertion order
    pub fn document_ids(&self) -> &[DocId] {
        self.store.document_ids()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            documents: self.store.document_count(),
            terms: self.store.term_count(),
        }
    }

    pub(crate) fn store(&self) -> &IndexStore {
        &self.store
    }
}
