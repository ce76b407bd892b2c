use std::cmp::Ordering;
use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::core::config::{MAX_RESULTS, RELEVANCE_EPSILON};
use crate::core::types::{DocId, Document, DocumentStatus};
use crate::index::store::IndexStore;
use crate::parallel::score_map::ShardedScoreMap;
use crate::query::parser::Query;

/// Scores candidates for a parsed query against a store.
///
/// Stateless apart from the shard layout of its parallel accumulator; it
/// borrows the store per call and never outlives it.
#[derive(Debug)]
pub struct Ranker {
    shard_count: usize,
}

impl Ranker {
    pub fn new(shard_count: usize) -> Self {
        Ranker { shard_count }
    }

    /// Top results: accumulate tf-idf over plus-terms for documents the
    /// predicate keeps, erase minus-term hits, order, truncate
    pub fn find_top<P>(&self, store: &IndexStore, query: &Query<'_>, predicate: P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut documents = self.find_all(store, query, predicate);
        sort_by_relevance(&mut documents);
        documents.truncate(MAX_RESULTS);
        documents
    }

    /// Same contract as `find_top`, scoring plus-terms across a worker pool
    pub fn find_top_parallel<P>(
        &self,
        store: &IndexStore,
        query: &Query<'_>,
        predicate: P,
    ) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let mut documents = self.find_all_parallel(store, query, predicate);
        sort_by_relevance(&mut documents);
        documents.truncate(MAX_RESULTS);
        documents
    }

    fn find_all<P>(&self, store: &IndexStore, query: &Query<'_>, predicate: P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for word in &query.plus {
            let Some(postings) = store.postings(word) else {
                continue;
            };
            let idf = inverse_document_frequency(store.document_count(), postings.len());
            for (&id, &tf) in postings {
                let Some(data) = store.data(id) else {
                    continue;
                };
                if predicate(id, data.status, data.rating) {
                    *relevance.entry(id).or_insert(0.0) += tf * idf;
                }
            }
        }
        erase_minus_matches(store, query, &mut relevance);
        collect_documents(store, relevance)
    }

    fn find_all_parallel<P>(
        &self,
        store: &IndexStore,
        query: &Query<'_>,
        predicate: P,
    ) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let scores = ShardedScoreMap::new(self.shard_count);
        query.plus.par_iter().for_each(|word| {
            let Some(postings) = store.postings(word) else {
                return;
            };
            let idf = inverse_document_frequency(store.document_count(), postings.len());
            for (&id, &tf) in postings {
                let Some(data) = store.data(id) else {
                    continue;
                };
                if predicate(id, data.status, data.rating) {
                    *scores.slot(id) += tf * idf;
                }
            }
        });
        let mut relevance = scores.into_ordered_map();
        erase_minus_matches(store, query, &mut relevance);
        collect_documents(store, relevance)
    }
}

/// ln(live documents / documents containing the term)
fn inverse_document_frequency(document_count: usize, document_frequency: usize) -> f64 {
    (document_count as f64 / document_frequency as f64).ln()
}

/// Minus-terms erase candidates unconditionally, after scoring
fn erase_minus_matches(store: &IndexStore, query: &Query<'_>, relevance: &mut BTreeMap<DocId, f64>) {
    for word in &query.minus {
        let Some(postings) = store.postings(word) else {
            continue;
        };
        for &id in postings.keys() {
            relevance.remove(&id);
        }
    }
}

fn collect_documents(store: &IndexStore, relevance: BTreeMap<DocId, f64>) -> Vec<Document> {
    relevance
        .into_iter()
        .filter_map(|(id, relevance)| {
            store.data(id).map(|data| Document {
                id,
                relevance,
                rating: data.rating,
            })
        })
        .collect()
}

/// Relevance descending; ties within epsilon fall back to rating, then to
/// ascending id so the full order is total
fn sort_by_relevance(documents: &mut [Document]) {
    documents.sort_by(|lhs, rhs| {
        if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
            rhs.rating
                .cmp(&lhs.rating)
                .then_with(|| lhs.id.cmp(&rhs.id))
        } else {
            rhs.relevance
                .partial_cmp(&lhs.relevance)
                .unwrap_or(Ordering::Equal)
        }
    });
}
