use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::analysis::stopword::StopWordSet;
use crate::analysis::tokenizer::{is_valid_term, split_into_words};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, DocumentData, DocumentStatus};

/// Forward and inverted indices plus per-document metadata.
///
/// Every term string is owned once by an append-only `Arc<str>` pool; the
/// index keys are clones of pooled entries, so a term key stays valid and
/// byte-stable no matter how many documents come and go. Pooled strings are
/// never removed; the term domain is bounded by the insert stream.
///
/// Mutations take `&mut self`, reads take `&self`. That is the whole
/// concurrency contract: readers may run freely in parallel, and a writer
/// excludes everything else at compile time.
#[derive(Debug)]
pub struct IndexStore {
    /// Append-only pool of every term ever indexed
    terms: HashSet<Arc<str>>,
    /// term -> (doc id -> tf); postings ordered by id
    inverted: HashMap<Arc<str>, BTreeMap<DocId, f64>>,
    /// doc id -> (term -> tf); ordered by term, present for every live doc
    forward: HashMap<DocId, BTreeMap<Arc<str>, f64>>,
    documents: BTreeMap<DocId, DocumentData>,
    /// Live ids in insertion order
    document_ids: Vec<DocId>,
    /// Shared sentinel for frequency lookups on unknown ids
    empty_frequencies: BTreeMap<Arc<str>, f64>,
}

impl IndexStore {
    pub fn new() -> Self {
        IndexStore {
            terms: HashSet::new(),
            inverted: HashMap::new(),
            forward: HashMap::new(),
            documents: BTreeMap::new(),
            document_ids: Vec::new(),
            empty_frequencies: BTreeMap::new(),
        }
    }

    /// Index a document. Fails on a negative or duplicate id and on any
    /// token with control characters, leaving the store untouched.
    ///
    /// A document whose tokens are all stop words (or whose text is empty)
    /// is stored with an empty term set: it counts toward `document_count`
    /// and answers an empty frequency map.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
        stop_words: &StopWordSet,
    ) -> Result<()> {
        if id.value() < 0 || self.documents.contains_key(&id) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("invalid document id {}", id.value()),
            ));
        }
        // validate every token before the first index write
        let words = split_into_words_no_stop(text, stop_words)?;

        let inv_word_count = 1.0 / words.len() as f64;
        let frequencies = self.forward.entry(id).or_default();
        for word in &words {
            let term = intern(&mut self.terms, word);
            *self
                .inverted
                .entry(Arc::clone(&term))
                .or_default()
                .entry(id)
                .or_insert(0.0) += inv_word_count;
            *frequencies.entry(term).or_insert(0.0) += inv_word_count;
        }
        self.documents.insert(
            id,
            DocumentData {
                rating: average_rating(ratings),
                status,
            },
        );
        self.document_ids.push(id);
        debug!(id = id.value(), tokens = words.len(), "document indexed");
        Ok(())
    }

    /// Term frequencies of a document, ordered by term. Unknown ids answer
    /// a shared empty map rather than an error.
    pub fn word_frequencies(&self, id: DocId) -> &BTreeMap<Arc<str>, f64> {
        self.forward.get(&id).unwrap_or(&self.empty_frequencies)
    }

    /// Posting map of a term, ordered by id
    pub fn postings(&self, term: &str) -> Option<&BTreeMap<DocId, f64>> {
        self.inverted.get(term)
    }

    pub fn data(&self, id: DocId) -> Option<&DocumentData> {
        self.documents.get(&id)
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn term_count(&self) -> usize {
        self.inverted.len()
    }

    /// Live ids in insertion order
    pub fn document_ids(&self) -> &[DocId] {
        &self.document_ids
    }

    pub fn document_id_at(&self, index: usize) -> Result<DocId> {
        self.document_ids.get(index).copied().ok_or_else(|| {
            Error::new(
                ErrorKind::OutOfRange,
                format!("document index {} out of range", index),
            )
        })
    }

    /// Drop a document from every structure. Unknown ids are a no-op.
    pub fn remove_document(&mut self, id: DocId) {
        let Some(frequencies) = self.forward.remove(&id) else {
            return;
        };
        for term in frequencies.keys() {
            if let Some(postings) = self.inverted.get_mut(term) {
                postings.remove(&id);
                if postings.is_empty() {
                    self.inverted.remove(term);
                }
            }
        }
        self.finish_removal(id);
    }

    /// Parallel removal: the posting erasures are partitioned over the
    /// inverted map so distinct workers touch distinct terms, then a
    /// sequential post-pass prunes the posting lists that emptied.
    pub fn remove_document_parallel(&mut self, id: DocId) {
        let Some(frequencies) = self.forward.remove(&id) else {
            return;
        };
        self.inverted.par_iter_mut().for_each(|(term, postings)| {
            if frequencies.contains_key(term) {
                postings.remove(&id);
            }
        });
        for term in frequencies.keys() {
            if self.inverted.get(term).is_some_and(|postings| postings.is_empty()) {
                self.inverted.remove(term);
            }
        }
        self.finish_removal(id);
    }

    fn finish_removal(&mut self, id: DocId) {
        self.documents.remove(&id);
        self.document_ids.retain(|&live| live != id);
        debug!(id = id.value(), "document removed");
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new()
    }
}

fn intern(pool: &mut HashSet<Arc<str>>, word: &str) -> Arc<str> {
    match pool.get(word) {
        Some(term) => Arc::clone(term),
        None => {
            let term: Arc<str> = Arc::from(word);
            pool.insert(Arc::clone(&term));
            term
        }
    }
}

/// Tokenize, validate, and drop stop words and the empty tokens produced
/// by consecutive spaces
fn split_into_words_no_stop<'a>(
    text: &'a str,
    stop_words: &StopWordSet,
) -> Result<Vec<&'a str>> {
    let mut words = Vec::new();
    for word in split_into_words(text) {
        if !is_valid_term(word) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("word {:?} contains a control character", word),
            ));
        }
        if word.is_empty() || stop_words.contains(word) {
            continue;
        }
        words.push(word);
    }
    Ok(words)
}

/// Floor of the mean rating, 0 for an empty vector
fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&rating| rating as i64).sum();
    sum.div_euclid(ratings.len() as i64) as i32
}

#[cfg(test)]
impl IndexStore {
    /// Cross-checks every structural invariant of the two indices
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.documents.len(), self.document_ids.len());
        assert_eq!(self.documents.len(), self.forward.len());
        for id in &self.document_ids {
            assert!(self.documents.contains_key(id));
        }
        for (term, postings) in &self.inverted {
            assert!(!postings.is_empty(), "empty posting list for {:?}", term);
            for (id, tf) in postings {
                let forward_tf = self
                    .forward
                    .get(id)
                    .and_then(|frequencies| frequencies.get(term));
                assert_eq!(forward_tf, Some(tf));
            }
        }
        for (id, frequencies) in &self.forward {
            for (term, tf) in frequencies {
                let inverted_tf = self
                    .inverted
                    .get(term)
                    .and_then(|postings| postings.get(id));
                assert_eq!(inverted_tf, Some(tf));
            }
        }
    }
}
