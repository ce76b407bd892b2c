use rayon::prelude::*;

use crate::analysis::stopword::StopWordSet;
use crate::analysis::tokenizer::is_valid_term;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, DocumentStatus};
use crate::index::store::IndexStore;
use crate::query::parser::{Query, QueryParser};

/// Explains which query terms hit a stored document.
///
/// Any minus-term present in the document empties the match list; the
/// document's status is reported either way.
#[derive(Debug)]
pub struct MatchEngine;

impl MatchEngine {
    /// Sequential walk: minus-terms first, then the plus-terms present
    pub fn match_document<'q>(
        &self,
        store: &IndexStore,
        stop_words: &StopWordSet,
        raw_query: &'q str,
        id: DocId,
    ) -> Result<(Vec<&'q str>, DocumentStatus)> {
        let (query, status) = self.prepare(store, stop_words, raw_query, id)?;
        let frequencies = store.word_frequencies(id);

        for word in &query.minus {
            if frequencies.contains_key(*word) {
                return Ok((Vec::new(), status));
            }
        }
        let matched = query
            .plus
            .iter()
            .copied()
            .filter(|word| frequencies.contains_key(*word))
            .collect();
        Ok((matched, status))
    }

    /// Parallel walk: the minus scan short-circuits on the first hit, then
    /// the plus-terms are filtered across the worker pool
    pub fn match_document_parallel<'q>(
        &self,
        store: &IndexStore,
        stop_words: &StopWordSet,
        raw_query: &'q str,
        id: DocId,
    ) -> Result<(Vec<&'q str>, DocumentStatus)> {
        let (query, status) = self.prepare(store, stop_words, raw_query, id)?;
        let frequencies = store.word_frequencies(id);

        if query
            .minus
            .par_iter()
            .any(|word| frequencies.contains_key(*word))
        {
            return Ok((Vec::new(), status));
        }
        let matched = query
            .plus
            .par_iter()
            .copied()
            .filter(|word| frequencies.contains_key(*word))
            .collect();
        Ok((matched, status))
    }

    /// Shared validation: raw-query characters, then the id, then the parse
    fn prepare<'q>(
        &self,
        store: &IndexStore,
        stop_words: &StopWordSet,
        raw_query: &'q str,
        id: DocId,
    ) -> Result<(Query<'q>, DocumentStatus)> {
        if !is_valid_term(raw_query) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "query contains a control character".to_string(),
            ));
        }
        let Some(data) = store.data(id) else {
            return Err(Error::new(
                ErrorKind::OutOfRange,
                format!("unknown document id {}", id.value()),
            ));
        };
        let query = QueryParser::new(stop_words).parse(raw_query)?;
        Ok((query, data.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (IndexStore, StopWordSet) {
        let stop_words = StopWordSet::from_text("in the").unwrap();
        let mut store = IndexStore::new();
        store
            .add_document(
                DocId(2),
                "fluffy cat fluffy tail",
                DocumentStatus::Actual,
                &[7, 2, 7],
                &stop_words,
            )
            .unwrap();
        store
            .add_document(
                DocId(3),
                "well-groomed dog expressive eyes",
                DocumentStatus::Banned,
                &[5],
                &stop_words,
            )
            .unwrap();
        (store, stop_words)
    }

    #[test]
    fn reports_plus_terms_present_in_the_document() {
        let (store, stop_words) = fixture();
        let (matched, status) = MatchEngine
            .match_document(&store, &stop_words, "fluffy -dog", DocId(2))
            .unwrap();
        assert_eq!(matched, vec!["fluffy"]);
        assert_eq!(status, DocumentStatus::Actual);
    }

    #[test]
    fn minus_term_hit_empties_the_match_list() {
        let (store, stop_words) = fixture();
        let (matched, status) = MatchEngine
            .match_document(&store, &stop_words, "fluffy -cat", DocId(2))
            .unwrap();
        assert!(matched.is_empty());
        assert_eq!(status, DocumentStatus::Actual);
    }

    #[test]
    fn status_is_reported_for_any_outcome() {
        let (store, stop_words) = fixture();
        let (matched, status) = MatchEngine
            .match_document(&store, &stop_words, "dog eyes", DocId(3))
            .unwrap();
        assert_eq!(matched.len(), 2);
        assert_eq!(status, DocumentStatus::Banned);
    }

    #[test]
    fn absent_plus_terms_are_not_reported() {
        let (store, stop_words) = fixture();
        let (matched, _) = MatchEngine
            .match_document(&store, &stop_words, "fluffy parrot tail", DocId(2))
            .unwrap();
        assert_eq!(matched, vec!["fluffy", "tail"]);
    }

    #[test]
    fn unknown_id_is_out_of_range() {
        let (store, stop_words) = fixture();
        let err = MatchEngine
            .match_document(&store, &stop_words, "fluffy", DocId(99))
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::OutOfRange));
    }

    #[test]
    fn control_character_in_query_is_invalid() {
        let (store, stop_words) = fixture();
        let err = MatchEngine
            .match_document(&store, &stop_words, "flu\u{4}ffy", DocId(2))
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidArgument));
    }

    #[test]
    fn character_check_precedes_the_id_check() {
        let (store, stop_words) = fixture();
        let err = MatchEngine
            .match_document(&store, &stop_words, "flu\u{4}ffy", DocId(99))
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidArgument));
    }

    #[test]
    fn parallel_variant_matches_sequential() {
        let (store, stop_words) = fixture();
        for raw_query in ["fluffy -dog", "fluffy -cat", "fluffy tail cat", "parrot"] {
            let sequential = MatchEngine
                .match_document(&store, &stop_words, raw_query, DocId(2))
                .unwrap();
            let mut parallel = MatchEngine
                .match_document_parallel(&store, &stop_words, raw_query, DocId(2))
                .unwrap();
            parallel.0.sort_unstable();
            let mut expected = sequential.clone();
            expected.0.sort_unstable();
            assert_eq!(parallel, expected, "query {:?}", raw_query);
        }
    }
}
