use std::collections::BTreeSet;

use crate::analysis::stopword::StopWordSet;
use crate::analysis::tokenizer::{is_valid_term, split_into_words};
use crate::core::error::{Error, ErrorKind, Result};

/// A parsed query: deduplicated positive and negated terms, as views into
/// the raw query text
#[derive(Debug, Default, Clone)]
pub struct Query<'a> {
    pub plus: BTreeSet<&'a str>,
    pub minus: BTreeSet<&'a str>,
}

/// One classified query token
struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
    is_stop: bool,
}

/// Turns raw query text into plus/minus term sets, filtering stop words
pub struct QueryParser<'s> {
    stop_words: &'s StopWordSet,
}

impl<'s> QueryParser<'s> {
    pub fn new(stop_words: &'s StopWordSet) -> Self {
        QueryParser { stop_words }
    }

    pub fn parse<'a>(&self, text: &'a str) -> Result<Query<'a>> {
        let mut query = Query::default();
        for word in split_into_words(text) {
            let word = self.parse_word(word)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus.insert(word.data);
            } else {
                query.plus.insert(word.data);
            }
        }
        Ok(query)
    }

    fn parse_word<'a>(&self, text: &'a str) -> Result<QueryWord<'a>> {
        if text.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "query word is empty".to_string(),
            ));
        }
        let (data, is_minus) = match text.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (text, false),
        };
        if data.is_empty() || data.starts_with('-') || !is_valid_term(data) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("query word {:?} is invalid", text),
            ));
        }
        Ok(QueryWord {
            data,
            is_minus,
            is_stop: self.stop_words.contains(data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser_fixture() -> StopWordSet {
        StopWordSet::from_text("in the").unwrap()
    }

    #[test]
    fn classifies_plus_and_minus_terms() {
        let stop_words = parser_fixture();
        let query = QueryParser::new(&stop_words)
            .parse("fluffy -cat tail")
            .unwrap();
        assert_eq!(
            query.plus.iter().copied().collect::<Vec<_>>(),
            vec!["fluffy", "tail"]
        );
        assert_eq!(query.minus.iter().copied().collect::<Vec<_>>(), vec!["cat"]);
    }

    #[test]
    fn stop_words_are_discarded_on_both_sides() {
        let stop_words = parser_fixture();
        let query = QueryParser::new(&stop_words)
            .parse("cat in -the house")
            .unwrap();
        assert!(!query.plus.contains("in"));
        assert!(!query.minus.contains("the"));
        assert_eq!(query.plus.len(), 2);
        assert!(query.minus.is_empty());
    }

    #[test]
    fn duplicate_terms_collapse() {
        let stop_words = parser_fixture();
        let query = QueryParser::new(&stop_words)
            .parse("cat cat -dog -dog")
            .unwrap();
        assert_eq!(query.plus.len(), 1);
        assert_eq!(query.minus.len(), 1);
    }

    #[test]
    fn bare_minus_is_rejected() {
        let stop_words = parser_fixture();
        let err = QueryParser::new(&stop_words).parse("cat -").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidArgument));
    }

    #[test]
    fn double_minus_is_rejected() {
        let stop_words = parser_fixture();
        let err = QueryParser::new(&stop_words).parse("--cat").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidArgument));
    }

    #[test]
    fn control_characters_are_rejected() {
        let stop_words = parser_fixture();
        let err = QueryParser::new(&stop_words).parse("ca\u{3}t").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidArgument));
    }

    #[test]
    fn empty_tokens_from_extra_spaces_are_rejected() {
        let stop_words = parser_fixture();
        assert!(QueryParser::new(&stop_words).parse("cat  dog").is_err());
        assert!(QueryParser::new(&stop_words).parse("").is_err());
    }

    #[test]
    fn minus_stop_word_is_silently_dropped() {
        let stop_words = parser_fixture();
        let query = QueryParser::new(&stop_words).parse("cat -in").unwrap();
        assert!(query.minus.is_empty());
        assert_eq!(query.plus.len(), 1);
    }

    #[test]
    fn terms_are_views_into_the_query() {
        let stop_words = parser_fixture();
        let text = String::from("fluffy");
        let query = QueryParser::new(&stop_words).parse(&text).unwrap();
        let term = query.plus.iter().next().unwrap();
        assert!(std::ptr::eq(term.as_ptr(), text.as_ptr()));
    }
}
