use std::collections::BTreeSet;

use crate::analysis::tokenizer::{is_valid_term, split_into_words};
use crate::core::error::{Error, ErrorKind, Result};

/// Immutable exact-match stop word set, fixed at construction
#[derive(Debug, Clone)]
pub struct StopWordSet {
    words: BTreeSet<String>,
}

impl StopWordSet {
    /// Build from any sequence of words. Empty strings are dropped; a word
    /// with control characters fails construction.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_term(word) {
                return Err(Error::new(
                    ErrorKind::InvalidArgument,
                    format!("stop word {:?} contains a control character", word),
                ));
            }
            set.insert(word.to_string());
        }
        Ok(StopWordSet { words: set })
    }

    /// Build by tokenizing a single space-separated string
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
