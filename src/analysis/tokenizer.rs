/// Splits text on single ASCII spaces into views over the input.
///
/// Allocates nothing per token. Consecutive spaces yield empty tokens;
/// indexing drops them and query parsing rejects them, each at its own
/// boundary.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ')
}

/// A term must not contain control characters
pub fn is_valid_term(word: &str) -> bool {
    !word.bytes().any(|b| b < 0x20)
}
