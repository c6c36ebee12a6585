//! Word tokenization for plot synopses.
//!
//! Text is lowercased and split into maximal runs of word characters
//! (alphanumeric or `_`). Runs shorter than two characters and English stop
//! words are dropped.

use crate::stop_words::is_stop_word;

/// Minimum token length in characters
pub const MIN_TOKEN_CHARS: usize = 2;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split `text` into lowercase tokens, optionally filtering stop words
pub fn tokenize(text: &str, remove_stop_words: bool) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !is_word_char(c))
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|token| !(remove_stop_words && is_stop_word(token)))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits_on_punctuation() {
        let tokens = tokenize("A paraplegic Marine, dispatched to PANDORA!", true);
        assert_eq!(tokens, vec!["paraplegic", "marine", "dispatched", "pandora"]);
    }

    #[test]
    fn test_short_tokens_dropped() {
        // "x" and "t" are single characters
        let tokens = tokenize("x don't 22nd", false);
        assert_eq!(tokens, vec!["don", "22nd"]);
    }

    #[test]
    fn test_underscore_and_unicode_are_word_chars() {
        let tokens = tokenize("snake_case café", false);
        assert_eq!(tokens, vec!["snake_case", "café"]);
    }

    #[test]
    fn test_stop_words_optional() {
        assert!(tokenize("the and of", true).is_empty());
        assert_eq!(tokenize("the and of", false), vec!["the", "and", "of"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("", true).is_empty());
        assert!(tokenize("  ,.;  ", true).is_empty());
    }
}
