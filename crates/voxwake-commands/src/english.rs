//! Heuristic filter against recognizer noise.
//!
//! Whisper-style engines hallucinate garbled or foreign-language text on
//! silence and non-speech audio. Dictation that is mostly not made of
//! plausible English words is discarded before it can be typed.

use regex::Regex;
use std::sync::OnceLock;

/// Characters other than word characters, whitespace, apostrophes, and
/// hyphens are stripped before word inspection.
fn strip_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s'-]").unwrap())
}

/// An English-looking word: letters, optionally joined by apostrophe or
/// hyphen runs ("don't", "voice-driven").
fn word_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z]+(['-][a-z]+)*$").unwrap())
}

/// Accept text when enough of its words look English.
///
/// Utterances of one or two words are accepted if *any* word matches, so
/// valid terse replies are not rejected. Longer text must reach the given
/// fraction of matching words.
pub fn is_mostly_english(text: &str, threshold: f32) -> bool {
    let lower = text.to_lowercase();
    let cleaned = strip_pattern().replace_all(&lower, "");
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    if words.is_empty() {
        return false;
    }

    if words.len() <= 2 {
        return words.iter().any(|w| word_pattern().is_match(w));
    }

    let english = words.iter().filter(|w| word_pattern().is_match(w)).count();
    english as f32 / words.len() as f32 >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 0.7;

    #[test]
    fn plain_english_passes() {
        assert!(is_mostly_english("please write this function", THRESHOLD));
        assert!(is_mostly_english("it's a voice-driven tool", THRESHOLD));
    }

    #[test]
    fn empty_and_symbol_only_text_is_rejected() {
        assert!(!is_mostly_english("", THRESHOLD));
        assert!(!is_mostly_english("   ", THRESHOLD));
        assert!(!is_mostly_english("!!! ???", THRESHOLD));
    }

    #[test]
    fn short_utterances_are_lenient() {
        // One plausible word is enough below three words.
        assert!(is_mostly_english("okay", THRESHOLD));
        assert!(is_mostly_english("yes 123", THRESHOLD));
        // A lone French word still looks like letters; the lenient rule
        // accepts it by design.
        assert!(is_mostly_english("bonjour", THRESHOLD));
    }

    #[test]
    fn accented_short_text_is_rejected() {
        assert!(!is_mostly_english("héllo wörld", THRESHOLD));
    }

    #[test]
    fn mostly_foreign_text_is_rejected() {
        // Three plain-letter French words all match the word pattern, so the
        // filter keys on non-ascii content and ratios, not vocabulary.
        assert!(!is_mostly_english("größe straße état café", THRESHOLD));
    }

    #[test]
    fn threshold_is_a_ratio_over_words() {
        // 3 of 4 words match: 0.75 >= 0.7.
        assert!(is_mostly_english("one two three 12345", THRESHOLD));
        // 2 of 4 words match: 0.5 < 0.7.
        assert!(!is_mostly_english("one two 999 12345", THRESHOLD));
        // Same text passes a looser threshold.
        assert!(is_mostly_english("one two 999 12345", 0.5));
    }
}
