use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::english;

/// Punctuation tolerated at the end of a spoken stop command.
const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

/// The five reserved control phrases. All are stored lowercased; matching
/// is case-folded throughout.
///
/// Phrase choice is configuration's responsibility: the wake phrase must
/// stay distinguishable from the others, since wake detection is substring
/// containment and does not respect word boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSet {
    pub wake: String,
    pub stop: String,
    pub clear: String,
    pub send: String,
    pub quit: String,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::new("bob", "stop", "zip", "go code it", "exit")
    }
}

impl CommandSet {
    pub fn new(
        wake: impl Into<String>,
        stop: impl Into<String>,
        clear: impl Into<String>,
        send: impl Into<String>,
        quit: impl Into<String>,
    ) -> Self {
        let fold = |s: String| s.trim().to_lowercase();
        Self {
            wake: fold(wake.into()),
            stop: fold(stop.into()),
            clear: fold(clear.into()),
            send: fold(send.into()),
            quit: fold(quit.into()),
        }
    }

    /// (phrase, effect) pairs for the startup banner.
    pub fn describe(&self) -> Vec<(&str, &'static str)> {
        vec![
            (self.wake.as_str(), "start dictating"),
            (self.stop.as_str(), "stop dictating (while dictating)"),
            (
                self.clear.as_str(),
                "select all and delete in the focused field (while idle)",
            ),
            (self.send.as_str(), "press Enter (while dictating)"),
            (self.quit.as_str(), "shut the program down"),
        ]
    }

    /// Whether any configured phrase occurs in the lowercased text. Such
    /// text is treated as carrying a command: it bypasses the English
    /// filter so a tersely or quietly spoken command is never discarded as
    /// noise.
    pub fn any_phrase_in(&self, lower: &str) -> bool {
        [&self.wake, &self.stop, &self.clear, &self.send, &self.quit]
            .iter()
            .any(|phrase| lower.contains(phrase.as_str()))
    }

    fn quit_matches(&self, tokens: &[String]) -> bool {
        tokens.len() <= 3 && tokens.iter().any(|t| *t == self.quit)
    }

    fn clear_matches(&self, tokens: &[String]) -> bool {
        tokens.len() <= 3 && tokens.iter().any(|t| *t == self.clear)
    }

    /// All words of the (possibly multi-word) send phrase present in any
    /// order, with room for a couple of stray words.
    fn send_matches(&self, tokens: &[String]) -> bool {
        tokens.len() <= 5
            && self
                .send
                .split_whitespace()
                .all(|word| tokens.iter().any(|t| t == word))
    }

    fn stop_exact(&self, tokens: &[String]) -> bool {
        tokens.len() <= 3 && tokens.iter().any(|t| *t == self.stop)
    }

    /// Trailing-stop rule: the last raw token, with trailing punctuation
    /// removed, equals the stop phrase. Returns the text preceding it,
    /// which still gets typed.
    fn split_trailing_stop(&self, raw: &str) -> Option<String> {
        let words: Vec<&str> = raw.split_whitespace().collect();
        let last = words.last()?;
        if last.trim_end_matches(&TRAILING_PUNCTUATION[..]).to_lowercase() != self.stop {
            return None;
        }
        let remainder = words[..words.len() - 1].join(" ");
        Some(remainder.trim_end_matches('.').trim().to_string())
    }
}

/// Session-scoped matching state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the wake phrase.
    Idle,
    /// Actively relaying speech as text.
    Dictating,
}

/// What one recognized window means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Shut the process down. Valid in either state.
    Quit,
    /// Clear the focused field. Idle only.
    Clear,
    /// Begin dictating. Idle only.
    Wake,
    /// Press Enter and return to idle. Dictating only.
    Send,
    /// Stop dictating with nothing typed. Dictating only.
    Stop,
    /// Type the carried text, then stop dictating. Dictating only.
    TypeThenStop(String),
    /// Free dictation to be typed verbatim.
    Dictation(String),
    /// Nothing actionable in this window.
    Empty,
}

struct NormalizedText {
    /// Trimmed text in its original case; what dictation ultimately types.
    raw: String,
    /// Case-folded variant used for substring checks.
    lower: String,
    /// Case-folded tokens with everything but word characters stripped;
    /// shared by every token-based matcher.
    tokens: Vec<String>,
}

fn token_strip_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

fn normalize(text: &str) -> NormalizedText {
    let raw = text.trim().to_string();
    let lower = raw.to_lowercase();
    let tokens = token_strip_pattern()
        .replace_all(&lower, "")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    NormalizedText { raw, lower, tokens }
}

/// Remove every case-insensitive occurrence of `phrase` from `text`,
/// preserving the case of what remains.
fn strip_phrase_ci(text: &str, phrase: &str) -> String {
    if phrase.is_empty() {
        return text.to_string();
    }
    if !text.is_ascii() {
        // Byte offsets of a case-folded copy are only guaranteed to line up
        // for ASCII; fall back to exact-case removal otherwise.
        return text.replace(phrase, "");
    }
    let lower = text.to_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut start = 0;
    while let Some(pos) = lower[start..].find(phrase) {
        out.push_str(&text[start..start + pos]);
        start += pos + phrase.len();
    }
    out.push_str(&text[start..]);
    out
}

/// Decides, per window of recognized text, between the reserved commands
/// and free dictation.
pub struct Classifier {
    commands: CommandSet,
    english_threshold: f32,
}

impl Classifier {
    pub fn new(commands: CommandSet, english_threshold: f32) -> Self {
        Self {
            commands,
            english_threshold,
        }
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    pub fn classify(&self, text: &str, state: SessionState) -> Classification {
        let normalized = normalize(text);
        if normalized.raw.is_empty() {
            return Classification::Empty;
        }

        // Quit outranks everything, in either state, even mid-dictation.
        if self.commands.quit_matches(&normalized.tokens) {
            return Classification::Quit;
        }

        match state {
            SessionState::Idle => self.classify_idle(&normalized),
            SessionState::Dictating => self.classify_dictating(&normalized),
        }
    }

    fn classify_idle(&self, normalized: &NormalizedText) -> Classification {
        if self.commands.clear_matches(&normalized.tokens) {
            return Classification::Clear;
        }
        // Pure substring containment: "bobsled" wakes a session configured
        // with "bob". Known heuristic false positive, kept as-is.
        if normalized.lower.contains(&self.commands.wake) {
            return Classification::Wake;
        }
        self.dictation_or_empty(normalized)
    }

    fn classify_dictating(&self, normalized: &NormalizedText) -> Classification {
        // The wake phrase can leak into a dictation window; drop it before
        // anything is matched or typed.
        let stripped = strip_phrase_ci(&normalized.raw, &self.commands.wake);
        let normalized = normalize(&stripped);
        if normalized.raw.is_empty() {
            return Classification::Empty;
        }

        if self.commands.send_matches(&normalized.tokens) {
            return Classification::Send;
        }
        if self.commands.stop_exact(&normalized.tokens) {
            return Classification::Stop;
        }
        if let Some(remainder) = self.commands.split_trailing_stop(&normalized.raw) {
            if remainder.is_empty() {
                return Classification::Stop;
            }
            return Classification::TypeThenStop(remainder);
        }
        self.dictation_or_empty(&normalized)
    }

    fn dictation_or_empty(&self, normalized: &NormalizedText) -> Classification {
        if self.commands.any_phrase_in(&normalized.lower)
            || english::is_mostly_english(&normalized.lower, self.english_threshold)
        {
            Classification::Dictation(normalized.raw.clone())
        } else {
            Classification::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(CommandSet::default(), 0.7)
    }

    fn idle(text: &str) -> Classification {
        classifier().classify(text, SessionState::Idle)
    }

    fn dictating(text: &str) -> Classification {
        classifier().classify(text, SessionState::Dictating)
    }

    #[test]
    fn empty_and_whitespace_windows_classify_empty() {
        assert_eq!(idle(""), Classification::Empty);
        assert_eq!(idle("   "), Classification::Empty);
        assert_eq!(dictating("\t"), Classification::Empty);
    }

    #[test]
    fn quit_works_in_both_states() {
        assert_eq!(idle("exit"), Classification::Quit);
        assert_eq!(dictating("exit"), Classification::Quit);
        assert_eq!(dictating("Exit."), Classification::Quit);
    }

    #[test]
    fn quit_allows_up_to_three_tokens() {
        assert_eq!(idle("okay please exit"), Classification::Quit);
        // Four tokens exceed the bound; this is dictation, not quit.
        assert_eq!(
            idle("please exit right now"),
            Classification::Dictation("please exit right now".to_string())
        );
    }

    #[test]
    fn quit_requires_token_not_substring() {
        // "exits" is not the token "exit".
        assert_eq!(
            idle("it exits cleanly"),
            Classification::Dictation("it exits cleanly".to_string())
        );
    }

    #[test]
    fn wake_is_substring_containment() {
        assert_eq!(idle("bob"), Classification::Wake);
        assert_eq!(idle("hey Bob, you there"), Classification::Wake);
        // Documented false positive: containment has no word boundary.
        assert_eq!(idle("bobsled"), Classification::Wake);
    }

    #[test]
    fn clear_beats_wake_when_both_present() {
        // Clear is checked before wake in idle.
        assert_eq!(idle("zip bob"), Classification::Clear);
    }

    #[test]
    fn clear_is_idle_only() {
        assert_eq!(idle("zip"), Classification::Clear);
        assert_eq!(idle("zip it please"), Classification::Clear);
        // While dictating, the same word is ordinary content (it carries a
        // command phrase, so it bypasses the English filter).
        assert_eq!(
            dictating("zip"),
            Classification::Dictation("zip".to_string())
        );
    }

    #[test]
    fn send_matches_all_words_any_order() {
        assert_eq!(dictating("go code it"), Classification::Send);
        assert_eq!(dictating("code it go now"), Classification::Send);
        assert_eq!(dictating("Go, code it!"), Classification::Send);
    }

    #[test]
    fn send_caps_at_five_tokens() {
        assert_eq!(dictating("go code it please now"), Classification::Send);
        assert_eq!(
            dictating("go code it please now then"),
            Classification::Dictation("go code it please now then".to_string())
        );
    }

    #[test]
    fn send_requires_every_word() {
        assert_eq!(
            dictating("go code"),
            Classification::Dictation("go code".to_string())
        );
    }

    #[test]
    fn send_is_dictating_only() {
        // In idle the send phrase is neither clear nor wake; it falls
        // through to dictation.
        assert_eq!(
            idle("go code it"),
            Classification::Dictation("go code it".to_string())
        );
    }

    #[test]
    fn short_stop_phrases_stop_without_typing() {
        assert_eq!(dictating("stop"), Classification::Stop);
        assert_eq!(dictating("Stop."), Classification::Stop);
        assert_eq!(dictating("please stop now"), Classification::Stop);
    }

    #[test]
    fn trailing_stop_types_the_preceding_text() {
        assert_eq!(
            dictating("please write this stop"),
            Classification::TypeThenStop("please write this".to_string())
        );
        assert_eq!(
            dictating("write it down, stop."),
            Classification::TypeThenStop("write it down,".to_string())
        );
    }

    #[test]
    fn non_final_stop_in_long_text_is_dictation() {
        // Exact stop needs <=3 tokens, trailing stop needs "stop" last;
        // neither holds here.
        assert_eq!(
            dictating("stop writing more code here"),
            Classification::Dictation("stop writing more code here".to_string())
        );
    }

    #[test]
    fn stop_is_dictating_only() {
        assert_eq!(
            idle("stop"),
            Classification::Dictation("stop".to_string())
        );
    }

    #[test]
    fn wake_phrase_is_stripped_from_dictation() {
        assert_eq!(
            dictating("bob write a test"),
            Classification::Dictation("write a test".to_string())
        );
        // A window holding nothing but the leaked wake phrase is dropped.
        assert_eq!(dictating("bob"), Classification::Empty);
        assert_eq!(dictating("Bob."), Classification::Empty);
    }

    #[test]
    fn wake_stripping_applies_before_stop_detection() {
        assert_eq!(dictating("bob stop"), Classification::Stop);
    }

    #[test]
    fn foreign_noise_is_dropped_unless_it_carries_a_command() {
        assert_eq!(dictating("état café größe"), Classification::Empty);
        // A command phrase substring exempts the text from the filter.
        assert_eq!(
            dictating("état café größe stop okay fine"),
            Classification::Dictation("état café größe stop okay fine".to_string())
        );
    }

    #[test]
    fn dictation_preserves_original_case() {
        assert_eq!(
            dictating("Write THIS verbatim"),
            Classification::Dictation("Write THIS verbatim".to_string())
        );
    }

    #[test]
    fn quit_outranks_send_and_stop() {
        assert_eq!(dictating("exit stop"), Classification::Quit);
    }

    #[test]
    fn custom_phrases_are_case_folded() {
        let classifier = Classifier::new(CommandSet::new("Jarvis", "Halt", "Wipe", "Ship It", "Quit"), 0.7);
        assert_eq!(
            classifier.classify("jarvis", SessionState::Idle),
            Classification::Wake
        );
        assert_eq!(
            classifier.classify("it ship", SessionState::Dictating),
            Classification::Send
        );
        assert_eq!(
            classifier.classify("HALT", SessionState::Dictating),
            Classification::Stop
        );
    }

    #[test]
    fn describe_covers_all_five_commands() {
        let set = CommandSet::default();
        let described = set.describe();
        assert_eq!(described.len(), 5);
        assert!(described.iter().any(|(phrase, _)| *phrase == "bob"));
        assert!(described.iter().any(|(phrase, _)| *phrase == "go code it"));
    }
}
