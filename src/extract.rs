//! Location extraction — finds a place name in free text.

use std::collections::HashSet;

use async_trait::async_trait;
use regex::Regex;

/// Entity extraction seam. Absence of a match is a normal outcome, not an
/// error, so there is no error path.
#[async_trait]
pub trait LocationExtractor: Send + Sync {
    /// Return the first place name found in `text`, in document order.
    async fn extract(&self, text: &str) -> Option<String>;
}

/// Capitalized words that start sentences or otherwise look like names but
/// aren't places. Span edges matching these are trimmed before a span is
/// accepted.
const STOPWORDS: &[&str] = &[
    "I", "I'm", "I'll", "I've", "I'd", "Me", "My", "Mine", "We", "Our", "Us",
    "You", "Your", "He", "She", "It", "They", "Them", "Their",
    "A", "An", "The", "This", "That", "These", "Those", "There", "Here",
    "Hello", "Hi", "Hey", "Thanks", "Thank", "Please", "Yes", "No", "Ok", "Okay",
    "Can", "Could", "Would", "Should", "Will", "Shall", "May", "Might", "Must",
    "Do", "Does", "Did", "Is", "Are", "Was", "Were", "Am", "Be", "Been",
    "What", "Where", "When", "Who", "Whom", "Which", "Why", "How",
    "Let", "Let's", "Go", "Going", "Take", "Show", "Tell", "Give", "Find",
    "Book", "Plan", "Visit", "Want", "Need", "Help", "Get", "Make", "See",
    "Next", "Last", "Maybe", "Also", "And", "But", "Or", "So", "Not",
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    "January", "February", "March", "April", "June", "July", "August",
    "September", "October", "November", "December",
];

/// Regex-based extractor: capitalized word spans, stopword-trimmed.
///
/// Approximates place-name recognition with a capitalization heuristic.
/// A statistical NER service can be swapped in behind [`LocationExtractor`]
/// for better recall.
pub struct HeuristicExtractor {
    span: Regex,
    stopwords: HashSet<&'static str>,
}

impl HeuristicExtractor {
    pub fn new() -> Self {
        // One or more capitalized words, possibly multi-word ("New York").
        let span = Regex::new(r"[A-Z][a-z'\-]+(?:\s+[A-Z][a-z'\-]+)*")
            .expect("span pattern is valid");
        Self {
            span,
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Trim stopwords off both edges of a span; the remainder is the
    /// candidate place name.
    fn trim_span<'a>(&self, span: &'a str) -> Option<Vec<&'a str>> {
        let words: Vec<&str> = span.split_whitespace().collect();
        let start = words.iter().position(|w| !self.stopwords.contains(w))?;
        let end = words.iter().rposition(|w| !self.stopwords.contains(w))?;
        // A stopword in the middle splits the span; keep the leading run.
        let run: Vec<&str> = words[start..=end]
            .iter()
            .take_while(|w| !self.stopwords.contains(*w))
            .copied()
            .collect();
        if run.is_empty() { None } else { Some(run) }
    }
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationExtractor for HeuristicExtractor {
    async fn extract(&self, text: &str) -> Option<String> {
        for m in self.span.find_iter(text) {
            if let Some(words) = self.trim_span(m.as_str()) {
                return Some(words.join(" "));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<String> {
        let extractor = HeuristicExtractor::new();
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(extractor.extract(text))
    }

    #[test]
    fn finds_single_word_place() {
        assert_eq!(extract("I want to visit Paris"), Some("Paris".to_string()));
    }

    #[test]
    fn finds_multi_word_place() {
        assert_eq!(
            extract("take me to New York this summer"),
            Some("New York".to_string())
        );
    }

    #[test]
    fn first_match_in_document_order() {
        assert_eq!(
            extract("flying from Rome and then to Paris"),
            Some("Rome".to_string())
        );
    }

    #[test]
    fn sentence_initial_verb_is_not_a_place() {
        assert_eq!(extract("Take me to Tokyo"), Some("Tokyo".to_string()));
        assert_eq!(extract("Show me around Cairo"), Some("Cairo".to_string()));
    }

    #[test]
    fn no_place_returns_none() {
        assert_eq!(extract("somewhere warm would be nice"), None);
        assert_eq!(extract("Hello there"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn stopword_only_spans_are_rejected() {
        assert_eq!(extract("Can I go next week"), None);
        assert_eq!(extract("Thanks"), None);
    }

    #[test]
    fn result_is_never_empty_string() {
        for text in ["Paris", "I like It", "What Where When", "visit Agra now"] {
            if let Some(place) = extract(text) {
                assert!(!place.is_empty(), "empty result for {text:?}");
            }
        }
    }
}
