//! Language detection for conversation prompts.
//!
//! The bot speaks exactly two locales. A pluggable classifier produces a
//! language tag from free text; a fixed keyword set overrides it for common
//! Spanish greetings/thanks so the first message lands in the right locale
//! even when it is too short for the classifier.

/// The two supported prompt locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    /// Primary/default locale.
    English,
    /// Secondary locale, tag `es`.
    Spanish,
}

impl Default for Locale {
    fn default() -> Self {
        Self::English
    }
}

/// Language tag of the secondary locale. Any other classifier output is
/// treated as the primary locale.
pub const SECONDARY_TAG: &str = "es";

/// Diagnostic words that force the secondary locale regardless of the
/// classifier's verdict.
const SPANISH_MARKERS: &[&str] = &["hola", "buenas", "buenos", "gracias", "ayuda", "ayúdame"];

/// Classifies free text into a language tag (e.g. `en`, `es`).
pub trait LanguageClassifier: Send + Sync {
    fn classify(&self, text: &str) -> String;
}

/// Naive stopword-count classifier used as the default implementation.
pub struct StopwordClassifier;

const SPANISH_STOPWORDS: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "que", "de", "en", "es", "está", "por", "para", "se",
    "no", "mi", "cuando", "pero", "como", "página",
];

impl LanguageClassifier for StopwordClassifier {
    fn classify(&self, text: &str) -> String {
        let hits = text
            .split_whitespace()
            .map(strip_punctuation)
            .filter(|w| SPANISH_STOPWORDS.contains(w))
            .count();
        if hits >= 2 {
            SECONDARY_TAG.to_string()
        } else {
            "en".to_string()
        }
    }
}

/// Pick the prompt locale for a message.
///
/// The text is lower-cased first; the marker keywords win over the
/// classifier.
pub fn detect_locale(classifier: &dyn LanguageClassifier, text: &str) -> Locale {
    let lower = text.to_lowercase();
    let has_marker = lower
        .split_whitespace()
        .map(strip_punctuation)
        .any(|w| SPANISH_MARKERS.contains(&w));
    if has_marker {
        return Locale::Spanish;
    }

    if classifier.classify(&lower) == SECONDARY_TAG {
        Locale::Spanish
    } else {
        Locale::English
    }
}

fn strip_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}
