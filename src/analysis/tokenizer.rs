use std::collections::HashSet;

use rust_stemmers::Stemmer;

use crate::analysis::language::Language;
use crate::analysis::normalize::{normalize, split_words};
use crate::analysis::stopwords;
use crate::core::error::{Error, ErrorKind, Result};

/// Turns raw field text into index terms.
///
/// Implementations are swappable at database creation; the engine never
/// inspects anything beyond this interface.
pub trait Tokenizer: Send + Sync {
    /// Tokenizes `text`. `language`, when given, must name the language the
    /// tokenizer was configured with. `property` is the flattened schema
    /// path being tokenized; the default pipeline ignores it.
    fn tokenize(&self, text: &str, language: Option<&str>, property: Option<&str>)
        -> Result<Vec<String>>;

    fn language(&self) -> Language;
}

/// Stop-word handling for the default tokenizer.
#[derive(Debug, Clone, Default)]
pub enum StopWordsConfig {
    /// Language-default list.
    #[default]
    Defaults,
    /// No stop-word filtering at all.
    Disabled,
    /// Caller-provided replacement list.
    Custom(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    pub language: Language,
    pub stemming: bool,
    pub stop_words: StopWordsConfig,
    pub allow_duplicates: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            language: Language::English,
            stemming: true,
            stop_words: StopWordsConfig::Defaults,
            allow_duplicates: false,
        }
    }
}

/// Normalize → split → stop-word filter → stem → dedup.
pub struct DefaultTokenizer {
    language: Language,
    stemmer: Option<Stemmer>,
    stop_words: Option<HashSet<String>>,
    allow_duplicates: bool,
}

impl DefaultTokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        let language = config.language;
        let stemmer = config
            .stemming
            .then(|| Stemmer::create(language.stemmer_algorithm()));

        // Stop words go through the same normalization as input text so
        // accented entries match their stripped form.
        let stop_words = match config.stop_words {
            StopWordsConfig::Disabled => None,
            StopWordsConfig::Defaults => Some(
                stopwords::for_language(language)
                    .iter()
                    .map(|word| normalize(word, language))
                    .collect(),
            ),
            StopWordsConfig::Custom(words) => Some(
                words
                    .iter()
                    .map(|word| normalize(word, language))
                    .collect(),
            ),
        };

        DefaultTokenizer {
            language,
            stemmer,
            stop_words,
            allow_duplicates: config.allow_duplicates,
        }
    }
}

impl Tokenizer for DefaultTokenizer {
    fn tokenize(
        &self,
        text: &str,
        language: Option<&str>,
        _property: Option<&str>,
    ) -> Result<Vec<String>> {
        if let Some(code) = language {
            let requested = Language::from_code(code)?;
            if requested != self.language {
                return Err(Error::new(
                    ErrorKind::LanguageNotSupported,
                    format!(
                        "tokenizer is configured for \"{}\", got \"{}\"",
                        self.language.code(),
                        code
                    ),
                ));
            }
        }

        let normalized = normalize(text, self.language);
        let mut terms = Vec::new();
        let mut seen = HashSet::new();

        for word in split_words(&normalized) {
            if let Some(stop_words) = &self.stop_words {
                if stop_words.contains(word) {
                    continue;
                }
            }

            let term = match &self.stemmer {
                Some(stemmer) => stemmer.stem(word).into_owned(),
                None => word.to_string(),
            };

            if term.is_empty() {
                continue;
            }
            if self.allow_duplicates || seen.insert(term.clone()) {
                terms.push(term);
            }
        }

        Ok(terms)
    }

    fn language(&self) -> Language {
        self.language
    }
}
