use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind, Result};

/// Languages the tokenizer understands. The set is closed: stop-word lists
/// and a Snowball stemmer exist for each member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Danish,
    Dutch,
    English,
    Finnish,
    French,
    German,
    Italian,
    Norwegian,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
}

pub const SUPPORTED_LANGUAGES: [Language; 12] = [
    Language::Danish,
    Language::Dutch,
    Language::English,
    Language::Finnish,
    Language::French,
    Language::German,
    Language::Italian,
    Language::Norwegian,
    Language::Portuguese,
    Language::Russian,
    Language::Spanish,
    Language::Swedish,
];

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Danish => "danish",
            Language::Dutch => "dutch",
            Language::English => "english",
            Language::Finnish => "finnish",
            Language::French => "french",
            Language::German => "german",
            Language::Italian => "italian",
            Language::Norwegian => "norwegian",
            Language::Portuguese => "portuguese",
            Language::Russian => "russian",
            Language::Spanish => "spanish",
            Language::Swedish => "swedish",
        }
    }

    /// Resolves a language name, failing with `LANGUAGE_NOT_SUPPORTED` for
    /// anything outside the closed set.
    pub fn from_code(code: &str) -> Result<Language> {
        let lowered = code.to_lowercase();
        SUPPORTED_LANGUAGES
            .iter()
            .find(|language| language.code() == lowered)
            .copied()
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::LanguageNotSupported,
                    format!("language \"{}\" is not supported", code),
                )
            })
    }

    pub fn stemmer_algorithm(&self) -> Algorithm {
        match self {
            Language::Danish => Algorithm::Danish,
            Language::Dutch => Algorithm::Dutch,
            Language::English => Algorithm::English,
            Language::Finnish => Algorithm::Finnish,
            Language::French => Algorithm::French,
            Language::German => Algorithm::German,
            Language::Italian => Algorithm::Italian,
            Language::Norwegian => Algorithm::Norwegian,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Russian => Algorithm::Russian,
            Language::Spanish => Algorithm::Spanish,
            Language::Swedish => Algorithm::Swedish,
        }
    }
}
