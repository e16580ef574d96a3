use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::language::Language;

/// Lowercases and strips diacritics.
///
/// Stripping decomposes to NFD and drops combining marks. Russian keeps its
/// marks: й/ё decompose to и/е plus a combining mark, so dropping marks would
/// rewrite distinct letters.
pub fn normalize(text: &str, language: Language) -> String {
    let lowered = text.to_lowercase();
    if language == Language::Russian {
        return lowered;
    }
    lowered.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Splits on UAX#29 word boundaries, dropping punctuation and whitespace.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.unicode_words()
}
