use crate::analysis::language::Language;

/// Default stop-word list for a language.
///
/// Entries are matched after normalization; the tokenizer normalizes this
/// list with the same rules it applies to input text.
pub fn for_language(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => ENGLISH,
        Language::Danish => DANISH,
        Language::Dutch => DUTCH,
        Language::Finnish => FINNISH,
        Language::French => FRENCH,
        Language::German => GERMAN,
        Language::Italian => ITALIAN,
        Language::Norwegian => NORWEGIAN,
        Language::Portuguese => PORTUGUESE,
        Language::Russian => RUSSIAN,
        Language::Spanish => SPANISH,
        Language::Swedish => SWEDISH,
    }
}

static ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over",
    "own", "s", "same", "she", "should", "so", "some", "such", "t", "than", "that", "the",
    "their", "theirs", "them", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "you", "your", "yours",
];

static DANISH: &[&str] = &[
    "af", "alle", "at", "da", "de", "den", "der", "det", "en", "er", "et", "for", "fra", "han",
    "har", "hun", "i", "ikke", "jeg", "med", "men", "og", "om", "på", "som", "til", "var", "vi",
];

static DUTCH: &[&str] = &[
    "aan", "als", "bij", "dat", "de", "die", "dit", "een", "en", "er", "hij", "het", "iets",
    "ik", "in", "is", "je", "maar", "met", "niet", "of", "om", "op", "te", "van", "voor", "was",
    "zijn",
];

static FINNISH: &[&str] = &[
    "ei", "että", "hän", "ja", "jos", "kun", "me", "minä", "mitä", "mutta", "ne", "niin", "nyt",
    "ole", "on", "oli", "se", "sen", "siellä", "sinä", "tai", "tämä", "vain",
];

static FRENCH: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "et", "il", "ils",
    "je", "la", "le", "les", "leur", "lui", "mais", "ne", "nous", "on", "ou", "où", "par", "pas",
    "pour", "qui", "que", "se", "ses", "son", "sur", "un", "une", "vous", "été", "être",
];

static GERMAN: &[&str] = &[
    "aber", "als", "auch", "auf", "aus", "bei", "das", "dass", "dem", "den", "der", "des", "die",
    "ein", "eine", "er", "es", "für", "hat", "ich", "im", "in", "ist", "mit", "nicht", "noch",
    "sich", "sie", "sind", "und", "von", "war", "wie", "zu",
];

static ITALIAN: &[&str] = &[
    "a", "anche", "che", "come", "con", "da", "del", "della", "di", "e", "è", "gli", "ha", "i",
    "il", "in", "la", "le", "lo", "ma", "nel", "non", "per", "più", "se", "si", "sono", "su",
    "un", "una", "uno",
];

static NORWEGIAN: &[&str] = &[
    "av", "at", "de", "den", "det", "eller", "en", "er", "et", "for", "fra", "han", "har", "hun",
    "i", "ikke", "jeg", "med", "men", "og", "om", "på", "som", "til", "var", "vi",
];

static PORTUGUESE: &[&str] = &[
    "a", "ao", "as", "com", "da", "das", "de", "do", "dos", "e", "é", "em", "era", "foi", "mas",
    "na", "não", "no", "nos", "o", "os", "ou", "para", "por", "que", "se", "sem", "seu", "sua",
    "um", "uma",
];

static RUSSIAN: &[&str] = &[
    "а", "без", "бы", "был", "была", "было", "в", "вот", "все", "вы", "да", "для", "его", "ее",
    "если", "есть", "же", "за", "и", "из", "к", "как", "когда", "мы", "на", "не", "но", "о",
    "он", "она", "они", "от", "по", "с", "так", "то", "только", "ты", "у", "что", "это", "я",
];

static SPANISH: &[&str] = &[
    "a", "al", "como", "con", "de", "del", "el", "ella", "en", "era", "es", "esta", "este",
    "fue", "ha", "la", "las", "lo", "los", "más", "no", "o", "para", "pero", "por", "que", "se",
    "sin", "son", "su", "un", "una", "y", "yo",
];

static SWEDISH: &[&str] = &[
    "att", "av", "de", "den", "det", "du", "efter", "eller", "en", "ett", "för", "från", "han",
    "har", "hon", "i", "inte", "jag", "man", "med", "men", "när", "och", "om", "på", "som",
    "till", "var", "vi", "är",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::language::SUPPORTED_LANGUAGES;

    #[test]
    fn test_every_language_ships_a_list() {
        for language in SUPPORTED_LANGUAGES {
            assert!(!for_language(language).is_empty(), "{:?}", language);
        }
    }

    #[test]
    fn test_english_defaults_cover_common_articles() {
        let words = for_language(Language::English);
        for expected in ["the", "a", "and", "of"] {
            assert!(words.contains(&expected));
        }
    }
}
