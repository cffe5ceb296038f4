use crate::checker::dictionary::Dictionary;

/// How tokens are compared against dictionary keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// Only a token spelled exactly as the key was written in the table matches.
    #[default]
    Exact,
    /// Exact matches first, then any token whose lowercase form is a key. Fallback hits get their
    /// suggestions recased to follow the token (`Teh` -> `The`, `TEH` -> `THE`).
    Fallback,
}

pub struct Matcher<'a> {
    dictionary: &'a Dictionary,
    case: CaseMode,
}

impl<'a> Matcher<'a> {
    pub fn new(dictionary: &'a Dictionary, case: CaseMode) -> Self {
        Self { dictionary, case }
    }

    /// Corrections for `word`, empty when it is not a known misspelling.
    pub fn suggestions(&self, word: &str) -> Vec<String> {
        let Some(entry) = self.dictionary.lookup(word) else {
            return Vec::new();
        };

        if entry.spelling == word {
            return entry.corrections.clone();
        }

        match self.case {
            CaseMode::Exact => Vec::new(),
            CaseMode::Fallback => entry
                .corrections
                .iter()
                .map(|c| match_case(word, c))
                .collect(),
        }
    }

    pub fn is_misspelled(&self, word: &str) -> bool {
        !self.suggestions(word).is_empty()
    }
}

fn match_case(original: &str, correction: &str) -> String {
    let has_letters = original.chars().filter(|c| c.is_alphabetic()).count() > 1;
    if has_letters && !original.chars().any(char::is_lowercase) {
        return correction.to_uppercase();
    }

    let mut chars = original.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let mut rest = correction.chars();
            match rest.next() {
                Some(c) => c.to_uppercase().chain(rest).collect(),
                None => String::new(),
            }
        }
        _ => correction.to_string(),
    }
}
