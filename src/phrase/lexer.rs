use crate::phrase::parser::{Pronoun, Rank, RelationTerm, SiblingWord};
use crate::types::Line;
use once_cell::sync::Lazy;
use regex::Regex;

static DASHES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\-\x{2010}-\x{2015}\x{2212}\x{FE58}\x{FE63}\x{FF0D}]").expect("dash regex must compile")
});
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s]+").expect("punctuation regex must compile"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex must compile"));

// Whole-word forms
const MOTHER: &[&str] = &["мать", "матери", "матерью", "мама", "мамы", "маме", "маму", "мамой"];
const FATHER: &[&str] = &["отец", "отца", "отцу", "отцом", "папа", "папы", "папе", "папу", "папой"];

// Stems matched as word prefixes
const GRANDFATHER: &[&str] = &["дед"];
const GRANDMOTHER: &[&str] = &["бабушк", "бабк", "бабул"];
const MATERNAL: &[&str] = &["материнск", "мамин"];
const PATERNAL: &[&str] = &["отцовск", "папин"];
const LINE_WORD: &[&str] = &["лини"];
const YOUNGER: &[&str] = &["младш"];
const OLDER: &[&str] = &["старш"];
const SISTER: &[&str] = &["сестр"];
const BROTHER: &[&str] = &["брат"];

const FILLERS: &[&str] = &["это", "является", "есть", "равно", "равна", "равен", "тоже", "как"];

fn has_stem(word: &str, stems: &[&str]) -> bool {
    stems.iter().any(|stem| word.starts_with(stem))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Index of the token in the normalized phrase
    pub position: usize,
}

/// Case-fold, unify ё/е, turn dashes into spaces, drop punctuation and collapse
/// whitespace.
pub fn normalize(text: &str) -> String {
    let folded = text.to_lowercase().replace('ё', "е");
    let undashed = DASHES.replace_all(&folded, " ");
    let stripped = PUNCTUATION.replace_all(&undashed, " ");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

pub fn tokenize(normalized: &str) -> Vec<Token> {
    normalized
        .split_whitespace()
        .enumerate()
        .map(|(position, text)| Token {
            text: text.to_string(),
            position,
        })
        .collect()
}

pub fn pronoun(word: &str) -> Option<Pronoun> {
    match word {
        "его" => Some(Pronoun::His),
        "ее" | "нее" => Some(Pronoun::Her),
        _ => None,
    }
}

pub fn relation_term(word: &str) -> Option<RelationTerm> {
    if MOTHER.contains(&word) {
        Some(RelationTerm::Mother)
    } else if FATHER.contains(&word) {
        Some(RelationTerm::Father)
    } else if has_stem(word, GRANDFATHER) {
        Some(RelationTerm::Grandfather)
    } else if has_stem(word, GRANDMOTHER) {
        Some(RelationTerm::Grandmother)
    } else {
        None
    }
}

pub fn is_line_preposition(word: &str) -> bool {
    word == "по"
}

pub fn line_side(word: &str) -> Option<Line> {
    if has_stem(word, MATERNAL) {
        Some(Line::Maternal)
    } else if has_stem(word, PATERNAL) {
        Some(Line::Paternal)
    } else {
        None
    }
}

pub fn is_line_word(word: &str) -> bool {
    has_stem(word, LINE_WORD)
}

pub fn is_filler(word: &str) -> bool {
    FILLERS.contains(&word)
}

pub fn rank(word: &str) -> Option<Rank> {
    if has_stem(word, YOUNGER) {
        Some(Rank::Younger)
    } else if has_stem(word, OLDER) {
        Some(Rank::Older)
    } else {
        None
    }
}

pub fn sibling_word(word: &str) -> Option<SiblingWord> {
    if has_stem(word, SISTER) {
        Some(SiblingWord::Sister)
    } else if has_stem(word, BROTHER) {
        Some(SiblingWord::Brother)
    } else {
        None
    }
}
