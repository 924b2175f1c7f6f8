use crate::types::PersonId;
use std::fmt;

/// Token class the phrase parser was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Pronoun,
    RelationTerm,
    LinePreposition,
    LineSide,
    LineWord,
    SiblingWord,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Pronoun => write!(f, "pronoun (его/её)"),
            Expected::RelationTerm => write!(f, "relation term (мать/отец/дедушка/бабушка)"),
            Expected::LinePreposition => write!(f, "'по'"),
            Expected::LineSide => write!(f, "line side (материнской/отцовской)"),
            Expected::LineWord => write!(f, "'линии'"),
            Expected::SiblingWord => write!(f, "sibling word (брат/сестра)"),
        }
    }
}

fn describe(found: &Option<String>) -> String {
    match found {
        Some(token) => format!("'{}'", token),
        None => "end of input".to_string(),
    }
}

/// Malformed kinship phrase. Positions are token indices after normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Phrase is empty")]
    EmptyInput,

    #[error("Expected {} at token {position}, found {}", Expected::Pronoun, describe(.found))]
    UnknownPronoun {
        position: usize,
        found: Option<String>,
    },

    #[error("Expected {} at token {position}, found {}", Expected::RelationTerm, describe(.found))]
    UnknownRelationTerm {
        position: usize,
        found: Option<String>,
    },

    #[error(
        "Grandparent term '{term}' requires a line clause (по материнской/отцовской линии) at token {position}, found {}",
        describe(.found)
    )]
    MissingLineClause {
        term: String,
        position: usize,
        found: Option<String>,
    },

    #[error("Malformed line clause: expected {expected} at token {position}, found {}", describe(.found))]
    MalformedLineClause {
        expected: Expected,
        position: usize,
        found: Option<String>,
    },

    #[error("Parent term '{term}' does not take a line clause (token {position})")]
    UnexpectedLineClause { term: String, position: usize },

    #[error("Expected {} at token {position}, found {}", Expected::SiblingWord, describe(.found))]
    MissingSiblingWord {
        position: usize,
        found: Option<String>,
    },
}

impl ParseError {
    /// Token class whose absence caused the failure
    pub fn expected(&self) -> Option<Expected> {
        match self {
            ParseError::EmptyInput => None,
            ParseError::UnknownPronoun { .. } => Some(Expected::Pronoun),
            ParseError::UnknownRelationTerm { .. } => Some(Expected::RelationTerm),
            ParseError::MissingLineClause { .. } => Some(Expected::LinePreposition),
            ParseError::MalformedLineClause { expected, .. } => Some(*expected),
            ParseError::UnexpectedLineClause { .. } => None,
            ParseError::MissingSiblingWord { .. } => Some(Expected::SiblingWord),
        }
    }
}

/// Interchange data that does not have the expected shape
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Schema mismatch: top level must be an object")]
    NotAnObject,

    #[error("Schema mismatch: missing sequence '{field}'")]
    MissingSequence { field: &'static str },

    #[error("Schema mismatch: '{field}' must be a list")]
    NotASequence { field: &'static str },

    #[error("Schema mismatch: invalid record {index} in '{field}': {message}")]
    InvalidRecord {
        field: &'static str,
        index: usize,
        message: String,
    },

    #[error("Schema mismatch: duplicate person id '{0}'")]
    DuplicatePersonId(PersonId),
}

/// Rejected mutation of a working family graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Person cannot be their own parent: {0}")]
    SelfLoop(PersonId),

    #[error("Person not found: {0}")]
    UnknownPerson(PersonId),
}
