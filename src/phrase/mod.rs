//! Compiler for fixed Russian sibling-equivalence phrases such as
//! "его мать — младшая сестра её дедушки по материнской линии".
//!
//! normalize → tokenize → parse → synthesize. Parsing either succeeds completely
//! or returns a `ParseError`; no partial graph is ever produced.

pub mod lexer;
pub mod parser;
pub mod synthesizer;

pub use lexer::{normalize, tokenize, Token};
pub use parser::{parse_sentence, Connector, Pronoun, Rank, RelationTerm, RelativeSpec, Sentence, SiblingWord, Step};
pub use synthesizer::{synthesize, SymbolTable, SynthesizedGraph, ROOT_HE, ROOT_SHE};

use crate::error::ParseError;
use crate::types::IdGenerator;
use tracing::{info, instrument};

/// Compile a phrase with a fresh id generator
pub fn parse_phrase(text: &str) -> Result<SynthesizedGraph, ParseError> {
    parse_phrase_with(text, &mut IdGenerator::default())
}

/// Compile a phrase, drawing person ids from `ids`
#[instrument(skip_all, fields(chars = text.chars().count()))]
pub fn parse_phrase_with(text: &str, ids: &mut IdGenerator) -> Result<SynthesizedGraph, ParseError> {
    let normalized = normalize(text);
    let tokens = tokenize(&normalized);
    let sentence = parse_sentence(&tokens)?;
    let graph = synthesize(sentence, ids);

    info!(
        "Compiled phrase into {} persons and {} edges",
        graph.persons.len(),
        graph.edges.len()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phrase_failure_produces_no_graph() {
        let mut ids = IdGenerator::default();
        let result = parse_phrase_with("его дедушка — старший брат её матери", &mut ids);

        assert!(matches!(result, Err(ParseError::MissingLineClause { .. })));
        assert_eq!(ids.peek(), 1);
    }

    #[test]
    fn test_parse_phrase_success() {
        let graph = parse_phrase("Её отец - брат его мамы").unwrap();
        assert_eq!(graph.persons.len(), 6);
        assert_eq!(graph.edges.len(), 6);
        assert!(graph.root_he.is_some() && graph.root_she.is_some());
    }
}
