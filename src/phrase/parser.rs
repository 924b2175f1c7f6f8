use crate::error::{Expected, ParseError};
use crate::phrase::lexer::{self, Token};
use crate::types::{Line, Sex};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pronoun {
    His,
    Her,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationTerm {
    Mother,
    Father,
    Grandfather,
    Grandmother,
}

impl RelationTerm {
    pub fn is_grandparent(&self) -> bool {
        matches!(self, RelationTerm::Grandfather | RelationTerm::Grandmother)
    }
}

/// One hop from a person to one of their parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Mother,
    Father,
}

impl Step {
    pub fn sex(&self) -> Sex {
        match self {
            Step::Mother => Sex::Female,
            Step::Father => Sex::Male,
        }
    }

    pub fn line(&self) -> Line {
        match self {
            Step::Mother => Line::Maternal,
            Step::Father => Line::Paternal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Younger,
    Older,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingWord {
    Sister,
    Brother,
}

/// "его мать", "её дедушки по материнской линии"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelativeSpec {
    pub pronoun: Pronoun,
    pub term: RelationTerm,
    pub line: Option<Line>,
}

impl RelativeSpec {
    /// Parent hops from the pronoun's person to the described relative
    pub fn steps(&self) -> Vec<Step> {
        let first = match self.line {
            Some(Line::Maternal) => Step::Mother,
            Some(Line::Paternal) => Step::Father,
            None => Step::Mother,
        };
        match self.term {
            RelationTerm::Mother => vec![Step::Mother],
            RelationTerm::Father => vec![Step::Father],
            RelationTerm::Grandmother => vec![first, Step::Mother],
            RelationTerm::Grandfather => vec![first, Step::Father],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connector {
    pub rank: Option<Rank>,
    /// Rank and sibling word as written, e.g. "младшая сестра"
    pub wording: String,
    pub sibling: SiblingWord,
}

/// Two relatives declared to be siblings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    pub left: RelativeSpec,
    pub connector: Connector,
    pub right: RelativeSpec,
}

/// Parse `RelativeSpec Connector RelativeSpec`. Trailing tokens are ignored.
pub fn parse_sentence(tokens: &[Token]) -> Result<Sentence, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut parser = Parser { tokens, cursor: 0 };
    let left = parser.relative_spec()?;
    let connector = parser.connector()?;
    let right = parser.relative_spec()?;

    if parser.cursor < tokens.len() {
        debug!("Ignoring {} trailing tokens", tokens.len() - parser.cursor);
    }

    Ok(Sentence {
        left,
        connector,
        right,
    })
}

struct Parser<'t> {
    tokens: &'t [Token],
    cursor: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.cursor).map(|token| token.text.as_str())
    }

    fn found(&self) -> Option<String> {
        self.peek().map(str::to_string)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .map(|token| token.position)
            .unwrap_or(self.tokens.len())
    }

    /// Consume the current token when `matcher` accepts it
    fn accept<T>(&mut self, matcher: impl Fn(&str) -> Option<T>) -> Option<T> {
        let value = self.peek().and_then(matcher)?;
        self.cursor += 1;
        Some(value)
    }

    fn relative_spec(&mut self) -> Result<RelativeSpec, ParseError> {
        let pronoun = self
            .accept(lexer::pronoun)
            .ok_or_else(|| ParseError::UnknownPronoun {
                position: self.position(),
                found: self.found(),
            })?;

        let term_token = self.peek().unwrap_or_default();
        let term = self
            .accept(lexer::relation_term)
            .ok_or_else(|| ParseError::UnknownRelationTerm {
                position: self.position(),
                found: self.found(),
            })?;

        let line = if term.is_grandparent() {
            Some(self.line_clause(term_token)?)
        } else {
            if self.peek().is_some_and(lexer::is_line_preposition) {
                return Err(ParseError::UnexpectedLineClause {
                    term: term_token.to_string(),
                    position: self.position(),
                });
            }
            None
        };

        Ok(RelativeSpec {
            pronoun,
            term,
            line,
        })
    }

    fn line_clause(&mut self, term: &str) -> Result<Line, ParseError> {
        if self.accept(|word| lexer::is_line_preposition(word).then_some(())).is_none() {
            return Err(ParseError::MissingLineClause {
                term: term.to_string(),
                position: self.position(),
                found: self.found(),
            });
        }

        let line = self
            .accept(lexer::line_side)
            .ok_or_else(|| ParseError::MalformedLineClause {
                expected: Expected::LineSide,
                position: self.position(),
                found: self.found(),
            })?;

        self.accept(|word| lexer::is_line_word(word).then_some(()))
            .ok_or_else(|| ParseError::MalformedLineClause {
                expected: Expected::LineWord,
                position: self.position(),
                found: self.found(),
            })?;

        Ok(line)
    }

    fn connector(&mut self) -> Result<Connector, ParseError> {
        while self.accept(|word| lexer::is_filler(word).then_some(())).is_some() {}

        let mut wording = Vec::new();

        let rank_token = self.peek();
        let rank = self.accept(lexer::rank);
        if rank.is_some() {
            wording.extend(rank_token);
        }

        let sibling_token = self.peek();
        let sibling = self
            .accept(lexer::sibling_word)
            .ok_or_else(|| ParseError::MissingSiblingWord {
                position: self.position(),
                found: self.found(),
            })?;
        wording.extend(sibling_token);

        Ok(Connector {
            rank,
            wording: wording.join(" "),
            sibling,
        })
    }
}
