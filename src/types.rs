use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Core types for the kinship engine

/// Process-unique person identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PersonId(String);

/// Accepts either a string or an unsigned integer; both map to the string form
impl<'de> Deserialize<'de> for PersonId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => Self(id),
            RawId::Number(id) => Self(id.to_string()),
        })
    }
}

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PersonId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
            Sex::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            "unknown" | "" => Ok(Sex::Unknown),
            other => Err(format!("Unknown sex: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>, sex: Sex) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sex,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Directed parent -> child relation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentEdge {
    pub parent_id: PersonId,
    pub child_id: PersonId,
}

impl ParentEdge {
    pub fn new(parent_id: impl Into<PersonId>, child_id: impl Into<PersonId>) -> Self {
        Self {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.parent_id == self.child_id
    }

    pub fn touches(&self, id: &PersonId) -> bool {
        &self.parent_id == id || &self.child_id == id
    }
}

/// Line of descent, derived from the sex of the nearest parent on a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Line {
    Maternal,
    Paternal,
}

impl Line {
    pub fn from_parent_sex(sex: Sex) -> Option<Self> {
        match sex {
            Sex::Female => Some(Line::Maternal),
            Sex::Male => Some(Line::Paternal),
            Sex::Unknown => None,
        }
    }
}

/// Monotonic person id generator.
///
/// Owned by whoever creates persons (a `FamilyTree` or one synthesis call) so that
/// no id state is shared implicitly between callers.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    start: u64,
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("p", 1)
    }
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            start,
            next: start,
        }
    }

    pub fn next_id(&mut self) -> PersonId {
        let id = PersonId(format!("{}{}", self.prefix, self.next));
        self.next = self.next.saturating_add(1);
        id
    }

    /// Value the next generated id will carry
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = self.start;
    }

    /// Advance past an externally supplied id so it is never generated again
    pub fn observe(&mut self, id: &PersonId) {
        if let Some(counter) = id
            .as_str()
            .strip_prefix(self.prefix.as_str())
            .and_then(|suffix| suffix.parse::<u64>().ok())
        {
            // A suffix of u64::MAX leaves no room above it
            if let Some(following) = counter.checked_add(1) {
                self.next = self.next.max(following);
            }
        }
    }
}

/// Structured kinship relation between A and B
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Relation {
    NotFound,
    SamePerson,
    DirectLine {
        generations: usize,
        a_is_ancestor: bool,
        line: Option<Line>,
    },
    Siblings {
        common_ancestor: PersonId,
    },
    AuntUncle {
        degree: usize,
        a_is_senior: bool,
        common_ancestor: PersonId,
    },
    Cousins {
        degree: usize,
        removal: usize,
        common_ancestor: PersonId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// What A is to B
    pub role_of_a: String,
    /// What B is to A
    pub role_of_b: String,
    pub relation: Relation,
    pub evidence: Vec<String>,
}

impl ClassificationResult {
    pub fn is_found(&self) -> bool {
        !matches!(self.relation, Relation::NotFound)
    }

    pub fn common_ancestor(&self) -> Option<&PersonId> {
        match &self.relation {
            Relation::Siblings { common_ancestor }
            | Relation::AuntUncle { common_ancestor, .. }
            | Relation::Cousins { common_ancestor, .. } => Some(common_ancestor),
            _ => None,
        }
    }
}
