use crate::error::SchemaError;
use crate::types::{ParentEdge, Person};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

const PEOPLE: &str = "people";
const RELATIONS: &str = "relations";
/// Older exports named the relation list "edges"
const RELATIONS_ALIAS: &str = "edges";

/// Import/export record: persons plus parent -> child relations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyDocument {
    pub people: Vec<Person>,
    #[serde(alias = "edges")]
    pub relations: Vec<ParentEdge>,
}

impl FamilyDocument {
    pub fn new(people: Vec<Person>, relations: Vec<ParentEdge>) -> Self {
        Self { people, relations }
    }

    pub fn from_json_str(content: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(&value)
    }

    /// Validate the document shape before decoding any record
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let object = value.as_object().ok_or(SchemaError::NotAnObject)?;

        let people_values = sequence(object, PEOPLE, &[PEOPLE])?;
        let relation_values = sequence(object, RELATIONS, &[RELATIONS, RELATIONS_ALIAS])?;

        let people: Vec<Person> = decode_records(PEOPLE, people_values)?;
        let relations: Vec<ParentEdge> = decode_records(RELATIONS, relation_values)?;

        let mut seen = HashSet::with_capacity(people.len());
        for person in &people {
            if !seen.insert(&person.id) {
                return Err(SchemaError::DuplicatePersonId(person.id.clone()));
            }
        }

        debug!(
            "Decoded family document with {} people and {} relations",
            people.len(),
            relations.len()
        );
        Ok(Self { people, relations })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize family document")
    }

    /// Load and validate a document from disk
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read family file {:?}", path))?;

        let document = Self::from_json_str(&content)
            .with_context(|| format!("Failed to load family file {:?}", path))?;

        info!(
            "Loaded {} people and {} relations from {:?}",
            document.people.len(),
            document.relations.len(),
            path
        );
        Ok(document)
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_json_pretty()?;
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write family file {:?}", path))?;

        info!("Family document written to {:?}", path);
        Ok(())
    }
}

/// First present key among `keys`, required to be a list
fn sequence<'v>(
    object: &'v Map<String, Value>,
    field: &'static str,
    keys: &[&str],
) -> Result<&'v Vec<Value>, SchemaError> {
    let value = keys
        .iter()
        .find_map(|key| object.get(*key))
        .ok_or(SchemaError::MissingSequence { field })?;

    value.as_array().ok_or(SchemaError::NotASequence { field })
}

fn decode_records<T: DeserializeOwned>(
    field: &'static str,
    values: &[Value],
) -> Result<Vec<T>, SchemaError> {
    values
        .iter()
        .enumerate()
        .map(|(index, record)| {
            T::deserialize(record).map_err(|e| SchemaError::InvalidRecord {
                field,
                index,
                message: e.to_string(),
            })
        })
        .collect()
}
