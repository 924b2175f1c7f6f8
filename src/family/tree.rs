use crate::error::GraphError;
use crate::family::interchange::FamilyDocument;
use crate::kinship::Classifier;
use crate::lineage::{build_indices, FamilyGraph, Indices};
use crate::phrase::SynthesizedGraph;
use crate::types::{ClassificationResult, IdGenerator, ParentEdge, Person, PersonId, Sex};
use tracing::{debug, info, warn};

/// Working family graph: the persons and edges a user edits, plus the id
/// generator new persons draw from.
#[derive(Debug, Clone, Default)]
pub struct FamilyTree {
    persons: Vec<Person>,
    edges: Vec<ParentEdge>,
    ids: IdGenerator,
}

impl FamilyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generator(ids: IdGenerator) -> Self {
        Self {
            persons: Vec::new(),
            edges: Vec::new(),
            ids,
        }
    }

    /// Build a tree from an interchange document. Relations that point at missing
    /// persons or at their own child are dropped.
    pub fn from_document(document: FamilyDocument, ids: IdGenerator) -> Self {
        let mut tree = Self::with_generator(ids);

        for person in document.people {
            tree.ids.observe(&person.id);
            tree.persons.push(person);
        }

        for edge in document.relations {
            match tree.add_edge(&edge.parent_id, &edge.child_id) {
                Ok(true) => {}
                Ok(false) => debug!("Duplicate relation {} -> {} skipped", edge.parent_id, edge.child_id),
                Err(e) => warn!("Relation {} -> {} dropped: {}", edge.parent_id, edge.child_id, e),
            }
        }

        info!(
            "Family tree loaded with {} persons and {} relations",
            tree.persons.len(),
            tree.edges.len()
        );
        tree
    }

    pub fn to_document(&self) -> FamilyDocument {
        FamilyDocument::new(self.persons.clone(), self.edges.clone())
    }

    /// Adopt the graph compiled from a phrase, replacing the current contents
    pub fn replace_with(&mut self, graph: SynthesizedGraph) {
        for person in &graph.persons {
            self.ids.observe(&person.id);
        }
        self.persons = graph.persons;
        self.edges = graph.edges;
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn edges(&self) -> &[ParentEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn generator_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.persons.iter().find(|person| &person.id == id)
    }

    fn person_mut(&mut self, id: &PersonId) -> Result<&mut Person, GraphError> {
        self.persons
            .iter_mut()
            .find(|person| &person.id == id)
            .ok_or_else(|| GraphError::UnknownPerson(id.clone()))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Person> {
        self.persons.iter().find(|person| person.name == name)
    }

    /// Look a person up by id first, then by exact name
    pub fn resolve(&self, key: &str) -> Option<PersonId> {
        self.person(&PersonId::from(key))
            .or_else(|| self.find_by_name(key))
            .map(|person| person.id.clone())
    }

    pub fn add_person(&mut self, name: impl Into<String>, sex: Sex, note: Option<String>) -> PersonId {
        let id = self.ids.next_id();
        let mut person = Person::new(id.clone(), name, sex);
        person.note = note;
        debug!("Added person {} '{}'", id, person.name);
        self.persons.push(person);
        id
    }

    pub fn rename(&mut self, id: &PersonId, name: impl Into<String>) -> Result<(), GraphError> {
        self.person_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_note(&mut self, id: &PersonId, note: Option<String>) -> Result<(), GraphError> {
        self.person_mut(id)?.note = note;
        Ok(())
    }

    /// Record `parent` as a parent of `child`. Returns `Ok(false)` when the edge
    /// already exists.
    pub fn add_edge(&mut self, parent: &PersonId, child: &PersonId) -> Result<bool, GraphError> {
        if parent == child {
            return Err(GraphError::SelfLoop(parent.clone()));
        }
        for id in [parent, child] {
            if self.person(id).is_none() {
                return Err(GraphError::UnknownPerson(id.clone()));
            }
        }

        let edge = ParentEdge::new(parent.clone(), child.clone());
        if self.edges.contains(&edge) {
            return Ok(false);
        }
        self.edges.push(edge);
        Ok(true)
    }

    pub fn remove_edge(&mut self, parent: &PersonId, child: &PersonId) -> bool {
        let before = self.edges.len();
        self.edges
            .retain(|edge| !(&edge.parent_id == parent && &edge.child_id == child));
        self.edges.len() != before
    }

    /// Remove a person together with every edge referencing them
    pub fn remove_person(&mut self, id: &PersonId) -> Option<Person> {
        let index = self.persons.iter().position(|person| &person.id == id)?;
        let person = self.persons.remove(index);

        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(id));
        debug!("Removed person {} and {} edges", id, before - self.edges.len());

        Some(person)
    }

    pub fn indices(&self) -> Indices {
        build_indices(&self.persons, &self.edges)
    }

    pub fn graph(&self) -> FamilyGraph {
        FamilyGraph::build(&self.persons, &self.edges)
    }

    pub fn parents_of(&self, id: &PersonId) -> Vec<PersonId> {
        self.indices().parents(id).to_vec()
    }

    pub fn children_of(&self, id: &PersonId) -> Vec<PersonId> {
        self.indices().children(id).to_vec()
    }

    pub fn classify(&self, a: &PersonId, b: &PersonId) -> ClassificationResult {
        self.classify_with(&Classifier::default(), a, b)
    }

    pub fn classify_with(&self, classifier: &Classifier, a: &PersonId, b: &PersonId) -> ClassificationResult {
        classifier.classify(a, b, &self.persons, &self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrase::parse_phrase;
    use crate::types::Relation;

    fn create_test_tree() -> (FamilyTree, PersonId, PersonId, PersonId) {
        let mut tree = FamilyTree::new();
        let mother = tree.add_person("Мама", Sex::Female, None);
        let father = tree.add_person("Папа", Sex::Male, None);
        let child = tree.add_person("Сын", Sex::Male, Some("младший".to_string()));
        tree.add_edge(&mother, &child).unwrap();
        tree.add_edge(&father, &child).unwrap();
        (tree, mother, father, child)
    }

    #[test]
    fn test_add_person_assigns_sequential_ids() {
        let (tree, mother, father, child) = create_test_tree();

        assert_eq!(mother, PersonId::from("p1"));
        assert_eq!(father, PersonId::from("p2"));
        assert_eq!(child, PersonId::from("p3"));
        assert_eq!(tree.person(&child).unwrap().note.as_deref(), Some("младший"));
    }

    #[test]
    fn test_add_edge_rules() {
        let (mut tree, mother, _, child) = create_test_tree();

        assert_eq!(tree.add_edge(&mother, &child), Ok(false));
        assert_eq!(tree.add_edge(&child, &child), Err(GraphError::SelfLoop(child.clone())));
        assert_eq!(
            tree.add_edge(&PersonId::from("ghost"), &child),
            Err(GraphError::UnknownPerson(PersonId::from("ghost")))
        );
        assert_eq!(tree.edges().len(), 2);
    }

    #[test]
    fn test_remove_person_cascades() {
        let (mut tree, mother, father, child) = create_test_tree();

        let removed = tree.remove_person(&mother).unwrap();
        assert_eq!(removed.name, "Мама");
        assert_eq!(tree.edges(), &[ParentEdge::new(father.clone(), child.clone())]);
        assert_eq!(tree.parents_of(&child), vec![father]);
        assert!(tree.remove_person(&mother).is_none());
    }

    #[test]
    fn test_remove_edge() {
        let (mut tree, mother, _, child) = create_test_tree();

        assert!(tree.remove_edge(&mother, &child));
        assert!(!tree.remove_edge(&mother, &child));
        assert_eq!(tree.children_of(&mother), Vec::<PersonId>::new());
    }

    #[test]
    fn test_resolve_and_rename() {
        let (mut tree, mother, _, _) = create_test_tree();

        assert_eq!(tree.resolve("p1"), Some(mother.clone()));
        assert_eq!(tree.resolve("Мама"), Some(mother.clone()));
        assert_eq!(tree.resolve("Бабушка"), None);

        tree.rename(&mother, "Мать").unwrap();
        tree.set_note(&mother, Some("заметка".to_string())).unwrap();
        assert_eq!(tree.resolve("Мать"), Some(mother));
        assert!(tree.rename(&PersonId::from("x"), "X").is_err());
    }

    #[test]
    fn test_classify_through_tree() {
        let (tree, mother, _, child) = create_test_tree();
        let result = tree.classify(&mother, &child);

        assert_eq!(result.role_of_a, "мать");
        assert_eq!(result.role_of_b, "сын");
    }

    #[test]
    fn test_document_round_trip_drops_bad_relations() {
        let document = FamilyDocument::new(
            vec![Person::new("p7", "A", Sex::Male), Person::new("p9", "B", Sex::Female)],
            vec![
                ParentEdge::new("p7", "p9"),
                ParentEdge::new("p7", "p9"),
                ParentEdge::new("p9", "p9"),
                ParentEdge::new("p7", "missing"),
            ],
        );
        let mut tree = FamilyTree::from_document(document, IdGenerator::default());

        assert_eq!(tree.edges().len(), 1);
        assert_eq!(tree.add_person("C", Sex::Unknown, None), PersonId::from("p10"));
        assert_eq!(tree.to_document().people.len(), 3);
    }

    #[test]
    fn test_import_with_largest_numeric_suffix() {
        let document = FamilyDocument::from_json_str(
            r#"{"people":[{"id":"p18446744073709551615","name":"X"}],"relations":[]}"#,
        )
        .unwrap();
        let mut tree = FamilyTree::from_document(document, IdGenerator::default());

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.add_person("Y", Sex::Unknown, None), PersonId::from("p1"));
    }

    #[test]
    fn test_replace_with_synthesized_graph() {
        let mut tree = FamilyTree::new();
        let graph = parse_phrase("его мать сестра её отца").unwrap();
        let (he, she) = (graph.root_he.clone().unwrap(), graph.root_she.clone().unwrap());

        tree.replace_with(graph);
        let result = tree.classify(&he, &she);
        assert!(matches!(result.relation, Relation::Cousins { degree: 1, removal: 0, .. }));

        let next = tree.add_person("Новый", Sex::Unknown, None);
        assert!(tree.person(&next).is_some());
        assert_eq!(tree.persons().iter().filter(|p| p.id == next).count(), 1);
    }
}
