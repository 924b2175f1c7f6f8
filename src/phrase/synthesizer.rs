use crate::kinship::lexicon;
use crate::phrase::parser::{Pronoun, RelativeSpec, Sentence, Step};
use crate::types::{IdGenerator, ParentEdge, Person, PersonId, Sex};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

pub const ROOT_HE: &str = "Он";
pub const ROOT_SHE: &str = "Она";
const SHARED_FATHER: &str = "Общий отец";
const SHARED_MOTHER: &str = "Общая мать";

/// Label → person id map scoped to a single synthesis call
#[derive(Debug, Default)]
pub struct SymbolTable {
    by_label: HashMap<String, PersonId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<&PersonId> {
        self.by_label.get(label)
    }

    pub fn insert(&mut self, label: impl Into<String>, id: PersonId) {
        self.by_label.insert(label.into(), id);
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Persons and edges compiled from one phrase
#[derive(Debug, Clone, Serialize)]
pub struct SynthesizedGraph {
    pub persons: Vec<Person>,
    pub edges: Vec<ParentEdge>,
    pub root_he: Option<PersonId>,
    pub root_she: Option<PersonId>,
    pub sentence: Sentence,
}

impl SynthesizedGraph {
    pub fn person_by_name(&self, name: &str) -> Option<&Person> {
        self.persons.iter().find(|person| person.name == name)
    }
}

fn root_of(pronoun: Pronoun) -> (&'static str, Sex) {
    match pronoun {
        Pronoun::His => (ROOT_HE, Sex::Male),
        Pronoun::Her => (ROOT_SHE, Sex::Female),
    }
}

fn possessive(pronoun: Pronoun) -> &'static str {
    match pronoun {
        Pronoun::His => "Его",
        Pronoun::Her => "Её",
    }
}

/// Label and sex of the ancestor reached by `steps`, derived from the steps alone
fn ancestor_label(pronoun: Pronoun, steps: &[Step]) -> (String, Sex) {
    let owner = possessive(pronoun);
    match steps {
        [step] => {
            let noun = match step {
                Step::Mother => "мать",
                Step::Father => "отец",
            };
            (format!("{} {}", owner, noun), step.sex())
        }
        [first, .., last] => {
            let noun = match last {
                Step::Mother => "бабушка",
                Step::Father => "дедушка",
            };
            (
                format!("{} {} {}", owner, noun, lexicon::line_note(first.line())),
                last.sex(),
            )
        }
        [] => {
            let (label, sex) = root_of(pronoun);
            (label.to_string(), sex)
        }
    }
}

struct Builder<'g> {
    ids: &'g mut IdGenerator,
    symbols: SymbolTable,
    persons: Vec<Person>,
    edges: Vec<ParentEdge>,
    linked: HashSet<(PersonId, PersonId)>,
}

impl<'g> Builder<'g> {
    fn fresh(&mut self, label: &str, sex: Sex) -> PersonId {
        let id = self.ids.next_id();
        debug!("Synthesized person {} '{}'", id, label);
        self.persons.push(Person::new(id.clone(), label, sex));
        id
    }

    /// Person with this label, created on first use
    fn node(&mut self, label: &str, sex: Sex) -> PersonId {
        if let Some(id) = self.symbols.get(label) {
            return id.clone();
        }
        let id = self.fresh(label, sex);
        self.symbols.insert(label, id.clone());
        id
    }

    fn link(&mut self, parent: &PersonId, child: &PersonId) {
        if parent == child {
            warn!("Refusing to make {} their own parent", parent);
            return;
        }
        if self.linked.insert((parent.clone(), child.clone())) {
            self.edges.push(ParentEdge::new(parent.clone(), child.clone()));
        }
    }

    /// Build the ancestor chain for one relative, returning its terminal node
    fn chain(&mut self, spec: &RelativeSpec) -> PersonId {
        let (root_label, root_sex) = root_of(spec.pronoun);
        let mut current = self.node(root_label, root_sex);

        let steps = spec.steps();
        for depth in 1..=steps.len() {
            let (label, sex) = ancestor_label(spec.pronoun, &steps[..depth]);
            let ancestor = self.node(&label, sex);
            self.link(&ancestor, &current);
            current = ancestor;
        }
        current
    }
}

/// Compile a parsed sentence into persons and edges. The two described relatives
/// become siblings through two fresh shared parents.
pub fn synthesize(sentence: Sentence, ids: &mut IdGenerator) -> SynthesizedGraph {
    let mut builder = Builder {
        ids,
        symbols: SymbolTable::new(),
        persons: Vec::new(),
        edges: Vec::new(),
        linked: HashSet::new(),
    };

    let left = builder.chain(&sentence.left);
    let right = builder.chain(&sentence.right);
    if left == right {
        warn!("Phrase declares a person to be their own sibling");
    }

    for (label, sex) in [(SHARED_FATHER, Sex::Male), (SHARED_MOTHER, Sex::Female)] {
        let shared = builder.fresh(label, sex);
        builder.link(&shared, &left);
        builder.link(&shared, &right);
    }

    if sentence.connector.rank.is_some() {
        if let Some(person) = builder.persons.iter_mut().find(|person| person.id == left) {
            person.note = Some(sentence.connector.wording.clone());
        }
    }

    let root_he = builder.symbols.get(ROOT_HE).cloned();
    let root_she = builder.symbols.get(ROOT_SHE).cloned();

    debug!(
        "Synthesized {} persons and {} edges from {} labels",
        builder.persons.len(),
        builder.edges.len(),
        builder.symbols.len()
    );

    SynthesizedGraph {
        persons: builder.persons,
        edges: builder.edges,
        root_he,
        root_she,
        sentence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrase::lexer::{normalize, tokenize};
    use crate::phrase::parser::parse_sentence;

    fn compile(text: &str) -> SynthesizedGraph {
        let sentence = parse_sentence(&tokenize(&normalize(text))).unwrap();
        synthesize(sentence, &mut IdGenerator::default())
    }

    fn has_edge(graph: &SynthesizedGraph, parent: &str, child: &str) -> bool {
        let parent = graph.person_by_name(parent).unwrap();
        let child = graph.person_by_name(child).unwrap();
        graph
            .edges
            .iter()
            .any(|edge| edge.parent_id == parent.id && edge.child_id == child.id)
    }

    #[test]
    fn test_chains_and_shared_parents() {
        let graph = compile("его мать младшая сестра её дедушки по материнской линии");

        let names: Vec<&str> = graph.persons.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Он",
                "Его мать",
                "Она",
                "Её мать",
                "Её дедушка по материнской линии",
                "Общий отец",
                "Общая мать",
            ]
        );

        assert!(has_edge(&graph, "Его мать", "Он"));
        assert!(has_edge(&graph, "Её мать", "Она"));
        assert!(has_edge(&graph, "Её дедушка по материнской линии", "Её мать"));
        for shared in ["Общий отец", "Общая мать"] {
            assert!(has_edge(&graph, shared, "Его мать"));
            assert!(has_edge(&graph, shared, "Её дедушка по материнской линии"));
        }
        assert_eq!(graph.edges.len(), 7);

        let grandfather = graph.person_by_name("Её дедушка по материнской линии").unwrap();
        assert_eq!(grandfather.sex, Sex::Male);

        let left = graph.person_by_name("Его мать").unwrap();
        assert_eq!(left.note.as_deref(), Some("младшая сестра"));

        assert_eq!(graph.root_he.as_ref(), Some(&PersonId::from("p1")));
        assert_eq!(graph.root_she.as_ref(), Some(&PersonId::from("p3")));
    }

    #[test]
    fn test_nodes_reused_by_label() {
        let graph = compile("его бабушка по материнской линии сестра его матери");

        // "Его мать" is built once and shared by both chains
        let mothers = graph.persons.iter().filter(|p| p.name == "Его мать").count();
        assert_eq!(mothers, 1);
        assert!(graph.root_she.is_none());
        assert!(graph.root_he.is_some());
        assert!(graph.person_by_name("Его мать").unwrap().note.is_none());
    }

    #[test]
    fn test_injected_generator_controls_ids() {
        let sentence = parse_sentence(&tokenize(&normalize("его отец брат её отца"))).unwrap();
        let mut ids = IdGenerator::new("n", 100);

        let graph = synthesize(sentence.clone(), &mut ids);
        assert_eq!(graph.persons[0].id, PersonId::from("n100"));
        assert_eq!(ids.peek(), 100 + graph.persons.len() as u64);

        ids.reset();
        let again = synthesize(sentence, &mut ids);
        assert_eq!(graph.persons, again.persons);
        assert_eq!(graph.edges, again.edges);
    }

    #[test]
    fn test_ancestor_labels() {
        assert_eq!(
            ancestor_label(Pronoun::Her, &[Step::Father, Step::Mother]),
            ("Её бабушка по отцовской линии".to_string(), Sex::Female)
        );
        assert_eq!(
            ancestor_label(Pronoun::His, &[Step::Father]),
            ("Его отец".to_string(), Sex::Male)
        );
    }
}
