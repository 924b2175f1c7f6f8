use crate::types::{ParentEdge, Person, PersonId};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// Parent/child lookup tables derived from a person and edge snapshot.
///
/// Every person id is present in both maps, persons without relations map to an
/// empty list. Lists are sorted so the result does not depend on input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indices {
    pub parents_of: BTreeMap<PersonId, Vec<PersonId>>,
    pub children_of: BTreeMap<PersonId, Vec<PersonId>>,
}

impl Indices {
    pub fn parents(&self, id: &PersonId) -> &[PersonId] {
        self.parents_of.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn children(&self, id: &PersonId) -> &[PersonId] {
        self.children_of.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.parents_of.contains_key(id)
    }
}

/// Build parent-of / child-of indices. Never fails: edges with an endpoint outside
/// `persons`, self-loops and duplicates are skipped.
pub fn build_indices(persons: &[Person], edges: &[ParentEdge]) -> Indices {
    FamilyGraph::build(persons, edges).indices()
}

/// Wrapper around petgraph DiGraph with edges pointing parent -> child
pub struct FamilyGraph {
    graph: DiGraph<PersonId, ()>,
    node_map: HashMap<PersonId, NodeIndex>,
}

impl FamilyGraph {
    pub fn build(persons: &[Person], edges: &[ParentEdge]) -> Self {
        let mut graph = DiGraph::with_capacity(persons.len(), edges.len());
        let mut node_map = HashMap::with_capacity(persons.len());

        for person in persons {
            if node_map.contains_key(&person.id) {
                warn!("Duplicate person id {} ignored while indexing", person.id);
                continue;
            }
            let node_index = graph.add_node(person.id.clone());
            node_map.insert(person.id.clone(), node_index);
        }

        let mut seen = HashSet::with_capacity(edges.len());
        let mut skipped = 0;
        for edge in edges {
            if edge.is_self_loop() {
                skipped += 1;
                continue;
            }
            match (node_map.get(&edge.parent_id), node_map.get(&edge.child_id)) {
                (Some(&from_idx), Some(&to_idx)) => {
                    if seen.insert((from_idx, to_idx)) {
                        graph.add_edge(from_idx, to_idx, ());
                    }
                }
                _ => {
                    debug!("Dangling edge ignored: {} -> {}", edge.parent_id, edge.child_id);
                    skipped += 1;
                }
            }
        }

        debug!(
            "Family graph built with {} nodes and {} edges ({} skipped)",
            graph.node_count(),
            graph.edge_count(),
            skipped
        );

        Self { graph, node_map }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.node_map.contains_key(id)
    }

    fn neighbors(&self, id: &PersonId, direction: Direction) -> Vec<PersonId> {
        let Some(&node_index) = self.node_map.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<PersonId> = self
            .graph
            .neighbors_directed(node_index, direction)
            .filter_map(|neighbor| self.graph.node_weight(neighbor).cloned())
            .collect();
        ids.sort();
        ids
    }

    /// Direct parents, sorted
    pub fn parents(&self, id: &PersonId) -> Vec<PersonId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Direct children, sorted
    pub fn children(&self, id: &PersonId) -> Vec<PersonId> {
        self.neighbors(id, Direction::Outgoing)
    }

    pub fn indices(&self) -> Indices {
        let mut indices = Indices::default();
        for id in self.node_map.keys() {
            indices.parents_of.insert(id.clone(), self.parents(id));
            indices.children_of.insert(id.clone(), self.children(id));
        }
        indices
    }

    /// Persons with no recorded parents
    pub fn founders(&self) -> Vec<PersonId> {
        self.select(|index| {
            self.graph
                .neighbors_directed(index, Direction::Incoming)
                .next()
                .is_none()
        })
    }

    /// Persons with no recorded children
    pub fn childless(&self) -> Vec<PersonId> {
        self.select(|index| {
            self.graph
                .neighbors_directed(index, Direction::Outgoing)
                .next()
                .is_none()
        })
    }

    fn select(&self, predicate: impl Fn(NodeIndex) -> bool) -> Vec<PersonId> {
        let mut ids: Vec<PersonId> = self
            .node_map
            .iter()
            .filter(|(_, index)| predicate(**index))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Groups of persons that are their own ancestors
    pub fn find_cycles(&self) -> Vec<Vec<PersonId>> {
        let mut cycles: Vec<Vec<PersonId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut ids: Vec<PersonId> = component
                    .into_iter()
                    .filter_map(|index| self.graph.node_weight(index).cloned())
                    .collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }

    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(&self.graph)
    }

    pub fn statistics(&self) -> GraphStatistics {
        let total_persons = self.node_count();
        let total_edges = self.edge_count();

        let average_degree = if total_persons > 0 {
            (2 * total_edges) as f64 / total_persons as f64
        } else {
            0.0
        };

        GraphStatistics {
            total_persons,
            total_edges,
            founders: self.founders().len(),
            childless: self.childless().len(),
            average_degree,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphStatistics {
    pub total_persons: usize,
    pub total_edges: usize,
    pub founders: usize,
    pub childless: usize,
    pub average_degree: f64,
}
