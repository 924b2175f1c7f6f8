use crate::lineage::graph::Indices;
use crate::types::PersonId;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use tracing::debug;

/// Generation distances from a person to each of their ancestors
pub type AncestorDistances = BTreeMap<PersonId, usize>;

/// Nearest common ancestor of two persons
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonAncestor {
    pub id: PersonId,
    pub distance_a: usize,
    pub distance_b: usize,
}

/// Ancestry traversal utilities over parent-of indices
pub struct AncestryTraversal;

impl AncestryTraversal {
    /// Breadth-first walk up the parent relation, one generation at a time.
    ///
    /// The first time an ancestor is reached is its minimal hop count; it is never
    /// revisited. Assumes an acyclic graph: with a cycle the walk still terminates
    /// but a reported distance may exceed the true minimum.
    pub fn ancestor_distances(start: &PersonId, indices: &Indices) -> AncestorDistances {
        let mut distances = BTreeMap::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(start.clone());
        queue.push_back((start.clone(), 0usize));

        while let Some((current, depth)) = queue.pop_front() {
            for parent in indices.parents(&current) {
                if visited.insert(parent.clone()) {
                    distances.insert(parent.clone(), depth + 1);
                    queue.push_back((parent.clone(), depth + 1));
                }
            }
        }

        debug!("Found {} ancestors for {}", distances.len(), start);
        distances
    }

    /// Shortest chain of persons from `descendant` up to `ancestor`, both included.
    ///
    /// Searches at most `max_depth` generations. Returns `None` when the ancestor is
    /// not reachable within that bound.
    pub fn ancestry_path(
        descendant: &PersonId,
        ancestor: &PersonId,
        indices: &Indices,
        max_depth: usize,
    ) -> Option<Vec<PersonId>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut child_of: HashMap<PersonId, PersonId> = HashMap::new();

        visited.insert(descendant.clone());
        queue.push_back((descendant.clone(), 0usize));

        while let Some((current, depth)) = queue.pop_front() {
            if &current == ancestor {
                // Walk the pointers back down to the descendant
                let mut path = vec![current.clone()];
                let mut cursor = current;
                while let Some(prev) = child_of.get(&cursor) {
                    path.push(prev.clone());
                    cursor = prev.clone();
                }
                path.reverse();
                return Some(path);
            }

            if depth >= max_depth {
                continue;
            }

            for parent in indices.parents(&current) {
                if visited.insert(parent.clone()) {
                    child_of.insert(parent.clone(), current.clone());
                    queue.push_back((parent.clone(), depth + 1));
                }
            }
        }

        None
    }

    /// Common ancestor minimising the sum of both distances, ties broken by the
    /// smaller of the two maxima (the most recent shared ancestor), then by id.
    pub fn resolve_lca(a: &AncestorDistances, b: &AncestorDistances) -> Option<CommonAncestor> {
        let mut best: Option<(usize, usize, CommonAncestor)> = None;

        for (id, &distance_a) in a {
            let Some(&distance_b) = b.get(id) else {
                continue;
            };
            let sum = distance_a + distance_b;
            let max = distance_a.max(distance_b);

            let better = match &best {
                None => true,
                Some((best_sum, best_max, _)) => (sum, max) < (*best_sum, *best_max),
            };
            if better {
                best = Some((
                    sum,
                    max,
                    CommonAncestor {
                        id: id.clone(),
                        distance_a,
                        distance_b,
                    },
                ));
            }
        }

        best.map(|(_, _, ancestor)| ancestor)
    }
}
