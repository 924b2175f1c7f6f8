use crate::kinship::lexicon;
use crate::lineage::{build_indices, AncestryTraversal, CommonAncestor, Indices};
use crate::types::{ClassificationResult, Line, ParentEdge, Person, PersonId, Relation};
use std::collections::HashMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct ClassifierOptions {
    /// Generations searched when reconstructing an evidence path
    pub max_path_depth: usize,
    /// Whether evidence lists the reconstructed paths
    pub include_paths: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            max_path_depth: 64,
            include_paths: true,
        }
    }
}

/// Classify with default options. Never fails: unknown ids and unrelated
/// persons produce `Relation::NotFound`.
pub fn classify(
    a: &PersonId,
    b: &PersonId,
    persons: &[Person],
    edges: &[ParentEdge],
) -> ClassificationResult {
    Classifier::default().classify(a, b, persons, edges)
}

/// Turns generational distances into sexed kinship labels
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    options: ClassifierOptions,
}

/// Per-call view of the snapshot being classified
struct Snapshot<'a> {
    indices: Indices,
    by_id: HashMap<&'a PersonId, &'a Person>,
    options: &'a ClassifierOptions,
}

impl<'a> Snapshot<'a> {
    fn name(&self, id: &PersonId) -> String {
        self.by_id
            .get(id)
            .map(|person| person.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn path(&self, descendant: &PersonId, ancestor: &PersonId) -> Option<Vec<PersonId>> {
        AncestryTraversal::ancestry_path(descendant, ancestor, &self.indices, self.options.max_path_depth)
    }

    /// Line of descent from the sex of the first parent (in parent order) that
    /// reaches `ancestor` in `generations - 1` further steps. Not bounded by
    /// `max_path_depth`.
    fn line_towards(&self, descendant: &PersonId, ancestor: &PersonId, generations: usize) -> Option<Line> {
        let remaining = generations.checked_sub(1)?;
        let parent = self.indices.parents(descendant).iter().find(|parent| {
            *parent == ancestor
                || (remaining > 0
                    && AncestryTraversal::ancestor_distances(parent, &self.indices).get(ancestor)
                        == Some(&remaining))
        })?;
        self.by_id
            .get(parent)
            .and_then(|parent| Line::from_parent_sex(parent.sex))
    }

    fn describe_path(&self, path: &[PersonId]) -> String {
        let names: Vec<String> = path.iter().map(|id| self.name(id)).collect();
        format!("Путь: {}", names.join(" → "))
    }

    /// Path and line annotation for one side of a collateral relation
    fn branch(&self, person: &Person, ancestor: &PersonId, generations: usize, evidence: &mut Vec<String>) {
        if self.options.include_paths {
            if let Some(path) = self.path(&person.id, ancestor) {
                evidence.push(self.describe_path(&path));
            }
        }
        if let Some(line) = self.line_towards(&person.id, ancestor, generations) {
            evidence.push(format!("{}: {}", person.name, lexicon::line_note(line)));
        }
    }
}

impl Classifier {
    pub fn new(options: ClassifierOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Name what A is to B and what B is to A
    #[instrument(skip_all, fields(a = %a, b = %b))]
    pub fn classify(
        &self,
        a: &PersonId,
        b: &PersonId,
        persons: &[Person],
        edges: &[ParentEdge],
    ) -> ClassificationResult {
        let by_id: HashMap<&PersonId, &Person> = persons.iter().map(|p| (&p.id, p)).collect();

        let (Some(&person_a), Some(&person_b)) = (by_id.get(a), by_id.get(b)) else {
            debug!("Classification requested for an unknown person");
            return not_found();
        };

        if a == b {
            return ClassificationResult {
                role_of_a: lexicon::SAME_PERSON.to_string(),
                role_of_b: lexicon::SAME_PERSON.to_string(),
                relation: Relation::SamePerson,
                evidence: Vec::new(),
            };
        }

        let snapshot = Snapshot {
            indices: build_indices(persons, edges),
            by_id,
            options: &self.options,
        };

        let ancestors_of_a = AncestryTraversal::ancestor_distances(a, &snapshot.indices);
        let ancestors_of_b = AncestryTraversal::ancestor_distances(b, &snapshot.indices);

        let result = if let Some(&generations) = ancestors_of_b.get(a) {
            self.direct_line(&snapshot, person_a, person_b, generations, true)
        } else if let Some(&generations) = ancestors_of_a.get(b) {
            self.direct_line(&snapshot, person_b, person_a, generations, false)
        } else {
            match AncestryTraversal::resolve_lca(&ancestors_of_a, &ancestors_of_b) {
                Some(common) => self.collateral(&snapshot, person_a, person_b, &common),
                None => not_found(),
            }
        };

        debug!(
            "Classified {} as '{}' and {} as '{}'",
            a, result.role_of_a, b, result.role_of_b
        );
        result
    }

    fn direct_line(
        &self,
        snapshot: &Snapshot<'_>,
        ancestor: &Person,
        descendant: &Person,
        generations: usize,
        a_is_ancestor: bool,
    ) -> ClassificationResult {
        let (ancestor_role, descendant_role) =
            lexicon::direct_terms(generations, ancestor.sex, descendant.sex);

        let mut evidence = Vec::new();
        let line = snapshot.line_towards(&descendant.id, &ancestor.id, generations);

        if self.options.include_paths {
            if let Some(path) = snapshot.path(&descendant.id, &ancestor.id) {
                evidence.push(snapshot.describe_path(&path));
            }
        }
        evidence.push(format!("Предок: {}, поколений: {}", ancestor.name, generations));
        if let Some(line) = line {
            evidence.push(format!("{}: {}", descendant.name, lexicon::line_note(line)));
        }

        let (role_of_a, role_of_b) = if a_is_ancestor {
            (ancestor_role, descendant_role)
        } else {
            (descendant_role, ancestor_role)
        };

        ClassificationResult {
            role_of_a,
            role_of_b,
            relation: Relation::DirectLine {
                generations,
                a_is_ancestor,
                line,
            },
            evidence,
        }
    }

    fn collateral(
        &self,
        snapshot: &Snapshot<'_>,
        a: &Person,
        b: &Person,
        common: &CommonAncestor,
    ) -> ClassificationResult {
        let (k, l) = (common.distance_a, common.distance_b);

        let mut evidence = vec![format!("Общий предок: {}", snapshot.name(&common.id))];
        snapshot.branch(a, &common.id, k, &mut evidence);
        snapshot.branch(b, &common.id, l, &mut evidence);

        let common_ancestor = common.id.clone();

        let (role_of_a, role_of_b, relation) = if k == 1 && l == 1 {
            (
                lexicon::sibling_term(a.sex),
                lexicon::sibling_term(b.sex),
                Relation::Siblings { common_ancestor },
            )
        } else if k == 1 || l == 1 {
            let degree = k.max(l) - 1;
            let a_is_senior = k == 1;
            let (role_of_a, role_of_b) = if a_is_senior {
                lexicon::aunt_family_terms(degree, a.sex, b.sex)
            } else {
                let (senior, junior) = lexicon::aunt_family_terms(degree, b.sex, a.sex);
                (junior, senior)
            };
            (
                role_of_a,
                role_of_b,
                Relation::AuntUncle {
                    degree,
                    a_is_senior,
                    common_ancestor,
                },
            )
        } else {
            let degree = k.min(l) - 1;
            let removal = k.abs_diff(l);
            evidence.push(format!("Степень: {}, удалённость: {}", degree, removal));
            let (role_of_a, role_of_b) = if k <= l {
                lexicon::cousin_terms(degree, removal, a.sex, b.sex)
            } else {
                let (near, far) = lexicon::cousin_terms(degree, removal, b.sex, a.sex);
                (far, near)
            };
            (
                role_of_a,
                role_of_b,
                Relation::Cousins {
                    degree,
                    removal,
                    common_ancestor,
                },
            )
        };

        ClassificationResult {
            role_of_a,
            role_of_b,
            relation,
            evidence,
        }
    }
}

fn not_found() -> ClassificationResult {
    ClassificationResult {
        role_of_a: lexicon::NOT_FOUND.to_string(),
        role_of_b: lexicon::NOT_FOUND.to_string(),
        relation: Relation::NotFound,
        evidence: Vec::new(),
    }
}
