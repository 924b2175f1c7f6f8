use kinship_engine::error::{Expected, ParseError};
use kinship_engine::family::FamilyTree;
use kinship_engine::lineage::{build_indices, AncestorDistances, AncestryTraversal};
use kinship_engine::types::{ParentEdge, Person, PersonId, Relation, Sex};
use kinship_engine::{classify, parse_phrase};
use proptest::prelude::*;

fn id(s: &str) -> PersonId {
    PersonId::from(s)
}

const PARENT_TERMS: [&str; 3] = ["отец", "мать", "родитель"];
const CHILD_TERMS: [&str; 3] = ["сын", "дочь", "ребёнок"];

#[test]
fn siblings_share_both_parents() {
    let persons = vec![
        Person::new("F", "Отец", Sex::Male),
        Person::new("M", "Мать", Sex::Female),
        Person::new("S", "Сын", Sex::Male),
        Person::new("D", "Дочь", Sex::Female),
    ];
    let edges = vec![
        ParentEdge::new("F", "S"),
        ParentEdge::new("M", "S"),
        ParentEdge::new("F", "D"),
        ParentEdge::new("M", "D"),
    ];

    let result = classify(&id("S"), &id("D"), &persons, &edges);

    assert_eq!(result.role_of_a, "брат");
    assert_eq!(result.role_of_b, "сестра");
    assert!(matches!(result.relation, Relation::Siblings { .. }));
}

#[test]
fn mother_and_child_on_maternal_line() {
    let persons = vec![
        Person::new("Mom", "Мама", Sex::Female),
        Person::new("C", "Ребёнок", Sex::Male),
    ];
    let edges = vec![ParentEdge::new("Mom", "C")];

    let result = classify(&id("Mom"), &id("C"), &persons, &edges);

    assert!(PARENT_TERMS.contains(&result.role_of_a.as_str()));
    assert!(CHILD_TERMS.contains(&result.role_of_b.as_str()));
    assert!(result
        .evidence
        .iter()
        .any(|line| line.contains("по материнской линии")));
}

/// Он → Его мать, Она → Её мать → Её дедушка по материнской линии, with
/// "Его мать" and the grandfather sharing two parents
fn cousin_uncle_demo() -> (FamilyTree, PersonId, PersonId) {
    let mut tree = FamilyTree::new();
    let he = tree.add_person("Он", Sex::Male, None);
    let his_mother = tree.add_person("Его мать", Sex::Female, None);
    let she = tree.add_person("Она", Sex::Female, None);
    let her_mother = tree.add_person("Её мать", Sex::Female, None);
    let grandfather = tree.add_person("Её дедушка по материнской линии", Sex::Male, None);
    let shared_father = tree.add_person("Общий отец", Sex::Male, None);
    let shared_mother = tree.add_person("Общая мать", Sex::Female, None);

    let edges = [
        (&his_mother, &he),
        (&her_mother, &she),
        (&grandfather, &her_mother),
        (&shared_father, &his_mother),
        (&shared_father, &grandfather),
        (&shared_mother, &his_mother),
        (&shared_mother, &grandfather),
    ];
    for (parent, child) in edges {
        assert_eq!(tree.add_edge(parent, child), Ok(true));
    }

    (tree, he, she)
}

fn assert_cousin_uncle(tree: &FamilyTree, he: &PersonId, she: &PersonId) {
    let forward = tree.classify(he, she);
    assert!(forward.role_of_a.contains("двоюродн"));
    assert!(forward.role_of_a.contains("дядя"));
    assert!(matches!(
        forward.relation,
        Relation::Cousins { degree: 1, removal: 1, .. }
    ));

    let backward = tree.classify(she, he);
    assert!(backward.role_of_b.contains("двоюродн"));
    assert!(backward.role_of_b.contains("дядя"));
    assert!(backward.role_of_a.contains("двоюродн"));
    assert!(backward.role_of_a.contains("племянница"));
    assert_eq!(forward.role_of_a, backward.role_of_b);
    assert_eq!(forward.role_of_b, backward.role_of_a);
}

#[test]
fn demo_graph_is_cousin_uncle_and_niece() {
    let (tree, he, she) = cousin_uncle_demo();
    assert_cousin_uncle(&tree, &he, &she);

    let result = tree.classify(&he, &she);
    assert_eq!(result.role_of_a, "двоюродный дядя");
    assert_eq!(result.role_of_b, "двоюродная племянница");
}

#[test]
fn parsed_phrase_classifies_like_demo_graph() {
    let graph = parse_phrase("Его мать — младшая сестра её дедушки по материнской линии").unwrap();
    let he = graph.root_he.clone().unwrap();
    let she = graph.root_she.clone().unwrap();

    let mut tree = FamilyTree::new();
    tree.replace_with(graph);
    assert_cousin_uncle(&tree, &he, &she);

    let (demo, demo_he, demo_she) = cousin_uncle_demo();
    let expected = demo.classify(&demo_he, &demo_she);
    let actual = tree.classify(&he, &she);
    assert_eq!(actual.role_of_a, expected.role_of_a);
    assert_eq!(actual.role_of_b, expected.role_of_b);
}

#[test]
fn grandparent_without_line_clause_is_rejected() {
    let err = parse_phrase("его дед является старшим братом её матери").unwrap_err();

    assert!(matches!(err, ParseError::MissingLineClause { .. }));
    assert_eq!(err.expected(), Some(Expected::LinePreposition));
    assert!(err.to_string().contains("line clause"));
}

#[test]
fn same_person_is_reciprocal() {
    let persons = vec![Person::new("a", "A", Sex::Female)];
    let result = classify(&id("a"), &id("a"), &persons, &[]);

    assert_eq!(result.relation, Relation::SamePerson);
    assert_eq!(result.role_of_a, result.role_of_b);
}

/// Persons n0..n(count-1) with edges only from a lower to a higher index
fn random_dag() -> impl Strategy<Value = (Vec<Person>, Vec<ParentEdge>)> {
    (2usize..8).prop_flat_map(|count| {
        let pairs = count * (count - 1) / 2;
        (
            prop::collection::vec(0u8..3, count),
            prop::collection::vec(prop::bool::weighted(0.35), pairs),
        )
            .prop_map(move |(sexes, present)| {
                let persons: Vec<Person> = sexes
                    .iter()
                    .enumerate()
                    .map(|(i, sex)| {
                        let sex = match sex {
                            0 => Sex::Male,
                            1 => Sex::Female,
                            _ => Sex::Unknown,
                        };
                        Person::new(format!("n{}", i), format!("Person {}", i), sex)
                    })
                    .collect();

                let mut edges = Vec::new();
                let mut flags = present.into_iter();
                for parent in 0..count {
                    for child in parent + 1..count {
                        if flags.next().unwrap_or(false) {
                            edges.push(ParentEdge::new(format!("n{}", parent), format!("n{}", child)));
                        }
                    }
                }
                (persons, edges)
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn classification_is_reciprocal(
        (persons, edges) in random_dag(),
        a in 0usize..8,
        b in 0usize..8,
    ) {
        let a = persons[a % persons.len()].id.clone();
        let b = persons[b % persons.len()].id.clone();

        let forward = classify(&a, &b, &persons, &edges);
        let backward = classify(&b, &a, &persons, &edges);

        prop_assert_eq!(&forward.role_of_a, &backward.role_of_b);
        prop_assert_eq!(&forward.role_of_b, &backward.role_of_a);
        prop_assert_eq!(forward.common_ancestor(), backward.common_ancestor());
    }

    #[test]
    fn recorded_parent_is_named_as_parent((persons, edges) in random_dag()) {
        for edge in &edges {
            let result = classify(&edge.parent_id, &edge.child_id, &persons, &edges);

            prop_assert!(PARENT_TERMS.contains(&result.role_of_a.as_str()));
            prop_assert!(CHILD_TERMS.contains(&result.role_of_b.as_str()));
        }
    }

    #[test]
    fn diamond_yields_shortest_distance(short in 1usize..6, extra in 1usize..6) {
        let long = short + extra;
        let mut persons = vec![
            Person::new("d", "Descendant", Sex::Unknown),
            Person::new("x", "Ancestor", Sex::Unknown),
        ];
        let mut edges = Vec::new();

        for (branch, length) in [("s", short), ("l", long)] {
            let mut child = id("d");
            for step in 1..length {
                let parent = id(&format!("{}{}", branch, step));
                persons.push(Person::new(parent.clone(), parent.to_string(), Sex::Unknown));
                edges.push(ParentEdge::new(parent.clone(), child));
                child = parent;
            }
            edges.push(ParentEdge::new(id("x"), child));
        }

        let indices = build_indices(&persons, &edges);
        let distances = AncestryTraversal::ancestor_distances(&id("d"), &indices);
        prop_assert_eq!(distances.get(&id("x")), Some(&short));
    }

    #[test]
    fn lca_prefers_smaller_maximum_on_equal_sums(sum in 2usize..20, i in 0usize..20, j in 0usize..20) {
        let (i, j) = (i % (sum + 1), j % (sum + 1));
        let max_i = i.max(sum - i);
        let max_j = j.max(sum - j);
        prop_assume!(max_i != max_j);

        let mut side_a = AncestorDistances::new();
        let mut side_b = AncestorDistances::new();
        // "a" sorts first so the id tie-break would pick it if it were consulted
        side_a.insert(id("a"), i);
        side_b.insert(id("a"), sum - i);
        side_a.insert(id("b"), j);
        side_b.insert(id("b"), sum - j);

        let expected = if max_i < max_j { id("a") } else { id("b") };
        let common = AncestryTraversal::resolve_lca(&side_a, &side_b).unwrap();
        prop_assert_eq!(common.id, expected);
    }
}
