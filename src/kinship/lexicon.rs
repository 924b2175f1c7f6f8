//! Russian kinship vocabulary.
//!
//! Every label the classifier produces is built here from a single
//! (concept, sex) table, with a neutral form when sex is unknown.

use crate::types::{Line, Sex};

pub const NOT_FOUND: &str = "связь не найдена";
pub const SAME_PERSON: &str = "тот же человек";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concept {
    Parent,
    Child,
    Grandparent,
    Grandchild,
    GreatGrandparent,
    GreatGrandchild,
    Sibling,
    AuntUncle,
    NieceNephew,
}

pub fn word(concept: Concept, sex: Sex) -> &'static str {
    use Concept::*;

    match (concept, sex) {
        (Parent, Sex::Male) => "отец",
        (Parent, Sex::Female) => "мать",
        (Parent, Sex::Unknown) => "родитель",
        (Child, Sex::Male) => "сын",
        (Child, Sex::Female) => "дочь",
        (Child, Sex::Unknown) => "ребёнок",
        (Grandparent, Sex::Male) => "дедушка",
        (Grandparent, Sex::Female) => "бабушка",
        (Grandparent, Sex::Unknown) => "дедушка/бабушка",
        (Grandchild, Sex::Male) => "внук",
        (Grandchild, Sex::Female) => "внучка",
        (Grandchild, Sex::Unknown) => "внук/внучка",
        (GreatGrandparent, Sex::Male) => "прадедушка",
        (GreatGrandparent, Sex::Female) => "прабабушка",
        (GreatGrandparent, Sex::Unknown) => "прадедушка/прабабушка",
        (GreatGrandchild, Sex::Male) => "правнук",
        (GreatGrandchild, Sex::Female) => "правнучка",
        (GreatGrandchild, Sex::Unknown) => "правнук/правнучка",
        (Sibling, Sex::Male) => "брат",
        (Sibling, Sex::Female) => "сестра",
        (Sibling, Sex::Unknown) => "брат/сестра",
        (AuntUncle, Sex::Male) => "дядя",
        (AuntUncle, Sex::Female) => "тётя",
        (AuntUncle, Sex::Unknown) => "дядя/тётя",
        (NieceNephew, Sex::Male) => "племянник",
        (NieceNephew, Sex::Female) => "племянница",
        (NieceNephew, Sex::Unknown) => "племянник/племянница",
    }
}

pub fn line_note(line: Line) -> &'static str {
    match line {
        Line::Maternal => "по материнской линии",
        Line::Paternal => "по отцовской линии",
    }
}

/// Adjective stem for "of the n-th birth": 2 is двоюродн-, 3 is троюродн-
fn ordinal_stem(ordinal: usize) -> Option<&'static str> {
    match ordinal {
        2 => Some("двоюродн"),
        3 => Some("троюродн"),
        4 => Some("четвероюродн"),
        5 => Some("пятиюродн"),
        _ => None,
    }
}

fn inflect(stem: &str, sex: Sex) -> String {
    match sex {
        Sex::Male => format!("{}ый", stem),
        Sex::Female => format!("{}ая", stem),
        Sex::Unknown => format!("{}ый(-ая)", stem),
    }
}

/// Noun qualified by a cousin degree: 1 → двоюродный, 4 → пятиюродный,
/// higher degrees fall back to "<noun> N-й степени".
fn with_cousin_degree(degree: usize, sex: Sex, noun: &str) -> String {
    match ordinal_stem(degree + 1) {
        Some(stem) => format!("{} {}", inflect(stem, sex), noun),
        None => format!("{} {}-й степени", noun, degree),
    }
}

/// Labels for a direct line: (ancestor's role, descendant's role)
pub fn direct_terms(generations: usize, ancestor_sex: Sex, descendant_sex: Sex) -> (String, String) {
    let concepts = match generations {
        1 => Some((Concept::Parent, Concept::Child)),
        2 => Some((Concept::Grandparent, Concept::Grandchild)),
        3 => Some((Concept::GreatGrandparent, Concept::GreatGrandchild)),
        _ => None,
    };

    match concepts {
        Some((senior, junior)) => (
            word(senior, ancestor_sex).to_string(),
            word(junior, descendant_sex).to_string(),
        ),
        None => (
            format!("предок, поколение {}", generations),
            format!("потомок, поколение {}", generations),
        ),
    }
}

pub fn sibling_term(sex: Sex) -> String {
    word(Concept::Sibling, sex).to_string()
}

/// Labels for a person whose parent is the common ancestor (senior) and a
/// descendant of that person's sibling (junior): (senior's role, junior's role)
pub fn aunt_family_terms(degree: usize, senior_sex: Sex, junior_sex: Sex) -> (String, String) {
    match degree {
        1 => (
            word(Concept::AuntUncle, senior_sex).to_string(),
            word(Concept::NieceNephew, junior_sex).to_string(),
        ),
        2 | 3 => {
            // Ordinal equals degree here, unlike cousins
            let stem = ordinal_stem(degree).unwrap_or("двоюродн");
            (
                format!("{} {}", inflect(stem, senior_sex), word(Concept::Grandparent, senior_sex)),
                format!("{} {}", inflect(stem, junior_sex), word(Concept::Grandchild, junior_sex)),
            )
        }
        _ => (
            format!("боковой предок, удалённость {}", degree),
            format!("боковой потомок, удалённость {}", degree),
        ),
    }
}

/// Labels for cousins: (role of the side nearer the common ancestor, role of the
/// farther side). With zero removal both sides get the symmetric cousin word.
pub fn cousin_terms(degree: usize, removal: usize, near_sex: Sex, far_sex: Sex) -> (String, String) {
    match removal {
        0 => (
            with_cousin_degree(degree, near_sex, word(Concept::Sibling, near_sex)),
            with_cousin_degree(degree, far_sex, word(Concept::Sibling, far_sex)),
        ),
        1 => (
            with_cousin_degree(degree, near_sex, word(Concept::AuntUncle, near_sex)),
            with_cousin_degree(degree, far_sex, word(Concept::NieceNephew, far_sex)),
        ),
        _ => (
            format!(
                "{}, удалённость {}",
                with_cousin_degree(degree, near_sex, word(Concept::AuntUncle, near_sex)),
                removal
            ),
            format!(
                "{}, удалённость {}",
                with_cousin_degree(degree, far_sex, word(Concept::NieceNephew, far_sex)),
                removal
            ),
        ),
    }
}
