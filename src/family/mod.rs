pub mod interchange;
pub mod tree;

pub use interchange::FamilyDocument;
pub use tree::FamilyTree;
