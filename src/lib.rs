pub mod config;
pub mod error;
pub mod family;
pub mod kinship;
pub mod lineage;
pub mod phrase;
pub mod reports;
pub mod types;

pub use error::{GraphError, ParseError, SchemaError};
pub use kinship::classify;
pub use lineage::build_indices;
pub use phrase::parse_phrase;
