//! Structural relations of an expression and their graph view.
pub mod edge;
pub mod structure;

// Re-export key types for convenient access
pub use edge::{Relation, RelationType};
pub use structure::StructureGraph;
