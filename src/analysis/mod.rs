//! Position-indexed analysis of the relations held by a knowledge store.
pub mod attributes;
pub mod index;
pub mod operands;
pub mod relations;
pub mod report;

pub use attributes::{attribute_at, attribute_by_index};
pub use index::{index_flat, index_relation, FlatRelation, RelationIndex};
pub use operands::operand_positions;
pub use relations::build_relations;
pub use report::{analyze, AnalysisReport};
