//! Order-violation analysis for a student's evaluation of an expression.
//!
//! A knowledge store holds the expression tokens and named relations between
//! them. This crate indexes those relations by token position, classifies the
//! asserted violations into six kinds of `StudentError`, assembles the
//! structural relation list, and renders each violation as text.

pub mod analysis;
pub mod display;
pub mod error;
pub mod graph;
pub mod store;
pub mod validation;

pub use analysis::{analyze, AnalysisReport, FlatRelation, RelationIndex};
pub use error::{AnalysisError, Result};
pub use graph::{Relation, RelationType, StructureGraph};
pub use store::{Attribute, KnowledgeStore, Predicate, TokenAttributes, TokenId, TokenRegistry};
pub use validation::{AnalysisOptions, StudentError, StudentErrorType};
