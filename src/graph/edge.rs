//! Defines the `Relation` record, a labeled structural edge between two tokens.
use crate::store::Predicate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a structural edge, one per structural store relation. `from` and
/// `to` keep the subject and object of the store fact as asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// Read from `before_direct`.
    BeforeDirect,
    /// Read from `before_by_third_operator`.
    BeforeByThirdOperator,
    /// Read from `before_third_operator`.
    BeforeThirdOperator,
    /// Read from `before_as_operand`.
    BeforeAsOperand,
    /// Read from `has_operand`.
    HasOperand,
}

impl RelationType {
    /// Fixed output order of the assembled relation list.
    pub const ALL: [RelationType; 5] = [
        RelationType::BeforeDirect,
        RelationType::BeforeByThirdOperator,
        RelationType::BeforeThirdOperator,
        RelationType::BeforeAsOperand,
        RelationType::HasOperand,
    ];

    /// The store relation this edge kind is read from.
    pub fn predicate(&self) -> Predicate {
        match self {
            RelationType::BeforeDirect => Predicate::BeforeDirect,
            RelationType::BeforeByThirdOperator => Predicate::BeforeByThirdOperator,
            RelationType::BeforeThirdOperator => Predicate::BeforeThirdOperator,
            RelationType::BeforeAsOperand => Predicate::BeforeAsOperand,
            RelationType::HasOperand => Predicate::HasOperand,
        }
    }

    pub fn as_str(&self) -> &'static str { self.predicate().as_str() }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structural edge. Lists of relations keep duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub from: u32,
    pub to: u32,
    #[serde(rename = "type")]
    pub kind: RelationType,
}

impl Relation {
    pub fn new(from: u32, to: u32, kind: RelationType) -> Self {
        Self { from, to, kind }
    }
}
