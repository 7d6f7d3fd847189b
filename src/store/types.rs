use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque handle of a token inside a knowledge store.
///
/// Distinct from the token's `index` attribute: handles are assigned by the
/// store, indices are asserted facts about the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl TokenId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// Scalar attributes a token may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// 1-based position of the token in the expression.
    Index,
    /// Literal text of the token.
    Text,
    /// Non-empty when the token is an operand.
    IsOperand,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Index, Attribute::Text, Attribute::IsOperand];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Index => "index",
            Attribute::Text => "text",
            Attribute::IsOperand => "is_operand",
        }
    }
}

/// Named binary relations between tokens.
///
/// The first five describe expression structure, the remaining six are the
/// order violations asserted against a student's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    BeforeDirect,
    BeforeByThirdOperator,
    BeforeThirdOperator,
    BeforeAsOperand,
    HasOperand,
    StudentErrorMorePriorityLeft,
    StudentErrorMorePriorityRight,
    StudentErrorLeftAssoc,
    StudentErrorRightAssoc,
    StudentErrorInComplex,
    StudentErrorStrictOperandsOrder,
}

impl Predicate {
    pub const ALL: [Predicate; 11] = [
        Predicate::BeforeDirect,
        Predicate::BeforeByThirdOperator,
        Predicate::BeforeThirdOperator,
        Predicate::BeforeAsOperand,
        Predicate::HasOperand,
        Predicate::StudentErrorMorePriorityLeft,
        Predicate::StudentErrorMorePriorityRight,
        Predicate::StudentErrorLeftAssoc,
        Predicate::StudentErrorRightAssoc,
        Predicate::StudentErrorInComplex,
        Predicate::StudentErrorStrictOperandsOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::BeforeDirect => "before_direct",
            Predicate::BeforeByThirdOperator => "before_by_third_operator",
            Predicate::BeforeThirdOperator => "before_third_operator",
            Predicate::BeforeAsOperand => "before_as_operand",
            Predicate::HasOperand => "has_operand",
            Predicate::StudentErrorMorePriorityLeft => "student_error_more_priority_left",
            Predicate::StudentErrorMorePriorityRight => "student_error_more_priority_right",
            Predicate::StudentErrorLeftAssoc => "student_error_left_assoc",
            Predicate::StudentErrorRightAssoc => "student_error_right_assoc",
            Predicate::StudentErrorInComplex => "student_error_in_complex",
            Predicate::StudentErrorStrictOperandsOrder => "student_error_strict_operands_order",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Predicate {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Predicate::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AnalysisError::UnknownPredicate(s.to_string()))
    }
}

/// Attribute values of a single token, stored column-wise by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAttributes {
    pub index: Option<String>,
    pub text: Option<String>,
    pub is_operand: Option<String>,
}

impl TokenAttributes {
    pub fn get(&self, attr: Attribute) -> Option<&str> {
        match attr {
            Attribute::Index => self.index.as_deref(),
            Attribute::Text => self.text.as_deref(),
            Attribute::IsOperand => self.is_operand.as_deref(),
        }
    }

    pub fn set(&mut self, attr: Attribute, value: String) {
        match attr {
            Attribute::Index => self.index = Some(value),
            Attribute::Text => self.text = Some(value),
            Attribute::IsOperand => self.is_operand = Some(value),
        }
    }
}
