//! Defines the order-violation findings produced by the collector.
use crate::error::AnalysisError;
use crate::store::Predicate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The rule a student's evaluation order broke.
///
// Ordered so findings can be sorted for stable reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentErrorType {
    /// An operator of higher precedence on the left should have gone first.
    HighPriorityToLeft,
    /// An operator of higher precedence on the right should have gone first.
    HighPriorityToRight,
    /// A left-associative neighbour on the left should have gone first.
    LeftAssocToLeft,
    /// A right-associative neighbour on the right should have gone first.
    RightAssocToRight,
    /// The operator sits inside a complex operator that must be evaluated first.
    InComplex,
    /// The first operand of a strict-order operator must be evaluated first.
    StrictOperandsOrder,
}

impl StudentErrorType {
    pub const ALL: [StudentErrorType; 6] = [
        StudentErrorType::HighPriorityToLeft,
        StudentErrorType::HighPriorityToRight,
        StudentErrorType::LeftAssocToLeft,
        StudentErrorType::RightAssocToRight,
        StudentErrorType::InComplex,
        StudentErrorType::StrictOperandsOrder,
    ];

    /// The store relation asserting this kind of finding.
    pub fn predicate(&self) -> Predicate {
        match self {
            StudentErrorType::HighPriorityToLeft => Predicate::StudentErrorMorePriorityLeft,
            StudentErrorType::HighPriorityToRight => Predicate::StudentErrorMorePriorityRight,
            StudentErrorType::LeftAssocToLeft => Predicate::StudentErrorLeftAssoc,
            StudentErrorType::RightAssocToRight => Predicate::StudentErrorRightAssoc,
            StudentErrorType::InComplex => Predicate::StudentErrorInComplex,
            StudentErrorType::StrictOperandsOrder => Predicate::StudentErrorStrictOperandsOrder,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StudentErrorType::HighPriorityToLeft => "HIGH_PRIORITY_TO_LEFT",
            StudentErrorType::HighPriorityToRight => "HIGH_PRIORITY_TO_RIGHT",
            StudentErrorType::LeftAssocToLeft => "LEFT_ASSOC_TO_LEFT",
            StudentErrorType::RightAssocToRight => "RIGHT_ASSOC_TO_RIGHT",
            StudentErrorType::InComplex => "IN_COMPLEX",
            StudentErrorType::StrictOperandsOrder => "STRICT_OPERANDS_ORDER",
        }
    }
}

impl fmt::Display for StudentErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentErrorType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StudentErrorType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AnalysisError::UnknownErrorType(s.to_string()))
    }
}

/// A single finding: the token at `error_pos` was evaluated too early, and
/// `reason_pos` is the token that should have gone first.
///
/// Identity is the full triple; the same pair under two kinds is two findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentError {
    pub error_pos: u32,
    pub reason_pos: u32,
    #[serde(rename = "type")]
    pub kind: StudentErrorType,
}

impl StudentError {
    pub fn new(error_pos: u32, reason_pos: u32, kind: StudentErrorType) -> Self {
        Self { error_pos, reason_pos, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case("HIGH_PRIORITY_TO_LEFT", StudentErrorType::HighPriorityToLeft)]
    #[case("RIGHT_ASSOC_TO_RIGHT", StudentErrorType::RightAssocToRight)]
    #[case("STRICT_OPERANDS_ORDER", StudentErrorType::StrictOperandsOrder)]
    fn test_type_names(#[case] name: &str, #[case] expected: StudentErrorType) {
        assert_eq!(name.parse::<StudentErrorType>().unwrap(), expected);
        assert_eq!(serde_json::to_string(&expected).unwrap(), format!("\"{}\"", name));
    }

    #[test]
    fn test_unrecognized_type_never_reaches_describer() {
        // The enum is closed, so an unknown name is rejected before a finding exists.
        let err = "LOWER_PRIORITY".parse::<StudentErrorType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown error 'LOWER_PRIORITY'");
    }

    #[test]
    fn test_predicates_are_distinct() {
        let predicates: HashSet<Predicate> = StudentErrorType::ALL.iter().map(|t| t.predicate()).collect();
        assert_eq!(predicates.len(), 6);
    }

    #[test]
    fn test_identity_is_full_triple() {
        let mut set = HashSet::new();
        set.insert(StudentError::new(2, 1, StudentErrorType::HighPriorityToLeft));
        set.insert(StudentError::new(2, 1, StudentErrorType::HighPriorityToLeft));
        set.insert(StudentError::new(1, 2, StudentErrorType::HighPriorityToLeft));
        set.insert(StudentError::new(2, 1, StudentErrorType::LeftAssocToLeft));
        assert_eq!(set.len(), 3);
    }
}
