use crate::analysis::attributes::attribute_at;
use crate::analysis::index::{index_relation, RelationIndex};
use crate::error::Result;
use crate::store::{Attribute, KnowledgeStore, Predicate};
use crate::validation::{StudentError, StudentErrorType};
use std::collections::HashSet;
use std::fmt::Write;

/// Renders the explanation of a single finding.
///
/// Fails only when a position of the finding does not resolve to a token. A
/// missing third operator is rendered as empty text on pos `-1`.
pub fn describe<S: KnowledgeStore + ?Sized>(error: &StudentError, store: &S) -> Result<String> {
    let third_operators = index_relation(store, Predicate::BeforeThirdOperator)?;
    describe_with(error, store, &third_operators)
}

fn describe_with<S: KnowledgeStore + ?Sized>(
    error: &StudentError,
    store: &S,
    third_operators: &RelationIndex,
) -> Result<String> {
    let error_text = attribute_at(store, Some(error.error_pos), Attribute::Text)?;
    let reason_text = attribute_at(store, Some(error.reason_pos), Attribute::Text)?;

    let third_operator = third_operator_of(third_operators, error.reason_pos);
    let third_text = attribute_at(store, third_operator, Attribute::Text)?;
    let third_pos = third_operator.map_or(-1, i64::from);

    let mut out = String::new();
    let _ = write!(
        out,
        "Operator {} on pos {} evaluated before operator {} on pos {}",
        reason_text, error.reason_pos, error_text, error.error_pos
    );

    match error.kind {
        StudentErrorType::HighPriorityToLeft | StudentErrorType::HighPriorityToRight => {
            out.push_str(" as operator with higher precedence");
        }
        StudentErrorType::LeftAssocToLeft => {
            out.push_str(" as operator with left associativity");
        }
        StudentErrorType::RightAssocToRight => {
            out.push_str(" as operator with right associativity");
        }
        StudentErrorType::InComplex => {
            let _ = write!(out, " as operator in complex operator {} on pos {}", third_text, third_pos);
        }
        StudentErrorType::StrictOperandsOrder => {
            let _ = write!(
                out,
                " as first operand of operator {} on pos {} with strict evaluation order operands",
                third_text, third_pos
            );
        }
    }
    Ok(out)
}

/// Descriptions of every finding, sorted by error position, reason position
/// and kind.
pub fn describe_all<S: KnowledgeStore + ?Sized>(
    errors: &HashSet<StudentError>,
    store: &S,
) -> Result<Vec<(StudentError, String)>> {
    let third_operators = index_relation(store, Predicate::BeforeThirdOperator)?;
    let mut sorted: Vec<StudentError> = errors.iter().copied().collect();
    sorted.sort();
    sorted
        .into_iter()
        .map(|e| describe_with(&e, store, &third_operators).map(|text| (e, text)))
        .collect()
}

/// The operator that orders `reason_pos` through `before_third_operator`.
///
/// Well-formed input has at most one; the smallest index wins otherwise.
fn third_operator_of(third_operators: &RelationIndex, reason_pos: u32) -> Option<u32> {
    let candidates = third_operators.get(reason_pos);
    if candidates.len() > 1 {
        tracing::warn!(
            reason_pos,
            candidates = ?candidates,
            "More than one third operator; using the first"
        );
    }
    candidates.iter().next().copied()
}
