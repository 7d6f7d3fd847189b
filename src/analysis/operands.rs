use crate::analysis::attributes::attribute_by_index;
use crate::error::Result;
use crate::store::{Attribute, KnowledgeStore};
use std::collections::BTreeSet;

/// 0-based positions of the tokens flagged as operands.
///
/// Token indices are 1-based everywhere else; consumers of this set index a
/// 0-based token array, hence the shift.
pub fn operand_positions<S: KnowledgeStore + ?Sized>(store: &S) -> Result<BTreeSet<usize>> {
    let flags = attribute_by_index(store, Attribute::IsOperand)?;
    Ok(flags
        .into_iter()
        .filter(|(_, flag)| !flag.is_empty())
        .map(|(index, _)| index as usize - 1)
        .collect())
}
