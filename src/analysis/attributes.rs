use crate::analysis::index::sorted_tokens;
use crate::error::{AnalysisError, Result};
use crate::store::{Attribute, KnowledgeStore};
use std::collections::BTreeMap;

/// Value of `attr` for every token, keyed by token index. Tokens without the
/// attribute map to an empty string.
pub fn attribute_by_index<S: KnowledgeStore + ?Sized>(store: &S, attr: Attribute) -> Result<BTreeMap<u32, String>> {
    Ok(sorted_tokens(store)?
        .into_iter()
        .map(|(index, token)| (index, store.attribute(token, attr).unwrap_or_default()))
        .collect())
}

/// Value of `attr` on the token at `index`.
///
/// `None` stands for "no such position" (e.g. an absent third operator) and
/// yields an empty string without touching the store.
pub fn attribute_at<S: KnowledgeStore + ?Sized>(store: &S, index: Option<u32>, attr: Attribute) -> Result<String> {
    let Some(index) = index else {
        return Ok(String::new());
    };
    let token = store
        .resolve_by_index(index)
        .ok_or(AnalysisError::UnknownIndex(index))?;
    Ok(store.attribute(token, attr).unwrap_or_default())
}
