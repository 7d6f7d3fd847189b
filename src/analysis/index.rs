//! index.rs
//! Dense, position-keyed view of a single relation.

use crate::error::{AnalysisError, Result};
use crate::store::{Attribute, KnowledgeStore, Predicate, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

static EMPTY: BTreeSet<u32> = BTreeSet::new();

/// Source index -> set of target indices. Every token index of the expression
/// is present as a key, even when its set is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationIndex(BTreeMap<u32, BTreeSet<u32>>);

impl RelationIndex {
    /// Targets of `index`; the empty set for unknown keys.
    pub fn get(&self, index: u32) -> &BTreeSet<u32> {
        self.0.get(&index).unwrap_or(&EMPTY)
    }

    pub fn contains_key(&self, index: u32) -> bool { self.0.contains_key(&index) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &BTreeSet<u32>)> + '_ {
        self.0.iter().map(|(&k, v)| (k, v))
    }

    /// Every `(source, target)` pair, ascending by source then target.
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().flat_map(|(&from, to)| to.iter().map(move |&t| (from, t)))
    }

    /// Number of `(source, target)` pairs.
    pub fn edge_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }
}

/// A relation record exchanged outside the knowledge store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRelation {
    #[serde(alias = "indexFrom")]
    pub from: u32,
    #[serde(alias = "indexesTo")]
    pub to: Vec<u32>,
}

impl FlatRelation {
    /// Decodes a JSON array of `{ "from": .., "to": [..] }` records.
    pub fn parse_list(json: &str) -> Result<Vec<FlatRelation>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Reads and validates the `index` attribute of a token.
pub fn token_index<S: KnowledgeStore + ?Sized>(store: &S, token: TokenId) -> Result<u32> {
    let raw = store
        .attribute(token, Attribute::Index)
        .ok_or(AnalysisError::MissingIndex { token })?;
    let parsed = raw.parse::<u32>();
    match parsed {
        Ok(index) if index >= 1 => Ok(index),
        _ => Err(AnalysisError::InvalidIndex { token, value: raw }),
    }
}

/// Every token paired with its index, ascending by index.
///
/// Fails on the first token whose index is absent, malformed or shared.
pub fn sorted_tokens<S: KnowledgeStore + ?Sized>(store: &S) -> Result<Vec<(u32, TokenId)>> {
    let mut tokens = store
        .tokens()
        .into_iter()
        .map(|t| token_index(store, t).map(|i| (i, t)))
        .collect::<Result<Vec<_>>>()?;
    tokens.sort_by_key(|&(index, _)| index);

    if let Some(w) = tokens.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(AnalysisError::DuplicateIndex { index: w[0].0 });
    }
    Ok(tokens)
}

/// Builds the position-keyed index of `predicate` from store queries.
pub fn index_relation<S: KnowledgeStore + ?Sized>(store: &S, predicate: Predicate) -> Result<RelationIndex> {
    let mut relations = BTreeMap::new();

    for (index, token) in sorted_tokens(store)? {
        let targets = store
            .related(token, predicate)
            .into_iter()
            .map(|target| token_index(store, target))
            .collect::<Result<BTreeSet<u32>>>()?;
        relations.insert(index, targets);
    }

    tracing::debug!(
        relation = %predicate,
        keys = relations.len(),
        "Indexed relation"
    );
    Ok(RelationIndex(relations))
}

/// Builds the index from flat records over the index range `1..=max_index`.
pub fn index_flat(edges: &[FlatRelation], max_index: u32) -> Result<RelationIndex> {
    let mut relations: BTreeMap<u32, BTreeSet<u32>> =
        (1..=max_index).map(|i| (i, BTreeSet::new())).collect();

    for edge in edges {
        let targets = relations
            .get_mut(&edge.from)
            .ok_or(AnalysisError::IndexOutOfRange { index: edge.from, max: max_index })?;
        targets.extend(edge.to.iter().copied());
    }
    Ok(RelationIndex(relations))
}
