use crate::analysis::index::index_relation;
use crate::error::Result;
use crate::graph::{Relation, RelationType};
use crate::store::KnowledgeStore;

/// Assembles every structural relation of the expression.
///
/// Blocks follow `RelationType::ALL`; inside a block, records are ascending by
/// source and then target. Duplicates are not removed.
pub fn build_relations<S: KnowledgeStore + ?Sized>(store: &S) -> Result<Vec<Relation>> {
    let mut relations = Vec::new();
    for kind in RelationType::ALL {
        let index = index_relation(store, kind.predicate())?;
        relations.extend(index.pairs().map(|(from, to)| Relation::new(from, to, kind)));
    }
    tracing::debug!(count = relations.len(), "Assembled structural relations");
    Ok(relations)
}
