//! The collector that gathers every asserted order violation of an expression.
use super::error::{StudentError, StudentErrorType};
use crate::analysis::index::{index_relation, sorted_tokens};
use crate::error::Result;
use crate::store::{Attribute, KnowledgeStore, Predicate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Knobs for a collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Dump the store contents at debug level before collecting.
    #[serde(default)]
    pub debug: bool,
}

/// Turns the six error relations of a knowledge store into findings.
///
/// Like a linter pass: it reads every error relation, and every pair in each
/// relation becomes one `StudentError`. Redundant facts collapse because the
/// result is a set.
pub struct ErrorCollector<'a, S: KnowledgeStore + ?Sized> {
    store: &'a S,
    options: AnalysisOptions,
}

impl<'a, S: KnowledgeStore + ?Sized> ErrorCollector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store, options: AnalysisOptions::default() }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs every error relation. The first fatal store error aborts the run.
    pub fn collect(&self) -> Result<HashSet<StudentError>> {
        if self.options.debug {
            self.dump()?;
        }

        let mut errors = HashSet::new();
        for kind in StudentErrorType::ALL {
            let index = index_relation(self.store, kind.predicate())?;
            errors.extend(index.pairs().map(|(error, reason)| StudentError::new(error, reason, kind)));
        }

        tracing::debug!(count = errors.len(), "Collected student errors");
        Ok(errors)
    }

    fn dump(&self) -> Result<()> {
        for (index, token) in sorted_tokens(self.store)? {
            tracing::debug!(
                index,
                text = %self.store.attribute(token, Attribute::Text).unwrap_or_default(),
                is_operand = %self.store.attribute(token, Attribute::IsOperand).unwrap_or_default(),
                "Token"
            );
        }
        for predicate in Predicate::ALL {
            let index = index_relation(self.store, predicate)?;
            tracing::debug!(relation = %predicate, edges = index.edge_count(), "Relation");
        }
        Ok(())
    }
}

/// Shorthand for `ErrorCollector::new(store).collect()`.
pub fn collect_errors<S: KnowledgeStore + ?Sized>(store: &S) -> Result<HashSet<StudentError>> {
    ErrorCollector::new(store).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::store::{TokenAttributes, TokenId, TokenRegistry};

    #[test]
    fn test_single_priority_error() {
        let mut reg = TokenRegistry::from_expression(["2", "+", "3"]);
        reg.add_relation(TokenId(1), Predicate::StudentErrorMorePriorityLeft, TokenId(0));

        let errors = collect_errors(&reg).unwrap();
        assert_eq!(errors, HashSet::from([StudentError::new(2, 1, StudentErrorType::HighPriorityToLeft)]));
    }

    #[test]
    fn test_every_category_is_read() {
        let mut reg = TokenRegistry::from_expression(["a", "b", "c", "d"]);
        for kind in StudentErrorType::ALL {
            reg.add_relation(TokenId(3), kind.predicate(), TokenId(0));
        }
        let errors = collect_errors(&reg).unwrap();
        assert_eq!(errors.len(), 6);
        assert!(errors.iter().all(|e| e.error_pos == 4 && e.reason_pos == 1));
    }

    #[test]
    fn test_duplicate_facts_collapse() {
        let mut reg = TokenRegistry::from_expression(["a", "*", "b", "+", "c"]);
        reg.add_relation(TokenId(3), Predicate::StudentErrorMorePriorityLeft, TokenId(1));
        reg.add_relation(TokenId(3), Predicate::StudentErrorMorePriorityLeft, TokenId(1));

        let errors = collect_errors(&reg).unwrap();
        assert_eq!(errors, HashSet::from([StudentError::new(4, 2, StudentErrorType::HighPriorityToLeft)]));
    }

    #[test]
    fn test_store_error_aborts_collection() {
        let mut reg = TokenRegistry::from_expression(["a", "+", "b"]);
        reg.add_relation(TokenId(1), Predicate::StudentErrorLeftAssoc, TokenId(0));
        reg.add_token(TokenAttributes { text: Some("c".into()), ..Default::default() });

        assert!(matches!(collect_errors(&reg), Err(AnalysisError::MissingIndex { .. })));
    }

    #[test]
    fn test_debug_dump_does_not_change_result() {
        let mut reg = TokenRegistry::from_expression(["a", "=", "b", "=", "c"]);
        reg.add_relation(TokenId(1), Predicate::StudentErrorRightAssoc, TokenId(3));

        let plain = collect_errors(&reg).unwrap();
        let dumped = ErrorCollector::new(&reg).with_options(AnalysisOptions { debug: true }).collect().unwrap();
        assert_eq!(plain, dumped);
    }

    #[test]
    fn test_empty_expression() {
        assert!(collect_errors(&TokenRegistry::new()).unwrap().is_empty());
    }
}
