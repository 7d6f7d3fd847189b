//! report.rs
//! Runs every analysis pass over one expression and bundles the results.

use crate::analysis::operands::operand_positions;
use crate::analysis::relations::build_relations;
use crate::display::describe_all;
use crate::error::Result;
use crate::graph::Relation;
use crate::store::KnowledgeStore;
use crate::validation::{AnalysisOptions, ErrorCollector, StudentError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything a report generator or grading pipeline needs for one answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Findings, sorted.
    pub errors: Vec<StudentError>,
    pub relations: Vec<Relation>,
    /// 0-based.
    pub operand_positions: BTreeSet<usize>,
    /// One entry per finding, in the order of `errors`.
    pub descriptions: Vec<String>,
}

/// Collects findings and assembles relations side by side, then renders the
/// descriptions. Any fatal error aborts the whole analysis.
pub fn analyze<S>(store: &S, options: &AnalysisOptions) -> Result<AnalysisReport>
where
    S: KnowledgeStore + Sync + ?Sized,
{
    let (errors, relations) = rayon::join(
        || ErrorCollector::new(store).with_options(*options).collect(),
        || build_relations(store),
    );
    let errors = errors?;
    let relations = relations?;

    let described = describe_all(&errors, store)?;
    let (errors, descriptions): (Vec<StudentError>, Vec<String>) = described.into_iter().unzip();

    Ok(AnalysisReport {
        errors,
        relations,
        operand_positions: operand_positions(store)?,
        descriptions,
    })
}
