use rayon::prelude::*;
use tracing::debug;

use crate::core::engine::SearchEngine;
use crate::core::error::Result;
use crate::core::types::Document;

/// Run a batch of raw queries against the engine in parallel.
///
/// Slot `i` of the output is the default (Actual-status) top-documents
/// result of query `i`; input order is preserved regardless of scheduling.
/// If any query is malformed the whole batch fails with the error of the
/// earliest failing query, and no partial output is returned.
pub fn process_queries(
    engine: &SearchEngine,
    queries: &[String],
) -> Result<Vec<Vec<Document>>> {
    let results: Vec<Result<Vec<Document>>> = queries
        .par_iter()
        .map(|query| engine.find_top_documents(query))
        .collect();
    debug!(queries = queries.len(), "bulk query batch finished");
    results.into_iter().collect()
}

/// As `process_queries`, flattened into one sequence: every result of
/// query 0, then every result of query 1, and so on
pub fn process_queries_joined(
    engine: &SearchEngine,
    queries: &[String],
) -> Result<Vec<Document>> {
    Ok(process_queries(engine, queries)?
        .into_iter()
        .flatten()
        .collect())
}
