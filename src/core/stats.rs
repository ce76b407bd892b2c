use std::collections::VecDeque;

use serde::{Serialize, Deserialize};

use crate::core::config::REQUEST_WINDOW;
use crate::core::engine::SearchEngine;
use crate::core::error::Result;
use crate::core::types::{Document, DocumentStatus};

/// Engine snapshot for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub documents: usize,
    pub terms: usize,
}

#[derive(Debug, Clone)]
struct RequestRecord {
    timestamp: u64,
    results: usize,
}

/// Sliding-window counter of zero-result queries.
///
/// Each recorded query advances a virtual clock by one; entries older than
/// REQUEST_WINDOW ticks are expired before the new entry lands, so the
/// window always covers the last 1,440 recorded queries.
#[derive(Debug, Default)]
pub struct RequestMeter {
    requests: VecDeque<RequestRecord>,
    zero_results: usize,
    current_time: u64,
}

impl RequestMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a query that returned `results` documents
    pub fn record(&mut self, results: usize) {
        self.current_time += 1;
        while let Some(front) = self.requests.front() {
            if self.current_time - front.timestamp < REQUEST_WINDOW {
                break;
            }
            if front.results == 0 {
                self.zero_results -= 1;
            }
            self.requests.pop_front();
        }
        self.requests.push_back(RequestRecord {
            timestamp: self.current_time,
            results,
        });
        if results == 0 {
            self.zero_results += 1;
        }
    }

    /// Run the default search, record its result count, hand the results on
    pub fn add_find_request(
        &mut self,
        engine: &SearchEngine,
        raw_query: &str,
    ) -> Result<Vec<Document>> {
        let result = engine.find_top_documents(raw_query)?;
        self.record(result.len());
        Ok(result)
    }

    pub fn add_find_request_with_status(
        &mut self,
        engine: &SearchEngine,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let result = engine.find_top_documents_with_status(raw_query, status)?;
        self.record(result.len());
        Ok(result)
    }

    /// Queries in the window that returned nothing
    pub fn zero_result_count(&self) -> usize {
        self.zero_results
    }
}
