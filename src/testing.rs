//! Scripted in-memory backend for unit tests.

use crate::api::{Backend, QueryAccepted, QueryRequest, QueryStatus, SearchRequest};
use crate::error::ClientError;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

/// Answers each call from a queue. Status polls fall back to `pending` when the queue
/// is empty; other calls fall back to a network error.
#[derive(Default)]
pub struct ScriptedBackend {
    submits: Mutex<VecDeque<Result<QueryAccepted, ClientError>>>,
    statuses: Mutex<VecDeque<Result<QueryStatus, ClientError>>>,
    searches: Mutex<VecDeque<Result<Value, ClientError>>>,
    summaries: Mutex<VecDeque<Result<String, ClientError>>>,
    links: Mutex<VecDeque<Result<(), ClientError>>>,

    submitted: Mutex<Vec<QueryRequest>>,
    status_calls: Mutex<Vec<(String, Instant)>>,
    search_calls: Mutex<Vec<(String, u32)>>,
    summary_calls: Mutex<Vec<String>>,
    link_calls: Mutex<Vec<String>>,
}

fn exhausted<T>() -> Result<T, ClientError> {
    Err(ClientError::Network("script exhausted".to_string()))
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_submit(&self, result: Result<QueryAccepted, ClientError>) {
        self.submits.lock().unwrap().push_back(result);
    }

    pub fn accept(&self, query_id: &str) {
        self.push_submit(Ok(QueryAccepted {
            query_id: query_id.to_string(),
            status: Some("submitted".to_string()),
        }));
    }

    pub fn push_status(&self, result: Result<QueryStatus, ClientError>) {
        self.statuses.lock().unwrap().push_back(result);
    }

    pub fn push_search(&self, result: Result<Value, ClientError>) {
        self.searches.lock().unwrap().push_back(result);
    }

    pub fn push_summary(&self, result: Result<String, ClientError>) {
        self.summaries.lock().unwrap().push_back(result);
    }

    pub fn push_link(&self, result: Result<(), ClientError>) {
        self.links.lock().unwrap().push_back(result);
    }

    pub fn submitted(&self) -> Vec<QueryRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> Vec<(String, Instant)> {
        self.status_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn summary_calls(&self) -> Vec<String> {
        self.summary_calls.lock().unwrap().clone()
    }

    pub fn link_calls(&self) -> Vec<String> {
        self.link_calls.lock().unwrap().clone()
    }
}

impl Backend for ScriptedBackend {
    fn submit_query(&self, request: &QueryRequest) -> Result<QueryAccepted, ClientError> {
        self.submitted.lock().unwrap().push(request.clone());
        self.submits.lock().unwrap().pop_front().unwrap_or_else(exhausted)
    }

    fn query_status(&self, query_id: &str) -> Result<QueryStatus, ClientError> {
        self.status_calls
            .lock()
            .unwrap()
            .push((query_id.to_string(), Instant::now()));
        self.statuses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(QueryStatus {
                status: "pending".to_string(),
                response: None,
                error: None,
            })
        })
    }

    fn search(&self, mode: &str, request: &SearchRequest) -> Result<Value, ClientError> {
        self.search_calls
            .lock()
            .unwrap()
            .push((mode.to_string(), request.max_results));
        self.searches.lock().unwrap().pop_front().unwrap_or_else(exhausted)
    }

    fn metadata_summary(&self, sources: &str) -> Result<String, ClientError> {
        self.summary_calls.lock().unwrap().push(sources.to_string());
        self.summaries.lock().unwrap().pop_front().unwrap_or_else(exhausted)
    }

    fn submit_link(&self, link: &str) -> Result<(), ClientError> {
        self.link_calls.lock().unwrap().push(link.to_string());
        self.links.lock().unwrap().pop_front().unwrap_or_else(exhausted)
    }
}
