//! HTTP client for the Ratatoskr API.

use super::types::{
    LinkRequest, QueryAccepted, QueryRequest, QueryStatus, SearchRequest, SummaryRequest,
};
use crate::error::ClientError;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:6666";

/// The calls the frontend makes against the backend.
///
/// Implemented by [`ApiClient`] over HTTP; tests substitute scripted backends.
pub trait Backend: Send + Sync {
    /// Submit a dialog query; the backend answers with a handle to poll.
    fn submit_query(&self, request: &QueryRequest) -> Result<QueryAccepted, ClientError>;

    /// Fetch the current status of a submitted query.
    fn query_status(&self, query_id: &str) -> Result<QueryStatus, ClientError>;

    /// Run a synchronous search against `/api/{mode}_search`.
    fn search(&self, mode: &str, request: &SearchRequest) -> Result<Value, ClientError>;

    /// Summarize the comma separated list of sources. Returns the plain-text body.
    fn metadata_summary(&self, sources: &str) -> Result<String, ClientError>;

    /// Submit a link for ingestion.
    fn submit_link(&self, link: &str) -> Result<(), ClientError>;
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client ({}), using defaults", e);
                Client::new()
            });
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post_json<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<Response, ClientError> {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(ClientError::from_reqwest)?;
        check_status(resp)
    }
}

fn check_status(resp: Response) -> Result<Response, ClientError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(ClientError::Http {
            status: resp.status().as_u16(),
        })
    }
}

fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    resp.json().map_err(|e| ClientError::Parse(e.to_string()))
}

impl Backend for ApiClient {
    fn submit_query(&self, request: &QueryRequest) -> Result<QueryAccepted, ClientError> {
        let resp = self.post_json("/api/query", request)?;
        read_json(resp)
    }

    fn query_status(&self, query_id: &str) -> Result<QueryStatus, ClientError> {
        let url = format!(
            "{}?query_id={}",
            self.url("/api/query_status"),
            urlencoding::encode(query_id)
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(ClientError::from_reqwest)?;
        read_json(check_status(resp)?)
    }

    fn search(&self, mode: &str, request: &SearchRequest) -> Result<Value, ClientError> {
        let path = format!("/api/{}_search", mode);
        let resp = self.post_json(&path, request)?;
        read_json(resp)
    }

    fn metadata_summary(&self, sources: &str) -> Result<String, ClientError> {
        let body = SummaryRequest {
            sources: sources.to_string(),
        };
        let resp = self.post_json("/api/metadata_summary", &body)?;
        resp.text().map_err(ClientError::from_reqwest)
    }

    fn submit_link(&self, link: &str) -> Result<(), ClientError> {
        let body = LinkRequest {
            link: link.to_string(),
        };
        self.post_json("/api/submit_link", &body).map(|_| ())
    }
}
