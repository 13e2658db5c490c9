//! Wire types for the Ratatoskr HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub user: String,
    pub session: String,
    pub model: String,
    pub query: String,
    pub use_rag_database: bool,
}

/// Response of `POST /api/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryAccepted {
    pub query_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Response of `GET /api/query_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryStatus {
    pub status: String,
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl QueryStatus {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

/// Body of `POST /api/{mode}_search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
}

/// One hit returned by the vector search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VectorHit {
    pub metadata_source: String,
    pub page_content: String,
}

/// Body of `POST /api/metadata_summary`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest {
    pub sources: String,
}

/// Body of `POST /api/submit_link`.
#[derive(Debug, Clone, Serialize)]
pub struct LinkRequest {
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_field_names() {
        let req = QueryRequest {
            user: "ana".into(),
            session: "s-1".into(),
            model: "llama3".into(),
            query: "hi".into(),
            use_rag_database: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["use_rag_database"], Value::Bool(true));
        assert_eq!(json["session"], "s-1");
    }

    #[test]
    fn test_status_without_response() {
        let status: QueryStatus = serde_json::from_str(r#"{"query_id":"q","status":"pending"}"#).unwrap();
        assert!(!status.is_completed());
        assert!(status.response.is_none());
    }

    #[test]
    fn test_backend_error_status() {
        let status: QueryStatus =
            serde_json::from_str(r#"{"status":"error","error":"model offline"}"#).unwrap();
        assert!(status.is_error());
        assert_eq!(status.error.as_deref(), Some("model offline"));
    }
}
