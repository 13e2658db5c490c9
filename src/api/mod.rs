//! API client module for communicating with the Ratatoskr backend.

mod client;
pub mod types;

pub use client::{ApiClient, Backend, DEFAULT_API_BASE};
pub use types::{QueryAccepted, QueryRequest, QueryStatus, SearchRequest, VectorHit};
