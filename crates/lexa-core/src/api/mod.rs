//! Request Gateway for the Lexa backend.
//!
//! Wraps outbound HTTP calls: attaches the base URL and API key header,
//! normalizes error responses into [`ApiError`], and exposes the streaming
//! endpoints as async streams of [`StreamEvent`]s.

mod client;
mod error;
mod sse;
mod types;

pub use client::{ApiClient, DEFAULT_BASE_URL, EventStream};
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use sse::{SseParser, StreamEvent};
pub use types::{
    AdviseRequest, AdviseResponse, AnalyzeRequest, AnalyzeResponse, ApiChatMessage, Clarification,
    DraftRequest, DraftResponse, HealthStatus,
};
