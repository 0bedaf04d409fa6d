use std::pin::Pin;

use eventsource_stream::{EventStream, Eventsource};
use futures_util::Stream;
use serde::Deserialize;

use super::error::{ApiError, ApiResult};
use super::types::Clarification;

/// An event from a streaming endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Keep-alive, no payload.
    Ping,
    /// Incremental text to append to the in-flight response.
    Chunk { text: String },
    /// The backend started (or, with `None`, finished) running a tool.
    Tool { name: Option<String> },
    /// Structured follow-up question for the current reply.
    Clarification { clarification: Clarification },
    /// The response is complete.
    Completed,
    /// Error reported by the backend mid-stream.
    Error {
        code: Option<String>,
        message: String,
    },
}

/// SSE parser that converts a byte stream into `StreamEvent`s.
pub struct SseParser<S> {
    inner: EventStream<S>,
}

impl<S> SseParser<S> {
    pub fn new(stream: S) -> Self
    where
        S: Eventsource,
    {
        Self {
            inner: stream.eventsource(),
        }
    }
}

impl<S, E> Stream for SseParser<S>
where
    S: Stream<Item = std::result::Result<bytes::Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    type Item = ApiResult<StreamEvent>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        use std::task::Poll;

        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(event))) => {
                Poll::Ready(Some(parse_event_fields(&event.event, &event.data)))
            }
            Poll::Ready(Some(Err(e))) => {
                Poll::Ready(Some(Err(ApiError::parse(format!("SSE stream error: {e}")))))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Parses a single SSE event (name + data) into a `StreamEvent`.
fn parse_event_fields(event_type: &str, data: &str) -> ApiResult<StreamEvent> {
    let data = if data.trim().is_empty() {
        None
    } else {
        Some(data)
    };

    match event_type {
        "ping" => Ok(StreamEvent::Ping),
        "chunk" => {
            let data = data.ok_or_else(|| ApiError::parse("Missing data for chunk"))?;
            let parsed: SseChunk = serde_json::from_str(data)
                .map_err(|err| ApiError::parse(format!("Failed to parse chunk: {err}")))?;
            Ok(StreamEvent::Chunk { text: parsed.text })
        }
        "tool" => {
            let data = data.ok_or_else(|| ApiError::parse("Missing data for tool"))?;
            let parsed: SseTool = serde_json::from_str(data)
                .map_err(|err| ApiError::parse(format!("Failed to parse tool: {err}")))?;
            Ok(StreamEvent::Tool { name: parsed.name })
        }
        "clarification" => {
            let data = data.ok_or_else(|| ApiError::parse("Missing data for clarification"))?;
            let clarification: Clarification = serde_json::from_str(data)
                .map_err(|err| ApiError::parse(format!("Failed to parse clarification: {err}")))?;
            Ok(StreamEvent::Clarification { clarification })
        }
        "done" => Ok(StreamEvent::Completed),
        "error" => {
            let data = data.ok_or_else(|| ApiError::parse("Missing data for error event"))?;
            let parsed: SseError = serde_json::from_str(data)
                .map_err(|err| ApiError::parse(format!("Failed to parse error: {err}")))?;
            Ok(StreamEvent::Error {
                code: parsed.code,
                message: parsed.message,
            })
        }
        other => Err(ApiError::parse(format!("Unknown SSE event type: {other}"))),
    }
}

// === SSE Response Structures ===

#[derive(Debug, Deserialize)]
struct SseChunk {
    text: String,
}

#[derive(Debug, Deserialize)]
struct SseTool {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SseError {
    #[serde(default)]
    code: Option<String>,
    message: String,
}
