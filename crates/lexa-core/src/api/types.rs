//! Wire types for the Lexa backend API.

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;
use crate::session::intake::Questionnaire;

/// A structured follow-up question attached to an assistant reply.
///
/// The backend emits one when it needs more input from the user before it
/// can proceed (e.g. which legal form the user is leaning towards).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clarification {
    /// The question to put to the user.
    pub question: String,
    /// Intake field the answer should flow into, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Suggested answers, possibly empty for free-form questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

/// A chat message in API format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for the advise endpoints.
#[derive(Debug, Serialize)]
pub struct AdviseRequest<'a> {
    pub jurisdiction: &'a str,
    pub messages: Vec<ApiChatMessage>,
}

/// Response from `POST /v1/advise`.
#[derive(Debug, Deserialize)]
pub struct AdviseResponse {
    pub reply: String,
    #[serde(default)]
    pub clarification: Option<Clarification>,
}

/// Request body for the analyze endpoints.
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub country: &'a str,
    pub questionnaire: &'a Questionnaire,
}

/// Response from `POST /v1/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub summary: String,
}

/// Request body for the draft endpoints.
#[derive(Debug, Serialize)]
pub struct DraftRequest<'a> {
    pub document_kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<&'a str>,
    pub profile: &'a UserProfile,
}

/// Response from `POST /v1/draft`.
#[derive(Debug, Deserialize)]
pub struct DraftResponse {
    pub document: String,
}

/// Response from `GET /v1/health`.
#[derive(Debug, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}
