//! Application context.
//!
//! The context object owns the configuration, the gateway client and the
//! stores. It is created once by the application root and handed to
//! consumers explicitly; there is no process-wide mutable state.
//!
//! The turn drivers here implement the control flow
//! event → store mutation → gateway call → streamed response → store
//! mutation. Stores surface failures through their `error` field so a
//! renderer can display them; the drivers additionally propagate the error
//! to the caller.

use anyhow::Result;
use futures_util::StreamExt;

use crate::api::{
    AdviseRequest, AnalyzeRequest, ApiChatMessage, ApiClient, ApiError, DraftRequest, StreamEvent,
};
use crate::config::Config;
use crate::profile::{ProfilePatch, ProfileState, ProfileStore};
use crate::session::conversation::{ConversationState, MessageDraft};
use crate::session::intake::IntakeState;

/// Composition root for the client core.
pub struct AppContext {
    pub config: Config,
    pub client: ApiClient,
    pub conversation: ConversationState,
    pub intake: IntakeState,
    pub profile: ProfileState,
    store: ProfileStore,
}

impl AppContext {
    /// Builds a context from configuration, with the profile persisted at
    /// the default location.
    pub fn new(config: Config) -> Self {
        Self::with_store(config, ProfileStore::new())
    }

    /// Builds a context with an explicit profile store location.
    pub fn with_store(config: Config, store: ProfileStore) -> Self {
        let client = ApiClient::from_config(&config);
        let conversation = ConversationState::new(config.jurisdiction.clone());
        Self {
            client,
            conversation,
            intake: IntakeState::new(),
            profile: ProfileState::default(),
            store,
            config,
        }
    }

    /// Restores the persisted profile, then signals hydration completion.
    pub fn hydrate(&mut self) -> Result<()> {
        self.profile.profile = self.store.load()?;
        self.profile.set_loaded(true);
        tracing::debug!("profile hydrated");
        Ok(())
    }

    /// Applies a profile patch and writes the result back to storage.
    pub fn update_profile(&mut self, patch: ProfilePatch) -> Result<()> {
        self.profile.update_profile(patch);
        self.store.save(&self.profile.profile)
    }

    /// Restores the default profile and writes it back to storage.
    pub fn reset_profile(&mut self) -> Result<()> {
        self.profile.reset_profile();
        self.store.save(&self.profile.profile)
    }

    /// Runs one chat turn against the streaming advise endpoint.
    ///
    /// Appends the user message and an empty streaming assistant message,
    /// then routes stream events into the conversation store as they
    /// arrive. `on_delta` sees each text chunk (for live rendering).
    /// Returns the assistant message id.
    pub async fn send_message<F>(&mut self, content: &str, mut on_delta: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        self.conversation.set_error(None);
        self.conversation.add_message(MessageDraft::user(content));
        let history = self.chat_history();
        let assistant_id = self
            .conversation
            .add_message(MessageDraft::assistant("").streaming());
        self.conversation.set_loading(true);

        let jurisdiction = self.conversation.jurisdiction.clone();
        let request = AdviseRequest {
            jurisdiction: &jurisdiction,
            messages: history,
        };

        let mut stream = match self.client.advise_stream(&request).await {
            Ok(stream) => stream,
            Err(err) => {
                self.conversation.set_error(Some(err.to_string()));
                self.finish_turn(&assistant_id);
                return Err(err.into());
            }
        };

        let mut reply = String::new();
        let mut failure: Option<ApiError> = None;

        while let Some(event) = stream.next().await {
            match event {
                Ok(StreamEvent::Chunk { text }) => {
                    reply.push_str(&text);
                    self.conversation.update_message(&assistant_id, reply.clone());
                    on_delta(&text);
                }
                Ok(StreamEvent::Tool { name }) => self.conversation.set_current_tool(name),
                Ok(StreamEvent::Clarification { clarification }) => {
                    self.conversation
                        .set_clarification(&assistant_id, Some(clarification));
                }
                Ok(StreamEvent::Completed) => break,
                Ok(StreamEvent::Ping) => {}
                Ok(StreamEvent::Error { code, message }) => {
                    failure = Some(ApiError::api(code, message));
                    break;
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        self.finish_turn(&assistant_id);

        if let Some(err) = failure {
            tracing::warn!(error = %err, "advise stream failed");
            self.conversation.set_error(Some(err.to_string()));
            return Err(err.into());
        }
        Ok(assistant_id)
    }

    /// One-shot chat turn against the synchronous advise endpoint.
    /// Returns the assistant message id.
    pub async fn ask(&mut self, content: &str) -> Result<String> {
        self.conversation.set_error(None);
        self.conversation.add_message(MessageDraft::user(content));
        let history = self.chat_history();
        self.conversation.set_loading(true);

        let jurisdiction = self.conversation.jurisdiction.clone();
        let request = AdviseRequest {
            jurisdiction: &jurisdiction,
            messages: history,
        };

        let result = self.client.advise(&request).await;
        self.conversation.set_loading(false);

        match result {
            Ok(response) => {
                let id = self.conversation.add_message(MessageDraft::assistant(response.reply));
                self.conversation.set_clarification(&id, response.clarification);
                Ok(id)
            }
            Err(err) => {
                self.conversation.set_error(Some(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Streams the intake analysis for the current country and
    /// questionnaire, accumulating chunks into the result buffer.
    pub async fn run_analysis<F>(&mut self, mut on_delta: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        self.intake.set_error(None);
        self.intake.set_result("");
        self.intake.set_loading(true);

        let country = self.intake.country.clone();
        let questionnaire = self.intake.questionnaire.clone();
        let request = AnalyzeRequest {
            country: &country,
            questionnaire: &questionnaire,
        };

        let mut stream = match self.client.analyze_stream(&request).await {
            Ok(stream) => stream,
            Err(err) => {
                self.intake.set_loading(false);
                self.intake.set_error(Some(err.to_string()));
                return Err(err.into());
            }
        };

        let mut failure: Option<ApiError> = None;

        while let Some(event) = stream.next().await {
            match event {
                Ok(StreamEvent::Chunk { text }) => {
                    self.intake.append_result(&text);
                    on_delta(&text);
                }
                Ok(StreamEvent::Tool { name }) => self.intake.set_current_tool(name),
                Ok(StreamEvent::Completed) => break,
                Ok(StreamEvent::Ping | StreamEvent::Clarification { .. }) => {}
                Ok(StreamEvent::Error { code, message }) => {
                    failure = Some(ApiError::api(code, message));
                    break;
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        self.intake.set_current_tool(None);
        self.intake.set_loading(false);

        if let Some(err) = failure {
            tracing::warn!(error = %err, "analyze stream failed");
            self.intake.set_error(Some(err.to_string()));
            return Err(err.into());
        }
        Ok(())
    }

    /// One-shot intake analysis; the summary replaces the result buffer.
    pub async fn analyze_once(&mut self) -> Result<String> {
        self.intake.set_error(None);
        self.intake.set_loading(true);

        let country = self.intake.country.clone();
        let questionnaire = self.intake.questionnaire.clone();
        let request = AnalyzeRequest {
            country: &country,
            questionnaire: &questionnaire,
        };

        let result = self.client.analyze(&request).await;
        self.intake.set_loading(false);

        match result {
            Ok(response) => {
                self.intake.set_result(response.summary.clone());
                Ok(response.summary)
            }
            Err(err) => {
                self.intake.set_error(Some(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Streams a document drafted from the hydrated profile.
    /// Returns the accumulated document text.
    pub async fn draft_document<F>(
        &mut self,
        kind: &str,
        instructions: Option<&str>,
        mut on_delta: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        anyhow::ensure!(
            self.profile.loaded,
            "profile not hydrated; call hydrate() first"
        );

        let profile = self.profile.profile.clone();
        let request = DraftRequest {
            document_kind: kind,
            instructions,
            profile: &profile,
        };

        let mut stream = self.client.draft_stream(&request).await?;
        let mut document = String::new();

        while let Some(event) = stream.next().await {
            match event {
                Ok(StreamEvent::Chunk { text }) => {
                    document.push_str(&text);
                    on_delta(&text);
                }
                Ok(StreamEvent::Completed) => break,
                Ok(StreamEvent::Ping | StreamEvent::Tool { .. }) => {}
                Ok(StreamEvent::Clarification { .. }) => {}
                Ok(StreamEvent::Error { code, message }) => {
                    return Err(ApiError::api(code, message).into());
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(document)
    }

    /// One-shot document draft from the hydrated profile.
    pub async fn draft_once(&mut self, kind: &str, instructions: Option<&str>) -> Result<String> {
        anyhow::ensure!(
            self.profile.loaded,
            "profile not hydrated; call hydrate() first"
        );

        let profile = self.profile.profile.clone();
        let request = DraftRequest {
            document_kind: kind,
            instructions,
            profile: &profile,
        };

        let response = self.client.draft(&request).await?;
        Ok(response.document)
    }

    /// Conversation history in API format, excluding in-flight placeholders.
    fn chat_history(&self) -> Vec<ApiChatMessage> {
        self.conversation
            .messages
            .iter()
            .filter(|m| !m.is_streaming)
            .map(|m| ApiChatMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect()
    }

    /// Clears the per-turn flags once a streamed reply ends, however it ends.
    fn finish_turn(&mut self, assistant_id: &str) {
        self.conversation.set_streaming(assistant_id, false);
        self.conversation.set_current_tool(None);
        self.conversation.set_loading(false);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::profile::UserProfile;

    fn test_config() -> Config {
        Config {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        }
    }

    /// Hydration restores persisted fields and flips the loaded flag.
    #[test]
    fn test_hydrate_restores_profile_and_sets_loaded() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profile.toml"));
        store
            .save(&UserProfile {
                first_name: "Camille".to_string(),
                ..UserProfile::default()
            })
            .unwrap();

        let mut ctx = AppContext::with_store(test_config(), store);
        assert!(!ctx.profile.loaded);

        ctx.hydrate().unwrap();

        assert!(ctx.profile.loaded);
        assert_eq!(ctx.profile.profile.first_name, "Camille");
    }

    /// Every profile mutation through the context is written back.
    #[test]
    fn test_update_profile_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.toml");

        let mut ctx = AppContext::with_store(test_config(), ProfileStore::at(&path));
        ctx.hydrate().unwrap();
        ctx.update_profile(ProfilePatch {
            city: Some("Paris".to_string()),
            ..ProfilePatch::default()
        })
        .unwrap();

        let reloaded = ProfileStore::at(&path).load().unwrap();
        assert_eq!(reloaded.city, "Paris");
    }

    /// Drafting before hydration is refused.
    #[tokio::test]
    async fn test_draft_requires_hydration() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profile.toml"));
        let mut ctx = AppContext::with_store(test_config(), store);

        let result = ctx.draft_once("statuts", None).await;
        assert!(result.unwrap_err().to_string().contains("not hydrated"));
    }

    /// The conversation store starts on the configured jurisdiction.
    #[test]
    fn test_conversation_inherits_configured_jurisdiction() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profile.toml"));
        let config = Config {
            jurisdiction: "BE".to_string(),
            ..test_config()
        };

        let ctx = AppContext::with_store(config, store);
        assert_eq!(ctx.conversation.jurisdiction, "BE");
    }
}
