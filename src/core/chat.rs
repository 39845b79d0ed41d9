//! AI agronomist chat - Conversation transcript and the submit/await state machine.
//!
//! A session is either idle or waiting on exactly one backend call. Submissions
//! while waiting are rejected, as is blank input. Every completed call appends
//! exactly one model message: the backend's answer, or a fixed apology when the
//! backend failed or timed out. There is no retry.

use crate::errors::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// First message of every transcript.
pub const GREETING: &str = "Hello! I am your AI Agronomist assistant. Ask me about pest control, chemical safety, or organic alternatives.";

/// Shown in place of an answer whenever the backend call fails.
pub const APOLOGY: &str =
    "An error occurred while consulting the AI Agronomist. Please try again later.";

/// Default number of turns kept after the greeting (a question and its answer are two).
pub const DEFAULT_HISTORY_TURNS: usize = 40;

/// Used when the backend answers without any text.
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a response at this time.";

/// Who wrote a transcript message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person asking
    User,
    /// The AI agronomist
    Model,
}

/// A citation returned by the backend's search step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    /// Page title
    pub title: String,
    /// Page address
    pub uri: String,
}

/// One transcript entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: ChatRole,
    /// Message body
    pub text: String,
    /// Citations; always empty for user messages
    pub sources: Vec<GroundingSource>,
    /// When the message entered the transcript
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, text: impl Into<String>, sources: Vec<GroundingSource>) -> Self {
        Self {
            role,
            text: text.into(),
            sources,
            sent_at: Utc::now(),
        }
    }

    /// Turns a backend outcome into the model message to display.
    #[must_use]
    pub fn from_outcome(outcome: Result<AgronomistReply>) -> Self {
        match outcome {
            Ok(reply) => Self::new(ChatRole::Model, reply.text, reply.sources),
            Err(e) => {
                warn!("Agronomist backend failed: {e}");
                Self::new(ChatRole::Model, APOLOGY, Vec::new())
            }
        }
    }

    /// Message text followed by a bulleted "Sources:" list when citations exist.
    #[must_use]
    pub fn render(&self) -> String {
        if self.sources.is_empty() {
            return self.text.clone();
        }
        let sources: Vec<String> = self
            .sources
            .iter()
            .map(|s| format!("• [{}]({})", s.title, s.uri))
            .collect();
        format!("{}\n\n**Sources:**\n{}", self.text, sources.join("\n"))
    }
}

/// What the backend returns for one user message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgronomistReply {
    /// Answer text
    pub text: String,
    /// Citations, possibly empty
    pub sources: Vec<GroundingSource>,
}

/// A live conversation with the AI backend.
///
/// Implementations keep whatever multi-turn context they need; callers only
/// hand over the newest user text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one user message and waits for the answer.
    async fn send_message(&self, text: &str) -> Result<AgronomistReply>;
}

/// Opens new backend conversations, one per chat session.
pub trait ConversationStarter: Send + Sync {
    /// Starts a fresh conversation.
    fn start_conversation(&self) -> Arc<dyn ChatBackend>;
}

impl<F> ConversationStarter for F
where
    F: Fn() -> Arc<dyn ChatBackend> + Send + Sync,
{
    fn start_conversation(&self) -> Arc<dyn ChatBackend> {
        self()
    }
}

/// Calls the backend, giving up after `timeout`.
///
/// # Errors
/// Propagates backend errors and returns [`Error::Timeout`] when the bound is hit.
pub async fn send_with_timeout(
    backend: &dyn ChatBackend,
    text: &str,
    timeout: Duration,
) -> Result<AgronomistReply> {
    tokio::time::timeout(timeout, backend.send_message(text))
        .await
        .map_err(|_| Error::Timeout {
            seconds: timeout.as_secs(),
        })?
}

/// Whether a session can take a new submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChatState {
    /// Ready for input
    #[default]
    Idle,
    /// One backend call is in flight; input is disabled
    AwaitingResponse,
}

/// Why a submission was refused. The transcript is untouched in both cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    /// Blank or whitespace-only input
    #[error("message is empty")]
    Empty,
    /// Still waiting on the previous answer
    #[error("still waiting for the previous answer")]
    Busy,
}

/// Transcript plus state machine for one chat window.
#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    state: ChatState,
    history_limit: usize,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// New idle session holding only the greeting.
    #[must_use]
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_TURNS)
    }

    /// Like [`ChatSession::new`], keeping at most `turns` messages after the greeting.
    #[must_use]
    pub fn with_history_limit(turns: usize) -> Self {
        Self {
            transcript: vec![ChatMessage::new(ChatRole::Model, GREETING, Vec::new())],
            state: ChatState::Idle,
            history_limit: turns,
        }
    }

    /// Messages so far, oldest first.
    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ChatState {
        self.state
    }

    /// Accepts a user message and moves to [`ChatState::AwaitingResponse`].
    ///
    /// Returns the text to forward to the backend.
    ///
    /// # Errors
    /// [`SubmitRejection::Empty`] for blank input, [`SubmitRejection::Busy`] while
    /// a previous call is in flight.
    pub fn begin(&mut self, text: &str) -> std::result::Result<String, SubmitRejection> {
        if self.state == ChatState::AwaitingResponse {
            return Err(SubmitRejection::Busy);
        }
        if text.trim().is_empty() {
            return Err(SubmitRejection::Empty);
        }
        self.transcript
            .push(ChatMessage::new(ChatRole::User, text, Vec::new()));
        self.state = ChatState::AwaitingResponse;
        Ok(text.to_string())
    }

    /// Records the backend outcome and returns to [`ChatState::Idle`].
    pub fn complete(&mut self, outcome: Result<AgronomistReply>) -> &ChatMessage {
        self.finish(ChatMessage::from_outcome(outcome))
    }

    fn finish(&mut self, message: ChatMessage) -> &ChatMessage {
        self.transcript.push(message);
        self.state = ChatState::Idle;

        // The greeting stays; the oldest exchanges go first
        let excess = (self.transcript.len() - 1).saturating_sub(self.history_limit);
        if excess > 0 {
            self.transcript.drain(1..=excess);
        }
        &self.transcript[self.transcript.len() - 1]
    }

    /// Runs a full submit → send → complete cycle.
    ///
    /// # Errors
    /// Same rejections as [`ChatSession::begin`]; backend failures are folded into
    /// the apology message instead.
    pub async fn submit(
        &mut self,
        backend: &dyn ChatBackend,
        text: &str,
        timeout: Duration,
    ) -> std::result::Result<&ChatMessage, SubmitRejection> {
        let outgoing = self.begin(text)?;
        let outcome = send_with_timeout(backend, &outgoing, timeout).await;
        Ok(self.complete(outcome))
    }
}

struct Conversation {
    session: ChatSession,
    backend: Arc<dyn ChatBackend>,
}

/// All open chat sessions, keyed by conversation (e.g. a Discord channel id).
///
/// The lock is only held to move a session between states, never across the
/// backend call, so a slow answer in one conversation does not block others.
pub struct ChatDesk {
    starter: Arc<dyn ConversationStarter>,
    timeout: Duration,
    history_limit: usize,
    conversations: Mutex<HashMap<u64, Conversation>>,
}

impl ChatDesk {
    /// Creates an empty desk. `timeout` bounds every backend call.
    #[must_use]
    pub fn new(starter: Arc<dyn ConversationStarter>, timeout: Duration) -> Self {
        Self {
            starter,
            timeout,
            history_limit: DEFAULT_HISTORY_TURNS,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    /// Caps every transcript at `turns` messages after the greeting.
    #[must_use]
    pub fn with_history_limit(mut self, turns: usize) -> Self {
        self.history_limit = turns;
        self
    }

    /// Submits `text` to the conversation `key`, opening it on first use.
    ///
    /// Returns the model message appended for this submission.
    ///
    /// # Errors
    /// See [`ChatSession::begin`].
    pub async fn ask(
        &self,
        key: u64,
        text: &str,
    ) -> std::result::Result<ChatMessage, SubmitRejection> {
        let (outgoing, backend) = {
            let mut conversations = self.conversations.lock().await;
            let conversation = conversations.entry(key).or_insert_with(|| {
                debug!("Opening agronomist conversation {key}");
                Conversation {
                    session: ChatSession::with_history_limit(self.history_limit),
                    backend: self.starter.start_conversation(),
                }
            });
            let outgoing = conversation.session.begin(text)?;
            (outgoing, Arc::clone(&conversation.backend))
        };

        let outcome = send_with_timeout(backend.as_ref(), &outgoing, self.timeout).await;
        let message = ChatMessage::from_outcome(outcome);

        let mut conversations = self.conversations.lock().await;
        match conversations.get_mut(&key) {
            // Only record into the session that issued the call; it may have
            // been reset while we were waiting.
            Some(conversation) if Arc::ptr_eq(&conversation.backend, &backend) => {
                Ok(conversation.session.finish(message).clone())
            }
            _ => Ok(message),
        }
    }

    /// State of conversation `key`; unknown conversations are idle.
    pub async fn state(&self, key: u64) -> ChatState {
        self.conversations
            .lock()
            .await
            .get(&key)
            .map_or(ChatState::Idle, |c| c.session.state())
    }

    /// Copy of the transcript for `key`; unknown conversations show only the greeting.
    pub async fn transcript(&self, key: u64) -> Vec<ChatMessage> {
        self.conversations.lock().await.get(&key).map_or_else(
            || ChatSession::new().transcript().to_vec(),
            |c| c.session.transcript().to_vec(),
        )
    }

    /// Drops conversation `key`. Returns whether one existed.
    pub async fn reset(&self, key: u64) -> bool {
        self.conversations.lock().await.remove(&key).is_some()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_new_session_has_greeting() {
        let session = ChatSession::new();
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, ChatRole::Model);
        assert_eq!(session.transcript()[0].text, GREETING);
    }

    #[tokio::test]
    async fn test_blank_submission_is_noop() {
        let backend = ScriptedBackend::new(vec![]);
        let mut session = ChatSession::new();

        for blank in ["", "   ", "\n\t"] {
            let result = session.submit(&backend, blank, TIMEOUT).await;
            assert_eq!(result.unwrap_err(), SubmitRejection::Empty);
        }
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(backend.calls(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_successful_round_trip_appends_user_and_model() {
        let backend = ScriptedBackend::new(vec![Ok(reply_with_source(
            "Use 22 oz/acre.",
            "Label",
            "https://example.com/label",
        ))]);
        let mut session = ChatSession::new();

        let answer = session
            .submit(&backend, "How much Roundup?", TIMEOUT)
            .await
            .unwrap()
            .clone();
        assert_eq!(answer.role, ChatRole::Model);
        assert_eq!(answer.text, "Use 22 oz/acre.");
        assert_eq!(answer.sources.len(), 1);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, ChatRole::User);
        assert_eq!(transcript[1].text, "How much Roundup?");
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(backend.calls(), ["How much Roundup?"]);
    }

    #[test]
    fn test_render_lists_sources() {
        let plain = ChatMessage::from_outcome(Ok(AgronomistReply {
            text: "No citations.".to_string(),
            sources: Vec::new(),
        }));
        assert_eq!(plain.render(), "No citations.");

        let cited = ChatMessage::from_outcome(Ok(reply_with_source(
            "Rotate modes of action.",
            "IRAC",
            "https://irac.example.org",
        )));
        assert_eq!(
            cited.render(),
            "Rotate modes of action.\n\n**Sources:**\n• [IRAC](https://irac.example.org)"
        );
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_apology() {
        let backend = ScriptedBackend::new(vec![Err(Error::Agronomist {
            message: "500".to_string(),
        })]);
        let mut session = ChatSession::new();

        let answer = session.submit(&backend, "hi", TIMEOUT).await.unwrap();
        assert_eq!(answer.text, APOLOGY);
        assert!(answer.sources.is_empty());
        assert_eq!(session.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_begin_while_awaiting_is_rejected() {
        let mut session = ChatSession::new();
        session.begin("first").unwrap();
        assert_eq!(session.state(), ChatState::AwaitingResponse);

        assert_eq!(session.begin("second"), Err(SubmitRejection::Busy));
        assert_eq!(session.transcript().len(), 2);

        session.complete(Ok(AgronomistReply {
            text: "answer".to_string(),
            sources: Vec::new(),
        }));
        assert_eq!(session.state(), ChatState::Idle);
        assert!(session.begin("second").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_backend_times_out_with_apology() {
        let mut session = ChatSession::new();
        let answer = session
            .submit(&HangingBackend, "anyone there?", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(answer.text, APOLOGY);
        assert_eq!(session.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_desk_rejects_second_question_while_waiting() {
        let gate = Arc::new(GatedBackend::default());
        let desk = Arc::new(ChatDesk::new(gated_starter(&gate), TIMEOUT));

        let pending = tokio::spawn({
            let desk = Arc::clone(&desk);
            async move { desk.ask(1, "first").await }
        });
        while desk.state(1).await != ChatState::AwaitingResponse {
            tokio::task::yield_now().await;
        }

        assert_eq!(desk.ask(1, "second").await, Err(SubmitRejection::Busy));
        assert_eq!(desk.transcript(1).await.len(), 2);

        // Other conversations are unaffected
        assert_eq!(desk.state(2).await, ChatState::Idle);

        gate.release();
        let answer = pending.await.unwrap().unwrap();
        assert_eq!(answer.text, "released");
        assert_eq!(desk.transcript(1).await.len(), 3);
        assert_eq!(desk.state(1).await, ChatState::Idle);
    }

    #[tokio::test]
    async fn test_transcript_keeps_greeting_and_latest_exchanges() {
        let answers = (1..=3)
            .map(|n| {
                Ok(AgronomistReply {
                    text: format!("answer {n}"),
                    sources: Vec::new(),
                })
            })
            .collect();
        let backend = ScriptedBackend::new(answers);
        let mut session = ChatSession::with_history_limit(4);

        for question in ["q1", "q2", "q3"] {
            session.submit(&backend, question, TIMEOUT).await.unwrap();
        }

        let texts: Vec<&str> = session.transcript().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, [GREETING, "q2", "answer 2", "q3", "answer 3"]);
    }

    #[tokio::test]
    async fn test_answer_after_reset_is_not_recorded_in_new_conversation() {
        let (starter, opened) = gated_starter_per_conversation();
        let desk = Arc::new(ChatDesk::new(starter, TIMEOUT));

        let first = tokio::spawn({
            let desk = Arc::clone(&desk);
            async move { desk.ask(1, "before reset").await }
        });
        while desk.state(1).await != ChatState::AwaitingResponse {
            tokio::task::yield_now().await;
        }
        assert!(desk.reset(1).await);

        let second = tokio::spawn({
            let desk = Arc::clone(&desk);
            async move { desk.ask(1, "after reset").await }
        });
        while desk.state(1).await != ChatState::AwaitingResponse {
            tokio::task::yield_now().await;
        }

        // The stale answer goes back to its caller only
        let first_backend = Arc::clone(&opened.lock().unwrap()[0]);
        first_backend.release();
        assert_eq!(first.await.unwrap().unwrap().text, "released");

        let transcript = desk.transcript(1).await;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].text, "after reset");
        assert_eq!(desk.state(1).await, ChatState::AwaitingResponse);

        let second_backend = Arc::clone(&opened.lock().unwrap()[1]);
        second_backend.release();
        second.await.unwrap().unwrap();
        assert_eq!(desk.transcript(1).await.len(), 3);
        assert_eq!(desk.state(1).await, ChatState::Idle);
    }

    #[tokio::test]
    async fn test_desk_reset_starts_fresh_conversation() {
        let starter: Arc<dyn ConversationStarter> = Arc::new(|| -> Arc<dyn ChatBackend> {
            Arc::new(ScriptedBackend::new(vec![Ok(AgronomistReply {
                text: "ok".to_string(),
                sources: Vec::new(),
            })]))
        });
        let desk = ChatDesk::new(starter, TIMEOUT);

        desk.ask(7, "hello").await.unwrap();
        assert_eq!(desk.transcript(7).await.len(), 3);

        assert!(desk.reset(7).await);
        assert!(!desk.reset(7).await);
        assert_eq!(desk.transcript(7).await.len(), 1);
    }
}
