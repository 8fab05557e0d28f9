use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use backend::ChatBackend;
use legal_core::model::{ChatMessage, ChatTopic};

use crate::Clock;
use crate::error::ChatError;

#[derive(Debug, Clone, Default)]
struct ChatState {
    transcript: Vec<ChatMessage>,
    topic: Option<String>,
    pending: bool,
    last_error: Option<String>,
}

/// Tutor conversation: transcript, current topic and the in-flight request.
#[derive(Clone)]
pub struct ChatService {
    clock: Clock,
    backend: Arc<dyn ChatBackend>,
    state: Arc<Mutex<ChatState>>,
}

impl ChatService {
    #[must_use]
    pub fn new(clock: Clock, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            clock,
            backend,
            state: Arc::new(Mutex::new(ChatState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send a message to the tutor.
    ///
    /// Blank text is ignored. On failure the transcript still gains an
    /// assistant entry flagged as an error, so the conversation reads coherently.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Busy` while another message is in flight and
    /// `ChatError::Backend` if the request fails.
    #[tracing::instrument(level = "debug", skip(self, text))]
    pub async fn send(&self, text: &str, topic: Option<&str>) -> Result<(), ChatError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        {
            let mut state = self.state();
            if state.pending {
                return Err(ChatError::Busy);
            }
            state.transcript.push(ChatMessage::user(text, self.clock.now()));
            state.pending = true;
            state.last_error = None;
        }

        let result = self.backend.send_message(text, topic).await;

        let mut state = self.state();
        state.pending = false;
        match result {
            Ok(reply) => {
                if let Some(topic) = reply.topic {
                    state.topic = Some(topic);
                }
                state.transcript.push(ChatMessage::assistant(
                    reply.response,
                    reply.sources,
                    self.clock.now(),
                ));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                state.last_error = Some(err.user_message());
                state
                    .transcript
                    .push(ChatMessage::assistant_error(self.clock.now()));
                Err(err.into())
            }
        }
    }

    /// Available topics; empty when the request fails.
    pub async fn topics(&self) -> Vec<ChatTopic> {
        match self.backend.topics().await {
            Ok(topics) => topics,
            Err(err) => {
                tracing::warn!(error = %err, "chat topics unavailable");
                Vec::new()
            }
        }
    }

    /// Empty the transcript and forget the topic and the last error.
    pub fn clear(&self) {
        let mut state = self.state();
        state.transcript.clear();
        state.topic = None;
        state.last_error = None;
    }

    pub fn set_topic(&self, topic: Option<String>) {
        self.state().topic = topic.filter(|t| !t.trim().is_empty());
    }

    #[must_use]
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.state().transcript.clone()
    }

    #[must_use]
    pub fn current_topic(&self) -> Option<String> {
        self.state().topic.clone()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state().pending
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::{InMemoryBackend, Operation};
    use legal_core::model::{CHAT_ERROR_REPLY, ChatReply, ChatRole};
    use legal_core::time::fixed_clock;

    fn service(backend: &InMemoryBackend) -> ChatService {
        ChatService::new(fixed_clock(), Arc::new(backend.clone()))
    }

    #[tokio::test]
    async fn blank_messages_are_not_sent() {
        let backend = InMemoryBackend::new();
        let chat = service(&backend);

        chat.send("   ", None).await.unwrap();

        assert!(chat.transcript().is_empty());
        assert_eq!(backend.calls(Operation::SendMessage), 0);
    }

    #[tokio::test]
    async fn reply_is_appended_and_topic_adopted() {
        let backend = InMemoryBackend::new();
        backend.set_chat_reply(ChatReply {
            response: "An offer is a manifestation of willingness to bargain.".into(),
            sources: vec!["Restatement (Second) of Contracts §24".into()],
            topic: Some("contracts".into()),
        });
        let chat = service(&backend);

        chat.send("What is an offer?", None).await.unwrap();

        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role(), ChatRole::User);
        assert_eq!(transcript[1].role(), ChatRole::Assistant);
        assert_eq!(transcript[1].sources().len(), 1);
        assert_eq!(chat.current_topic().as_deref(), Some("contracts"));
        assert!(!chat.is_pending());
    }

    #[tokio::test]
    async fn failure_appends_error_reply() {
        let backend = InMemoryBackend::new();
        backend.fail(Operation::SendMessage, "tutor offline");
        let chat = service(&backend);

        let err = chat.send("Explain estoppel", None).await.unwrap_err();
        assert!(matches!(err, ChatError::Backend(_)));

        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 2);
        assert!(transcript[1].is_error());
        assert_eq!(transcript[1].content(), CHAT_ERROR_REPLY);
        assert_eq!(chat.last_error().as_deref(), Some("tutor offline"));
    }

    #[tokio::test]
    async fn clear_resets_everything() {
        let backend = InMemoryBackend::new();
        let chat = service(&backend);
        chat.set_topic(Some("torts".into()));
        chat.send("Duty of care?", None).await.unwrap();

        chat.clear();

        assert!(chat.transcript().is_empty());
        assert_eq!(chat.current_topic(), None);
        assert_eq!(chat.last_error(), None);
    }

    #[tokio::test]
    async fn topics_fall_back_to_empty() {
        let backend = InMemoryBackend::new();
        backend.set_topics(vec![ChatTopic {
            id: "contracts".into(),
            name: "Contract Law".into(),
        }]);
        let chat = service(&backend);
        assert_eq!(chat.topics().await.len(), 1);

        backend.fail(Operation::Topics, "offline");
        assert!(chat.topics().await.is_empty());
    }
}
