use chrono::{DateTime, Utc};

use crate::model::ids::MessageId;

/// Text shown in place of an assistant reply when a chat request fails.
pub const CHAT_ERROR_REPLY: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry of the tutor transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: MessageId,
    role: ChatRole,
    content: String,
    sent_at: DateTime<Utc>,
    sources: Vec<String>,
    is_error: bool,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::generate(),
            role: ChatRole::User,
            content: content.into(),
            sent_at,
            sources: Vec::new(),
            is_error: false,
        }
    }

    #[must_use]
    pub fn assistant(
        content: impl Into<String>,
        sources: Vec<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            role: ChatRole::Assistant,
            content: content.into(),
            sent_at,
            sources,
            is_error: false,
        }
    }

    /// Synthetic assistant message that keeps the transcript coherent after a failure.
    #[must_use]
    pub fn assistant_error(sent_at: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::generate(),
            role: ChatRole::Assistant,
            content: CHAT_ERROR_REPLY.to_owned(),
            sent_at,
            sources: Vec::new(),
            is_error: true,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    #[must_use]
    pub fn role(&self) -> ChatRole {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

/// Backend reply to a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatReply {
    pub response: String,
    pub sources: Vec<String>,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTopic {
    pub id: String,
    pub name: String,
}

/// Past conversation listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatSession {
    pub id: Option<String>,
    pub topic: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ChatSession {
    #[must_use]
    pub fn topic_label(&self) -> &str {
        self.topic.as_deref().unwrap_or("General Discussion")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn error_reply_is_assistant_and_flagged() {
        let msg = ChatMessage::assistant_error(fixed_now());
        assert_eq!(msg.role(), ChatRole::Assistant);
        assert!(msg.is_error());
        assert_eq!(msg.content(), CHAT_ERROR_REPLY);
    }

    #[test]
    fn session_topic_falls_back() {
        assert_eq!(ChatSession::default().topic_label(), "General Discussion");
    }
}
