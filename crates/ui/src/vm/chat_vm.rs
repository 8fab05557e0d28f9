use legal_core::model::{ChatMessage, ChatRole};

use crate::vm::time_fmt::format_datetime;

/// Sources shown under an assistant reply.
pub const BUBBLE_SOURCE_LIMIT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BubbleTone {
    User,
    Assistant,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageBubbleVm {
    pub tone: BubbleTone,
    pub content: String,
    pub sources: Vec<String>,
    pub sent_at_str: String,
}

impl MessageBubbleVm {
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.tone == BubbleTone::User
    }
}

impl From<&ChatMessage> for MessageBubbleVm {
    fn from(message: &ChatMessage) -> Self {
        let tone = match message.role() {
            ChatRole::User => BubbleTone::User,
            ChatRole::Assistant if message.is_error() => BubbleTone::Error,
            ChatRole::Assistant => BubbleTone::Assistant,
        };
        Self {
            tone,
            content: message.content().to_owned(),
            sources: message
                .sources()
                .iter()
                .take(BUBBLE_SOURCE_LIMIT)
                .cloned()
                .collect(),
            sent_at_str: format_datetime(message.sent_at()),
        }
    }
}

#[must_use]
pub fn map_transcript(messages: &[ChatMessage]) -> Vec<MessageBubbleVm> {
    messages.iter().map(MessageBubbleVm::from).collect()
}
