//! Conversation Entity
//!
//! Append-only message log for a chat session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Sender;

/// Greeting every new conversation opens with
pub const CHAT_GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";

/// Assistant stand-in appended when a chat call fails
pub const CHAT_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Position-derived id, strictly increasing within a conversation
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Ordered, append-only sequence of messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
    next_id: u64,
}

impl Conversation {
    /// Start a conversation with the assistant greeting
    pub fn new() -> Self {
        let mut conversation = Self::empty();
        conversation.append(Sender::Assistant, CHAT_GREETING);
        conversation
    }

    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a message and return a copy of it
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> ConversationMessage {
        let message = ConversationMessage {
            id: self.next_id,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_has_greeting() {
        let conversation = Conversation::new();
        assert_eq!(conversation.len(), 1);
        let first = &conversation.messages()[0];
        assert_eq!(first.text, CHAT_GREETING);
        assert_eq!(first.sender, Sender::Assistant);
    }

    #[test]
    fn test_ids_increase_in_append_order() {
        let mut conversation = Conversation::new();
        let a = conversation.append(Sender::User, "one");
        let b = conversation.append(Sender::Assistant, "two");
        assert!(a.id < b.id);
        assert!(conversation.messages()[0].id < a.id);
        assert_eq!(conversation.last().map(|m| m.text.as_str()), Some("two"));
    }
}
