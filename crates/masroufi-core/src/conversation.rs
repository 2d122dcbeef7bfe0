use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Reply shown in place of the assistant's answer when the call fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't process your request right now. Please try again in a moment.";

/// The assistant chat log kept for the current session.
///
/// Each exchange is independent: nothing here is sent back upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// True when `content` is the canned fallback.
    #[serde(default)]
    pub failed: bool,
    pub timestamp: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl Conversation {
    pub fn push_user(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatRole::User, content.into(), false)
    }

    /// Append the assistant's reply, or the fallback if the call failed.
    /// Replies are appended in completion order.
    pub fn push_reply<E: Display>(&mut self, reply: Result<String, E>) -> &ChatMessage {
        match reply {
            Ok(text) => self.push(ChatRole::Assistant, text, false),
            Err(e) => {
                tracing::warn!(error = %e, "assistant call failed, using fallback reply");
                self.push(ChatRole::Assistant, FALLBACK_REPLY.to_string(), true)
            }
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    fn push(&mut self, role: ChatRole, content: String, failed: bool) -> &ChatMessage {
        let index = self.messages.len();
        self.messages.push(ChatMessage {
            role,
            content,
            failed,
            timestamp: jiff::Timestamp::now(),
        });
        &self.messages[index]
    }
}
