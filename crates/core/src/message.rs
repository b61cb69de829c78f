//! Message and chat session domain types.
//!
//! These are the value objects a transport exchanges with the dialogue:
//! User sends a message → session records it → dialogue replies → session records the reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sender name attached to every bot reply.
pub const BOT_SENDER: &str = "Leasebot";

/// Identifier of a chat session, handed out sequentially by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The person chatting with the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A single message in a chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// When the message was sent
    pub time_sent: DateTime<Utc>,

    /// Display name of the sender
    pub sender: String,

    /// The text content
    pub content: String,

    /// Whether the bot wrote this message
    pub is_bot_message: bool,
}

impl Message {
    /// Create a message written by a user.
    pub fn user(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            time_sent: Utc::now(),
            sender: sender.into(),
            content: content.into(),
            is_bot_message: false,
        }
    }

    /// Create a reply written by the bot.
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            time_sent: Utc::now(),
            sender: BOT_SENDER.to_string(),
            content: content.into(),
            is_bot_message: true,
        }
    }
}

/// The message history between one user and the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Session ID
    pub id: SessionId,

    /// Who is chatting
    pub user: User,

    /// Ordered messages
    pub messages: Vec<Message>,

    /// When this session was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a new empty session.
    pub fn new(id: SessionId, user: User) -> Self {
        let now = Utc::now();
        Self {
            id,
            user,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a message to the session.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// The most recent bot reply, if any.
    pub fn last_reply(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_bot_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("klaus", "help");
        assert!(!msg.is_bot_message);
        assert_eq!(msg.sender, "klaus");
        assert_eq!(msg.content, "help");
    }

    #[test]
    fn bot_messages_carry_bot_sender() {
        let msg = Message::bot("Hi!");
        assert!(msg.is_bot_message);
        assert_eq!(msg.sender, BOT_SENDER);
    }

    #[test]
    fn session_tracks_updates() {
        let mut session = ChatSession::new(SessionId(1), User::new("klaus"));
        let created = session.created_at;

        session.push(Message::user("klaus", "First message"));
        session.push(Message::bot("Reply"));
        assert_eq!(session.messages.len(), 2);
        assert!(session.updated_at >= created);
        assert_eq!(session.last_reply().map(|m| m.content.as_str()), Some("Reply"));
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::bot("Test message");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("is_bot_message"));
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.content, "Test message");
        assert!(deserialized.is_bot_message);
    }
}
