//! Per-user conversation session: transcript plus the state the flow gates on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::flow::Stage;

/// Who authored a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// A single transcript line. Insertion order is display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}

/// One user's conversation with the guide.
///
/// All state is in-memory; nothing survives a process restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub messages: Vec<Message>,
    /// Set once the user supplies a string containing `@`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// False until the authenticator confirms a code match for `email`.
    pub otp_verified: bool,
    /// Set once extraction succeeds; never empty when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub stage: Stage,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            email: None,
            otp_verified: false,
            location: None,
            stage: Stage::default(),
            started_at: Utc::now(),
        }
    }

    /// Append a user line to the transcript.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new(Role::User, content));
    }

    /// Append a bot line to the transcript.
    pub fn push_bot(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new(Role::Bot, content));
    }

    /// Advance to the next stage. Returns an error if already terminal.
    pub fn advance(&mut self) -> std::result::Result<Stage, String> {
        let next = self
            .stage
            .next()
            .ok_or_else(|| "Already at terminal stage".to_string())?;
        if !self.stage.can_transition_to(next) {
            return Err(format!("Cannot transition from {} to {}", self.stage, next));
        }
        self.stage = next;
        Ok(next)
    }

    /// Number of user turns so far.
    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_defaults() {
        let s = Session::new();
        assert!(s.messages.is_empty());
        assert!(s.email.is_none());
        assert!(s.location.is_none());
        assert!(!s.otp_verified);
        assert_eq!(s.stage, Stage::Greet);
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut s = Session::new();
        s.push_bot("hello");
        s.push_user("hi");
        s.push_bot("where to?");

        let roles: Vec<Role> = s.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Bot, Role::User, Role::Bot]);
        assert_eq!(s.messages[1].content, "hi");
        assert_eq!(s.user_turns(), 1);
    }

    #[test]
    fn advance_walks_to_terminal() {
        let mut s = Session::new();
        let mut seen = Vec::new();
        while let Ok(stage) = s.advance() {
            seen.push(stage);
        }
        assert_eq!(seen.last(), Some(&Stage::Complete));
        assert!(s.stage.is_terminal());
        assert!(s.advance().is_err());
    }

    #[test]
    fn session_serde_roundtrip() {
        let mut s = Session::new();
        s.push_bot("greeting");
        s.push_user("I want to visit Paris");
        s.location = Some("Paris".to_string());
        s.stage = Stage::AwaitEmail;

        let json = serde_json::to_string(&s).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, s.id);
        assert_eq!(parsed.messages.len(), 2);
        assert_eq!(parsed.location.as_deref(), Some("Paris"));
        assert_eq!(parsed.stage, Stage::AwaitEmail);
        assert!(!parsed.otp_verified);
    }
}
