//! In-memory conversation history for the chat endpoint.
//!
//! One session exists per process and is shared by all callers; answer
//! quality is history-dependent and not isolated per end user. The
//! provider serializes access so concurrent requests cannot interleave
//! turns.

/// System preamble, sent as the first user turn of every session.
pub const SESSION_PREAMBLE: &str = "You are the assistant for a programming community. \
Answer questions about programming, algorithms and club activities. \
Keep answers concise and stay on topic.";

/// Canned acknowledgement seeded as the model's reply to the preamble.
pub const SESSION_PREAMBLE_ACK: &str =
    "Understood. I will keep my answers concise and on topic.";

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    /// Role string used on the Gemini wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// A single turn of the conversation.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Ordered turn history, always starting with the seed preamble pair.
#[derive(Debug, Clone)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    /// Create a session containing only the seed pair.
    pub fn seeded() -> Self {
        Self {
            turns: vec![
                ChatTurn {
                    role: ChatRole::User,
                    text: SESSION_PREAMBLE.to_string(),
                },
                ChatTurn {
                    role: ChatRole::Model,
                    text: SESSION_PREAMBLE_ACK.to_string(),
                },
            ],
        }
    }

    /// Append a completed user/model exchange.
    ///
    /// Called only after the upstream reply arrived, so a failed call
    /// never leaves a dangling user turn.
    pub fn push_exchange(&mut self, prompt: String, reply: String) {
        self.turns.push(ChatTurn {
            role: ChatRole::User,
            text: prompt,
        });
        self.turns.push(ChatTurn {
            role: ChatRole::Model,
            text: reply,
        });
    }

    /// Discard all history and reinstate the seed pair.
    pub fn reset(&mut self) {
        *self = Self::seeded();
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_contains_only_the_seed_pair() {
        let session = ChatSession::seeded();
        assert_eq!(session.len(), 2);
        assert_eq!(session.turns()[0].role, ChatRole::User);
        assert_eq!(session.turns()[1].role, ChatRole::Model);
    }

    #[test]
    fn exchanges_append_two_turns() {
        let mut session = ChatSession::seeded();
        session.push_exchange("hello".to_string(), "hi".to_string());
        assert_eq!(session.len(), 4);
        session.push_exchange("more".to_string(), "reply".to_string());
        assert_eq!(session.len(), 6);
    }

    #[test]
    fn reset_discards_prior_turns() {
        let mut session = ChatSession::seeded();
        session.push_exchange("a".to_string(), "b".to_string());
        session.push_exchange("c".to_string(), "d".to_string());

        session.reset();
        assert_eq!(session.len(), 2);

        // One exchange after reset: exactly seed pair + new pair.
        session.push_exchange("e".to_string(), "f".to_string());
        assert_eq!(session.len(), 4);
        assert_eq!(session.turns()[2].text, "e");
    }
}
