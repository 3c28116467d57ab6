//! Chat history management for the in-game assistant

/// Maximum messages retained; older ones are dropped first.
pub const MAX_CHAT_HISTORY: usize = 10;

/// Keywords marking a chat message as a move instruction for the AI.
const MOVE_KEYWORDS: [&str; 4] = ["move", "play", "put", "place"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Wire name used by the provider APIs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Bounded conversation history between the player and the assistant.
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatRole::User, content.into());
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatRole::Assistant, content.into());
    }

    fn push(&mut self, role: ChatRole, content: String) {
        self.messages.push(ChatMessage { role, content });
        if self.messages.len() > MAX_CHAT_HISTORY {
            let excess = self.messages.len() - MAX_CHAT_HISTORY;
            self.messages.drain(..excess);
        }
    }

    /// All retained messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The most recent `count` messages.
    #[must_use]
    pub fn recent(&self, count: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Scan the latest user messages for a move instruction (e.g. "play
    /// H8") to forward to the LLM move prompt.
    #[must_use]
    pub fn find_move_instruction(&self) -> Option<&str> {
        self.recent(3)
            .iter()
            .rev()
            .filter(|msg| msg.role == ChatRole::User)
            .find(|msg| {
                let lowered = msg.content.to_lowercase();
                MOVE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
            })
            .map(|msg| msg.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_order() {
        let mut log = ChatLog::new();
        log.push_user("hello");
        log.push_assistant("hi there");

        let messages = log.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Assistant);
    }

    #[test]
    fn test_history_is_trimmed() {
        let mut log = ChatLog::new();
        for i in 0..MAX_CHAT_HISTORY + 5 {
            log.push_user(format!("message {i}"));
        }

        assert_eq!(log.messages().len(), MAX_CHAT_HISTORY);
        // The oldest messages are gone
        assert_eq!(log.messages()[0].content, "message 5");
    }

    #[test]
    fn test_recent_window() {
        let mut log = ChatLog::new();
        log.push_user("one");
        log.push_assistant("two");
        log.push_user("three");

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "two");
        assert_eq!(recent[1].content, "three");

        assert_eq!(log.recent(10).len(), 3);
    }

    #[test]
    fn test_find_move_instruction() {
        let mut log = ChatLog::new();
        log.push_user("how are you doing?");
        assert!(log.find_move_instruction().is_none());

        log.push_user("please play H8 next");
        assert_eq!(log.find_move_instruction(), Some("please play H8 next"));

        // Assistant messages never count as instructions
        log.push_assistant("I will play H8");
        assert_eq!(log.find_move_instruction(), Some("please play H8 next"));
    }

    #[test]
    fn test_instruction_outside_recent_window_ignored() {
        let mut log = ChatLog::new();
        log.push_user("move to J10");
        log.push_user("nice weather");
        log.push_assistant("indeed");
        log.push_user("thanks");

        assert!(log.find_move_instruction().is_none());
    }

    #[test]
    fn test_clear() {
        let mut log = ChatLog::new();
        log.push_user("hello");
        log.clear();
        assert!(log.is_empty());
    }
}
