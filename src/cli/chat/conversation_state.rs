/// Who authored a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single entry in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only record of everything shown to the user, in on-screen order.
///
/// There is deliberately no way to remove or reorder entries.
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_insertion_order() {
        let mut log = ConversationLog::new();
        log.append(Message::assistant("hello"));
        log.append(Message::user("hi"));
        log.append(Message::assistant("how can I help?"));

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0], Message::assistant("hello"));
        assert_eq!(snapshot[1], Message::user("hi"));
        assert_eq!(snapshot[2], Message::assistant("how can I help?"));
    }

    #[test]
    fn append_never_shrinks_the_log() {
        let mut log = ConversationLog::new();
        assert!(log.is_empty());
        for i in 0..10 {
            let before = log.len();
            log.append(Message::user(format!("message {}", i)));
            assert_eq!(log.len(), before + 1);
        }
    }

    #[test]
    fn earlier_entries_are_untouched_by_later_appends() {
        let mut log = ConversationLog::new();
        log.append(Message::user("first"));
        let first = log.snapshot()[0].clone();
        log.append(Message::assistant("second"));
        assert_eq!(log.snapshot()[0], first);
    }
}
