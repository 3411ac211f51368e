use crate::providers::Message;
use std::collections::VecDeque;

/// Maximum number of turns kept per conversation.
pub const HISTORY_CAPACITY: usize = 20;

/// Sliding window over the most recent turns of a conversation.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    turns: VecDeque<Message>,
}

impl ChatHistory {
    /// Push a turn, evicting from the front so at most
    /// [`HISTORY_CAPACITY`] turns remain.
    pub fn append(&mut self, turn: Message) {
        self.turns.push_back(turn);
        while self.turns.len() > HISTORY_CAPACITY {
            self.turns.pop_front();
        }
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.turns.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }
}
