use crate::domain::creator::Creator;
use crate::domain::message::{Conversation, Message};
use crate::error::Result;
use serde::Deserialize;

const BUNDLED: &str = include_str!("../../data/seed.json");

/// Demo data the marketplace ships with: a small creator catalog plus a few
/// conversations between those creators and sample clients.
#[derive(Debug, Clone, Deserialize)]
pub struct Seed {
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Seed {
    pub fn bundled() -> Result<Self> {
        Ok(serde_json::from_str(BUNDLED)?)
    }

    /// Messages belonging to one conversation, in send order.
    pub fn messages_for(&self, conversation_id: &str) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        messages
    }
}
