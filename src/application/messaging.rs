use crate::domain::message::{Attachment, Conversation, Message, MessageKind};
use crate::domain::money::{Amount, Money};
use crate::error::{MarketplaceError, Result};
use crate::format::{format_currency, format_time_ago};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

/// One-tap amounts offered in the tip dialog.
pub const TIP_PRESETS: [Decimal; 3] = [dec!(5), dec!(10), dec!(25)];

/// A message as the conversation view renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry<'a> {
    pub message: &'a Message,
    /// Sent by the viewer; rendered on the right without an avatar.
    pub own: bool,
    pub time_label: String,
}

/// A single conversation and its messages, in send order.
#[derive(Debug, Clone)]
pub struct MessageThread {
    conversation: Conversation,
    messages: Vec<Message>,
}

impl MessageThread {
    pub fn new(conversation: Conversation, messages: Vec<Message>) -> Self {
        Self {
            conversation,
            messages,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Sends a text message, optionally with a picture or video attached.
    /// A blank text is only accepted alongside an attachment.
    pub fn send(
        &mut self,
        sender_id: &str,
        text: &str,
        attachment: Option<Attachment>,
        now: DateTime<Utc>,
    ) -> Result<&Message> {
        self.require_participant(sender_id)?;
        if text.trim().is_empty() && attachment.is_none() {
            return Err(MarketplaceError::ValidationError(
                "Message is empty".to_string(),
            ));
        }

        let (kind, media_url, preview) = match attachment {
            Some(file) => {
                let preview = if text.trim().is_empty() {
                    file.file_name.clone()
                } else {
                    text.to_string()
                };
                (file.message_kind(), Some(file.url), preview)
            }
            None => (MessageKind::Text, None, text.to_string()),
        };

        let message = Message {
            id: self.next_id(),
            conversation_id: self.conversation.id.clone(),
            sender_id: sender_id.to_string(),
            content: text.to_string(),
            kind,
            timestamp: now,
            read: false,
            media_url,
            payment_amount: None,
        };
        Ok(self.push(message, preview))
    }

    /// Sends a tip typed into the tip dialog. The raw text must parse as a
    /// positive amount.
    pub fn send_tip(
        &mut self,
        sender_id: &str,
        raw_amount: &str,
        now: DateTime<Utc>,
    ) -> Result<&Message> {
        self.require_participant(sender_id)?;
        let amount = Decimal::from_str(raw_amount.trim())
            .map_err(|_| {
                MarketplaceError::ValidationError(format!("'{raw_amount}' is not a valid amount"))
            })
            .and_then(Amount::new)?;

        let content = format!("Sent a tip of {}", format_currency(amount.value()));
        let message = Message {
            id: self.next_id(),
            conversation_id: self.conversation.id.clone(),
            sender_id: sender_id.to_string(),
            content: content.clone(),
            kind: MessageKind::Payment,
            timestamp: now,
            read: false,
            media_url: None,
            payment_amount: Some(amount.value()),
        };
        self.conversation.total_spent += Money::from(amount);
        tracing::debug!(conversation = %self.conversation.id, %amount, "tip sent");
        Ok(self.push(message, content))
    }

    /// Marks everything the other participant sent as read. Returns how many
    /// messages changed.
    pub fn mark_read(&mut self, reader_id: &str) -> usize {
        let mut marked = 0;
        for message in self
            .messages
            .iter_mut()
            .filter(|m| m.sender_id != reader_id && !m.read)
        {
            message.read = true;
            marked += 1;
        }
        marked
    }

    pub fn unread_for(&self, viewer_id: &str) -> usize {
        self.messages
            .iter()
            .filter(|m| m.sender_id != viewer_id && !m.read)
            .count()
    }

    pub fn timeline(&self, viewer_id: &str, now: DateTime<Utc>) -> Vec<TimelineEntry<'_>> {
        self.messages
            .iter()
            .map(|message| TimelineEntry {
                message,
                own: message.sender_id == viewer_id,
                time_label: format_time_ago(message.timestamp, now),
            })
            .collect()
    }

    fn require_participant(&self, user_id: &str) -> Result<()> {
        if user_id == self.conversation.creator_id || user_id == self.conversation.client_id {
            Ok(())
        } else {
            Err(MarketplaceError::ValidationError(format!(
                "{user_id} is not part of conversation {}",
                self.conversation.id
            )))
        }
    }

    fn next_id(&self) -> String {
        format!("{}-{}", self.conversation.id, self.messages.len() + 1)
    }

    fn push(&mut self, message: Message, preview: String) -> &Message {
        self.conversation.last_message = preview;
        self.conversation.last_message_time = message.timestamp;
        self.conversation.active = true;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}
