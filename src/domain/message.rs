use super::money::Money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Payment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub payment_amount: Option<Decimal>,
}

/// A private thread between one creator and one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub creator_id: String,
    pub client_id: String,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub total_spent: Money,
}

/// A file picked for sending. Upload itself happens elsewhere; `url` is
/// wherever the host made the file reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub url: String,
}

impl Attachment {
    /// Images render inline; anything else is shown as a video player.
    pub fn message_kind(&self) -> MessageKind {
        if self.mime_type.starts_with("image/") {
            MessageKind::Image
        } else {
            MessageKind::Video
        }
    }

    /// Size label used in the attachment preview, e.g. `2.4 MB`.
    pub fn size_label(&self) -> String {
        format!("{:.1} MB", self.size_bytes as f64 / 1024.0 / 1024.0)
    }
}
