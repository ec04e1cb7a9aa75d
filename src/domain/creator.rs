use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Performance figures shown on a creator's profile and dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreatorStats {
    pub total_earnings: Decimal,
    pub total_clients: u32,
    /// Human readable, e.g. `"< 5 min"`.
    pub response_time: String,
    /// Percentage of bookings completed.
    pub completion_rate: u8,
    /// Percentage of clients that booked again.
    pub repeat_clients: u8,
}

/// A bookable offering listed on a creator's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorService {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub delivery_time: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

/// Per-channel rates a creator charges outside of listed services.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pricing {
    /// Per message.
    pub messaging_rate: Decimal,
    /// Per minute.
    pub video_call_rate: Decimal,
    /// Base rate for custom content requests.
    pub custom_content_rate: Decimal,
    pub tip_minimum: Decimal,
}

/// A catalog entry the query engine selects and reorders.
///
/// Creators are read-only inputs: the engine only ever clones them into new
/// result sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub handle: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    pub age: u32,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub online: bool,
    /// Average review score between 0 and 5.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub stats: CreatorStats,
    #[serde(default)]
    pub services: Vec<CreatorService>,
    #[serde(default)]
    pub pricing: Pricing,
    /// When the creator joined the platform. Drives the `newest` ordering.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Creator {
    /// Cheapest listed service, if the creator lists any.
    pub fn min_service_price(&self) -> Option<Decimal> {
        self.services.iter().map(|s| s.price).min()
    }

    /// Most expensive listed service, if the creator lists any.
    pub fn max_service_price(&self) -> Option<Decimal> {
        self.services.iter().map(|s| s.price).max()
    }

    /// Composite ranking score: `rating × ln(total_reviews + 1)`.
    ///
    /// The logarithm keeps a large review count from outweighing a poor
    /// rating, while a perfect score with a single review still ranks below
    /// an established creator.
    pub fn popularity(&self) -> f64 {
        self.rating * (f64::from(self.total_reviews) + 1.0).ln()
    }

    /// Numeric reading of the identifier; non-numeric ids count as 0.
    pub fn numeric_id(&self) -> u64 {
        self.id.trim().parse().unwrap_or(0)
    }
}
