use crate::domain::message::Conversation;
use crate::domain::ports::CatalogSource;
use crate::error::Result;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Default share of each payment the platform keeps, in percent.
pub const DEFAULT_COMMISSION_PERCENT: Decimal = dec!(20);

/// Average online time reported until real presence tracking exists.
const ONLINE_HOURS_PLACEHOLDER: f64 = 6.5;

/// Figures shown on a creator's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_earnings: Decimal,
    pub monthly_earnings: Decimal,
    pub total_clients: u32,
    pub new_clients: u32,
    pub active_conversations: usize,
    pub completed_bookings: u32,
    pub average_rating: f64,
    pub total_reviews: u32,
    pub response_time: String,
    pub online_hours: f64,
}

impl DashboardStats {
    fn empty() -> Self {
        Self {
            total_earnings: Decimal::ZERO,
            monthly_earnings: Decimal::ZERO,
            total_clients: 0,
            new_clients: 0,
            active_conversations: 0,
            completed_bookings: 0,
            average_rating: 0.0,
            total_reviews: 0,
            response_time: "N/A".to_string(),
            online_hours: 0.0,
        }
    }
}

/// Builds dashboard figures for `creator_id`. Monthly earnings, new clients
/// and completed bookings are estimated from the lifetime totals until a
/// bookings history is available. Unknown creators get empty stats.
pub async fn dashboard_stats(
    catalog: &dyn CatalogSource,
    conversations: &[Conversation],
    creator_id: &str,
) -> Result<DashboardStats> {
    let Some(creator) = catalog.get(creator_id).await? else {
        tracing::debug!(creator_id, "dashboard requested for unknown creator");
        return Ok(DashboardStats::empty());
    };

    let active_conversations = conversations
        .iter()
        .filter(|c| c.creator_id == creator_id && c.active)
        .count();
    let clients = f64::from(creator.stats.total_clients);

    Ok(DashboardStats {
        total_earnings: creator.stats.total_earnings,
        monthly_earnings: (creator.stats.total_earnings * dec!(0.3))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        total_clients: creator.stats.total_clients,
        new_clients: (clients * 0.1).round() as u32,
        active_conversations,
        completed_bookings: (clients * 0.8).round() as u32,
        average_rating: creator.rating,
        total_reviews: creator.total_reviews,
        response_time: creator.stats.response_time,
        online_hours: ONLINE_HOURS_PLACEHOLDER,
    })
}

/// The platform's cut of `amount`, rounded to cents.
pub fn platform_commission(amount: Decimal, percent: Decimal) -> Decimal {
    (amount * percent / dec!(100)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// What the creator keeps after commission.
pub fn creator_earnings(amount: Decimal, percent: Decimal) -> Decimal {
    amount - platform_commission(amount, percent)
}
