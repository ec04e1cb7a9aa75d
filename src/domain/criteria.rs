use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Ordering applied to a query's result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Popular,
    Newest,
    PriceLow,
    PriceHigh,
    Rating,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::Popular => "popular",
            SortMode::Newest => "newest",
            SortMode::PriceLow => "price_low",
            SortMode::PriceHigh => "price_high",
            SortMode::Rating => "rating",
        };
        f.write_str(name)
    }
}

/// A partially populated set of constraints.
///
/// Every field is optional: `None` imposes no constraint on that dimension.
/// Category and language sets match when any requested tag is present; an
/// empty set is treated the same as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub categories: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub age_range: Option<RangeInclusive<u32>>,
    /// Compared against the creator's cheapest service.
    pub price_range: Option<RangeInclusive<Decimal>>,
    pub online: Option<bool>,
    pub verified: Option<bool>,
    pub min_rating: Option<f64>,
    pub sort_by: Option<SortMode>,
}

impl FilterCriteria {
    pub fn with_categories<I, S>(self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: Some(categories.into_iter().map(Into::into).collect()),
            ..self
        }
    }

    pub fn with_languages<I, S>(self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: Some(languages.into_iter().map(Into::into).collect()),
            ..self
        }
    }

    pub fn with_age_range(self, range: RangeInclusive<u32>) -> Self {
        Self {
            age_range: Some(range),
            ..self
        }
    }

    pub fn with_price_range(self, range: RangeInclusive<Decimal>) -> Self {
        Self {
            price_range: Some(range),
            ..self
        }
    }

    pub fn with_online(self, online: bool) -> Self {
        Self {
            online: Some(online),
            ..self
        }
    }

    pub fn with_verified(self, verified: bool) -> Self {
        Self {
            verified: Some(verified),
            ..self
        }
    }

    pub fn with_min_rating(self, rating: f64) -> Self {
        Self {
            min_rating: Some(rating),
            ..self
        }
    }

    pub fn with_sort(self, mode: SortMode) -> Self {
        Self {
            sort_by: Some(mode),
            ..self
        }
    }

    /// The sort mode to apply, defaulting to `popular` when unset.
    pub fn sort_mode(&self) -> SortMode {
        self.sort_by.unwrap_or_default()
    }
}
