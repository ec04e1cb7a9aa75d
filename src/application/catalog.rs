use crate::domain::creator::Creator;
use crate::domain::criteria::{FilterCriteria, SortMode};
use crate::domain::ports::CatalogSourceBox;
use crate::error::Result;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Case-insensitive substring search over a creator's descriptive fields.
///
/// A blank query returns the input unchanged. Otherwise a creator is kept
/// when the lowercased query occurs in its name, handle, bio, location, any
/// category or language tag, or any service title or description.
pub fn search(query: &str, creators: &[Creator]) -> Vec<Creator> {
    if query.trim().is_empty() {
        return creators.to_vec();
    }

    let term = query.to_lowercase();
    creators
        .iter()
        .filter(|creator| matches_term(creator, &term))
        .cloned()
        .collect()
}

fn matches_term(creator: &Creator, term: &str) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(term);

    hit(&creator.name)
        || hit(&creator.handle)
        || hit(&creator.bio)
        || hit(&creator.location)
        || creator.categories.iter().any(|c| hit(c))
        || creator.languages.iter().any(|l| hit(l))
        || creator
            .services
            .iter()
            .any(|s| hit(&s.title) || hit(&s.description))
}

/// Keeps the creators satisfying every present criterion.
pub fn filter(creators: &[Creator], criteria: &FilterCriteria) -> Vec<Creator> {
    creators
        .iter()
        .filter(|creator| satisfies(creator, criteria))
        .cloned()
        .collect()
}

fn satisfies(creator: &Creator, criteria: &FilterCriteria) -> bool {
    if let Some(categories) = &criteria.categories
        && !categories.is_empty()
        && !categories.iter().any(|c| creator.categories.contains(c))
    {
        return false;
    }

    if let Some(languages) = &criteria.languages
        && !languages.is_empty()
        && !languages.iter().any(|l| creator.languages.contains(l))
    {
        return false;
    }

    if let Some(ages) = &criteria.age_range
        && !ages.contains(&creator.age)
    {
        return false;
    }

    // Creators without listed services are not excluded on price.
    if let Some(prices) = &criteria.price_range
        && let Some(min_price) = creator.min_service_price()
        && !prices.contains(&min_price)
    {
        return false;
    }

    if let Some(online) = criteria.online
        && creator.online != online
    {
        return false;
    }

    if let Some(verified) = criteria.verified
        && creator.verified != verified
    {
        return false;
    }

    // A non-finite threshold constrains nothing.
    if let Some(min_rating) = criteria.min_rating.filter(|r| r.is_finite())
        && creator.rating < min_rating
    {
        return false;
    }

    true
}

/// Returns a reordered copy. The sort is stable: creators with equal keys
/// keep their input order.
pub fn sort(creators: &[Creator], mode: SortMode) -> Vec<Creator> {
    let mut sorted = creators.to_vec();
    sorted.sort_by(|a, b| compare(a, b, mode));
    sorted
}

fn compare(a: &Creator, b: &Creator, mode: SortMode) -> Ordering {
    match mode {
        SortMode::Rating => b.rating.total_cmp(&a.rating),
        SortMode::PriceLow => min_price(a).cmp(&min_price(b)),
        SortMode::PriceHigh => max_price(b).cmp(&max_price(a)),
        SortMode::Newest => (b.created_at, b.numeric_id()).cmp(&(a.created_at, a.numeric_id())),
        SortMode::Popular => b.popularity().total_cmp(&a.popularity()),
    }
}

fn min_price(creator: &Creator) -> Decimal {
    creator.min_service_price().unwrap_or(Decimal::ZERO)
}

fn max_price(creator: &Creator) -> Decimal {
    creator.max_service_price().unwrap_or(Decimal::ZERO)
}

/// Runs the discovery pipeline (search, then filter, then sort) over a
/// catalog source.
pub struct CatalogService {
    source: CatalogSourceBox,
}

impl CatalogService {
    pub fn new(source: CatalogSourceBox) -> Self {
        Self { source }
    }

    /// Returns the ordered result set for a free-text query and criteria.
    pub async fn query(&self, text: &str, criteria: &FilterCriteria) -> Result<Vec<Creator>> {
        let creators = self.source.all().await?;
        let found = search(text, &creators);
        let filtered = filter(&found, criteria);
        let mode = criteria.sort_mode();
        tracing::debug!(
            catalog = creators.len(),
            searched = found.len(),
            filtered = filtered.len(),
            %mode,
            "catalog query"
        );
        Ok(sort(&filtered, mode))
    }

    pub async fn creator(&self, creator_id: &str) -> Result<Option<Creator>> {
        self.source.get(creator_id).await
    }
}
