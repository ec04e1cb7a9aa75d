use creatorhub::domain::creator::{Creator, CreatorService};
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;

const CATEGORIES: [&str; 6] = ["Art", "Fitness", "Lifestyle", "Music", "Photography", "Wellness"];
const LANGUAGES: [&str; 4] = ["English", "French", "Mandarin", "Spanish"];

fn pick<R: Rng>(rng: &mut R, pool: &[&str]) -> Vec<String> {
    let count = rng.gen_range(0..=pool.len().min(3));
    pool.choose_multiple(rng, count)
        .map(|s| s.to_string())
        .collect()
}

/// Builds `count` creators with random tags, prices and ratings. Roughly one
/// in five lists no services at all.
pub fn random_catalog<R: Rng>(rng: &mut R, count: usize) -> Vec<Creator> {
    (1..=count)
        .map(|i| {
            let services = if rng.gen_bool(0.2) {
                Vec::new()
            } else {
                (0..rng.gen_range(1..=3))
                    .map(|s| CreatorService {
                        id: format!("s{i}-{s}"),
                        title: format!("Service {s}"),
                        description: "Made to order".to_string(),
                        category: "Custom".to_string(),
                        price: Decimal::new(rng.gen_range(500..=50_000), 2),
                        duration: String::new(),
                        delivery_time: String::new(),
                        features: Vec::new(),
                        popular: false,
                    })
                    .collect()
            };

            Creator {
                id: i.to_string(),
                name: format!("Creator {i}"),
                handle: format!("creator_{i}"),
                bio: String::new(),
                location: String::new(),
                age: rng.gen_range(18..=60),
                verified: rng.gen_bool(0.5),
                online: rng.gen_bool(0.5),
                rating: f64::from(rng.gen_range(0..=50u32)) / 10.0,
                total_reviews: rng.gen_range(0..=1000),
                categories: pick(rng, &CATEGORIES),
                languages: pick(rng, &LANGUAGES),
                stats: Default::default(),
                services,
                pricing: Default::default(),
                created_at: None,
            }
        })
        .collect()
}
