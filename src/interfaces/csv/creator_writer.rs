use crate::domain::creator::Creator;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct CreatorRow<'a> {
    id: &'a str,
    name: &'a str,
    handle: &'a str,
    rating: f64,
    reviews: u32,
    min_price: Option<Decimal>,
    online: bool,
    verified: bool,
}

impl<'a> From<&'a Creator> for CreatorRow<'a> {
    fn from(creator: &'a Creator) -> Self {
        Self {
            id: &creator.id,
            name: &creator.name,
            handle: &creator.handle,
            rating: creator.rating,
            reviews: creator.total_reviews,
            min_price: creator.min_service_price(),
            online: creator.online,
            verified: creator.verified,
        }
    }
}

/// Writes query results as CSV, one creator per row, in result order.
pub struct CreatorWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CreatorWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_creators(&mut self, creators: &[Creator]) -> Result<()> {
        if creators.is_empty() {
            self.writer.write_record([
                "id", "name", "handle", "rating", "reviews", "min_price", "online", "verified",
            ])?;
        }
        for creator in creators {
            self.writer.serialize(CreatorRow::from(creator))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
