use crate::application::checkout::CheckoutOrder;
use crate::error::{MarketplaceError, Result};
use std::io::Read;

/// Reads checkout orders from a CSV source.
///
/// Expected header: `kind,amount,recipient,service,tip,card_number,expiry,cvv,holder`.
/// `service` and `tip` may be left empty. Whitespace around fields is trimmed.
pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    /// Creates a new `OrderReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes orders; a malformed row yields an `Err` without
    /// ending the stream.
    pub fn orders(self) -> impl Iterator<Item = Result<CheckoutOrder>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(MarketplaceError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentKind;
    use rust_decimal_macros::dec;

    const HEADER: &str = "kind, amount, recipient, service, tip, card_number, expiry, cvv, holder";

    #[test]
    fn test_reader_valid_stream() {
        let data = format!(
            "{HEADER}\n\
             service, 100, Isabella Rose, Custom Photo Set, 10, 4242424242424242, 12/27, 123, John Smith\n\
             tip, 50, Mia Rodriguez, , , 4000000000000002, 01/26, 999, John Smith"
        );
        let reader = OrderReader::new(data.as_bytes());
        let results: Vec<Result<CheckoutOrder>> = reader.orders().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.kind, PaymentKind::Service);
        assert_eq!(first.amount, dec!(100));
        assert_eq!(first.tip, Some(10));
        assert_eq!(first.service.as_deref(), Some("Custom Photo Set"));

        let second = results[1].as_ref().unwrap();
        assert_eq!(second.kind, PaymentKind::Tip);
        assert_eq!(second.tip, None);
        assert_eq!(second.service, None);
        assert_eq!(second.card_number, "4000000000000002");
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = format!(
            "{HEADER}\n\
             refund, 100, Isabella Rose, , , 4242424242424242, 12/27, 123, John Smith\n\
             tip, lots, Isabella Rose, , , 4242424242424242, 12/27, 123, John Smith\n\
             tip, 5, Isabella Rose, , , 4242424242424242, 12/27, 123, John Smith"
        );
        let reader = OrderReader::new(data.as_bytes());
        let results: Vec<Result<CheckoutOrder>> = reader.orders().collect();

        assert!(results[0].is_err());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
