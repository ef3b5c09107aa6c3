//! The external checkout boundary.

use async_trait::async_trait;

use coursegate_common::types::parse_display_price;
use coursegate_common::{CheckoutRequest, EnrollError, PaymentOutcome};

/// Opens the third-party checkout overlay and resolves with the user's
/// outcome.
///
/// The engine treats the overlay as a black box: amount and currency are
/// validated before invocation, and the returned payment identifier is
/// opaque. A load/initialization failure is an `Err`; the user closing the
/// overlay without paying is `Ok(PaymentOutcome::Dismissed)`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn open(&self, request: CheckoutRequest) -> Result<PaymentOutcome, EnrollError>;
}

/// Convert a catalog display price into minor currency units.
///
/// Strips every non-digit character and multiplies by 100, so "₹5,999"
/// becomes 599900 paise. A price with no digits is an error, not zero.
pub fn price_to_minor_units(display_price: &str) -> Result<u64, EnrollError> {
    let major = parse_display_price(display_price)
        .ok_or_else(|| EnrollError::UnpricedOffering(display_price.to_string()))?;
    Ok(major * 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupee_prices_convert_to_paise() {
        assert_eq!(price_to_minor_units("₹5,999").unwrap(), 599_900);
        assert_eq!(price_to_minor_units("₹1,999").unwrap(), 199_900);
        assert_eq!(price_to_minor_units("999").unwrap(), 99_900);
    }

    #[test]
    fn unpriced_offerings_are_rejected() {
        assert!(matches!(
            price_to_minor_units("Free"),
            Err(EnrollError::UnpricedOffering(_))
        ));
        assert!(matches!(
            price_to_minor_units(""),
            Err(EnrollError::UnpricedOffering(_))
        ));
    }
}
