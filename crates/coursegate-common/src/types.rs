//! Core types shared across Coursegate components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A purchasable course entry in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offering {
    /// Catalog identifier, unique per offering
    pub id: u32,

    /// Course title
    pub title: String,

    /// Instructor display name
    pub instructor: String,

    /// Display price as shown in the catalog, e.g. "₹5,999"
    pub price: String,

    /// Pre-discount display price, if the offering is on sale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
}

impl Offering {
    /// Discount between `original_price` and `price`, rounded to the
    /// nearest whole percent. None when there is no sale price or either
    /// price carries no digits.
    pub fn discount_percent(&self) -> Option<u8> {
        let original = parse_display_price(self.original_price.as_deref()?)?;
        let current = parse_display_price(&self.price)?;
        if original == 0 || current > original {
            return None;
        }
        let discount = ((original - current) as f64 / original as f64) * 100.0;
        Some(discount.round() as u8)
    }
}

/// Extract the numeric value from a display price by stripping every
/// non-digit character ("₹5,999" → 5999). None when no digits remain.
pub fn parse_display_price(display: &str) -> Option<u64> {
    let digits: String = display.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// A persisted marker that an offering has been purchased locally.
///
/// Serialized in camelCase to match the historical store format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    /// Offering identifier (unique within the persisted collection)
    pub course_id: u32,

    /// Course title at enrollment time
    pub course_title: String,

    /// Instructor display name
    pub instructor: String,

    /// When the enrollment was recorded
    pub enrolled_at: DateTime<Utc>,

    /// Completion percentage (0-100), maintained by the dashboard
    pub progress: u8,

    /// Last time the course was opened
    pub last_accessed: DateTime<Utc>,
}

impl EnrollmentRecord {
    /// Fresh record for a just-purchased offering: progress starts at zero
    /// and both timestamps are now.
    pub fn new(offering: &Offering) -> Self {
        let now = Utc::now();
        Self {
            course_id: offering.id,
            course_title: offering.title.clone(),
            instructor: offering.instructor.clone(),
            enrolled_at: now,
            progress: 0,
            last_accessed: now,
        }
    }
}

/// Stage pointer of the enrollment wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStage {
    /// Waiting for a valid email and a solved challenge
    CollectingEmail,
    /// Simulated one-time-code send in flight
    DispatchingCode,
    /// Waiting for the user to enter the code
    AwaitingCode,
    /// Simulated code confirmation in flight
    ConfirmingCode,
    /// Waiting for the user to start the checkout
    CollectingPayment,
    /// Payment succeeded, recording the enrollment
    CompletingPayment,
    /// Dismissed or completed; no further transitions
    Closed,
}

impl WizardStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Parameters handed to the external checkout overlay.
///
/// The overlay is a black box: everything here is validated before the
/// invocation, nothing after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Amount in minor currency units (paise for INR)
    pub amount_minor: u64,

    /// ISO currency code, e.g. "INR"
    pub currency: String,

    /// Merchant display name
    pub name: String,

    /// Line shown under the merchant name
    pub description: String,

    /// Email prefilled into the overlay's form
    pub prefill_email: String,

    /// Overlay accent color
    pub theme_color: String,
}

/// How the external checkout overlay resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment went through; the identifier is opaque to us
    Completed { payment_id: String },
    /// The user closed the overlay without paying
    Dismissed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_display_price_strips_symbols_and_separators() {
        assert_eq!(parse_display_price("₹5,999"), Some(5999));
        assert_eq!(parse_display_price("₹1,999"), Some(1999));
        assert_eq!(parse_display_price("12999"), Some(12999));
        assert_eq!(parse_display_price("Free"), None);
        assert_eq!(parse_display_price(""), None);
    }

    #[test]
    fn discount_percent_rounds_to_whole_percent() {
        let offering = Offering {
            id: 1,
            title: "Technical Analysis Fundamentals".into(),
            instructor: "Rahul Verma".into(),
            price: "₹1,999".into(),
            original_price: Some("₹3,999".into()),
        };
        assert_eq!(offering.discount_percent(), Some(50));
    }

    #[test]
    fn discount_percent_absent_without_sale_price() {
        let offering = Offering {
            id: 2,
            title: "Intro to Markets".into(),
            instructor: "Rahul Verma".into(),
            price: "₹999".into(),
            original_price: None,
        };
        assert_eq!(offering.discount_percent(), None);
    }

    #[test]
    fn enrollment_record_serializes_camel_case() {
        let offering = Offering {
            id: 7,
            title: "Options Trading Mastery".into(),
            instructor: "Priya Sharma".into(),
            price: "₹5,999".into(),
            original_price: None,
        };
        let record = EnrollmentRecord::new(&offering);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["courseId"], 7);
        assert_eq!(json["courseTitle"], "Options Trading Mastery");
        assert_eq!(json["progress"], 0);
        assert!(json["enrolledAt"].is_string());
        assert!(json["lastAccessed"].is_string());
    }
}
