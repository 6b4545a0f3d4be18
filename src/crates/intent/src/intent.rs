//! The closed intent taxonomy.
//!
//! Intents are compared by equality; ordering is used only for deterministic
//! tie-breaking and is lexicographic on the wire form returned by
//! [`Intent::as_str`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the admin wants done, as a closed enumeration.
///
/// Variants are declared in lexicographic order of their wire form so the
/// derived `Ord` agrees with the tie-break contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Sales/revenue/reporting questions.
    #[serde(rename = "ANALYTICS_QUERY")]
    AnalyticsQuery,
    /// Looking up a customer profile.
    #[serde(rename = "CUSTOMER_LOOKUP")]
    CustomerLookup,
    /// Drafting an email to a customer.
    #[serde(rename = "EMAIL_DRAFT")]
    EmailDraft,
    /// Refunding an order.
    #[serde(rename = "ORDER_REFUND")]
    OrderRefund,
    /// Searching across orders.
    #[serde(rename = "ORDER_SEARCH")]
    OrderSearch,
    /// Status of a single order.
    #[serde(rename = "ORDER_STATUS")]
    OrderStatus,
    /// Inventory/stock questions.
    #[serde(rename = "PRODUCT_STOCK")]
    ProductStock,
    /// No intent matched.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Intent {
    /// All members of the taxonomy, in tie-break order.
    pub const ALL: [Intent; 8] = [
        Intent::AnalyticsQuery,
        Intent::CustomerLookup,
        Intent::EmailDraft,
        Intent::OrderRefund,
        Intent::OrderSearch,
        Intent::OrderStatus,
        Intent::ProductStock,
        Intent::Unknown,
    ];

    /// The wire form of this intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::AnalyticsQuery => "ANALYTICS_QUERY",
            Intent::CustomerLookup => "CUSTOMER_LOOKUP",
            Intent::EmailDraft => "EMAIL_DRAFT",
            Intent::OrderRefund => "ORDER_REFUND",
            Intent::OrderSearch => "ORDER_SEARCH",
            Intent::OrderStatus => "ORDER_STATUS",
            Intent::ProductStock => "PRODUCT_STOCK",
            Intent::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = UnknownIntentName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| UnknownIntentName(s.to_string()))
    }
}

/// Error returned when parsing a string that is not a taxonomy member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntentName(pub String);

impl fmt::Display for UnknownIntentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a known intent: {}", self.0)
    }
}

impl std::error::Error for UnknownIntentName {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form_round_trip() {
        for intent in Intent::ALL {
            let parsed: Intent = intent.as_str().parse().unwrap();
            assert_eq!(parsed, intent);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = "ORDER_EXPLODE".parse::<Intent>().unwrap_err();
        assert_eq!(err, UnknownIntentName("ORDER_EXPLODE".to_string()));
    }

    #[test]
    fn test_ordering_matches_wire_form() {
        let mut by_name = Intent::ALL;
        by_name.sort_by_key(|i| i.as_str());
        let mut derived = Intent::ALL;
        derived.sort();
        assert_eq!(by_name, derived);
    }

    #[test]
    fn test_serde_uses_wire_form() {
        let json = serde_json::to_string(&Intent::OrderRefund).unwrap();
        assert_eq!(json, "\"ORDER_REFUND\"");
        let back: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Intent::OrderRefund);
    }
}
