use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const DEFAULT_TEST_AMOUNT_CENTS: i64 = 1000;
pub const DEFAULT_TEST_CURRENCY: &str = "USD";
pub const DEFAULT_TEST_DONOR: &str = "Test Donor";
pub const DEFAULT_TEST_MESSAGE: &str = "This is a test donation!";

//--------------------------------------     Donation       -----------------------------------------------------------
/// A donation, as shown to viewers.
///
/// `amount` is in major units (dollars, not cents). `timestamp` is when the record was produced, not when the payment
/// happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub amount: Decimal,
    pub currency: String,
    pub donor_name: String,
    pub message: String,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl Donation {
    pub fn new<S1, S2, S3>(
        amount: Decimal,
        currency: S1,
        donor_name: S2,
        message: S3,
        timestamp: DateTime<Utc>,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self { amount, currency: currency.into(), donor_name: donor_name.into(), message: message.into(), timestamp }
    }
}

impl Display for Donation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} from {}", self.amount, self.currency, self.donor_name)?;
        if !self.message.is_empty() {
            write!(f, ": \"{}\"", self.message)?;
        }
        Ok(())
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T12:00:00.123Z`.
pub fn serialize_iso_millis<S>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where S: Serializer {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

//--------------------------------------  TestDonationRequest  --------------------------------------------------------
/// Body of a synthetic donation request. Every field is optional, and a value of the wrong type is treated as
/// missing rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDonationRequest {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub donor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

impl TestDonationRequest {
    /// Fills in the blanks. Zero amounts and empty strings count as missing. Supplied values are used verbatim; in
    /// particular the currency is not upper-cased.
    pub fn into_donation(self, timestamp: DateTime<Utc>) -> Donation {
        let amount =
            self.amount.filter(|a| !a.is_zero()).unwrap_or_else(|| Decimal::new(DEFAULT_TEST_AMOUNT_CENTS, 2));
        Donation {
            amount,
            currency: non_empty_or(self.currency, DEFAULT_TEST_CURRENCY),
            donor_name: non_empty_or(self.donor_name, DEFAULT_TEST_DONOR),
            message: non_empty_or(self.message, DEFAULT_TEST_MESSAGE),
            timestamp,
        }
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value.filter(|s| !s.is_empty()).unwrap_or_else(|| default.to_string())
}

fn lenient_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where D: Deserializer<'de> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Accepts JSON numbers and numeric strings.
fn lenient_amount<'de, D>(d: D) -> Result<Option<Decimal>, D::Error>
where D: Deserializer<'de> {
    let amount = match Value::deserialize(d)? {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok().or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    };
    Ok(amount)
}
