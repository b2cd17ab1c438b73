use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";
pub const PAYMENT_INTENT_SUCCEEDED: &str = "payment_intent.succeeded";

/// The envelope every webhook body arrives in. The object is only interpreted once the event type is known.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: RawEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEventData {
    pub object: Value,
}

/// An authenticated payment event, shaped according to its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    CheckoutSessionCompleted(CheckoutSession),
    PaymentIntentSucceeded(PaymentIntent),
    /// Any event type we don't act on.
    Other { id: String, event_type: String },
}

impl PaymentEvent {
    /// Shape a raw webhook body. Recognised event types must carry a well-formed object.
    pub fn from_json(payload: &[u8]) -> Result<Self, serde_json::Error> {
        let raw = serde_json::from_slice::<RawEvent>(payload)?;
        let event = match raw.event_type.as_str() {
            CHECKOUT_SESSION_COMPLETED => Self::CheckoutSessionCompleted(serde_json::from_value(raw.data.object)?),
            PAYMENT_INTENT_SUCCEEDED => Self::PaymentIntentSucceeded(serde_json::from_value(raw.data.object)?),
            _ => Self::Other { id: raw.id, event_type: raw.event_type },
        };
        Ok(event)
    }

    pub fn event_type(&self) -> &str {
        match self {
            Self::CheckoutSessionCompleted(_) => CHECKOUT_SESSION_COMPLETED,
            Self::PaymentIntentSucceeded(_) => PAYMENT_INTENT_SUCCEEDED,
            Self::Other { event_type, .. } => event_type.as_str(),
        }
    }
}

//--------------------------------------  CheckoutSession  ------------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    #[serde(default)]
    pub id: String,
    /// Minor units. Null for sessions that never had a total.
    #[serde(default)]
    pub amount_total: Option<i64>,
    pub currency: String,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    pub custom_fields: Option<Vec<CustomField>>,
}

impl CheckoutSession {
    /// The text value of the first custom field with the given key, if that value is non-empty.
    pub fn custom_field_text(&self, key: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .flatten()
            .find(|f| f.key == key)
            .and_then(|f| f.text.as_ref())
            .and_then(|t| t.value.as_deref())
            .filter(|v| !v.is_empty())
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        non_empty_entry(self.metadata.as_ref(), key)
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_details.as_ref().and_then(|c| c.name.as_deref()).filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub text: Option<CustomFieldText>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldText {
    #[serde(default)]
    pub value: Option<String>,
}

//--------------------------------------   PaymentIntent   ------------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    #[serde(default)]
    pub id: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    pub receipt_email: Option<String>,
}

impl PaymentIntent {
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        non_empty_entry(self.metadata.as_ref(), key)
    }
}

fn non_empty_entry<'a>(map: Option<&'a HashMap<String, String>>, key: &str) -> Option<&'a str> {
    map.and_then(|m| m.get(key)).map(String::as_str).filter(|v| !v.is_empty())
}
