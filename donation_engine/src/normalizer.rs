//! Turns payment events into donations.
//!
//! ## Donor name
//! For completed checkout sessions, the first of these that is present and non-empty wins:
//! 1. the `name` custom field on the checkout page,
//! 2. `donor_name` in the session metadata,
//! 3. the customer's billing name,
//! 4. `"Anonymous"`.
//!
//! Successful payment intents only look at `donor_name` in the metadata before falling back to `"Anonymous"`.
//!
//! ## Message
//! Checkout sessions use the `message` custom field, then `message` in the metadata. Payment intents only use the
//! metadata. The fallback is an empty string.
//!
//! Amounts arrive in minor units and are divided by 100. Currency codes are upper-cased and otherwise left alone.
use chrono::{DateTime, Utc};
use da_common::MinorUnits;
use log::*;

use crate::{
    donation::Donation,
    stripe::{CheckoutSession, PaymentEvent, PaymentIntent},
};

pub const ANONYMOUS_DONOR: &str = "Anonymous";
const NAME_FIELD: &str = "name";
const MESSAGE_FIELD: &str = "message";
const DONOR_NAME_KEY: &str = "donor_name";
const MESSAGE_KEY: &str = "message";

/// Produces a donation for the two recognised event types, stamped with the current time. Other events yield `None`.
pub fn normalize_event(event: &PaymentEvent) -> Option<Donation> {
    normalize_event_at(event, Utc::now())
}

pub fn normalize_event_at(event: &PaymentEvent, timestamp: DateTime<Utc>) -> Option<Donation> {
    match event {
        PaymentEvent::CheckoutSessionCompleted(session) => Some(from_checkout_session(session, timestamp)),
        PaymentEvent::PaymentIntentSucceeded(intent) => Some(from_payment_intent(intent, timestamp)),
        PaymentEvent::Other { id, event_type } => {
            trace!("🧾️ Ignoring {event_type} event {id}");
            None
        },
    }
}

pub fn from_checkout_session(session: &CheckoutSession, timestamp: DateTime<Utc>) -> Donation {
    debug!("🧾️ Checkout session {} metadata: {:?}", session.id, session.metadata);
    debug!("🧾️ Checkout session {} customer details: {:?}", session.id, session.customer_details);
    debug!("🧾️ Checkout session {} custom fields: {:?}", session.id, session.custom_fields);
    let donor_name = session
        .custom_field_text(NAME_FIELD)
        .or_else(|| session.metadata_value(DONOR_NAME_KEY))
        .or_else(|| session.customer_name())
        .unwrap_or(ANONYMOUS_DONOR);
    let message =
        session.custom_field_text(MESSAGE_FIELD).or_else(|| session.metadata_value(MESSAGE_KEY)).unwrap_or_default();
    let amount = MinorUnits::from(session.amount_total.unwrap_or_default());
    Donation::new(amount.to_major(), session.currency.to_uppercase(), donor_name, message, timestamp)
}

pub fn from_payment_intent(intent: &PaymentIntent, timestamp: DateTime<Utc>) -> Donation {
    debug!("🧾️ Payment intent {} metadata: {:?}", intent.id, intent.metadata);
    debug!("🧾️ Payment intent {} receipt email: {:?}", intent.id, intent.receipt_email);
    let donor_name = intent.metadata_value(DONOR_NAME_KEY).unwrap_or(ANONYMOUS_DONOR);
    let message = intent.metadata_value(MESSAGE_KEY).unwrap_or_default();
    let amount = MinorUnits::from(intent.amount);
    Donation::new(amount.to_major(), intent.currency.to_uppercase(), donor_name, message, timestamp)
}
