//! Stripe webhook support.
//!
//! [`StripeWebhookVerifier`] checks the `Stripe-Signature` header and shapes the body into a [`PaymentEvent`]. Only
//! two event types carry donations; everything else comes through as [`PaymentEvent::Other`].
mod types;
mod verifier;

pub use types::{
    CheckoutSession,
    CustomField,
    CustomFieldText,
    CustomerDetails,
    PaymentEvent,
    PaymentIntent,
    RawEvent,
    RawEventData,
    CHECKOUT_SESSION_COMPLETED,
    PAYMENT_INTENT_SUCCEEDED,
};
pub use verifier::{
    compute_signature,
    SignatureHeader,
    StripeWebhookVerifier,
    DEFAULT_SIGNATURE_TOLERANCE_SECS,
    SIGNATURE_HEADER,
    SIGNATURE_SCHEME,
};
