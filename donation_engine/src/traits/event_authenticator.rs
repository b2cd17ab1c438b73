use thiserror::Error;

use crate::stripe::PaymentEvent;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error("No signature header value was provided.")]
    MissingSignature,
    #[error("Unable to extract timestamp and signatures from header.")]
    MalformedSignature,
    #[error("No signatures found with expected scheme.")]
    NoSignaturesForScheme,
    #[error("No signatures found matching the expected signature for payload.")]
    SignatureMismatch,
    #[error("Timestamp outside the tolerance zone ({age}s old, tolerance is {tolerance}s).")]
    TimestampOutsideTolerance { age: i64, tolerance: i64 },
    #[error("The webhook signing secret has not been configured.")]
    SecretNotConfigured,
    #[error("The webhook signing secret is unusable. {0}")]
    InvalidSecret(String),
    #[error("The event payload is malformed. {0}")]
    MalformedPayload(String),
}

/// Authenticates and parses incoming payment-processor webhooks.
///
/// Implementations must not hand back an event unless the signature checks out. Every failure is the caller's
/// problem (a client error); there is nothing to retry on our side.
pub trait EventAuthenticator {
    fn construct_event(&self, payload: &[u8], signature: Option<&str>) -> Result<PaymentEvent, WebhookError>;
}
