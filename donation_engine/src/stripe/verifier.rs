//! Stripe webhook signature verification.
//!
//! Stripe signs every webhook it sends with the endpoint's signing secret (`whsec_...`). The signature is carried in
//! the `Stripe-Signature` header, which looks like
//!
//! ```text
//!    t=1714564800,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd,v0=...
//! ```
//!
//! where `t` is the unix time the event was signed and each `v1` entry is a candidate signature. The signed message is
//! `{t}.{raw body}` and the signature is the lowercase hex HMAC-SHA256 of that message. More than one `v1` entry
//! appears while a secret is being rolled, and a match against any of them is enough.
//!
//! To limit replays, events signed more than `tolerance` seconds ago are rejected even if the signature is valid.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use da_common::Secret;
use hmac::{Hmac, Mac};
use log::{debug, trace, warn};
use sha2::Sha256;

use crate::{
    stripe::PaymentEvent,
    traits::{EventAuthenticator, WebhookError},
};

pub const SIGNATURE_HEADER: &str = "Stripe-Signature";
pub const SIGNATURE_SCHEME: &str = "v1";
pub const DEFAULT_SIGNATURE_TOLERANCE_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

//--------------------------------------  SignatureHeader  ------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    /// Only the signatures for [`SIGNATURE_SCHEME`]. Other schemes are ignored.
    pub signatures: Vec<String>,
}

impl FromStr for SignatureHeader {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut timestamp = None;
        let mut signatures = Vec::new();
        for item in s.split(',') {
            let Some((key, value)) = item.split_once('=') else {
                continue;
            };
            match key.trim() {
                "t" => {
                    let t = value.trim().parse::<i64>().map_err(|_| WebhookError::MalformedSignature)?;
                    timestamp = Some(t);
                },
                SIGNATURE_SCHEME => signatures.push(value.trim().to_string()),
                _ => {},
            }
        }
        let timestamp = timestamp.ok_or(WebhookError::MalformedSignature)?;
        if signatures.is_empty() {
            return Err(WebhookError::NoSignaturesForScheme);
        }
        Ok(Self { timestamp, signatures })
    }
}

fn signed_payload_mac(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, WebhookError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| WebhookError::InvalidSecret(e.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Calculates the `v1` signature for `payload` as signed at `timestamp`.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, WebhookError> {
    let digest = signed_payload_mac(secret, timestamp, payload)?.finalize().into_bytes();
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// Decodes a hex signature. Anything that isn't an even number of hex digits yields `None`.
fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    (0..s.len()).step_by(2).map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok()).collect()
}

//-------------------------------------- StripeWebhookVerifier ---------------------------------------------------------
#[derive(Clone, Debug)]
pub struct StripeWebhookVerifier {
    secret: Secret<String>,
    /// Maximum age of a signature, in seconds. Zero or less disables the age check.
    tolerance: i64,
}

impl StripeWebhookVerifier {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret, tolerance: DEFAULT_SIGNATURE_TOLERANCE_SECS }
    }

    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance = tolerance_secs;
        self
    }

    pub fn tolerance(&self) -> i64 {
        self.tolerance
    }

    /// Checks the signature of `payload` against the header, as of `now`.
    pub fn verify_at(&self, payload: &[u8], header: Option<&str>, now: DateTime<Utc>) -> Result<(), WebhookError> {
        if self.secret.is_empty() {
            warn!("🔐️ Cannot verify webhook: no signing secret is configured.");
            return Err(WebhookError::SecretNotConfigured);
        }
        let header = header.ok_or(WebhookError::MissingSignature)?.parse::<SignatureHeader>()?;
        trace!("🔐️ Checking {} signature(s) for webhook signed at {}", header.signatures.len(), header.timestamp);
        let mac = signed_payload_mac(self.secret.reveal(), header.timestamp, payload)?;
        let found = header
            .signatures
            .iter()
            .filter_map(|s| decode_hex(s))
            .any(|candidate| mac.clone().verify_slice(&candidate).is_ok());
        if !found {
            debug!("🔐️ None of the webhook signatures match the payload.");
            return Err(WebhookError::SignatureMismatch);
        }
        let age = now.timestamp() - header.timestamp;
        if self.tolerance > 0 && age > self.tolerance {
            debug!("🔐️ Webhook signature is {age}s old. Tolerance is {}s.", self.tolerance);
            return Err(WebhookError::TimestampOutsideTolerance { age, tolerance: self.tolerance });
        }
        trace!("🔐️ Webhook signature check ✅️");
        Ok(())
    }
}

impl EventAuthenticator for StripeWebhookVerifier {
    fn construct_event(&self, payload: &[u8], signature: Option<&str>) -> Result<PaymentEvent, WebhookError> {
        self.verify_at(payload, signature, Utc::now())?;
        PaymentEvent::from_json(payload).map_err(|e| WebhookError::MalformedPayload(e.to_string()))
    }
}
