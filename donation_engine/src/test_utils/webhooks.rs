use serde_json::{json, Value};

use crate::stripe::compute_signature;

/// Builds a `Stripe-Signature` header value for `payload`, as though Stripe had signed it at `timestamp`.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let sig = compute_signature(secret, timestamp, payload).unwrap_or_default();
    format!("t={timestamp},v1={sig}")
}

/// Wraps `object` in a webhook event envelope of the given type.
pub fn event_json(event_type: &str, object: Value) -> String {
    json!({
        "id": format!("evt_{}", rand::random::<u32>()),
        "object": "event",
        "type": event_type,
        "data": { "object": object },
    })
    .to_string()
}
