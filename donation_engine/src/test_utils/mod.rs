//! Fixtures for signing and building webhook payloads in tests.
mod webhooks;

pub use webhooks::{event_json, signature_header};
