//! Server configuration.
//!
//! Everything is read from environment variables when the server starts. Invalid values are logged and replaced by
//! their defaults rather than stopping the server.
//!
//! | Variable                 | Default   |
//! |--------------------------|-----------|
//! | `HOST`                   | `0.0.0.0` |
//! | `PORT`                   | `3001`    |
//! | `STRIPE_SECRET_KEY`      |           |
//! | `STRIPE_WEBHOOK_SECRET`  |           |
//! | `DA_SIGNATURE_TOLERANCE` | `300`     |
//! | `DA_KEEPALIVE_INTERVAL`  | `15`      |
use std::{env, time::Duration};

use da_common::{helpers::env_or_default, Secret};
use donation_engine::{stripe::DEFAULT_SIGNATURE_TOLERANCE_SECS, StripeWebhookVerifier};
use log::*;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_KEEPALIVE_INTERVAL_SECS: u64 = 15;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds between keepalive pings to connected viewers. Zero disables keepalives.
    pub keepalive_interval_secs: u64,
    pub stripe: StripeConfig,
}

#[derive(Clone, Debug)]
pub struct StripeConfig {
    /// The Stripe API key. Nothing in the webhook flow calls the Stripe API, but deployments carry it alongside the
    /// webhook secret.
    pub secret_key: Secret<String>,
    /// The signing secret for the webhook endpoint (`whsec_...`).
    pub webhook_secret: Secret<String>,
    /// Maximum age of a webhook signature, in seconds. Zero disables the check.
    pub signature_tolerance: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            keepalive_interval_secs: DEFAULT_KEEPALIVE_INTERVAL_SECS,
            stripe: StripeConfig::default(),
        }
    }
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: Secret::default(),
            webhook_secret: Secret::default(),
            signature_tolerance: DEFAULT_SIGNATURE_TOLERANCE_SECS,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("HOST").ok().unwrap_or_else(|| DEFAULT_HOST.into());
        let port = env_or_default("PORT", DEFAULT_PORT);
        let keepalive_interval_secs = env_or_default("DA_KEEPALIVE_INTERVAL", DEFAULT_KEEPALIVE_INTERVAL_SECS);
        if keepalive_interval_secs == 0 {
            warn!("🪛️ Keepalives are disabled. Disconnected viewers may linger until the next donation.");
        }
        let stripe = StripeConfig::from_env_or_defaults();
        Self { host, port, keepalive_interval_secs, stripe }
    }

    pub fn keepalive_interval(&self) -> Option<Duration> {
        (self.keepalive_interval_secs > 0).then(|| Duration::from_secs(self.keepalive_interval_secs))
    }
}

impl StripeConfig {
    pub fn from_env_or_defaults() -> Self {
        let secret_key = env::var("STRIPE_SECRET_KEY").ok().unwrap_or_else(|| {
            warn!("🪛️ STRIPE_SECRET_KEY is not set.");
            String::default()
        });
        let webhook_secret = env::var("STRIPE_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ STRIPE_WEBHOOK_SECRET is not set. Please set it to the signing secret of your Stripe webhook \
                 endpoint. Until you do, every webhook will be rejected."
            );
            String::default()
        });
        let signature_tolerance = env_or_default("DA_SIGNATURE_TOLERANCE", DEFAULT_SIGNATURE_TOLERANCE_SECS);
        if signature_tolerance <= 0 {
            warn!("🪛️ Webhook signature age checks are disabled. Old webhooks can be replayed.");
        }
        Self { secret_key: Secret::new(secret_key), webhook_secret: Secret::new(webhook_secret), signature_tolerance }
    }

    pub fn webhook_verifier(&self) -> StripeWebhookVerifier {
        StripeWebhookVerifier::new(self.webhook_secret.clone()).with_tolerance(self.signature_tolerance)
    }
}
