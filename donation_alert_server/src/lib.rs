//! # Donation alert server
//! This crate hosts the server code for donation alerts. It is responsible for:
//! Listening for incoming payment webhooks from Stripe.
//! Verifying the webhook signature and turning the event into a donation record.
//! Pushing each donation to every connected overlay (e.g. an OBS browser source) over Server-Sent Events.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/`: A human-readable status page.
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/events`: The Server-Sent Events stream that overlays subscribe to.
//! * `/webhook`: The webhook route for receiving payment events from Stripe.
//! * `/test-donation`: Broadcasts a made-up donation, for setting up and testing overlays.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod keepalive_worker;
pub mod routes;
pub mod server;
pub mod sse;
