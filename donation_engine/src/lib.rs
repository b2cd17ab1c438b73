//! Donation Engine
//!
//! The core of the donation alert server. It is transport-agnostic: nothing in here knows about HTTP or
//! Server-Sent Events.
//!
//! The library is divided into three sections:
//! 1. Payment-processor events ([`mod@stripe`]). Raw webhook bodies are authenticated by an [`EventAuthenticator`]
//!    and shaped into a [`PaymentEvent`] straight away, so nothing downstream handles untyped JSON.
//! 2. Normalization ([`mod@normalizer`]). A [`PaymentEvent`] becomes at most one [`Donation`] record. The donor name
//!    and message are resolved through a fixed chain of fallbacks, so normalization itself cannot fail.
//! 3. Fan-out ([`mod@events`]). The [`BroadcastHub`] keeps the set of connected viewers and delivers every donation
//!    to everyone connected at that moment. Viewers are reached through the [`Subscriber`] trait.
//!
//! [`DonationFlowApi`] ties the three together and is what the server calls.
pub mod donation;
pub mod events;
pub mod normalizer;
pub mod stripe;
pub mod traits;

mod api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::donation_flow_api::DonationFlowApi;
pub use donation::{Donation, TestDonationRequest};
pub use events::{BroadcastHub, ChannelSubscriber, HubMessage};
pub use stripe::{PaymentEvent, StripeWebhookVerifier};
pub use traits::{DeliveryError, EventAuthenticator, SessionId, Subscriber, WebhookError};
