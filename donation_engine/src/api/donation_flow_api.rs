use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    donation::{Donation, TestDonationRequest},
    events::BroadcastHub,
    normalizer::normalize_event,
    stripe::PaymentEvent,
    traits::{EventAuthenticator, WebhookError},
};

/// `DonationFlowApi` is the primary API for turning incoming payment webhooks (and synthetic test requests) into
/// donations on viewers' screens.
pub struct DonationFlowApi<A> {
    authenticator: A,
    hub: BroadcastHub,
}

impl<A> Debug for DonationFlowApi<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DonationFlowApi({:?})", self.hub)
    }
}

impl<A> DonationFlowApi<A> {
    pub fn new(authenticator: A, hub: BroadcastHub) -> Self {
        Self { authenticator, hub }
    }

    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }

    /// Normalizes an already-authenticated event and broadcasts the result. Events that don't describe a donation
    /// are dropped and `None` is returned.
    pub fn process_event(&self, event: &PaymentEvent) -> Option<Donation> {
        let donation = normalize_event(event)?;
        info!("💸️ New donation received: {donation}");
        self.hub.broadcast(&donation);
        Some(donation)
    }

    /// Broadcasts a synthetic donation, filling in any blanks in the request with the test defaults.
    pub fn process_test_donation(&self, request: TestDonationRequest) -> Donation {
        let donation = request.into_donation(Utc::now());
        info!("💸️ Test donation triggered: {donation}");
        self.hub.broadcast(&donation);
        donation
    }
}

impl<A> DonationFlowApi<A>
where A: EventAuthenticator
{
    /// Authenticates a raw webhook and, if it describes a donation, broadcasts it.
    ///
    /// Nothing is broadcast if authentication fails. `Ok(None)` means the webhook was genuine but of a type we
    /// don't act on.
    pub fn process_webhook(&self, payload: &[u8], signature: Option<&str>) -> Result<Option<Donation>, WebhookError> {
        let event = self.authenticator.construct_event(payload, signature).map_err(|e| {
            warn!("💸️ Webhook signature verification failed: {e}");
            e
        })?;
        debug!("💸️ Received {} webhook", event.event_type());
        Ok(self.process_event(&event))
    }
}
