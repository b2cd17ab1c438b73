use crate::donation::Donation;

pub const DONATION_EVENT: &str = "donation";
pub const CONNECTED_EVENT: &str = "connected";

/// Everything the hub can push to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubMessage {
    Donation(Donation),
    /// Carries no data. Sent periodically so that transports notice dead connections.
    KeepAlive,
}
