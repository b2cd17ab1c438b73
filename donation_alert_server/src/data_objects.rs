use donation_engine::Donation;
use serde::{Deserialize, Serialize};

/// The reply to every authenticated webhook, whether or not it produced a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDonationResponse {
    pub success: bool,
    pub donation: Donation,
}

impl TestDonationResponse {
    pub fn success(donation: Donation) -> Self {
        Self { success: true, donation }
    }
}
