use tokio::sync::mpsc;

use crate::{
    events::HubMessage,
    traits::{DeliveryError, SessionId, Subscriber},
};

/// A subscriber backed by an unbounded tokio channel. The receiving half belongs to the transport.
#[derive(Debug, Clone)]
pub struct ChannelSubscriber {
    session_id: SessionId,
    sender: mpsc::UnboundedSender<HubMessage>,
}

impl ChannelSubscriber {
    pub fn new(session_id: SessionId) -> (Self, mpsc::UnboundedReceiver<HubMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { session_id, sender }, receiver)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Subscriber for ChannelSubscriber {
    fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    fn send(&self, message: HubMessage) -> Result<(), DeliveryError> {
        self.sender.send(message).map_err(|_| DeliveryError::Disconnected(self.session_id.clone()))
    }
}
