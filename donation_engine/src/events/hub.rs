use std::{collections::HashMap, fmt::Debug, sync::Arc};

use log::*;
use parking_lot::RwLock;

use crate::{
    donation::Donation,
    events::HubMessage,
    traits::{SessionId, Subscriber},
};

type SubscriberMap = HashMap<SessionId, Arc<dyn Subscriber>>;

/// The set of currently connected viewers.
///
/// Cloning is cheap and every clone shares the same set. The hub never closes a connection; it only forgets handles
/// when the transport tells it to.
#[derive(Clone, Default)]
pub struct BroadcastHub {
    subscribers: Arc<RwLock<SubscriberMap>>,
}

impl Debug for BroadcastHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BroadcastHub({} subscribers)", self.subscriber_count())
    }
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber. A handle with the same session id replaces the old one.
    pub fn register(&self, subscriber: Arc<dyn Subscriber>) {
        let id = subscriber.session_id().clone();
        let total = {
            let mut subscribers = self.subscribers.write();
            if subscribers.insert(id.clone(), subscriber).is_some() {
                warn!("📡️ Subscriber {id} was already registered. Replacing the old handle.");
            }
            subscribers.len()
        };
        debug!("📡️ Subscriber {id} registered. {total} connected.");
    }

    /// Removes a subscriber. Unknown ids are ignored. Returns true if the subscriber was registered.
    pub fn unregister(&self, id: &SessionId) -> bool {
        let (removed, total) = {
            let mut subscribers = self.subscribers.write();
            let removed = subscribers.remove(id).is_some();
            (removed, subscribers.len())
        };
        if removed {
            debug!("📡️ Subscriber {id} unregistered. {total} connected.");
        } else {
            trace!("📡️ Subscriber {id} was not registered. Nothing to do.");
        }
        removed
    }

    pub fn is_registered(&self, id: &SessionId) -> bool {
        self.subscribers.read().contains_key(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Sends the donation to every subscriber registered right now, in no particular order. Returns the number of
    /// subscribers that accepted it.
    pub fn broadcast(&self, donation: &Donation) -> usize {
        let delivered = self.fan_out(&HubMessage::Donation(donation.clone()));
        info!("📡️ Donation broadcast to {delivered} viewer(s): {donation}");
        delivered
    }

    /// Pings every subscriber. Returns the number of subscribers that accepted the ping.
    pub fn send_keepalive(&self) -> usize {
        self.fan_out(&HubMessage::KeepAlive)
    }

    fn fan_out(&self, message: &HubMessage) -> usize {
        // Snapshot so that (un)registrations never wait on, or interfere with, delivery.
        let snapshot = self.subscribers.read().values().cloned().collect::<Vec<_>>();
        snapshot
            .iter()
            .filter(|sub| match sub.send(message.clone()) {
                Ok(()) => true,
                Err(e) => {
                    debug!("📡️ Could not deliver to subscriber. {e}");
                    false
                },
            })
            .count()
    }
}
