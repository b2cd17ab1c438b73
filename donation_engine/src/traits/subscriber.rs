use std::fmt::Display;

use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::HubMessage;

pub const SESSION_ID_LENGTH: usize = 20;

/// Identifies one viewer connection for as long as it is open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn random() -> Self {
        let id = rand::thread_rng().sample_iter(&Alphanumeric).take(SESSION_ID_LENGTH).map(char::from).collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("Subscriber {0} is no longer connected.")]
    Disconnected(SessionId),
}

/// A connected viewer.
///
/// `send` must not block: the hub calls it for every subscriber in turn while fanning out a message.
pub trait Subscriber: Send + Sync {
    fn session_id(&self) -> &SessionId;

    fn send(&self, message: HubMessage) -> Result<(), DeliveryError>;
}
