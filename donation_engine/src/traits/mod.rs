//! # Seams between the engine and the outside world.
//!
//! * [`EventAuthenticator`] turns a raw webhook body plus its signature header into a trusted [`PaymentEvent`]
//!   (or refuses to).
//! * [`Subscriber`] is a single connected viewer, as seen by the broadcast hub. The transport owns the connection; the
//!   hub only holds a handle that it can `send` to.
//!
//! [`PaymentEvent`]: crate::stripe::PaymentEvent
mod event_authenticator;
mod subscriber;

pub use event_authenticator::{EventAuthenticator, WebhookError};
pub use subscriber::{DeliveryError, SessionId, Subscriber, SESSION_ID_LENGTH};
