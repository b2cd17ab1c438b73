//! Donation fan-out.
//!
//! There is one [`BroadcastHub`] per process. The transport registers a [`Subscriber`] handle for each viewer when it
//! connects and unregisters it when the viewer goes away. [`BroadcastHub::broadcast`] delivers a donation to everyone
//! registered at that instant; there is no replay for viewers who connect later.
//!
//! [`ChannelSubscriber`] is the stock subscriber: it forwards hub messages onto a tokio channel that the transport
//! drains at its own pace.
//!
//! [`Subscriber`]: crate::traits::Subscriber
mod channel;
mod event_types;
mod hub;

pub use channel::ChannelSubscriber;
pub use event_types::{HubMessage, CONNECTED_EVENT, DONATION_EVENT};
pub use hub::BroadcastHub;
