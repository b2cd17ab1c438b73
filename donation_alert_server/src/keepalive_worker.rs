use std::time::Duration;

use donation_engine::BroadcastHub;
use log::*;
use tokio::task::JoinHandle;

/// Starts the keepalive worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Writing to a connection whose client has gone away fails, and that is how the transport learns of the disconnect.
/// Without a periodic write, dead viewers stay registered until the next donation.
pub fn start_keepalive_worker(hub: BroadcastHub, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        info!("💓️ Keepalive worker started. Pinging viewers every {}s", interval.as_secs());
        loop {
            timer.tick().await;
            let pinged = hub.send_keepalive();
            trace!("💓️ Keepalive sent to {pinged} viewer(s)");
        }
    })
}
