use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    App,
};
use da_common::Secret;
use donation_engine::{BroadcastHub, HubMessage, StripeWebhookVerifier};
use log::debug;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::server::configure_routes;

/// The webhook signing secret used throughout the endpoint tests. DO NOT re-use it anywhere.
pub const WEBHOOK_SECRET: &str = "whsec_endpoint_tests";

pub fn verifier() -> StripeWebhookVerifier {
    StripeWebhookVerifier::new(Secret::new(WEBHOOK_SECRET.to_string()))
}

pub async fn post_request(
    hub: &BroadcastHub,
    path: &str,
    body: impl Into<String>,
    headers: &[(&str, &str)],
) -> (StatusCode, String) {
    let mut req = TestRequest::post().uri(path).set_payload(body.into());
    for (name, value) in headers {
        req = req.insert_header((*name, *value));
    }
    let app = App::new()
        .app_data(web::Data::new(donation_engine::DonationFlowApi::new(verifier(), hub.clone())))
        .app_data(web::Data::new(hub.clone()))
        .configure(configure_routes::<StripeWebhookVerifier>);
    let service = test::init_service(app).await;
    debug!("Making request to {path}");
    let (_, res) = test::call_service(&service, req.to_request()).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

/// Everything a viewer has been sent so far, without waiting for more.
pub fn drain(rx: &mut UnboundedReceiver<HubMessage>) -> Vec<HubMessage> {
    let mut messages = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        messages.push(msg);
    }
    messages
}
