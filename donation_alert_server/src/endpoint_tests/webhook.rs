use std::sync::Arc;

use actix_web::http::StatusCode;
use chrono::Utc;
use donation_engine::{
    stripe::SIGNATURE_HEADER,
    test_utils::{event_json, signature_header},
    BroadcastHub,
    ChannelSubscriber,
    HubMessage,
    SessionId,
};
use serde_json::{json, Value};

use super::helpers::{drain, post_request, WEBHOOK_SECRET};

fn signed(payload: &str) -> String {
    signature_header(WEBHOOK_SECRET, Utc::now().timestamp(), payload.as_bytes())
}

fn hub_with_viewer() -> (BroadcastHub, tokio::sync::mpsc::UnboundedReceiver<HubMessage>) {
    let hub = BroadcastHub::new();
    let (viewer, rx) = ChannelSubscriber::new(SessionId::from("viewer-1"));
    hub.register(Arc::new(viewer));
    (hub, rx)
}

fn checkout_payload() -> String {
    event_json(
        "checkout.session.completed",
        json!({
            "id": "cs_test_1",
            "amount_total": 2599,
            "currency": "usd",
            "customer_details": { "name": "Bob", "email": "bob@example.com" },
            "metadata": { "donor_name": "Other" },
            "custom_fields": [
                { "key": "name", "text": { "value": "Jane" } },
                { "key": "message", "text": { "value": "Go team!" } }
            ]
        }),
    )
}

#[actix_web::test]
async fn checkout_session_is_broadcast() {
    let _ = env_logger::try_init();
    let (hub, mut rx) = hub_with_viewer();
    let payload = checkout_payload();
    let sig = signed(&payload);
    let (status, body) = post_request(&hub, "/webhook", payload, &[(SIGNATURE_HEADER, &sig)]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"received":true}"#);
    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 1);
    let HubMessage::Donation(donation) = &messages[0] else {
        panic!("Expected a donation, got {messages:?}");
    };
    assert_eq!(donation.amount.to_string(), "25.99");
    assert_eq!(donation.currency, "USD");
    assert_eq!(donation.donor_name, "Jane");
    assert_eq!(donation.message, "Go team!");
}

#[actix_web::test]
async fn payment_intent_is_broadcast() {
    let _ = env_logger::try_init();
    let (hub, mut rx) = hub_with_viewer();
    let payload = event_json(
        "payment_intent.succeeded",
        json!({ "id": "pi_1", "amount": 500, "currency": "eur", "metadata": { "message": "Cheers" } }),
    );
    let sig = signed(&payload);
    let (status, _) = post_request(&hub, "/webhook", payload, &[(SIGNATURE_HEADER, &sig)]).await;
    assert_eq!(status, StatusCode::OK);
    match drain(&mut rx).as_slice() {
        [HubMessage::Donation(d)] => {
            assert_eq!(d.amount.to_string(), "5.00");
            assert_eq!(d.currency, "EUR");
            assert_eq!(d.donor_name, "Anonymous");
            assert_eq!(d.message, "Cheers");
        },
        other => panic!("Expected exactly one donation, got {other:?}"),
    }
}

#[actix_web::test]
async fn other_event_types_are_acknowledged_but_not_broadcast() {
    let _ = env_logger::try_init();
    let (hub, mut rx) = hub_with_viewer();
    let payload = event_json("customer.created", json!({ "id": "cus_1" }));
    let sig = signed(&payload);
    let (status, body) = post_request(&hub, "/webhook", payload, &[(SIGNATURE_HEADER, &sig)]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"received":true}"#);
    assert!(drain(&mut rx).is_empty());
}

#[actix_web::test]
async fn bad_signature_is_rejected() {
    let _ = env_logger::try_init();
    let (hub, mut rx) = hub_with_viewer();
    let payload = checkout_payload();
    let sig = signature_header("whsec_not_the_secret", Utc::now().timestamp(), payload.as_bytes());
    let (status, body) = post_request(&hub, "/webhook", payload, &[(SIGNATURE_HEADER, &sig)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body["error"],
        "Webhook Error: No signatures found matching the expected signature for payload."
    );
    assert!(drain(&mut rx).is_empty());
}

#[actix_web::test]
async fn tampered_body_is_rejected() {
    let _ = env_logger::try_init();
    let (hub, mut rx) = hub_with_viewer();
    let payload = checkout_payload();
    let sig = signed(&payload);
    let tampered = payload.replace("2599", "259900");
    let (status, _) = post_request(&hub, "/webhook", tampered, &[(SIGNATURE_HEADER, &sig)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(drain(&mut rx).is_empty());
}

#[actix_web::test]
async fn missing_signature_is_rejected() {
    let _ = env_logger::try_init();
    let (hub, mut rx) = hub_with_viewer();
    let (status, body) = post_request(&hub, "/webhook", checkout_payload(), &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Webhook Error: "#));
    assert!(drain(&mut rx).is_empty());
}

#[actix_web::test]
async fn stale_signature_is_rejected() {
    let _ = env_logger::try_init();
    let (hub, mut rx) = hub_with_viewer();
    let payload = checkout_payload();
    let sig = signature_header(WEBHOOK_SECRET, Utc::now().timestamp() - 3600, payload.as_bytes());
    let (status, _) = post_request(&hub, "/webhook", payload, &[(SIGNATURE_HEADER, &sig)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(drain(&mut rx).is_empty());
}

#[actix_web::test]
async fn malformed_donation_object_is_rejected() {
    let _ = env_logger::try_init();
    let (hub, mut rx) = hub_with_viewer();
    // A payment intent without an amount
    let payload = event_json("payment_intent.succeeded", json!({ "id": "pi_1", "currency": "usd" }));
    let sig = signed(&payload);
    let (status, _) = post_request(&hub, "/webhook", payload, &[(SIGNATURE_HEADER, &sig)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(drain(&mut rx).is_empty());
}

#[actix_web::test]
async fn every_viewer_gets_the_donation() {
    let _ = env_logger::try_init();
    let hub = BroadcastHub::new();
    let mut receivers = (0..3)
        .map(|i| {
            let (viewer, rx) = ChannelSubscriber::new(SessionId::from(format!("viewer-{i}").as_str()));
            hub.register(Arc::new(viewer));
            rx
        })
        .collect::<Vec<_>>();
    let payload = checkout_payload();
    let sig = signed(&payload);
    let (status, _) = post_request(&hub, "/webhook", payload, &[(SIGNATURE_HEADER, &sig)]).await;
    assert_eq!(status, StatusCode::OK);
    let first = drain(&mut receivers[0]);
    assert_eq!(first.len(), 1);
    for rx in receivers.iter_mut().skip(1) {
        assert_eq!(drain(rx), first);
    }
}
