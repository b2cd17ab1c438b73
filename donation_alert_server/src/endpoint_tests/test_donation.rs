use std::sync::Arc;

use actix_web::http::StatusCode;
use donation_engine::{BroadcastHub, ChannelSubscriber, HubMessage, SessionId};
use serde_json::Value;

use super::helpers::{drain, post_request};

#[actix_web::test]
async fn empty_body_uses_defaults() {
    let _ = env_logger::try_init();
    let hub = BroadcastHub::new();
    let (viewer, mut rx) = ChannelSubscriber::new(SessionId::from("viewer-1"));
    hub.register(Arc::new(viewer));
    let (status, body) = post_request(&hub, "/test-donation", "", &[]).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], true);
    let donation = &body["donation"];
    assert_eq!(donation["amount"].as_f64(), Some(10.0));
    assert_eq!(donation["currency"], "USD");
    assert_eq!(donation["donorName"], "Test Donor");
    assert_eq!(donation["message"], "This is a test donation!");
    assert!(donation["timestamp"].as_str().unwrap().ends_with('Z'));
    match drain(&mut rx).as_slice() {
        [HubMessage::Donation(d)] => assert_eq!(d.donor_name, "Test Donor"),
        other => panic!("Expected exactly one donation, got {other:?}"),
    }
}

#[actix_web::test]
async fn empty_object_uses_defaults() {
    let _ = env_logger::try_init();
    let hub = BroadcastHub::new();
    let (status, body) =
        post_request(&hub, "/test-donation", "{}", &[("Content-Type", "application/json")]).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["donation"]["donorName"], "Test Donor");
}

#[actix_web::test]
async fn supplied_fields_are_used() {
    let _ = env_logger::try_init();
    let hub = BroadcastHub::new();
    let request = r#"{"amount": 42.5, "currency": "cad", "donorName": "Zed"}"#;
    let (status, body) = post_request(&hub, "/test-donation", request, &[("Content-Type", "application/json")]).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    let donation = &body["donation"];
    assert_eq!(donation["amount"].as_f64(), Some(42.5));
    assert_eq!(donation["currency"], "cad");
    assert_eq!(donation["donorName"], "Zed");
    assert_eq!(donation["message"], "This is a test donation!");
}

#[actix_web::test]
async fn invalid_json_is_rejected() {
    let _ = env_logger::try_init();
    let hub = BroadcastHub::new();
    let (viewer, mut rx) = ChannelSubscriber::new(SessionId::from("viewer-1"));
    hub.register(Arc::new(viewer));
    let (status, body) = post_request(&hub, "/test-donation", "{not json", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Could not read request body: "#));
    assert!(drain(&mut rx).is_empty());
}

#[actix_web::test]
async fn scalar_json_is_rejected() {
    let _ = env_logger::try_init();
    let hub = BroadcastHub::new();
    let (viewer, mut rx) = ChannelSubscriber::new(SessionId::from("viewer-1"));
    hub.register(Arc::new(viewer));
    for body in ["null", "42", "\"donate\""] {
        let (status, _) = post_request(&hub, "/test-donation", body, &[]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body} should be rejected");
    }
    assert!(drain(&mut rx).is_empty());
}

#[actix_web::test]
async fn array_body_uses_defaults() {
    let _ = env_logger::try_init();
    let hub = BroadcastHub::new();
    let (status, body) = post_request(&hub, "/test-donation", r#"[5, "usd"]"#, &[]).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["donation"]["amount"].as_f64(), Some(10.0));
    assert_eq!(body["donation"]["currency"], "USD");
}

#[actix_web::test]
async fn wrongly_typed_fields_use_defaults() {
    let _ = env_logger::try_init();
    let hub = BroadcastHub::new();
    let (viewer, mut rx) = ChannelSubscriber::new(SessionId::from("viewer-1"));
    hub.register(Arc::new(viewer));
    for request in [r#"{"donorName": 42}"#, r#"{"message": true}"#, r#"{"amount": "lots", "currency": {}}"#] {
        let (status, body) = post_request(&hub, "/test-donation", request, &[]).await;
        assert_eq!(status, StatusCode::OK, "{request} should be accepted");
        let body: Value = serde_json::from_str(&body).unwrap();
        let donation = &body["donation"];
        assert_eq!(donation["donorName"], "Test Donor");
        assert_eq!(donation["message"], "This is a test donation!");
        assert_eq!(donation["amount"].as_f64(), Some(10.0));
        assert_eq!(donation["currency"], "USD");
    }
    assert_eq!(drain(&mut rx).len(), 3);
    let (status, body) = post_request(&hub, "/test-donation", r#"{"amount": "5"}"#, &[]).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["donation"]["amount"].as_f64(), Some(5.0));
    assert_eq!(drain(&mut rx).len(), 1);
}
