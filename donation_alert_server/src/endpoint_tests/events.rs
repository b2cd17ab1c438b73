use std::{future::poll_fn, pin::Pin};

use actix_web::{
    body::MessageBody,
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    web::Bytes,
    App,
};
use chrono::Utc;
use donation_engine::{BroadcastHub, Donation};

use crate::routes::events;

async fn next_frame<B: MessageBody + Unpin>(body: &mut B) -> String {
    let frame: Option<Result<Bytes, _>> = poll_fn(|cx| Pin::new(&mut *body).poll_next(cx)).await;
    match frame {
        Some(Ok(bytes)) => String::from_utf8(bytes.to_vec()).unwrap(),
        _ => panic!("Event stream ended unexpectedly"),
    }
}

#[actix_web::test]
async fn event_stream_lifecycle() {
    let _ = env_logger::try_init();
    let hub = BroadcastHub::new();
    let app = test::init_service(App::new().app_data(web::Data::new(hub.clone())).service(events)).await;
    let req = TestRequest::get().uri("/events").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let headers = res.headers();
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/event-stream");
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-cache");
    assert_eq!(hub.subscriber_count(), 1);

    let mut body = res.into_body();
    let greeting = next_frame(&mut body).await;
    assert!(greeting.starts_with("event: connected\ndata: {\"id\":\""));

    let donation = Donation::new("7.50".parse().unwrap(), "USD", "Jane", "Hi!", Utc::now());
    assert_eq!(hub.broadcast(&donation), 1);
    let frame = next_frame(&mut body).await;
    assert!(frame.starts_with("event: donation\ndata: "));
    assert!(frame.contains(r#""amount":7.5"#));
    assert!(frame.contains(r#""donorName":"Jane""#));

    assert_eq!(hub.send_keepalive(), 1);
    assert_eq!(next_frame(&mut body).await, ": keepalive\n\n");

    // Closing the response is what a disconnecting client looks like to the hub
    drop(body);
    assert_eq!(hub.subscriber_count(), 0);
    assert_eq!(hub.broadcast(&donation), 0);
}

#[actix_web::test]
async fn each_stream_is_a_separate_viewer() {
    let _ = env_logger::try_init();
    let hub = BroadcastHub::new();
    let app = test::init_service(App::new().app_data(web::Data::new(hub.clone())).service(events)).await;
    let first = test::call_service(&app, TestRequest::get().uri("/events").to_request()).await;
    let second = test::call_service(&app, TestRequest::get().uri("/events").to_request()).await;
    assert_eq!(hub.subscriber_count(), 2);
    drop(first);
    assert_eq!(hub.subscriber_count(), 1);
    drop(second);
    assert_eq!(hub.subscriber_count(), 0);
}
