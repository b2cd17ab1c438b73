//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Long-lived responses, like the `/events` stream, are therefore
//! expressed as streams that the worker polls alongside everything else.
use actix_web::{get, http::header, web, HttpRequest, HttpResponse, Responder};
use donation_engine::{
    stripe::SIGNATURE_HEADER,
    traits::EventAuthenticator,
    BroadcastHub,
    DonationFlowApi,
    TestDonationRequest,
};
use log::*;
use serde_json::Value;

use crate::{
    data_objects::{TestDonationResponse, WebhookAck},
    errors::ServerError,
    sse::SseConnection,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Status  ----------------------------------------------------
#[get("/")]
pub async fn index(hub: web::Data<BroadcastHub>) -> impl Responder {
    trace!("💻️ Received status page request");
    let viewers = hub.subscriber_count();
    let page = format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Donation alerts</title></head>\n<body>\n<h1>Donation alert server is \
         running</h1>\n<p>Connected viewers: {viewers}</p>\n<p>Overlays subscribe to <code>/events</code>. Stripe \
         posts to <code>/webhook</code>.</p>\n</body>\n</html>\n"
    );
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(page)
}

// ----------------------------------------------   Events  ----------------------------------------------------
/// Opens a Server-Sent Events stream. Every donation broadcast while the stream is open is delivered on it.
#[get("/events")]
pub async fn events(req: HttpRequest, hub: web::Data<BroadcastHub>) -> impl Responder {
    debug!("💻️ New event stream requested from {:?}", req.peer_addr());
    let connection = SseConnection::open(hub.get_ref().clone());
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(connection)
}

// ----------------------------------------------   Webhook  ----------------------------------------------------
route!(webhook => Post "/webhook" impl EventAuthenticator);
/// Route handler for Stripe webhooks.
///
/// The raw body is needed to check the signature in the `Stripe-Signature` header, so it is taken as bytes and only
/// parsed once it has been authenticated. Any authentication or parsing failure is a 400; every authenticated event is
/// acknowledged with `{"received": true}`, whether or not it produced a donation.
pub async fn webhook<A>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<DonationFlowApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: EventAuthenticator,
{
    trace!("💻️ Received webhook request ({} bytes)", body.len());
    let signature = req.headers().get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    match api.process_webhook(&body, signature)? {
        Some(donation) => debug!("💻️ Webhook produced donation: {donation}"),
        None => debug!("💻️ Webhook acknowledged. No donation to broadcast."),
    }
    Ok(HttpResponse::Ok().json(WebhookAck::received()))
}

// ----------------------------------------------   Test donation  ----------------------------------------------
route!(test_donation => Post "/test-donation" impl EventAuthenticator);
/// Broadcasts a made-up donation. Any field left out of the JSON body, or given with the wrong type, takes its test
/// default. So does every field of an empty body or a JSON array.
pub async fn test_donation<A>(body: web::Bytes, api: web::Data<DonationFlowApi<A>>) -> Result<HttpResponse, ServerError>
where A: EventAuthenticator {
    trace!("💻️ Received test donation request");
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        TestDonationRequest::default()
    } else {
        parse_test_donation_request(&body).map_err(|e| {
            debug!("💻️ Could not parse test donation request. {e}");
            e
        })?
    };
    let donation = api.process_test_donation(request);
    Ok(HttpResponse::Ok().json(TestDonationResponse::success(donation)))
}

fn parse_test_donation_request(body: &[u8]) -> Result<TestDonationRequest, ServerError> {
    let value = serde_json::from_slice::<Value>(body).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    match value {
        Value::Object(_) => serde_json::from_value(value).map_err(|e| ServerError::InvalidRequestBody(e.to_string())),
        // An array has no named fields, so every field takes its default
        Value::Array(_) => Ok(TestDonationRequest::default()),
        _ => Err(ServerError::InvalidRequestBody("expected a JSON object or array".into())),
    }
}
