use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, web::ServiceConfig, App, HttpServer};
use donation_engine::{traits::EventAuthenticator, BroadcastHub, DonationFlowApi};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    keepalive_worker::start_keepalive_worker,
    routes::{events, health, index, TestDonationRoute, WebhookRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let hub = BroadcastHub::new();
    let verifier = config.stripe.webhook_verifier();
    match config.keepalive_interval() {
        Some(interval) => {
            let _keepalive = start_keepalive_worker(hub.clone(), interval);
        },
        None => info!("💓️ Keepalive worker is disabled"),
    }
    let srv = create_server_instance(config, hub, verifier)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<A>(config: ServerConfig, hub: BroadcastHub, authenticator: A) -> Result<Server, ServerError>
where A: EventAuthenticator + Clone + Send + 'static {
    let srv = HttpServer::new(move || {
        let donation_api = DonationFlowApi::new(authenticator.clone(), hub.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("das::access_log"))
            .app_data(web::Data::new(donation_api))
            .app_data(web::Data::new(hub.clone()))
            .configure(configure_routes::<A>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

pub fn configure_routes<A>(cfg: &mut ServiceConfig)
where A: EventAuthenticator + 'static {
    cfg.service(health)
        .service(index)
        .service(events)
        .service(WebhookRoute::<A>::new())
        .service(TestDonationRoute::<A>::new());
}
