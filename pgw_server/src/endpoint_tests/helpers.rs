use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, App};
use log::debug;
use pgw_channels::{test_utils::MockChannel, Service};

use crate::{config::ServerConfig, routes::configure};

pub fn mock_channel(id: &str) -> MockChannel {
    let mut channel = MockChannel::new();
    channel.expect_identifier().return_const(id.to_string());
    channel
}

pub fn service_with(channels: Vec<MockChannel>) -> Service {
    let mut service = Service::new();
    channels.into_iter().for_each(|c| service.register_channel(c));
    service
}

/// Sends `req` to an app wired with every gateway route, and returns the status and body.
pub async fn send(req: TestRequest, service: Service) -> (StatusCode, String) {
    let app = App::new()
        .app_data(web::Data::new(service))
        .app_data(web::Data::new(ServerConfig::default()))
        .configure(configure);
    let app = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Invalid JSON ({e}): {body}"))
}
