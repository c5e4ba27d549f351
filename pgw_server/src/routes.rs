//! Request handler definitions
//!
//! Define each route and its handler here. Handlers stay thin: they convert the HTTP request into channel types, call
//! the [`Service`] and serialize whatever comes back.
//!
//! The callback routes (`/pay/return`, `/pay/notify`, `/pay/cancel`) must be registered before [`create_payment`],
//! since `/pay/{channel}` would otherwise capture them.
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use bytes::Bytes;
use log::*;
use pgw_channels::Service;

use crate::{
    config::ServerConfig,
    data_objects::{CancelParams, JsonResponse, NewPaymentRequest, PaymentResponse},
    errors::ServerError,
    helpers::{callback_request, get_remote_ip},
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Channels  ----------------------------------------------------
#[get("/channels")]
pub async fn channels(service: web::Data<Service>) -> HttpResponse {
    trace!("💻️ Received channel list request");
    HttpResponse::Ok().json(service.channels())
}

//----------------------------------------------   Payments  ----------------------------------------------------
/// Starts a payment on `channel`. The response's `target` is whatever the channel produced for the requested trade
/// method.
#[post("/pay/{channel}")]
pub async fn create_payment(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<NewPaymentRequest>,
    config: web::Data<ServerConfig>,
    service: web::Data<Service>,
) -> Result<HttpResponse, ServerError> {
    let channel = path.into_inner();
    let client_ip = get_remote_ip(&req, config.proxy.use_x_forwarded_for, config.proxy.use_forwarded);
    let order = body.into_inner().into_order(&config.default_currency, client_ip.map(|ip| ip.to_string()));
    debug!("💻️ New {} payment request for order {} on '{channel}'", order.trade_method, order.order_no);
    let target = service.create_payment(&channel, &order).await?;
    let response = PaymentResponse { channel, order_no: order.order_no, trade_method: order.trade_method, target };
    Ok(HttpResponse::Ok().json(response))
}

#[get("/trade/{channel}/{trade_no}")]
pub async fn trade(path: web::Path<(String, String)>, service: web::Data<Service>) -> Result<HttpResponse, ServerError> {
    let (channel, trade_no) = path.into_inner();
    trace!("💻️ Trade query for {trade_no} on '{channel}'");
    let trade = service.get_trade(&channel, &trade_no).await?;
    Ok(HttpResponse::Ok().json(trade))
}

#[get("/order/{channel}/{order_no}")]
pub async fn trade_by_order(
    path: web::Path<(String, String)>,
    service: web::Data<Service>,
) -> Result<HttpResponse, ServerError> {
    let (channel, order_no) = path.into_inner();
    trace!("💻️ Trade query for order {order_no} on '{channel}'");
    let found = service.get_trade_with_order_no(&channel, &order_no).await?;
    Ok(HttpResponse::Ok().json(found))
}

//----------------------------------------------   Callbacks  ----------------------------------------------------
/// The payer's browser lands here after paying. Some providers redirect with a GET, others post a form.
pub async fn payment_return(
    req: HttpRequest,
    body: Bytes,
    service: web::Data<Service>,
) -> Result<HttpResponse, ServerError> {
    let callback = callback_request(&req, &body);
    trace!("💻️ Payment return: {}", req.query_string());
    let returned = service.return_request_handler(&callback).await?;
    info!(
        "💻️ Payer returned from {} for order {}. Trade {} is {} (paid: {})",
        returned.channel, returned.order_no, returned.trade_no, returned.trade_status, returned.trade_success
    );
    Ok(HttpResponse::Ok().json(returned))
}

#[post("/pay/notify")]
pub async fn payment_notify(
    req: HttpRequest,
    body: Bytes,
    service: web::Data<Service>,
) -> Result<HttpResponse, ServerError> {
    let callback = callback_request(&req, &body);
    let notification = service.notify_request_handler(&callback).await.map_err(|e| {
        warn!("💻️ Rejected payment notification ({}). {e}", req.query_string());
        e
    })?;
    match notification.notify_type {
        Some(kind) => info!(
            "💻️ {kind} notification from {} for order {} (trade {})",
            notification.channel, notification.order_no, notification.trade_no
        ),
        None => info!("💻️ Unrecognised notification from {} acknowledged", notification.channel),
    }
    Ok(HttpResponse::Ok().json(notification))
}

#[get("/pay/cancel")]
pub async fn payment_cancel(params: web::Query<CancelParams>) -> HttpResponse {
    let CancelParams { channel, order_no } = params.into_inner();
    info!("💻️ Payer cancelled the {channel} payment for order {order_no}");
    HttpResponse::Ok().json(JsonResponse::success(format!("Payment for order {order_no} was cancelled")))
}

/// Registers every gateway route on `cfg`, callbacks first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(channels)
        .service(
            web::resource("/pay/return")
                .route(web::get().to(payment_return))
                .route(web::post().to(payment_return)),
        )
        .service(payment_notify)
        .service(payment_cancel)
        .service(create_payment)
        .service(trade)
        .service(trade_by_order);
}
