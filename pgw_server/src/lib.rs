//! # Payment gateway server
//! This crate hosts the HTTP layer of the payment gateway. It is responsible for:
//! * Accepting payment requests and forwarding them to the requested channel.
//! * Answering trade status queries.
//! * Receiving return redirects and asynchronous notifications from payment providers, and routing them back to the
//!   channel that created the payment.
//!
//! The server does not construct channels itself. The embedding binary builds a [`pgw_channels::Service`] with its
//! provider clients and hands it to [`server::run_server`].
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /channels`: The identifiers of the registered channels.
//! * `POST /pay/{channel}`: Start a payment.
//! * `GET /trade/{channel}/{trade_no}`, `GET /order/{channel}/{order_no}`: Query a trade.
//! * `GET|POST /pay/return`, `POST /pay/notify`, `GET /pay/cancel`: Provider callbacks.
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
