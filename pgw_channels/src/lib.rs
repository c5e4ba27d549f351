//! # Payment gateway channels
//!
//! A provider-agnostic abstraction over online payment providers. Callers describe what they want charged with an
//! [`Order`], and a [`PayChannel`] translates it into a provider-specific payment request. Trade queries and provider
//! callbacks come back normalized as [`Trade`] and [`Notification`] values, so nothing at the call site needs to know
//! which provider is behind a payment.
//!
//! The crate is divided into:
//! 1. The channel contract ([`PayChannel`]) and the registry that dispatches to channels by identifier ([`Service`]).
//! 2. The normalized data model: [`mod@order`], [`mod@trade`] and [`mod@callback`].
//! 3. The provider adapters: [`mod@alipay`], [`mod@paypal`] and [`mod@wxpay`]. Each adapter is generic over a
//!    collaborator trait (e.g. [`alipay::client::AlipayClient`]) that owns signing, verification and transport for
//!    that provider's wire protocol.
//!
//! ## Callback routing
//! Every callback URL a channel gives a provider carries `channel` and `order_no` query parameters. The registry reads
//! `channel` from the inbound request to find the adapter that should handle it.
pub mod alipay;
pub mod callback;
mod channel;
pub mod config;
mod errors;
pub mod order;
pub mod paypal;
mod service;
pub mod trade;
pub mod wxpay;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use callback::{CallbackRequest, CallbackUrls};
pub use channel::PayChannel;
pub use errors::{ChannelError, ProviderError};
pub use order::{Order, OrderAmounts, Product, ShippingAddress, TradeMethod};
pub use service::Service;
pub use trade::{Notification, NotificationKind, RawNotification, RawTrade, Trade};
