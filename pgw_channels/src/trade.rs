//! Normalized results returned by channels: [`Trade`] snapshots from queries and [`Notification`]s from provider
//! callbacks.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{alipay, paypal, wxpay};

//--------------------------------------        Trade          --------------------------------------------------------
/// A point-in-time snapshot of a trade's settlement state. Each query produces a new `Trade`; they are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub channel: String,
    pub order_no: String,
    pub trade_no: String,
    /// The provider's own status vocabulary, e.g. `TRADE_SUCCESS` or `completed`.
    pub trade_status: String,
    #[serde(rename = "paid_success")]
    pub trade_success: bool,
    pub payer_id: String,
    pub payer_email: String,
    /// Decimal string with two fractional digits.
    pub total_amount: String,
    pub raw_trade: RawTrade,
}

impl Trade {
    /// A blank snapshot for `channel`, wrapping the provider's response.
    pub fn new(channel: &str, raw_trade: RawTrade) -> Self {
        Self {
            channel: channel.to_string(),
            order_no: String::default(),
            trade_no: String::default(),
            trade_status: String::default(),
            trade_success: false,
            payer_id: String::default(),
            payer_email: String::default(),
            total_amount: String::default(),
            raw_trade,
        }
    }
}

/// The unmodified provider response a [`Trade`] was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawTrade {
    Alipay(alipay::client::TradeQueryResponse),
    PayPal(paypal::client::Payment),
    WxPay(wxpay::client::OrderQueryResponse),
    /// For channels implemented outside this crate.
    Opaque(serde_json::Value),
}

//--------------------------------------   NotificationKind    --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// The trade settled, or its status changed.
    Trade,
    Refund,
    Dispute,
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Trade => write!(f, "trade"),
            NotificationKind::Refund => write!(f, "refund"),
            NotificationKind::Dispute => write!(f, "dispute"),
        }
    }
}

//--------------------------------------     Notification      --------------------------------------------------------
/// A verified, classified provider callback.
///
/// `notify_type` is `None` when the provider sent an event we don't recognise. Such events are acknowledged but carry
/// no order or trade number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub channel: String,
    pub notify_type: Option<NotificationKind>,
    pub order_no: String,
    pub trade_no: String,
    pub raw_notify: RawNotification,
}

impl Notification {
    pub fn new(channel: &str, raw_notify: RawNotification) -> Self {
        Self {
            channel: channel.to_string(),
            notify_type: None,
            order_no: String::default(),
            trade_no: String::default(),
            raw_notify,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.notify_type.is_some()
    }
}

/// The verified provider payload a [`Notification`] was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawNotification {
    Alipay(alipay::client::TradeNotification),
    PayPal(paypal::client::WebhookEvent),
    WxPay(wxpay::client::TradeNotification),
    Opaque(serde_json::Value),
}
