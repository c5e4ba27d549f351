use std::fmt::Display;

use pgw_channels::{Order, ShippingAddress, TradeMethod};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductLine {
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub tax: f64,
}

/// The body of a `POST /pay/{channel}` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaymentRequest {
    pub order_no: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub products: Vec<ProductLine>,
    #[serde(default)]
    pub shipping: f64,
    #[serde(default)]
    pub discount: f64,
    /// Defaults to the server's configured currency
    pub currency: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
    pub auth_code: Option<String>,
    /// A trade method token, e.g. `qr_code`. Missing or unrecognised tokens select the browser redirect flow.
    #[serde(default)]
    pub trade_method: String,
    #[serde(default)]
    pub timeout_minutes: u32,
}

impl NewPaymentRequest {
    pub fn into_order(self, default_currency: &str, client_ip: Option<String>) -> Order {
        let mut order = Order::new(self.order_no, self.subject);
        for p in self.products {
            order.add_product(p.name, p.sku, p.quantity, p.price, p.tax);
        }
        order.shipping = self.shipping;
        order.discount = self.discount;
        order.currency = self.currency.filter(|c| !c.trim().is_empty()).unwrap_or_else(|| default_currency.to_string());
        order.shipping_address = self.shipping_address;
        order.auth_code = self.auth_code;
        order.trade_method = TradeMethod::from_token_or_default(&self.trade_method);
        order.client_ip = client_ip.unwrap_or_default();
        order.timeout_minutes = self.timeout_minutes;
        order
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub channel: String,
    pub order_no: String,
    pub trade_method: TradeMethod,
    /// A redirect URL, SDK payload, QR code contents or provider trade number, depending on the trade method.
    pub target: String,
}

/// The routing parameters of a cancelled payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelParams {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub order_no: String,
}
