//! The provider-agnostic order model.
//!
//! An [`Order`] is built by the caller and handed to a channel by reference. Channels read it, compute the amount to
//! charge with [`Order::amounts`] and translate it into their provider's request format. Amounts are plain `f64`
//! major-unit values here; each channel owns the conversion into whatever its provider expects on the wire.
use std::{fmt::Display, str::FromStr};

use pgw_common::MinorUnits;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//--------------------------------------     TradeMethod       --------------------------------------------------------
/// Selects the payment flow a channel should use for an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeMethod {
    /// Desktop browser redirect.
    #[default]
    #[serde(rename = "web")]
    Web,
    /// Mobile browser redirect.
    #[serde(rename = "wap")]
    Wap,
    /// A signed payload for a native app SDK.
    #[serde(rename = "app")]
    App,
    /// A code the payer scans with their wallet app.
    #[serde(rename = "qr_code")]
    QrCode,
    /// Face-to-face: the merchant scans the payer's barcode.
    #[serde(rename = "f2f")]
    F2F,
}

#[derive(Debug, Clone, Error)]
#[error("Unknown trade method: '{0}'")]
pub struct UnknownTradeMethod(String);

impl TradeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeMethod::Web => "web",
            TradeMethod::Wap => "wap",
            TradeMethod::App => "app",
            TradeMethod::QrCode => "qr_code",
            TradeMethod::F2F => "f2f",
        }
    }

    /// Parses a wire token, falling back to the default (browser redirect) flow for anything unrecognised.
    pub fn from_token_or_default(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }
}

impl FromStr for TradeMethod {
    type Err = UnknownTradeMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(Self::Web),
            "wap" => Ok(Self::Wap),
            "app" => Ok(Self::App),
            "qr_code" => Ok(Self::QrCode),
            "f2f" => Ok(Self::F2F),
            _ => Err(UnknownTradeMethod(s.to_string())),
        }
    }
}

impl Display for TradeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------       Product         --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    /// Unit price, in major currency units
    pub price: f64,
    /// Unit tax, in major currency units
    pub tax: f64,
}

//--------------------------------------   ShippingAddress     --------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub country_code: String,
    pub postal_code: String,
    #[serde(default)]
    pub phone: String,
}

//--------------------------------------        Order          --------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// The caller-assigned, unique order number. Providers echo this back in queries and notifications.
    pub order_no: String,
    pub subject: String,
    pub shipping: f64,
    pub discount: f64,
    products: Vec<Product>,
    /// ISO 4217 code, e.g. `USD`. Only some providers use it.
    pub currency: String,
    pub shipping_address: Option<ShippingAddress>,
    /// The payer's barcode, for face-to-face charges.
    pub auth_code: Option<String>,
    pub trade_method: TradeMethod,
    pub client_ip: String,
    /// Minutes until the payment expires. Zero leaves expiry to the provider.
    pub timeout_minutes: u32,
}

impl Order {
    pub fn new(order_no: impl Into<String>, subject: impl Into<String>) -> Self {
        Self { order_no: order_no.into(), subject: subject.into(), ..Default::default() }
    }

    /// Appends a product line. Products cannot be changed or removed once added.
    pub fn add_product<S: Into<String>>(&mut self, name: S, sku: S, quantity: u32, price: f64, tax: f64) {
        self.products.push(Product { name: name.into(), sku: sku.into(), quantity, price, tax });
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The subject to show the payer. Blank subjects fall back to the order number.
    pub fn display_subject(&self) -> &str {
        let subject = self.subject.trim();
        if subject.is_empty() {
            &self.order_no
        } else {
            subject
        }
    }

    /// Aggregates the order's amounts. This is computed afresh on every call and never cached.
    pub fn amounts(&self) -> OrderAmounts {
        let (subtotal, tax) = self.products.iter().fold((0.0, 0.0), |(subtotal, tax), p| {
            let quantity = f64::from(p.quantity);
            (subtotal + p.price * quantity, tax + p.tax * quantity)
        });
        OrderAmounts { subtotal, tax, shipping: self.shipping, discount: self.discount }
    }
}

//--------------------------------------     OrderAmounts      --------------------------------------------------------
/// The amount breakdown of an order, in major currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderAmounts {
    /// Σ(price × quantity)
    pub subtotal: f64,
    /// Σ(tax × quantity)
    pub tax: f64,
    pub shipping: f64,
    pub discount: f64,
}

impl OrderAmounts {
    /// `subtotal + tax + shipping - discount`
    pub fn total(&self) -> f64 {
        self.subtotal + self.tax + self.shipping - self.discount
    }

    pub fn total_minor_units(&self) -> Result<MinorUnits, pgw_common::MinorUnitsConversionError> {
        MinorUnits::try_from(self.total())
    }
}
