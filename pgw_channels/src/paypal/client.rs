//! The PayPal collaborator contract and the subset of the REST payments objects the channel uses.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{callback::CallbackRequest, ProviderError};

pub const INTENT_SALE: &str = "sale";
pub const PAYMENT_METHOD_PAYPAL: &str = "paypal";
pub const PAYMENT_STATE_CREATED: &str = "created";
pub const SALE_STATE_COMPLETED: &str = "completed";
pub const LINK_REL_APPROVAL_URL: &str = "approval_url";

pub const RESOURCE_TYPE_SALE: &str = "sale";
pub const RESOURCE_TYPE_REFUND: &str = "refund";
pub const RESOURCE_TYPE_DISPUTE: &str = "dispute";

#[async_trait]
pub trait PayPalClient: Send + Sync {
    async fn create_payment(&self, payment: &Payment) -> Result<Payment, ProviderError>;
    async fn get_payment_details(&self, payment_id: &str) -> Result<Payment, ProviderError>;
    /// Executes a payment the payer has approved on PayPal's checkout page.
    async fn execute_approved_payment(&self, payment_id: &str, payer_id: &str) -> Result<Payment, ProviderError>;
    /// Verifies the webhook signature headers against `webhook_id` and decodes the event in the request body.
    async fn get_webhook_event(&self, webhook_id: &str, req: &CallbackRequest) -> Result<WebhookEvent, ProviderError>;
}

//--------------------------------------       Payment         --------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub intent: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    pub payer: Payer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_urls: Option<RedirectUrls>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub experience_profile_id: String,
    pub transactions: Vec<Transaction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Payment {
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.iter().find(|l| l.rel == rel).map(|l| l.href.as_str())
    }

    pub fn payer_id(&self) -> Option<&str> {
        self.payer.payer_info.as_ref().map(|p| p.payer_id.as_str()).filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payer {
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_info: Option<PayerInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayerInfo {
    pub payer_id: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectUrls {
    pub return_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub invoice_number: String,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_list: Option<ItemList>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_resources: Vec<RelatedResource>,
}

/// Every value is a decimal string with two fractional digits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Amount {
    pub currency: String,
    pub total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<AmountDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountDetails {
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub shipping_discount: String,
    pub handling_fee: String,
    pub insurance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemList {
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub name: String,
    pub sku: String,
    pub quantity: String,
    pub price: String,
    pub tax: String,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingAddress {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub country_code: String,
    pub postal_code: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale: Option<Sale>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sale {
    pub id: String,
    pub state: String,
    pub parent_payment: String,
    pub invoice_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: String,
}

//--------------------------------------     WebhookEvent      --------------------------------------------------------
/// A verified webhook event. `resource` is decoded lazily according to `resource_type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookEvent {
    pub id: String,
    pub event_type: String,
    pub resource_type: String,
    pub summary: String,
    pub resource: Value,
}

impl WebhookEvent {
    pub fn sale(&self) -> Result<Sale, ProviderError> {
        Ok(serde_json::from_value(self.resource.clone())?)
    }

    pub fn refund(&self) -> Result<Refund, ProviderError> {
        Ok(serde_json::from_value(self.resource.clone())?)
    }

    pub fn dispute(&self) -> Result<Dispute, ProviderError> {
        Ok(serde_json::from_value(self.resource.clone())?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Refund {
    pub id: String,
    pub state: String,
    pub sale_id: String,
    pub parent_payment: String,
    pub invoice_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dispute {
    pub dispute_id: String,
    pub reason: String,
    pub status: String,
    pub disputed_transactions: Vec<DisputedTransaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisputedTransaction {
    pub seller_transaction_id: String,
    pub invoice_number: String,
}
