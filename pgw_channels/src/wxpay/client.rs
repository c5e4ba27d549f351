//! The wxpay collaborator contract and its wire objects.
//!
//! The collaborator owns the app id, merchant id and API key. It signs requests and checks the `return_code` and
//! `result_code` of every response, reporting anything other than `SUCCESS` as a [`ProviderError::Api`].
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ProviderError;

pub const TRADE_TYPE_MWEB: &str = "MWEB";
pub const TRADE_TYPE_APP: &str = "APP";
pub const TRADE_TYPE_NATIVE: &str = "NATIVE";

pub const TRADE_STATE_SUCCESS: &str = "SUCCESS";
pub const TRADE_STATE_NOTPAY: &str = "NOTPAY";

#[async_trait]
pub trait WxPayClient: Send + Sync {
    async fn unified_order(&self, param: &UnifiedOrderParam) -> Result<UnifiedOrderResponse, ProviderError>;
    async fn order_query(&self, param: &OrderQueryParam) -> Result<OrderQueryResponse, ProviderError>;
    /// Checks the signature of the XML notification body and decodes it.
    async fn verify_trade_notification(&self, body: &[u8]) -> Result<TradeNotification, ProviderError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedOrderParam {
    pub body: String,
    pub notify_url: String,
    pub trade_type: String,
    pub spbill_create_ip: String,
    /// In fen
    pub total_fee: i64,
    pub out_trade_no: String,
    /// `yyyyMMddHHmmss` in China Standard Time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_expire: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnifiedOrderResponse {
    pub prepay_id: String,
    pub code_url: String,
    pub mweb_url: String,
}

/// Exactly one of the two fields should be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQueryParam {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub transaction_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub out_trade_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderQueryResponse {
    pub out_trade_no: String,
    pub transaction_id: String,
    pub trade_state: String,
    pub trade_state_desc: String,
    pub total_fee: i64,
    pub openid: String,
    pub time_end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeNotification {
    pub appid: String,
    pub mch_id: String,
    pub out_trade_no: String,
    pub transaction_id: String,
    pub result_code: String,
    pub total_fee: i64,
    pub openid: String,
    pub time_end: String,
}
