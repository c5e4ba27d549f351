//! The alipay collaborator contract and its wire objects.
//!
//! An [`AlipayClient`] implementation owns the app id, key material and gateway endpoint; it signs every request and
//! verifies every notification. The channel only fills in the request objects below.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ProviderError;

pub const SUCCESS_CODE: &str = "10000";
/// Returned by a barcode charge that is waiting for the payer to confirm on their phone. The trade exists.
pub const WAIT_BUYER_CONFIRM_CODE: &str = "10003";

pub const TRADE_STATUS_WAIT_BUYER_PAY: &str = "WAIT_BUYER_PAY";
pub const TRADE_STATUS_SUCCESS: &str = "TRADE_SUCCESS";
pub const TRADE_STATUS_FINISHED: &str = "TRADE_FINISHED";

pub const NOTIFY_TYPE_TRADE_STATUS_SYNC: &str = "trade_status_sync";

pub const PRODUCT_CODE_PAGE_PAY: &str = "FAST_INSTANT_TRADE_PAY";
pub const PRODUCT_CODE_WAP_PAY: &str = "QUICK_WAP_WAY";
pub const PRODUCT_CODE_APP_PAY: &str = "QUICK_MSECURITY_PAY";
pub const SCENE_BAR_CODE: &str = "bar_code";

#[async_trait]
pub trait AlipayClient: Send + Sync {
    /// Signs a desktop checkout request and returns the URL to redirect the payer to.
    fn trade_page_pay(&self, param: &TradePagePay) -> Result<String, ProviderError>;
    /// Signs a mobile-browser checkout request and returns the URL to redirect the payer to.
    fn trade_wap_pay(&self, param: &TradeWapPay) -> Result<String, ProviderError>;
    /// Signs an app checkout request and returns the parameter string for the alipay app SDK.
    fn trade_app_pay(&self, param: &TradeAppPay) -> Result<String, ProviderError>;
    async fn trade_pre_create(&self, param: &TradePreCreate) -> Result<TradePreCreateResponse, ProviderError>;
    async fn trade_pay(&self, param: &TradePay) -> Result<TradePayResponse, ProviderError>;
    async fn trade_query(&self, param: &TradeQuery) -> Result<TradeQueryResponse, ProviderError>;
    /// Checks the signature over the notification's form parameters and decodes them.
    async fn verify_trade_notification(&self, params: &[(String, String)])
        -> Result<TradeNotification, ProviderError>;
}

//--------------------------------------       Requests        --------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePagePay {
    pub notify_url: String,
    pub return_url: String,
    pub out_trade_no: String,
    pub subject: String,
    pub total_amount: String,
    pub product_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_express: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeWapPay {
    pub notify_url: String,
    pub return_url: String,
    pub quit_url: String,
    pub out_trade_no: String,
    pub subject: String,
    pub total_amount: String,
    pub product_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_express: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAppPay {
    pub notify_url: String,
    pub out_trade_no: String,
    pub subject: String,
    pub total_amount: String,
    pub product_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_express: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePreCreate {
    pub notify_url: String,
    pub out_trade_no: String,
    pub subject: String,
    pub total_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_express: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePay {
    pub notify_url: String,
    pub out_trade_no: String,
    pub auth_code: String,
    pub scene: String,
    pub subject: String,
    pub total_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_express: Option<String>,
}

/// Exactly one of `trade_no` or `out_trade_no` should be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_trade_no: Option<String>,
}

//--------------------------------------       Responses       --------------------------------------------------------
/// The status block every alipay API response carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub sub_code: String,
    #[serde(default)]
    pub sub_msg: String,
}

impl ResponseStatus {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// The most specific message available.
    pub fn error_message(&self) -> String {
        match (self.sub_msg.is_empty(), self.msg.is_empty()) {
            (false, _) => self.sub_msg.clone(),
            (true, false) => self.msg.clone(),
            (true, true) => format!("alipay response code {}", self.code),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePreCreateResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub qr_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePayResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub trade_no: String,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub buyer_logon_id: String,
    #[serde(default)]
    pub total_amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQueryResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub trade_no: String,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub trade_status: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub buyer_user_id: String,
    #[serde(default)]
    pub buyer_logon_id: String,
}

/// A verified asynchronous notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeNotification {
    pub notify_type: String,
    #[serde(default)]
    pub notify_id: String,
    #[serde(default)]
    pub notify_time: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub trade_no: String,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub trade_status: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub buyer_id: String,
    #[serde(default)]
    pub buyer_logon_id: String,
}
