use async_trait::async_trait;
use mockall::mock;

use crate::{
    alipay::client::{
        AlipayClient,
        TradeAppPay,
        TradeNotification as AlipayNotification,
        TradePagePay,
        TradePay,
        TradePayResponse,
        TradePreCreate,
        TradePreCreateResponse,
        TradeQuery,
        TradeQueryResponse,
        TradeWapPay,
    },
    callback::CallbackRequest,
    channel::PayChannel,
    order::Order,
    paypal::client::{Payment, PayPalClient, WebhookEvent},
    trade::{Notification, Trade},
    wxpay::client::{
        OrderQueryParam,
        OrderQueryResponse,
        TradeNotification as WxPayNotification,
        UnifiedOrderParam,
        UnifiedOrderResponse,
        WxPayClient,
    },
    ChannelError,
    ProviderError,
};

mock! {
    pub Channel {}
    #[async_trait]
    impl PayChannel for Channel {
        fn identifier(&self) -> &str;
        async fn create_trade_order(&self, order: &Order) -> Result<String, ChannelError>;
        async fn get_trade(&self, trade_no: &str) -> Result<Trade, ChannelError>;
        async fn get_trade_with_order_no(&self, order_no: &str) -> Result<Trade, ChannelError>;
        async fn return_request_handler(&self, req: &CallbackRequest) -> Result<Trade, ChannelError>;
        async fn notify_request_handler(&self, req: &CallbackRequest) -> Result<Notification, ChannelError>;
    }
}

mock! {
    pub AlipayApi {}
    #[async_trait]
    impl AlipayClient for AlipayApi {
        fn trade_page_pay(&self, param: &TradePagePay) -> Result<String, ProviderError>;
        fn trade_wap_pay(&self, param: &TradeWapPay) -> Result<String, ProviderError>;
        fn trade_app_pay(&self, param: &TradeAppPay) -> Result<String, ProviderError>;
        async fn trade_pre_create(&self, param: &TradePreCreate) -> Result<TradePreCreateResponse, ProviderError>;
        async fn trade_pay(&self, param: &TradePay) -> Result<TradePayResponse, ProviderError>;
        async fn trade_query(&self, param: &TradeQuery) -> Result<TradeQueryResponse, ProviderError>;
        async fn verify_trade_notification(&self, params: &[(String, String)]) -> Result<AlipayNotification, ProviderError>;
    }
}

mock! {
    pub PayPalApi {}
    #[async_trait]
    impl PayPalClient for PayPalApi {
        async fn create_payment(&self, payment: &Payment) -> Result<Payment, ProviderError>;
        async fn get_payment_details(&self, payment_id: &str) -> Result<Payment, ProviderError>;
        async fn execute_approved_payment(&self, payment_id: &str, payer_id: &str) -> Result<Payment, ProviderError>;
        async fn get_webhook_event(&self, webhook_id: &str, req: &CallbackRequest) -> Result<WebhookEvent, ProviderError>;
    }
}

mock! {
    pub WxPayApi {}
    #[async_trait]
    impl WxPayClient for WxPayApi {
        async fn unified_order(&self, param: &UnifiedOrderParam) -> Result<UnifiedOrderResponse, ProviderError>;
        async fn order_query(&self, param: &OrderQueryParam) -> Result<OrderQueryResponse, ProviderError>;
        async fn verify_trade_notification(&self, body: &[u8]) -> Result<WxPayNotification, ProviderError>;
    }
}
