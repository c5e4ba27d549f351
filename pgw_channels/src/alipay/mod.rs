//! # Alipay channel
//!
//! Alipay takes amounts as decimal strings with two fractional digits and supports every [`TradeMethod`]:
//!
//! | Trade method | Alipay API           | Returned value                      |
//! |--------------|----------------------|-------------------------------------|
//! | `Web`        | page pay             | checkout URL                        |
//! | `Wap`        | wap pay              | checkout URL                        |
//! | `App`        | app pay              | signed parameter string for the SDK |
//! | `QrCode`     | pre-create           | QR code contents                    |
//! | `F2F`        | pay (barcode scene)  | alipay trade number                 |
pub mod client;

use async_trait::async_trait;
use log::*;

use self::client::{
    AlipayClient,
    TradeAppPay,
    TradePagePay,
    TradePay,
    TradePreCreate,
    TradeQuery,
    TradeWapPay,
    NOTIFY_TYPE_TRADE_STATUS_SYNC,
    PRODUCT_CODE_APP_PAY,
    PRODUCT_CODE_PAGE_PAY,
    PRODUCT_CODE_WAP_PAY,
    SCENE_BAR_CODE,
    SUCCESS_CODE,
    TRADE_STATUS_FINISHED,
    TRADE_STATUS_SUCCESS,
    WAIT_BUYER_CONFIRM_CODE,
};
use crate::{
    callback::{routing_url, CallbackRequest, CallbackUrls, CHANNEL_PARAM, ORDER_NO_PARAM},
    order::{Order, TradeMethod},
    trade::{Notification, NotificationKind, RawNotification, RawTrade, Trade},
    ChannelError,
    PayChannel,
};

pub const ALIPAY_CHANNEL: &str = "alipay";
/// The query parameter alipay appends to the return URL.
pub const RETURN_TRADE_NO_PARAM: &str = "trade_no";

/// The fields shared by every alipay checkout request.
struct Checkout {
    order_no: String,
    subject: String,
    amount: String,
    timeout_express: Option<String>,
}

pub struct AlipayChannel<C> {
    client: C,
    callbacks: CallbackUrls,
}

impl<C: AlipayClient> AlipayChannel<C> {
    pub fn new(client: C, callbacks: CallbackUrls) -> Self {
        Self { client, callbacks }
    }

    fn url_for(&self, base: &str, order_no: &str) -> Result<String, ChannelError> {
        routing_url(base, ALIPAY_CHANNEL, order_no, &[])
    }

    fn trade_web_pay(&self, checkout: Checkout) -> Result<String, ChannelError> {
        let param = TradePagePay {
            notify_url: self.url_for(&self.callbacks.notify_url, &checkout.order_no)?,
            return_url: self.url_for(&self.callbacks.return_url, &checkout.order_no)?,
            out_trade_no: checkout.order_no,
            subject: checkout.subject,
            total_amount: checkout.amount,
            product_code: PRODUCT_CODE_PAGE_PAY.to_string(),
            timeout_express: checkout.timeout_express,
        };
        Ok(self.client.trade_page_pay(&param)?)
    }

    fn trade_wap_pay(&self, checkout: Checkout) -> Result<String, ChannelError> {
        let param = TradeWapPay {
            notify_url: self.url_for(&self.callbacks.notify_url, &checkout.order_no)?,
            return_url: self.url_for(&self.callbacks.return_url, &checkout.order_no)?,
            quit_url: self.url_for(&self.callbacks.cancel_url, &checkout.order_no)?,
            out_trade_no: checkout.order_no,
            subject: checkout.subject,
            total_amount: checkout.amount,
            product_code: PRODUCT_CODE_WAP_PAY.to_string(),
            timeout_express: checkout.timeout_express,
        };
        Ok(self.client.trade_wap_pay(&param)?)
    }

    fn trade_app_pay(&self, checkout: Checkout) -> Result<String, ChannelError> {
        let param = TradeAppPay {
            notify_url: self.url_for(&self.callbacks.notify_url, &checkout.order_no)?,
            out_trade_no: checkout.order_no,
            subject: checkout.subject,
            total_amount: checkout.amount,
            product_code: PRODUCT_CODE_APP_PAY.to_string(),
            timeout_express: checkout.timeout_express,
        };
        Ok(self.client.trade_app_pay(&param)?)
    }

    async fn trade_qr_code(&self, checkout: Checkout) -> Result<String, ChannelError> {
        let param = TradePreCreate {
            notify_url: self.url_for(&self.callbacks.notify_url, &checkout.order_no)?,
            out_trade_no: checkout.order_no,
            subject: checkout.subject,
            total_amount: checkout.amount,
            timeout_express: checkout.timeout_express,
        };
        let rsp = self.client.trade_pre_create(&param).await?;
        if !rsp.status.is_success() {
            debug!("💳️ alipay pre-create for {} failed. {:?}", param.out_trade_no, rsp.status);
            return Err(ChannelError::ProviderResponse(rsp.status.error_message()));
        }
        Ok(rsp.qr_code)
    }

    async fn trade_face_to_face(&self, checkout: Checkout, auth_code: &str) -> Result<String, ChannelError> {
        let param = TradePay {
            notify_url: self.url_for(&self.callbacks.notify_url, &checkout.order_no)?,
            out_trade_no: checkout.order_no,
            auth_code: auth_code.to_string(),
            scene: SCENE_BAR_CODE.to_string(),
            subject: checkout.subject,
            total_amount: checkout.amount,
            timeout_express: checkout.timeout_express,
        };
        let rsp = self.client.trade_pay(&param).await?;
        match rsp.status.code.as_str() {
            SUCCESS_CODE | WAIT_BUYER_CONFIRM_CODE => Ok(rsp.trade_no),
            _ => {
                debug!("💳️ alipay barcode charge for {} failed. {:?}", param.out_trade_no, rsp.status);
                Err(ChannelError::ProviderResponse(rsp.status.error_message()))
            },
        }
    }

    async fn query_trade(&self, query: TradeQuery) -> Result<Trade, ChannelError> {
        let rsp = self.client.trade_query(&query).await?;
        if !rsp.status.is_success() {
            debug!("💳️ alipay trade query {query:?} failed. {:?}", rsp.status);
            return Err(ChannelError::ProviderResponse(rsp.status.error_message()));
        }
        let mut trade = Trade::new(ALIPAY_CHANNEL, RawTrade::Alipay(rsp.clone()));
        trade.order_no = rsp.out_trade_no;
        trade.trade_no = rsp.trade_no;
        trade.trade_success = [TRADE_STATUS_SUCCESS, TRADE_STATUS_FINISHED].contains(&rsp.trade_status.as_str());
        trade.trade_status = rsp.trade_status;
        trade.total_amount = rsp.total_amount;
        trade.payer_id = rsp.buyer_user_id;
        trade.payer_email = rsp.buyer_logon_id;
        Ok(trade)
    }
}

#[async_trait]
impl<C: AlipayClient> PayChannel for AlipayChannel<C> {
    fn identifier(&self) -> &str {
        ALIPAY_CHANNEL
    }

    async fn create_trade_order(&self, order: &Order) -> Result<String, ChannelError> {
        let amount = order.amounts().total_minor_units()?;
        let checkout = Checkout {
            order_no: order.order_no.clone(),
            subject: order.display_subject().to_string(),
            amount: amount.to_decimal_string(),
            timeout_express: (order.timeout_minutes > 0).then(|| format!("{}m", order.timeout_minutes)),
        };
        debug!("💳️ Creating alipay {} trade for {} ({})", order.trade_method, order.order_no, checkout.amount);
        match order.trade_method {
            TradeMethod::Web => self.trade_web_pay(checkout),
            TradeMethod::Wap => self.trade_wap_pay(checkout),
            TradeMethod::App => self.trade_app_pay(checkout),
            TradeMethod::QrCode => self.trade_qr_code(checkout).await,
            TradeMethod::F2F => {
                let auth_code = order.auth_code.clone().unwrap_or_default();
                self.trade_face_to_face(checkout, &auth_code).await
            },
        }
    }

    async fn get_trade(&self, trade_no: &str) -> Result<Trade, ChannelError> {
        self.query_trade(TradeQuery { trade_no: Some(trade_no.to_string()), out_trade_no: None }).await
    }

    async fn get_trade_with_order_no(&self, order_no: &str) -> Result<Trade, ChannelError> {
        self.query_trade(TradeQuery { trade_no: None, out_trade_no: Some(order_no.to_string()) }).await
    }

    async fn return_request_handler(&self, req: &CallbackRequest) -> Result<Trade, ChannelError> {
        let trade_no = req.form_value(RETURN_TRADE_NO_PARAM).ok_or(ChannelError::UnknownTradeNo)?;
        self.get_trade(trade_no).await
    }

    async fn notify_request_handler(&self, req: &CallbackRequest) -> Result<Notification, ChannelError> {
        // The routing parameters were added by us and are not covered by alipay's signature
        let params = req.without_params(&[CHANNEL_PARAM, ORDER_NO_PARAM]).form_pairs();
        let notification = self.client.verify_trade_notification(&params).await?;
        trace!("💳️ Verified alipay notification {notification:?}");
        let mut result = Notification::new(ALIPAY_CHANNEL, RawNotification::Alipay(notification.clone()));
        // Refunds arrive as trade_status_sync too; acting on them is not supported yet.
        if notification.notify_type == NOTIFY_TYPE_TRADE_STATUS_SYNC {
            result.notify_type = Some(NotificationKind::Trade);
            result.order_no = notification.out_trade_no;
            result.trade_no = notification.trade_no;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use mockall::predicate::*;

    use super::{client::*, *};
    use crate::{
        test_utils::{callback_urls, prepare_test_env, widget_order, MockAlipayApi},
        ProviderError,
    };

    fn channel(client: MockAlipayApi) -> AlipayChannel<MockAlipayApi> {
        AlipayChannel::new(client, callback_urls())
    }

    fn query_response(status: &str) -> TradeQueryResponse {
        TradeQueryResponse {
            status: ResponseStatus { code: SUCCESS_CODE.into(), msg: "Success".into(), ..Default::default() },
            trade_no: "2024T1".into(),
            out_trade_no: "O-1".into(),
            trade_status: status.into(),
            total_amount: "34.50".into(),
            buyer_user_id: "2088U".into(),
            buyer_logon_id: "buyer@example.com".into(),
        }
    }

    #[tokio::test]
    async fn web_pay_encodes_decimal_amount_and_routing() {
        prepare_test_env();
        let mut client = MockAlipayApi::new();
        client.expect_trade_page_pay().times(1).returning(|p| {
            assert_eq!(p.total_amount, "34.50");
            assert_eq!(p.out_trade_no, "O-1");
            assert_eq!(p.subject, "Widgets");
            assert_eq!(p.product_code, "FAST_INSTANT_TRADE_PAY");
            assert_eq!(p.timeout_express, None);
            assert_eq!(p.notify_url, "https://shop.example.com/pay/notify?channel=alipay&order_no=O-1");
            assert_eq!(p.return_url, "https://shop.example.com/pay/return?channel=alipay&order_no=O-1");
            Ok("https://openapi.alipay.com/gateway.do?sign=x".to_string())
        });
        let url = channel(client).create_trade_order(&widget_order()).await.unwrap();
        assert_eq!(url, "https://openapi.alipay.com/gateway.do?sign=x");
    }

    #[tokio::test]
    async fn wap_pay_sets_quit_url_and_timeout() {
        let mut client = MockAlipayApi::new();
        client.expect_trade_wap_pay().times(1).returning(|p| {
            assert_eq!(p.quit_url, "https://shop.example.com/pay/cancel?channel=alipay&order_no=O-1");
            assert_eq!(p.product_code, "QUICK_WAP_WAY");
            assert_eq!(p.timeout_express.as_deref(), Some("15m"));
            Ok("https://m.alipay.com/checkout".to_string())
        });
        let mut order = widget_order();
        order.trade_method = TradeMethod::Wap;
        order.timeout_minutes = 15;
        assert_eq!(channel(client).create_trade_order(&order).await.unwrap(), "https://m.alipay.com/checkout");
    }

    #[tokio::test]
    async fn app_pay_uses_order_number_as_blank_subject() {
        let mut client = MockAlipayApi::new();
        client.expect_trade_app_pay().times(1).returning(|p| {
            assert_eq!(p.subject, "O-1");
            assert_eq!(p.product_code, "QUICK_MSECURITY_PAY");
            Ok("app_id=1&biz_content=...&sign=abc".to_string())
        });
        let mut order = widget_order();
        order.subject = "  ".into();
        order.trade_method = TradeMethod::App;
        assert_eq!(channel(client).create_trade_order(&order).await.unwrap(), "app_id=1&biz_content=...&sign=abc");
    }

    #[tokio::test]
    async fn qr_code_surfaces_provider_rejection() {
        let mut client = MockAlipayApi::new();
        client.expect_trade_pre_create().times(1).returning(|_| {
            Ok(TradePreCreateResponse {
                status: ResponseStatus {
                    code: "40004".into(),
                    msg: "Business Failed".into(),
                    sub_code: "ACQ.TOTAL_FEE_EXCEED".into(),
                    sub_msg: "Order amount exceeds limit".into(),
                },
                ..Default::default()
            })
        });
        let mut order = widget_order();
        order.trade_method = TradeMethod::QrCode;
        let err = channel(client).create_trade_order(&order).await.unwrap_err();
        assert!(matches!(err, ChannelError::ProviderResponse(m) if m == "Order amount exceeds limit"));
    }

    #[tokio::test]
    async fn qr_code_returns_code_contents() {
        let mut client = MockAlipayApi::new();
        client.expect_trade_pre_create().times(1).returning(|p| {
            assert_eq!(p.total_amount, "34.50");
            Ok(TradePreCreateResponse {
                status: ResponseStatus { code: SUCCESS_CODE.into(), ..Default::default() },
                out_trade_no: p.out_trade_no.clone(),
                qr_code: "https://qr.alipay.com/bax01".into(),
            })
        });
        let mut order = widget_order();
        order.trade_method = TradeMethod::QrCode;
        assert_eq!(channel(client).create_trade_order(&order).await.unwrap(), "https://qr.alipay.com/bax01");
    }

    #[tokio::test]
    async fn face_to_face_returns_trade_number() {
        let mut client = MockAlipayApi::new();
        client.expect_trade_pay().times(1).returning(|p| {
            assert_eq!(p.auth_code, "28763443825664394");
            assert_eq!(p.scene, "bar_code");
            Ok(TradePayResponse {
                status: ResponseStatus { code: WAIT_BUYER_CONFIRM_CODE.into(), ..Default::default() },
                trade_no: "2024F2F".into(),
                ..Default::default()
            })
        });
        let mut order = widget_order();
        order.trade_method = TradeMethod::F2F;
        order.auth_code = Some("28763443825664394".into());
        assert_eq!(channel(client).create_trade_order(&order).await.unwrap(), "2024F2F");
    }

    #[tokio::test]
    async fn provider_call_failures_propagate_verbatim() {
        let mut client = MockAlipayApi::new();
        client.expect_trade_page_pay().returning(|_| Err(ProviderError::Transport("connection reset".into())));
        let err = channel(client).create_trade_order(&widget_order()).await.unwrap_err();
        assert_eq!(err.to_string(), "Could not reach the payment provider. connection reset");
    }

    #[tokio::test]
    async fn invalid_callback_url_is_reported() {
        let mut client = MockAlipayApi::new();
        client.expect_trade_page_pay().never();
        let channel = AlipayChannel::new(client, CallbackUrls::default());
        let err = channel.create_trade_order(&widget_order()).await.unwrap_err();
        assert!(matches!(err, ChannelError::InvalidCallbackUrl(_)));
    }

    #[tokio::test]
    async fn get_trade_normalizes_query() {
        let mut client = MockAlipayApi::new();
        client
            .expect_trade_query()
            .with(eq(TradeQuery { trade_no: Some("2024T1".into()), out_trade_no: None }))
            .times(1)
            .returning(|_| Ok(query_response(TRADE_STATUS_SUCCESS)));
        let trade = channel(client).get_trade("2024T1").await.unwrap();
        assert_eq!(trade.channel, "alipay");
        assert_eq!(trade.order_no, "O-1");
        assert_eq!(trade.trade_no, "2024T1");
        assert!(trade.trade_success);
        assert_eq!(trade.total_amount, "34.50");
        assert_eq!(trade.payer_id, "2088U");
        assert_eq!(trade.payer_email, "buyer@example.com");
        assert!(matches!(trade.raw_trade, RawTrade::Alipay(_)));
    }

    #[tokio::test]
    async fn get_trade_by_order_number() {
        let mut client = MockAlipayApi::new();
        client
            .expect_trade_query()
            .with(eq(TradeQuery { trade_no: None, out_trade_no: Some("O-1".into()) }))
            .times(1)
            .returning(|_| Ok(query_response(TRADE_STATUS_WAIT_BUYER_PAY)));
        let trade = channel(client).get_trade_with_order_no("O-1").await.unwrap();
        assert!(!trade.trade_success);
        assert_eq!(trade.trade_status, "WAIT_BUYER_PAY");
    }

    #[tokio::test]
    async fn finished_trades_are_successful() {
        let mut client = MockAlipayApi::new();
        client.expect_trade_query().returning(|_| Ok(query_response(TRADE_STATUS_FINISHED)));
        assert!(channel(client).get_trade("2024T1").await.unwrap().trade_success);
    }

    #[tokio::test]
    async fn return_handler_requires_trade_no() {
        let mut client = MockAlipayApi::new();
        client.expect_trade_query().never();
        let req = CallbackRequest::from_query("channel=alipay&order_no=O-1");
        let err = channel(client).return_request_handler(&req).await.unwrap_err();
        assert!(matches!(err, ChannelError::UnknownTradeNo));
    }

    #[tokio::test]
    async fn return_handler_queries_trade() {
        let mut client = MockAlipayApi::new();
        client.expect_trade_query().times(1).returning(|q| {
            assert_eq!(q.trade_no.as_deref(), Some("2024T1"));
            Ok(query_response(TRADE_STATUS_SUCCESS))
        });
        let req = CallbackRequest::from_query("channel=alipay&order_no=O-1&trade_no=2024T1&sign=xyz");
        assert!(channel(client).return_request_handler(&req).await.unwrap().trade_success);
    }

    #[tokio::test]
    async fn notify_strips_routing_params_before_verification() {
        let mut client = MockAlipayApi::new();
        client.expect_verify_trade_notification().times(1).returning(|params| {
            assert!(params.iter().all(|(k, _)| k != "channel" && k != "order_no"));
            assert!(params.contains(&("sign".to_string(), "abc".to_string())));
            Ok(TradeNotification {
                notify_type: NOTIFY_TYPE_TRADE_STATUS_SYNC.into(),
                trade_no: "2024T1".into(),
                out_trade_no: "O-1".into(),
                trade_status: TRADE_STATUS_SUCCESS.into(),
                ..Default::default()
            })
        });
        let req = CallbackRequest::new(
            "channel=alipay&order_no=O-1",
            [("content-type", "application/x-www-form-urlencoded")],
            b"notify_type=trade_status_sync&trade_no=2024T1&out_trade_no=O-1&sign=abc".to_vec(),
        );
        let note = channel(client).notify_request_handler(&req).await.unwrap();
        assert_eq!(note.notify_type, Some(NotificationKind::Trade));
        assert_eq!(note.order_no, "O-1");
        assert_eq!(note.trade_no, "2024T1");
    }

    #[tokio::test]
    async fn unrecognised_notification_is_acknowledged() {
        let mut client = MockAlipayApi::new();
        client.expect_verify_trade_notification().returning(|_| {
            Ok(TradeNotification {
                notify_type: "batch_trans_notify".into(),
                trade_no: "2024T1".into(),
                out_trade_no: "O-1".into(),
                ..Default::default()
            })
        });
        let note = channel(client).notify_request_handler(&CallbackRequest::from_query("channel=alipay")).await.unwrap();
        assert_eq!(note.notify_type, None);
        assert!(note.order_no.is_empty());
        assert!(note.trade_no.is_empty());
    }

    #[tokio::test]
    async fn failed_verification_is_an_error() {
        let mut client = MockAlipayApi::new();
        client
            .expect_verify_trade_notification()
            .returning(|_| Err(ProviderError::Verification("bad signature".into())));
        let err = channel(client).notify_request_handler(&CallbackRequest::from_query("channel=alipay")).await;
        assert!(matches!(err, Err(ChannelError::ProviderCall(ProviderError::Verification(_)))));
    }
}
