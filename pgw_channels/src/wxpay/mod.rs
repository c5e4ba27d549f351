//! # wxpay channel
//!
//! wxpay charges integer amounts in fen, and serves every supported flow through one unified-order call parametrized by
//! trade type:
//!
//! | Trade method | wxpay trade type | Returned value |
//! |--------------|------------------|----------------|
//! | `Wap`        | `MWEB`           | `mweb_url`     |
//! | `App`        | `APP`            | `prepay_id`    |
//! | `QrCode`     | `NATIVE`         | `code_url`     |
//!
//! wxpay notifications don't say what kind of event they are, so the notify URL carries a `notify_type` parameter.
pub mod client;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::*;
use pgw_common::MinorUnits;

use self::client::{
    OrderQueryParam,
    UnifiedOrderParam,
    WxPayClient,
    TRADE_STATE_SUCCESS,
    TRADE_TYPE_APP,
    TRADE_TYPE_MWEB,
    TRADE_TYPE_NATIVE,
};
use crate::{
    callback::{routing_url, CallbackRequest, CallbackUrls, NOTIFY_TYPE_PARAM},
    order::{Order, TradeMethod},
    trade::{Notification, NotificationKind, RawNotification, RawTrade, Trade},
    ChannelError,
    PayChannel,
};

pub const WXPAY_CHANNEL: &str = "wxpay";
/// The query parameter carrying the trade id on the return URL.
pub const RETURN_TRANSACTION_ID_PARAM: &str = "transaction_id";

const NOTIFY_TYPE_TRADE: &str = "trade";
const NOTIFY_TYPE_REFUND: &str = "refund";
/// wxpay expiry times are in China Standard Time (UTC+8).
const CST_OFFSET_HOURS: i64 = 8;
const TIME_EXPIRE_FORMAT: &str = "%Y%m%d%H%M%S";

pub struct WxPayChannel<C> {
    client: C,
    callbacks: CallbackUrls,
}

/// The `time_expire` value for an order created at `now` that expires after `timeout_minutes`.
pub fn time_expire(now: DateTime<Utc>, timeout_minutes: u32) -> String {
    let expire = now.naive_utc() + Duration::hours(CST_OFFSET_HOURS) + Duration::minutes(i64::from(timeout_minutes));
    expire.format(TIME_EXPIRE_FORMAT).to_string()
}

impl<C: WxPayClient> WxPayChannel<C> {
    pub fn new(client: C, callbacks: CallbackUrls) -> Self {
        Self { client, callbacks }
    }

    async fn query(&self, param: OrderQueryParam) -> Result<Trade, ChannelError> {
        let rsp = self.client.order_query(&param).await?;
        let mut trade = Trade::new(WXPAY_CHANNEL, RawTrade::WxPay(rsp.clone()));
        trade.order_no = rsp.out_trade_no;
        trade.trade_no = rsp.transaction_id;
        trade.trade_success = rsp.trade_state == TRADE_STATE_SUCCESS;
        trade.trade_status = rsp.trade_state;
        trade.total_amount = MinorUnits::from(rsp.total_fee).to_decimal_string();
        trade.payer_id = rsp.openid;
        Ok(trade)
    }
}

#[async_trait]
impl<C: WxPayClient> PayChannel for WxPayChannel<C> {
    fn identifier(&self) -> &str {
        WXPAY_CHANNEL
    }

    async fn create_trade_order(&self, order: &Order) -> Result<String, ChannelError> {
        let trade_type = match order.trade_method {
            TradeMethod::Wap => TRADE_TYPE_MWEB,
            TradeMethod::App => TRADE_TYPE_APP,
            TradeMethod::QrCode => TRADE_TYPE_NATIVE,
            method @ (TradeMethod::Web | TradeMethod::F2F) => {
                return Err(ChannelError::unsupported_method(WXPAY_CHANNEL, method))
            },
        };
        let total_fee = order.amounts().total_minor_units()?.value();
        let notify_url = routing_url(&self.callbacks.notify_url, WXPAY_CHANNEL, &order.order_no, &[(
            NOTIFY_TYPE_PARAM,
            NOTIFY_TYPE_TRADE,
        )])?;
        let param = UnifiedOrderParam {
            body: order.display_subject().to_string(),
            notify_url,
            trade_type: trade_type.to_string(),
            spbill_create_ip: order.client_ip.clone(),
            total_fee,
            out_trade_no: order.order_no.clone(),
            time_expire: (order.timeout_minutes > 0).then(|| time_expire(Utc::now(), order.timeout_minutes)),
        };
        debug!("💳️ Creating wxpay {trade_type} order for {} ({total_fee} fen)", order.order_no);
        let rsp = self.client.unified_order(&param).await?;
        let target = match order.trade_method {
            TradeMethod::Wap => rsp.mweb_url,
            TradeMethod::App => rsp.prepay_id,
            _ => rsp.code_url,
        };
        Ok(target)
    }

    async fn get_trade(&self, trade_no: &str) -> Result<Trade, ChannelError> {
        self.query(OrderQueryParam { transaction_id: trade_no.to_string(), out_trade_no: String::default() }).await
    }

    async fn get_trade_with_order_no(&self, order_no: &str) -> Result<Trade, ChannelError> {
        self.query(OrderQueryParam { transaction_id: String::default(), out_trade_no: order_no.to_string() }).await
    }

    async fn return_request_handler(&self, req: &CallbackRequest) -> Result<Trade, ChannelError> {
        let trade_no = req.form_value(RETURN_TRANSACTION_ID_PARAM).ok_or(ChannelError::UnknownTradeNo)?;
        self.get_trade(trade_no).await
    }

    async fn notify_request_handler(&self, req: &CallbackRequest) -> Result<Notification, ChannelError> {
        let notification = self.client.verify_trade_notification(req.body()).await?;
        let notify_type = req.form_value(NOTIFY_TYPE_PARAM).unwrap_or_default();
        trace!("💳️ Verified wxpay {notify_type} notification {notification:?}");
        let mut result = Notification::new(WXPAY_CHANNEL, RawNotification::WxPay(notification.clone()));
        match notify_type {
            NOTIFY_TYPE_TRADE => {
                result.notify_type = Some(NotificationKind::Trade);
                result.order_no = notification.out_trade_no;
                result.trade_no = notification.transaction_id;
            },
            // Refund notifications are encrypted; the trade numbers are not extracted.
            NOTIFY_TYPE_REFUND => result.notify_type = Some(NotificationKind::Refund),
            other => debug!("💳️ Ignoring wxpay notification with notify_type '{other}'"),
        }
        Ok(result)
    }
}
