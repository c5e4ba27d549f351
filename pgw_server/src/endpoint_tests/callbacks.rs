use actix_web::{http::StatusCode, test::TestRequest};
use pgw_channels::{
    alipay::{client::TradeNotification, AlipayChannel},
    test_utils::{callback_urls, prepare_test_env, MockAlipayApi},
    ChannelError,
    Notification,
    NotificationKind,
    RawNotification,
    RawTrade,
    Service,
    Trade,
};
use serde_json::json;

use super::helpers::{json, mock_channel, send, service_with};

fn paid_trade(channel: &str, trade_no: &str) -> Trade {
    let mut trade = Trade::new(channel, RawTrade::Opaque(json!({})));
    trade.trade_no = trade_no.to_string();
    trade.order_no = "O-1".into();
    trade.trade_status = "TRADE_SUCCESS".into();
    trade.trade_success = true;
    trade
}

#[actix_web::test]
async fn return_by_get() {
    prepare_test_env();
    let mut channel = mock_channel("alipay");
    channel.expect_return_request_handler().times(1).returning(|req| {
        let trade_no = req.form_value("trade_no").ok_or(ChannelError::UnknownTradeNo)?;
        Ok(paid_trade("alipay", trade_no))
    });
    let req = TestRequest::get().uri("/pay/return?channel=alipay&order_no=O-1&trade_no=2024T1");
    let (status, body) = send(req, service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::OK);
    let trade = json(&body);
    assert_eq!(trade["trade_no"], "2024T1");
    assert_eq!(trade["paid_success"], true);
}

#[actix_web::test]
async fn return_by_form_post() {
    let mut channel = mock_channel("wxpay");
    channel
        .expect_return_request_handler()
        .withf(|req| req.form_value("transaction_id") == Some("4200001"))
        .times(1)
        .returning(|_| Ok(paid_trade("wxpay", "4200001")));
    let req = TestRequest::post()
        .uri("/pay/return?channel=wxpay")
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload("transaction_id=4200001");
    let (status, _) = send(req, service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn return_without_channel() {
    let mut channel = mock_channel("alipay");
    channel.expect_return_request_handler().never();
    let (status, body) = send(TestRequest::get().uri("/pay/return?trade_no=T1"), service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "Unknown payment channel: ''");
}

#[actix_web::test]
async fn return_without_trade_number_makes_no_provider_call() {
    let mut client = MockAlipayApi::new();
    client.expect_trade_query().never();
    let mut service = Service::new();
    service.register_channel(AlipayChannel::new(client, callback_urls()));
    let (status, body) = send(TestRequest::get().uri("/pay/return?channel=alipay&order_no=O-1"), service).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "The callback did not carry a trade number");
}

#[actix_web::test]
async fn alipay_notification_end_to_end() {
    let mut client = MockAlipayApi::new();
    client.expect_verify_trade_notification().times(1).returning(|params| {
        let value = |k: &str| params.iter().find(|(n, _)| n == k).map(|(_, v)| v.clone()).unwrap_or_default();
        Ok(TradeNotification {
            notify_type: value("notify_type"),
            trade_no: value("trade_no"),
            out_trade_no: value("out_trade_no"),
            trade_status: value("trade_status"),
            ..Default::default()
        })
    });
    let mut service = Service::new();
    service.register_channel(AlipayChannel::new(client, callback_urls()));
    let req = TestRequest::post()
        .uri("/pay/notify?channel=alipay&order_no=O-1")
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload("notify_type=trade_status_sync&trade_no=2024T1&out_trade_no=O-1&trade_status=TRADE_SUCCESS&sign=x");
    let (status, body) = send(req, service).await;
    assert_eq!(status, StatusCode::OK);
    let note = json(&body);
    assert_eq!(note["channel"], "alipay");
    assert_eq!(note["notify_type"], "trade");
    assert_eq!(note["order_no"], "O-1");
    assert_eq!(note["trade_no"], "2024T1");
}

#[actix_web::test]
async fn unrecognised_notification_is_acknowledged() {
    let mut channel = mock_channel("paypal");
    channel
        .expect_notify_request_handler()
        .times(1)
        .returning(|_| Ok(Notification::new("paypal", RawNotification::Opaque(json!({"resource_type": "invoices"})))));
    let req = TestRequest::post().uri("/pay/notify?channel=paypal").set_json(json!({"id": "WH-1"}));
    let (status, body) = send(req, service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::OK);
    let note = json(&body);
    assert!(note["notify_type"].is_null());
    assert_eq!(note["order_no"], "");
}

#[actix_web::test]
async fn refund_notification() {
    let mut channel = mock_channel("wxpay");
    channel.expect_notify_request_handler().times(1).returning(|req| {
        assert_eq!(req.body(), b"<xml></xml>");
        let mut note = Notification::new("wxpay", RawNotification::Opaque(json!({})));
        note.notify_type = Some(NotificationKind::Refund);
        Ok(note)
    });
    let req = TestRequest::post()
        .uri("/pay/notify?channel=wxpay&notify_type=refund")
        .insert_header(("Content-Type", "text/xml"))
        .set_payload("<xml></xml>");
    let (status, body) = send(req, service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["notify_type"], "refund");
}

#[actix_web::test]
async fn cancel() {
    let (status, body) =
        send(TestRequest::get().uri("/pay/cancel?channel=paypal&order_no=O-1"), service_with(vec![])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"success": true, "message": "Payment for order O-1 was cancelled"}));
}
