use actix_web::{http::StatusCode, test::TestRequest};
use pgw_channels::{
    test_utils::prepare_test_env,
    ChannelError,
    ProviderError,
    RawTrade,
    Trade,
    TradeMethod,
};
use serde_json::json;

use super::helpers::{json, mock_channel, send, service_with};

fn widget_request(trade_method: &str) -> serde_json::Value {
    json!({
        "order_no": "O-1",
        "subject": "Widgets",
        "products": [{"name": "widget", "sku": "W1", "quantity": 3, "price": 10.0, "tax": 0.5}],
        "shipping": 5.0,
        "discount": 2.0,
        "trade_method": trade_method
    })
}

#[actix_web::test]
async fn health() {
    prepare_test_env();
    let (status, body) = send(TestRequest::get().uri("/health"), service_with(vec![])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn list_channels() {
    let service = service_with(vec![mock_channel("wxpay"), mock_channel("alipay")]);
    let (status, body) = send(TestRequest::get().uri("/channels"), service).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!(["alipay", "wxpay"]));
}

#[actix_web::test]
async fn create_payment() {
    prepare_test_env();
    let mut channel = mock_channel("alipay");
    channel
        .expect_create_trade_order()
        .withf(|o| {
            o.order_no == "O-1" &&
                o.amounts().total() == 34.5 &&
                o.currency == "USD" &&
                o.trade_method == TradeMethod::QrCode
        })
        .times(1)
        .returning(|_| Ok("https://qr.alipay.com/bax01".to_string()));
    let req = TestRequest::post().uri("/pay/alipay").set_json(widget_request("qr_code"));
    let (status, body) = send(req, service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json(&body),
        json!({"channel": "alipay", "order_no": "O-1", "trade_method": "qr_code", "target": "https://qr.alipay.com/bax01"})
    );
}

#[actix_web::test]
async fn create_payment_on_unknown_channel() {
    let mut channel = mock_channel("alipay");
    channel.expect_create_trade_order().never();
    let req = TestRequest::post().uri("/pay/applepay").set_json(widget_request("web"));
    let (status, body) = send(req, service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body), json!({"error": "Unknown payment channel: 'applepay'"}));
}

#[actix_web::test]
async fn unsupported_trade_method() {
    let mut channel = mock_channel("wxpay");
    channel
        .expect_create_trade_order()
        .returning(|o| Err(ChannelError::unsupported_method("wxpay", o.trade_method)));
    let req = TestRequest::post().uri("/pay/wxpay").set_json(widget_request("f2f"));
    let (status, body) = send(req, service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(json(&body)["error"], "The wxpay channel does not support the 'f2f' trade method");
}

#[actix_web::test]
async fn provider_failures_are_bad_gateway() {
    let mut channel = mock_channel("paypal");
    channel
        .expect_create_trade_order()
        .returning(|_| Err(ProviderError::Api { code: "VALIDATION_ERROR".into(), message: "Invalid request".into() }.into()));
    let req = TestRequest::post().uri("/pay/paypal").set_json(widget_request(""));
    let (status, body) = send(req, service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json(&body)["error"], "Payment provider call failed. Error VALIDATION_ERROR. Invalid request");
}

#[actix_web::test]
async fn malformed_payment_request() {
    let mut channel = mock_channel("alipay");
    channel.expect_create_trade_order().never();
    let req = TestRequest::post().uri("/pay/alipay").set_json(json!({"subject": "no order number"}));
    let (status, _) = send(req, service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn query_trade() {
    let mut channel = mock_channel("wxpay");
    channel.expect_get_trade().withf(|t| t == "4200001").times(1).returning(|t| {
        let mut trade = Trade::new("wxpay", RawTrade::Opaque(json!({"trade_state": "SUCCESS"})));
        trade.trade_no = t.to_string();
        trade.order_no = "O-1".into();
        trade.trade_success = true;
        trade.total_amount = "34.50".into();
        Ok(trade)
    });
    let (status, body) = send(TestRequest::get().uri("/trade/wxpay/4200001"), service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::OK);
    let trade = json(&body);
    assert_eq!(trade["trade_no"], "4200001");
    assert_eq!(trade["paid_success"], true);
    assert_eq!(trade["total_amount"], "34.50");
}

#[actix_web::test]
async fn query_by_order_number_is_unsupported_on_paypal() {
    let mut channel = mock_channel("paypal");
    channel
        .expect_get_trade_with_order_no()
        .times(1)
        .returning(|_| Err(ChannelError::unsupported_operation("paypal", "trade lookup by order number")));
    let (status, _) = send(TestRequest::get().uri("/order/paypal/O-1"), service_with(vec![channel])).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
}
