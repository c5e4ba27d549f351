use crate::{callback::CallbackUrls, order::Order};

pub fn callback_urls() -> CallbackUrls {
    CallbackUrls {
        notify_url: "https://shop.example.com/pay/notify".into(),
        return_url: "https://shop.example.com/pay/return".into(),
        cancel_url: "https://shop.example.com/pay/cancel".into(),
    }
}

/// Three widgets at 10.00 plus 0.50 tax each, 5.00 shipping and a 2.00 discount. The total is 34.50.
pub fn widget_order() -> Order {
    let mut order = Order::new("O-1", "Widgets");
    order.add_product("widget", "W1", 3, 10.00, 0.50);
    order.shipping = 5.00;
    order.discount = 2.00;
    order
}
