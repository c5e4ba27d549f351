//! # PayPal channel
//!
//! PayPal has a single browser checkout flow, so the order's trade method is ignored. Every payment is a `sale` with an
//! itemized amount breakdown. PayPal rejects payments whose breakdown does not add up to the total to the cent, so all
//! components are converted to [`MinorUnits`] before being summed. The sum must equal the order total that the other
//! channels charge; an order whose unit prices carry fractions of a cent fails with [`ChannelError::InvalidAmount`]
//! rather than being charged a different amount.
//!
//! Payments are executed lazily: the first query after the payer approves the payment executes it.
pub mod client;

use async_trait::async_trait;
use log::*;
use pgw_common::MinorUnits;
use serde::{Deserialize, Serialize};

use self::client::{
    Amount,
    AmountDetails,
    Item,
    ItemList,
    Payer,
    Payment,
    PayPalClient,
    RedirectUrls,
    ShippingAddress,
    Transaction,
    INTENT_SALE,
    LINK_REL_APPROVAL_URL,
    PAYMENT_METHOD_PAYPAL,
    PAYMENT_STATE_CREATED,
    RESOURCE_TYPE_DISPUTE,
    RESOURCE_TYPE_REFUND,
    RESOURCE_TYPE_SALE,
    SALE_STATE_COMPLETED,
};
use crate::{
    callback::{routing_url, CallbackRequest, CallbackUrls},
    order::Order,
    trade::{Notification, NotificationKind, RawNotification, RawTrade, Trade},
    ChannelError,
    PayChannel,
};

pub const PAYPAL_CHANNEL: &str = "paypal";
/// The query parameter PayPal appends to the return URL.
pub const RETURN_PAYMENT_ID_PARAM: &str = "paymentId";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPalConfig {
    pub callbacks: CallbackUrls,
    /// Webhook notifications are verified against this id.
    pub webhook_id: String,
    /// Optional checkout experience profile.
    pub experience_profile_id: String,
}

pub struct PayPalChannel<C> {
    client: C,
    config: PayPalConfig,
}

impl<C: PayPalClient> PayPalChannel<C> {
    pub fn new(client: C, config: PayPalConfig) -> Self {
        Self { client, config }
    }

    fn build_payment(&self, order: &Order) -> Result<Payment, ChannelError> {
        let callbacks = &self.config.callbacks;
        let redirect_urls = RedirectUrls {
            return_url: routing_url(&callbacks.return_url, PAYPAL_CHANNEL, &order.order_no, &[])?,
            cancel_url: routing_url(&callbacks.cancel_url, PAYPAL_CHANNEL, &order.order_no, &[])?,
        };

        let mut subtotal = MinorUnits::default();
        let mut tax = MinorUnits::default();
        let mut items = Vec::with_capacity(order.products().len());
        for p in order.products() {
            let price = MinorUnits::try_from(p.price)?;
            let unit_tax = MinorUnits::try_from(p.tax)?;
            let quantity = i64::from(p.quantity);
            subtotal = subtotal.checked_add(price.checked_mul(quantity)?)?;
            tax = tax.checked_add(unit_tax.checked_mul(quantity)?)?;
            items.push(Item {
                name: p.name.clone(),
                sku: p.sku.clone(),
                quantity: p.quantity.to_string(),
                price: price.to_decimal_string(),
                tax: unit_tax.to_decimal_string(),
                currency: order.currency.clone(),
            });
        }
        let shipping = MinorUnits::try_from(order.shipping)?;
        let discount = MinorUnits::try_from(order.discount)?;
        let total = subtotal.checked_add(tax)?.checked_add(shipping)?.checked_sub(discount)?;
        let expected = order.amounts().total_minor_units()?;
        if total != expected {
            warn!(
                "💳️ PayPal breakdown for order {} sums to {total}, but the order total is {expected}",
                order.order_no
            );
            return Err(ChannelError::InvalidAmount(format!(
                "itemized total {total} does not match order total {expected}"
            )));
        }

        let shipping_address = order.shipping_address.as_ref().map(|a| ShippingAddress {
            line1: a.line1.clone(),
            line2: a.line2.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            country_code: a.country_code.clone(),
            postal_code: a.postal_code.clone(),
            phone: a.phone.clone(),
        });
        let transaction = Transaction {
            invoice_number: order.order_no.clone(),
            amount: Amount {
                currency: order.currency.clone(),
                total: total.to_decimal_string(),
                details: Some(AmountDetails {
                    subtotal: subtotal.to_decimal_string(),
                    tax: tax.to_decimal_string(),
                    shipping: shipping.to_decimal_string(),
                    shipping_discount: discount.to_decimal_string(),
                    handling_fee: "0".into(),
                    insurance: "0".into(),
                }),
            },
            item_list: Some(ItemList { items, shipping_address }),
            related_resources: Vec::new(),
        };
        Ok(Payment {
            intent: INTENT_SALE.into(),
            payer: Payer { payment_method: PAYMENT_METHOD_PAYPAL.into(), payer_info: None },
            redirect_urls: Some(redirect_urls),
            experience_profile_id: self.config.experience_profile_id.clone(),
            transactions: vec![transaction],
            ..Default::default()
        })
    }
}

fn trade_from_payment(payment: Payment) -> Trade {
    let mut trade = Trade::new(PAYPAL_CHANNEL, RawTrade::PayPal(payment.clone()));
    trade.trade_no = payment.id;
    trade.trade_status = payment.state;
    if let Some(info) = payment.payer.payer_info {
        trade.payer_id = info.payer_id;
        trade.payer_email = info.email;
    }
    if let Some(transaction) = payment.transactions.into_iter().next() {
        trade.order_no = transaction.invoice_number;
        trade.total_amount = transaction.amount.total;
        if let Some(sale) = transaction.related_resources.into_iter().next().and_then(|r| r.sale) {
            trade.trade_success = sale.state == SALE_STATE_COMPLETED;
            trade.trade_status = sale.state;
        }
    }
    trade
}

#[async_trait]
impl<C: PayPalClient> PayChannel for PayPalChannel<C> {
    fn identifier(&self) -> &str {
        PAYPAL_CHANNEL
    }

    async fn create_trade_order(&self, order: &Order) -> Result<String, ChannelError> {
        let payment = self.build_payment(order)?;
        debug!("💳️ Creating paypal payment for {} in {}", order.order_no, order.currency);
        let created = self.client.create_payment(&payment).await?;
        match created.link(LINK_REL_APPROVAL_URL) {
            Some(url) => Ok(url.to_string()),
            None => {
                warn!("💳️ PayPal payment {} for order {} has no approval link", created.id, order.order_no);
                Err(ChannelError::ProviderResponse(format!("PayPal payment {} has no approval link", created.id)))
            },
        }
    }

    async fn get_trade(&self, trade_no: &str) -> Result<Trade, ChannelError> {
        let mut payment = self.client.get_payment_details(trade_no).await?;
        if payment.state == PAYMENT_STATE_CREATED {
            if let Some(payer_id) = payment.payer_id().map(String::from) {
                debug!("💳️ Executing approved paypal payment {trade_no} for payer {payer_id}");
                payment = self.client.execute_approved_payment(&payment.id, &payer_id).await?;
            }
        }
        Ok(trade_from_payment(payment))
    }

    async fn get_trade_with_order_no(&self, _order_no: &str) -> Result<Trade, ChannelError> {
        Err(ChannelError::unsupported_operation(PAYPAL_CHANNEL, "trade lookup by order number"))
    }

    async fn return_request_handler(&self, req: &CallbackRequest) -> Result<Trade, ChannelError> {
        let payment_id = req.form_value(RETURN_PAYMENT_ID_PARAM).ok_or(ChannelError::UnknownTradeNo)?;
        self.get_trade(payment_id).await
    }

    async fn notify_request_handler(&self, req: &CallbackRequest) -> Result<Notification, ChannelError> {
        let event = self.client.get_webhook_event(&self.config.webhook_id, req).await?;
        trace!("💳️ Verified paypal webhook event {} ({})", event.id, event.event_type);
        let mut result = Notification::new(PAYPAL_CHANNEL, RawNotification::PayPal(event.clone()));
        match event.resource_type.as_str() {
            RESOURCE_TYPE_SALE => {
                let sale = event.sale()?;
                result.notify_type = Some(NotificationKind::Trade);
                result.order_no = sale.invoice_number;
                result.trade_no = sale.parent_payment;
            },
            RESOURCE_TYPE_REFUND => {
                let refund = event.refund()?;
                result.notify_type = Some(NotificationKind::Refund);
                result.order_no = refund.invoice_number;
                result.trade_no = refund.parent_payment;
            },
            RESOURCE_TYPE_DISPUTE => {
                let dispute = event.dispute()?;
                result.notify_type = Some(NotificationKind::Dispute);
                result.order_no =
                    dispute.disputed_transactions.into_iter().next().map(|t| t.invoice_number).unwrap_or_default();
            },
            other => debug!("💳️ Ignoring paypal webhook event with resource type '{other}'"),
        }
        Ok(result)
    }
}
