use std::{collections::HashMap, sync::Arc};

use log::*;

use crate::{
    callback::{CallbackRequest, CHANNEL_PARAM},
    channel::PayChannel,
    order::Order,
    trade::{Notification, Trade},
    ChannelError,
};

/// Routes payment operations to the channel registered under a given identifier.
///
/// `Service` does no normalization of its own. Build it once at startup, register the channels, then share it
/// immutably (e.g. behind an `Arc` or `web::Data`) for the life of the process.
#[derive(Clone, Default)]
pub struct Service {
    channels: HashMap<String, Arc<dyn PayChannel>>,
}

impl Service {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `channel` under its identifier. A channel already registered under the same identifier is replaced.
    pub fn register_channel<C: PayChannel + 'static>(&mut self, channel: C) {
        self.register_shared_channel(Arc::new(channel));
    }

    pub fn register_shared_channel(&mut self, channel: Arc<dyn PayChannel>) {
        let id = channel.identifier().to_string();
        if self.channels.insert(id.clone(), channel).is_some() {
            debug!("🧭️ Replaced payment channel '{id}'");
        } else {
            debug!("🧭️ Registered payment channel '{id}'");
        }
    }

    pub fn remove_channel(&mut self, identifier: &str) {
        if self.channels.remove(identifier).is_some() {
            debug!("🧭️ Removed payment channel '{identifier}'");
        }
    }

    pub fn channel(&self, identifier: &str) -> Result<Arc<dyn PayChannel>, ChannelError> {
        self.channels.get(identifier).cloned().ok_or_else(|| ChannelError::UnknownChannel(identifier.to_string()))
    }

    /// The registered channel identifiers, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut ids = self.channels.keys().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    pub async fn create_payment(&self, channel: &str, order: &Order) -> Result<String, ChannelError> {
        trace!("🧭️ create_payment for order {} on '{channel}'", order.order_no);
        self.channel(channel)?.create_trade_order(order).await
    }

    pub async fn get_trade(&self, channel: &str, trade_no: &str) -> Result<Trade, ChannelError> {
        trace!("🧭️ get_trade {trade_no} on '{channel}'");
        self.channel(channel)?.get_trade(trade_no).await
    }

    pub async fn get_trade_with_order_no(&self, channel: &str, order_no: &str) -> Result<Trade, ChannelError> {
        trace!("🧭️ get_trade_with_order_no {order_no} on '{channel}'");
        self.channel(channel)?.get_trade_with_order_no(order_no).await
    }

    /// Dispatches a browser-return callback to the channel named by its `channel` parameter.
    pub async fn return_request_handler(&self, req: &CallbackRequest) -> Result<Trade, ChannelError> {
        let channel = self.channel_for_request(req)?;
        channel.return_request_handler(req).await
    }

    /// Dispatches a provider notification to the channel named by its `channel` parameter.
    pub async fn notify_request_handler(&self, req: &CallbackRequest) -> Result<Notification, ChannelError> {
        let channel = self.channel_for_request(req)?;
        channel.notify_request_handler(req).await
    }

    fn channel_for_request(&self, req: &CallbackRequest) -> Result<Arc<dyn PayChannel>, ChannelError> {
        let id = req.form_value(CHANNEL_PARAM).unwrap_or_default();
        trace!("🧭️ Callback for channel '{id}'");
        self.channel(id)
    }
}
