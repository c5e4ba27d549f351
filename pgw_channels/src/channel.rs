use async_trait::async_trait;

use crate::{
    callback::CallbackRequest,
    order::Order,
    trade::{Notification, Trade},
    ChannelError,
};

/// The capability contract every payment channel implements.
///
/// Implementations hold an immutable configuration and a handle to their provider collaborator, and nothing else.
/// Calls are independent of each other; a channel keeps no state between them.
#[async_trait]
pub trait PayChannel: Send + Sync {
    /// A stable, lowercase token naming the provider, e.g. `alipay`. It is the registry key, and is embedded in every
    /// callback URL the channel hands out.
    fn identifier(&self) -> &str;

    /// Starts a payment for `order`.
    ///
    /// What comes back depends on `order.trade_method`: a URL to redirect the payer to, an opaque payload for a native
    /// SDK, the contents of a scannable code, or (for face-to-face charges) the provider's trade number.
    async fn create_trade_order(&self, order: &Order) -> Result<String, ChannelError>;

    /// Queries the current state of a trade by the provider's trade number.
    async fn get_trade(&self, trade_no: &str) -> Result<Trade, ChannelError>;

    /// Queries the current state of a trade by the caller's order number.
    async fn get_trade_with_order_no(&self, order_no: &str) -> Result<Trade, ChannelError>;

    /// Handles the payer's browser returning from the provider.
    async fn return_request_handler(&self, req: &CallbackRequest) -> Result<Trade, ChannelError>;

    /// Verifies and classifies an asynchronous provider notification.
    async fn notify_request_handler(&self, req: &CallbackRequest) -> Result<Notification, ChannelError>;
}
