//! Loading channel configuration from the environment.
//!
//! | Variable                           | Used for                                   |
//! |------------------------------------|--------------------------------------------|
//! | `PGW_NOTIFY_URL`                   | [`CallbackUrls::notify_url`]               |
//! | `PGW_RETURN_URL`                   | [`CallbackUrls::return_url`]               |
//! | `PGW_CANCEL_URL`                   | [`CallbackUrls::cancel_url`]               |
//! | `PGW_PAYPAL_WEBHOOK_ID`            | [`PayPalConfig::webhook_id`]               |
//! | `PGW_PAYPAL_EXPERIENCE_PROFILE_ID` | [`PayPalConfig::experience_profile_id`]    |
use std::env;

use log::*;

use crate::{callback::CallbackUrls, paypal::PayPalConfig};

impl CallbackUrls {
    pub fn from_env_or_default() -> Self {
        let notify_url = env::var("PGW_NOTIFY_URL").ok().unwrap_or_else(|| {
            error!(
                "🪛️ PGW_NOTIFY_URL is not set. Payment providers will not be able to notify the gateway of trade \
                 updates."
            );
            String::default()
        });
        let return_url = env::var("PGW_RETURN_URL").ok().unwrap_or_else(|| {
            error!("🪛️ PGW_RETURN_URL is not set. Payers will not be redirected back after paying.");
            String::default()
        });
        let cancel_url = env::var("PGW_CANCEL_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ PGW_CANCEL_URL is not set. Using the return URL for cancelled payments.");
            return_url.clone()
        });
        Self { notify_url, return_url, cancel_url }
    }
}

impl PayPalConfig {
    pub fn from_env_or_default() -> Self {
        let callbacks = CallbackUrls::from_env_or_default();
        let webhook_id = env::var("PGW_PAYPAL_WEBHOOK_ID").ok().unwrap_or_else(|| {
            warn!("🪛️ PGW_PAYPAL_WEBHOOK_ID is not set. PayPal webhook events will fail verification.");
            String::default()
        });
        let experience_profile_id = env::var("PGW_PAYPAL_EXPERIENCE_PROFILE_ID").ok().unwrap_or_else(|| {
            debug!("🪛️ PGW_PAYPAL_EXPERIENCE_PROFILE_ID is not set. PayPal's default checkout experience will be used.");
            String::default()
        });
        Self { callbacks, webhook_id, experience_profile_id }
    }
}
