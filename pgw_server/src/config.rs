use std::env;

use log::*;
use pgw_common::parse_boolean_flag;

const DEFAULT_PGW_HOST: &str = "127.0.0.1";
const DEFAULT_PGW_PORT: u16 = 8360;
const DEFAULT_CURRENCY: &str = "USD";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub proxy: ProxyConfig,
    /// The currency used for payment requests that don't specify one.
    pub default_currency: String,
}

/// Settings for servers that sit behind a reverse proxy.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProxyConfig {
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address.
    pub use_forwarded: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PGW_HOST.to_string(),
            port: DEFAULT_PGW_PORT,
            proxy: ProxyConfig::default(),
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("PGW_HOST").ok().unwrap_or_else(|| DEFAULT_PGW_HOST.into());
        let port = env::var("PGW_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PGW_PORT. {e} Using the default, {DEFAULT_PGW_PORT}, instead."
                    );
                    DEFAULT_PGW_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PGW_PORT);
        let use_x_forwarded_for = parse_boolean_flag(env::var("PGW_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("PGW_USE_FORWARDED").ok(), false);
        let default_currency = env::var("PGW_DEFAULT_CURRENCY")
            .ok()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                info!("🪛️ PGW_DEFAULT_CURRENCY is not set. Using {DEFAULT_CURRENCY}.");
                DEFAULT_CURRENCY.to_string()
            });
        Self { host, port, proxy: ProxyConfig { use_x_forwarded_for, use_forwarded }, default_currency }
    }
}
