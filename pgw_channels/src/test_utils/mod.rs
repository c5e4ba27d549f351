//! Mocks, fixtures and environment setup shared by this crate's tests and by downstream crates (with the
//! `test_utils` feature).
mod fixtures;
mod mocks;
mod prepare_env;

pub use fixtures::{callback_urls, widget_order};
pub use mocks::{MockAlipayApi, MockChannel, MockPayPalApi, MockWxPayApi};
pub use prepare_env::prepare_test_env;
