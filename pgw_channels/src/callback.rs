//! Inbound callback requests and the callback URLs handed to providers.
//!
//! Providers call back into the gateway twice per payment: a browser redirect when the payer returns from the
//! provider's checkout, and a server-to-server notification when the trade changes state. Both requests must be routed
//! back to the channel that created the payment, so every callback URL given to a provider carries the routing
//! parameters [`CHANNEL_PARAM`] and [`ORDER_NO_PARAM`].
use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::ChannelError;

pub const CHANNEL_PARAM: &str = "channel";
pub const ORDER_NO_PARAM: &str = "order_no";
pub const NOTIFY_TYPE_PARAM: &str = "notify_type";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

//--------------------------------------    CallbackUrls       --------------------------------------------------------
/// The gateway endpoints providers redirect payers to, or post notifications to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackUrls {
    /// Server-to-server notifications
    pub notify_url: String,
    /// Where the payer lands after paying
    pub return_url: String,
    /// Where the payer lands after abandoning the payment
    pub cancel_url: String,
}

/// Appends the routing parameters (and any `extra` pairs) to `base`, so the provider's eventual callback can be
/// dispatched back to `channel`.
pub fn routing_url(base: &str, channel: &str, order_no: &str, extra: &[(&str, &str)]) -> Result<String, ChannelError> {
    let mut url = Url::parse(base).map_err(|e| ChannelError::InvalidCallbackUrl(format!("'{base}'. {e}")))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair(CHANNEL_PARAM, channel).append_pair(ORDER_NO_PARAM, order_no);
        for (k, v) in extra {
            pairs.append_pair(k, v);
        }
    }
    Ok(url.to_string())
}

//--------------------------------------   CallbackRequest     --------------------------------------------------------
/// A transport-neutral view of an inbound HTTP callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackRequest {
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl CallbackRequest {
    /// Builds a request from its raw parts. If the `Content-Type` header marks the body as url-encoded, the body is
    /// also parsed into form values.
    pub fn new<I, K, V>(query_string: &str, headers: I, body: Vec<u8>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let headers =
            headers.into_iter().map(|(k, v)| (k.into().to_ascii_lowercase(), v.into())).collect::<Vec<_>>();
        let is_form = headers
            .iter()
            .any(|(k, v)| k == "content-type" && v.to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE));
        let form = if is_form { parse_pairs(&body) } else { Vec::new() };
        Self { query: parse_pairs(query_string.as_bytes()), form, headers, body }
    }

    /// A bodiless request, as produced by a browser redirect.
    pub fn from_query(query_string: &str) -> Self {
        Self::new(query_string, Vec::<(String, String)>::new(), Vec::new())
    }

    /// Looks up a parameter in the form body first, then in the query string. Empty values count as absent.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .chain(self.query.iter())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// All form and query parameters, form values first.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        self.form.iter().chain(self.query.iter()).cloned().collect()
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// A copy of this request with every occurrence of the named parameters removed from both the query string and
    /// the form body.
    pub fn without_params(&self, names: &[&str]) -> Self {
        let keep = |(k, _): &&(String, String)| !names.contains(&k.as_str());
        Self {
            query: self.query.iter().filter(keep).cloned().collect(),
            form: self.form.iter().filter(keep).cloned().collect(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }

    /// Header pairs with lowercase names
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

fn parse_pairs(input: &[u8]) -> Vec<(String, String)> {
    form_urlencoded::parse(input).map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
}
