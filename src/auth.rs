//! Authentication module for the Huobi API
//!
//! Huobi private endpoints use signature version 2: the auth parameters
//! (`AccessKeyId`, `SignatureMethod`, `SignatureVersion`, `Timestamp`) are merged
//! with the query parameters, sorted by key, percent-encoded and joined into
//!
//! ```text
//! METHOD\nhost\npath\nsorted-query
//! ```
//!
//! which is signed with HMAC-SHA256 and appended base64-encoded as `Signature`.
//! For POST requests only the auth parameters are signed; the request parameters
//! travel in the JSON body.

use std::collections::BTreeMap;
use std::fmt::Debug;

use aws_lc_rs::hmac;
use base64::prelude::*;
use chrono::{DateTime, Utc};
use zeroize::ZeroizeOnDrop;

pub const ACCESS_KEY_PARAM: &str = "AccessKeyId";
pub const SIGNATURE_METHOD_PARAM: &str = "SignatureMethod";
pub const SIGNATURE_VERSION_PARAM: &str = "SignatureVersion";
pub const TIMESTAMP_PARAM: &str = "Timestamp";
pub const SIGNATURE_PARAM: &str = "Signature";

pub const SIGNATURE_METHOD: &str = "HmacSHA256";
pub const SIGNATURE_VERSION: &str = "2";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Huobi API key pair
///
/// The secret is zeroized on drop and never printed by `Debug`.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Credentials {
    api_key: String,
    api_secret: Box<[u8]>,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(Credentials))
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Create credentials from an API key and secret
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into().into_bytes().into_boxed_slice(),
        }
    }

    /// The public API key (`AccessKeyId`)
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// HMAC-SHA256 the payload with the secret and base64-encode the tag
    pub fn sign(&self, payload: &str) -> String {
        let key = hmac::Key::new(hmac::HMAC_SHA256, &self.api_secret);
        let tag = hmac::sign(&key, payload.as_bytes());
        BASE64_STANDARD.encode(tag.as_ref())
    }

    /// Add the auth parameters and the resulting `Signature` to `params`
    ///
    /// `params` must already contain every parameter that will be sent in the
    /// query string, since all of them are covered by the signature.
    pub fn sign_params(
        &self,
        method: &str,
        host: &str,
        path: &str,
        params: &mut BTreeMap<String, String>,
        timestamp: DateTime<Utc>,
    ) {
        params.insert(ACCESS_KEY_PARAM.to_string(), self.api_key.clone());
        params.insert(
            SIGNATURE_METHOD_PARAM.to_string(),
            SIGNATURE_METHOD.to_string(),
        );
        params.insert(
            SIGNATURE_VERSION_PARAM.to_string(),
            SIGNATURE_VERSION.to_string(),
        );
        params.insert(
            TIMESTAMP_PARAM.to_string(),
            timestamp.format(TIMESTAMP_FORMAT).to_string(),
        );
        params.remove(SIGNATURE_PARAM);

        let payload = signing_payload(method, host, path, params);
        params.insert(SIGNATURE_PARAM.to_string(), self.sign(&payload));
    }
}

/// Build the string that gets signed
pub fn signing_payload(
    method: &str,
    host: &str,
    path: &str,
    params: &BTreeMap<String, String>,
) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        method.to_uppercase(),
        host.to_lowercase(),
        path,
        encode_query(params)
    )
}

/// Percent-encode and join parameters in key order
///
/// Uses uppercase hex escapes, which the signature check requires.
pub fn encode_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
