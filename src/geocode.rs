//! # Forward Geocoding Client
//!
//! This module handles the single network operation of the application: turning
//! free-text address input into a coordinate through a positionstack-style
//! forward geocoding endpoint.
//!
//! ## Request Format
//!
//! ```text
//! GET {base_url}?access_key={key}&query={address}
//! ```
//!
//! The only escaping applied to the address is replacing each space with `%20`.
//! Other reserved characters (`&`, `?`, `#`, ...) are embedded literally, so an
//! address containing them changes the meaning of the query string. This is the
//! behavior of the service's reference client and is kept as-is.
//!
//! ## Response Format
//!
//! ```json
//! { "data": [ { "latitude": 48.8566, "longitude": 2.3522, "name": "Paris" } ] }
//! ```
//!
//! Only `data[0]` is ever used.
//!
//! ## Error Handling
//!
//! - **Invalid URL**: the constructed string is not a strict RFC 3986 URL
//! - **Transport failures**: DNS, connect or read errors from reqwest
//! - **Decode failures**: body is not the expected JSON envelope (this includes
//!   the service's own error objects, the status code is not inspected)
//! - **Not found**: the envelope decodes but `data` is empty
//!
//! All errors propagate through [`GeocodeError`]. None of them are retried.

use crate::config::GeocoderConfig;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while resolving an address.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// The request URL could not be constructed from the address text
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON envelope
    #[error("Failed to decode data: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service returned no candidates
    #[error("Could not find address...")]
    NotFound,
}

/// Decoded response envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeocodeResponse {
    /// Candidate matches, best match first
    pub data: Vec<Candidate>,
}

/// A single candidate match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
}

impl GeocodeResponse {
    /// First candidate, or `None` when the address was not found.
    pub fn into_first(self) -> Option<Candidate> {
        self.data.into_iter().next()
    }
}

/// Build the request URL string for `address`.
///
/// # Example
/// ```
/// use compass_map_lib::geocode::build_request_url;
///
/// let url = build_request_url("http://example.com/v1/forward", "KEY", "10 Downing St");
/// assert_eq!(url, "http://example.com/v1/forward?access_key=KEY&query=10%20Downing%20St");
/// ```
pub fn build_request_url(base_url: &str, access_key: &str, address: &str) -> String {
    let escaped = address.replace(' ', "%20");
    format!("{base_url}?access_key={access_key}&query={escaped}")
}

/// Parse `url` strictly: every character must be legal in an RFC 3986 URI and
/// every `%` must start a two-digit hex escape.
pub fn parse_request_url(url: &str) -> Result<Url, GeocodeError> {
    let bytes = url.as_bytes();
    for (index, &byte) in bytes.iter().enumerate() {
        if byte == b'%' {
            let escape = bytes.get(index + 1..index + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return Err(GeocodeError::InvalidUrl(format!(
                    "malformed percent escape at byte {index}"
                )));
            }
        } else if !is_uri_char(byte) {
            return Err(GeocodeError::InvalidUrl(format!(
                "illegal character at byte {index}"
            )));
        }
    }

    Url::parse(url).map_err(|err| GeocodeError::InvalidUrl(err.to_string()))
}

fn is_uri_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"-._~:/?#[]@!$&'()*+,;=".contains(&byte)
}

/// Async client for the forward geocoding endpoint.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone, Debug)]
pub struct GeocodingClient {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl GeocodingClient {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: &GeocoderConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            access_key: config.access_key.clone(),
        }
    }

    /// URL that [`lookup`](Self::lookup) would request for `address`.
    pub fn request_url(&self, address: &str) -> String {
        build_request_url(&self.base_url, &self.access_key, address)
    }

    /// Resolve `address` to its best candidate.
    ///
    /// Issues exactly one GET request. There is no timeout beyond reqwest's
    /// defaults and no retry.
    pub async fn lookup(&self, address: &str) -> Result<Candidate, GeocodeError> {
        let url = parse_request_url(&self.request_url(address))?;
        log::debug!("Geocoding {address:?}");

        let body = self.http.get(url).send().await?.bytes().await?;
        let response: GeocodeResponse = serde_json::from_slice(&body)?;

        response.into_first().ok_or(GeocodeError::NotFound)
    }
}
