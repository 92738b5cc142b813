use reqwest::header::HeaderValue;
use url::Url;

use crate::error::{ClientError, Result};

pub use reqwest::{Body, Method, Request, Response};

/// Build a request for `raw_url`, attaching `body` when present.
pub fn new_request(method: Method, raw_url: &str, body: Option<Body>) -> Result<Request> {
    let url = Url::parse(raw_url).map_err(|source| ClientError::Url {
        url: raw_url.to_owned(),
        source,
    })?;

    let mut request = Request::new(method, url);
    *request.body_mut() = body;

    Ok(request)
}

/// Validate a synthesized header value.
pub fn header_value(name: &'static str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| ClientError::Header { name })
}
