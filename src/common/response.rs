// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Infrastructure types related to packaging rate-limit information alongside responses from
//! Twitter.

use hyper::{Body, Request, StatusCode};
use serde::de::DeserializeOwned;

use crate::common::Headers;
use crate::error::{Error, Result, TwitterErrors};

/// A helper struct to wrap response data with accompanying rate limit information.
///
/// Every API call in this library returns its output wrapped in this struct, so the rate-limit
/// headers Twitter attaches to the response are always on hand.
#[derive(Debug)]
pub struct Response<T> {
    /// The rate limit ceiling for the given request.
    pub rate_limit: i32,
    /// The number of requests left for the 15-minute window.
    pub rate_limit_remaining: i32,
    /// The UTC Unix timestamp at which the rate window resets.
    pub rate_limit_reset: i32,
    /// The decoded response from the request.
    pub response: T,
}

impl<T> Response<T> {
    /// Convert a `Response<T>` to a `Response<U>` by running its contained response through the
    /// given function, preserving its rate-limit information.
    pub fn map<F, U>(self, fun: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            rate_limit: self.rate_limit,
            rate_limit_remaining: self.rate_limit_remaining,
            rate_limit_reset: self.rate_limit_reset,
            response: fun(self.response),
        }
    }
}

fn rate_limit(headers: &Headers, name: &'static str) -> i32 {
    headers
        .get(name)
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.parse().ok())
        .unwrap_or(-1)
}

/// Builds an empty `Response` out of the rate-limit headers of a call.
pub fn rate_headers(headers: &Headers) -> Response<()> {
    Response {
        rate_limit: rate_limit(headers, "x-rate-limit-limit"),
        rate_limit_remaining: rate_limit(headers, "x-rate-limit-remaining"),
        rate_limit_reset: rate_limit(headers, "x-rate-limit-reset"),
        response: (),
    }
}

fn get_response(request: Request<Body>) -> hyper::client::ResponseFuture {
    #[cfg(feature = "native_tls")]
    let connector = hyper_tls::HttpsConnector::new();
    #[cfg(feature = "rustls")]
    let connector = hyper_rustls::HttpsConnector::with_native_roots();
    #[cfg(feature = "rustls_webpki")]
    let connector = hyper_rustls::HttpsConnector::with_webpki_roots();

    let client = hyper::Client::builder().build(connector);
    client.request(request)
}

/// Executes the given request, reads the whole response body, and inspects it for error payloads
/// or an error status before handing the headers and raw bytes back.
pub async fn raw_request(request: Request<Body>) -> Result<(Headers, Vec<u8>)> {
    let resp = get_response(request).await?;
    let status = resp.status();
    let (parts, body) = resp.into_parts();
    let body = hyper::body::to_bytes(body).await?.to_vec();

    if let Ok(errors) = serde_json::from_slice::<TwitterErrors>(&body) {
        if errors.errors.iter().any(|e| e.code == 88)
            && parts.headers.contains_key("x-rate-limit-reset")
        {
            return Err(Error::RateLimit(rate_limit(
                &parts.headers,
                "x-rate-limit-reset",
            )));
        } else {
            return Err(Error::TwitterError(errors));
        }
    }

    if status != StatusCode::OK {
        return Err(Error::BadStatus(status));
    }

    Ok((parts.headers, body))
}

/// Executes the given request and parses the response body as JSON into the target type,
/// wrapping it with the rate-limit headers of the call.
pub async fn request_with_json_response<T: DeserializeOwned>(
    request: Request<Body>,
) -> Result<Response<T>> {
    let (headers, body) = raw_request(request).await?;
    let out = serde_json::from_slice::<T>(&body)?;
    Ok(rate_headers(&headers).map(|()| out))
}
