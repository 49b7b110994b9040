// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Types and methods used to authenticate calls to Twitter.
//!
//! Everything a call needs to be signed lives here: the `KeyPair` that holds a key and secret,
//! the `Token` that combines them into a usable credential, and the functions that perform the
//! OAuth 1.0a "three-legged" exchange to turn an app's consumer keys into an access token for a
//! specific account.
//!
//! The exchange goes in three steps:
//!
//! 1. `request_token` asks Twitter for a *request token* that represents the pending
//!    authorization.
//! 2. `authorize_url` (or `authenticate_url`) renders the URL the user must visit to approve the
//!    request; with the `"oob"` callback they receive a PIN to hand back to the application.
//! 3. `access_token` exchanges the approved request token and the PIN (or callback verifier) for
//!    the final access token, along with the ID and screen name of the account that approved it.
//!
//! Most applications don't drive these steps by hand: the `vault` module wraps them in an
//! interactive flow and persists the result, so a token created once is found again by every
//! later process. `bearer_token` covers the app-only ("OAuth 2.0") side, which is not bound to
//! any account.

pub(crate) mod raw;

use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::error::{Error, Result};
use crate::{links, user};

use self::raw::RequestBuilder;

pub use self::raw::{get, post};

/// A key/secret pair representing the app or an account's access to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPair {
    /// A key used to identify an application or user.
    pub key: CowStr,
    /// A private key used to sign messages from an application or user.
    pub secret: CowStr,
}

impl KeyPair {
    /// Creates a `KeyPair` with the given key and secret.
    pub fn new(key: impl Into<CowStr>, secret: impl Into<CowStr>) -> KeyPair {
        KeyPair {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Creates an empty `KeyPair`, for when a signature requires one but no token is present.
    fn empty() -> KeyPair {
        KeyPair {
            key: "".into(),
            secret: "".into(),
        }
    }
}

/// A token that can be used to sign requests to Twitter.
///
/// Conceptually a "token" is the combination of everything needed to prove to Twitter who is
/// calling: for account-scoped (OAuth 1.0a) access that is the consumer pair plus the access
/// pair, and for app-only access it is a single bearer string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    /// An OAuth 1.0a access token, bound to one account.
    Access {
        /// The consumer key pair that identifies the application.
        consumer: KeyPair,
        /// The access key pair granted by the account the application acts as.
        access: KeyPair,
    },
    /// An OAuth 2.0 Bearer token, representing an application on its own.
    Bearer(String),
}

/// With the given consumer KeyPair, ask Twitter for a request token that can be used to request
/// access to a user's account.
///
/// The `callback` parameter is the OAuth callback URL that receives the result of the
/// authorization; give `"oob"` to use PIN-based authorization instead, where the user is shown a
/// PIN to type back into the application.
pub async fn request_token(con_token: &KeyPair, callback: impl Into<String>) -> Result<KeyPair> {
    let request = RequestBuilder::new(hyper::Method::POST, links::auth::REQUEST_TOKEN)
        .oauth_callback(callback)
        .request_keys(con_token, None);

    let (_, body) = raw_request(request).await?;
    let body = std::str::from_utf8(&body)
        .map_err(|_| Error::InvalidResponse("request token body was not UTF-8"))?;

    let mut key: Option<String> = None;
    let mut secret: Option<String> = None;

    for elem in body.split('&') {
        let mut kv = elem.splitn(2, '=');
        match kv.next() {
            Some("oauth_token") => key = kv.next().map(|s| s.to_string()),
            Some("oauth_token_secret") => secret = kv.next().map(|s| s.to_string()),
            Some(_) => (),
            None => return Err(Error::InvalidResponse("empty request token parameter")),
        }
    }

    Ok(KeyPair::new(
        key.ok_or(Error::MissingValue("oauth_token"))?,
        secret.ok_or(Error::MissingValue("oauth_token_secret"))?,
    ))
}

/// With the given request token, return a URL that a user can visit to accept or reject the
/// pending authorization request.
///
/// Using PIN-based authorization, the user receives a PIN after approving the request, which is
/// the verifier to hand to `access_token`.
pub fn authorize_url(request_token: &KeyPair) -> String {
    format!("{}?oauth_token={}", links::auth::AUTHORIZE, request_token.key)
}

/// Like `authorize_url`, but for apps using Twitter as a "sign in with" provider: users who have
/// already authorized the app are redirected straight through without re-approving.
pub fn authenticate_url(request_token: &KeyPair) -> String {
    format!(
        "{}?oauth_token={}",
        links::auth::AUTHENTICATE,
        request_token.key
    )
}

/// With the given consumer and approved request token, exchange the verifier for an access
/// `Token`, along with the user ID and screen name of the account that granted it.
///
/// The verifier is either delivered to the callback given to `request_token`, or shown to the
/// user as a PIN after they visit the `authorize_url`.
pub async fn access_token(
    con_token: KeyPair,
    request_token: &KeyPair,
    verifier: impl Into<String>,
) -> Result<(Token, u64, String)> {
    let request = RequestBuilder::new(hyper::Method::POST, links::auth::ACCESS_TOKEN)
        .oauth_verifier(verifier)
        .request_keys(&con_token, Some(request_token));

    let (_, body) = raw_request(request).await?;
    let body = std::str::from_utf8(&body)
        .map_err(|_| Error::InvalidResponse("access token body was not UTF-8"))?;

    let mut key: Option<String> = None;
    let mut secret: Option<String> = None;
    let mut id: Option<u64> = None;
    let mut username: Option<String> = None;

    for elem in body.split('&') {
        let mut kv = elem.splitn(2, '=');
        match kv.next() {
            Some("oauth_token") => key = kv.next().map(|s| s.to_string()),
            Some("oauth_token_secret") => secret = kv.next().map(|s| s.to_string()),
            Some("user_id") => id = kv.next().and_then(|s| s.parse().ok()),
            Some("screen_name") => username = kv.next().map(|s| s.to_string()),
            Some(_) => (),
            None => return Err(Error::InvalidResponse("empty access token parameter")),
        }
    }

    let access = KeyPair::new(
        key.ok_or(Error::MissingValue("oauth_token"))?,
        secret.ok_or(Error::MissingValue("oauth_token_secret"))?,
    );

    Ok((
        Token::Access {
            consumer: con_token,
            access,
        },
        id.ok_or(Error::MissingValue("user_id"))?,
        username.ok_or(Error::MissingValue("screen_name"))?,
    ))
}

/// With the given consumer KeyPair, request a Bearer token to perform app-only authenticated
/// requests.
pub async fn bearer_token(con_token: &KeyPair) -> Result<Token> {
    let params = ParamList::new().add_param("grant_type", "client_credentials");
    let request = RequestBuilder::new(hyper::Method::POST, links::auth::BEARER_TOKEN)
        .with_body_params(&params)
        .request_consumer_bearer(con_token);

    #[derive(Deserialize)]
    struct BearerGrant {
        access_token: String,
    }

    let (_, body) = raw_request(request).await?;
    let grant = serde_json::from_slice::<BearerGrant>(&body)?;

    Ok(Token::Bearer(grant.access_token))
}

/// If the given token is valid, return the user information for the account it is bound to.
pub async fn verify_tokens(token: &Token) -> Result<Response<user::TwitterUser>> {
    let req = get(links::auth::VERIFY_CREDENTIALS, token, None);

    request_with_json_response(req).await
}
