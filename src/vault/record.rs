// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The serialized form of a stored credential, and the predicate that decides whether a loaded
//! one is usable.

use serde::{Deserialize, Serialize};

use crate::auth::{KeyPair, Token};
use crate::error::{Error, Result};
use crate::links;

/// The authorization scheme a stored credential was created under.
///
/// Files written by other tools can carry tags this library doesn't know; those deserialize as
/// `Unknown` and are rejected by the usability check rather than failing the load outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// An OAuth 1.0a user token, bound to one account.
    OAuth1,
    /// An OAuth 2.0 app-only token, not bound to any account.
    OAuth2,
    /// A plain Bearer string, also app-only.
    Bearer,
    /// Anything else.
    #[serde(other)]
    Unknown,
}

/// The URL descriptor stored alongside a credential, naming where its OAuth exchange was (or
/// would be) performed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// The request token URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    /// The user authorization URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorize: Option<String>,
    /// The access token URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

impl Endpoint {
    /// The endpoint descriptor for Twitter's own OAuth URLs, stamped onto every credential this
    /// library creates.
    pub fn twitter() -> Endpoint {
        Endpoint {
            request: Some(links::auth::REQUEST_TOKEN.to_string()),
            authorize: Some(links::auth::AUTHORIZE.to_string()),
            access: Some(links::auth::ACCESS_TOKEN.to_string()),
        }
    }
}

/// The key material carried by a stored credential. Every field is optional; the usability
/// check and the conversion to a signing `Token` decide what is actually required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token_secret: Option<String>,
    /// The bearer string, for app-only credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer: Option<String>,
    /// The screen name of the account the credential is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    /// The numeric ID of the account the credential is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

/// A stored credential: what gets written to token files and held in the process-wide stash.
///
/// This is the on-disk contract. One record is written bare to a normal token file; "bundle"
/// files hold a JSON map of name → record. Records loaded from disk go through `is_usable`
/// before the resolver accepts them, and are turned into a signing [`Token`] with [`token`]
/// when a request needs to be made.
///
/// [`Token`]: ../enum.Token.html
/// [`token`]: #method.token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// The authorization scheme of this credential.
    pub kind: RecordKind,
    /// The name of the app the credential was created for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    /// Where the credential's OAuth exchange was performed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
    /// The key material itself.
    #[serde(default)]
    pub credentials: Credentials,
}

impl TokenRecord {
    /// Creates an account-bound record out of a completed OAuth 1.0a exchange.
    pub fn access(
        app: Option<String>,
        consumer: &KeyPair,
        access: &KeyPair,
        user_id: Option<u64>,
        screen_name: Option<String>,
    ) -> TokenRecord {
        TokenRecord {
            kind: RecordKind::OAuth1,
            app,
            endpoint: Some(Endpoint::twitter()),
            credentials: Credentials {
                consumer_key: Some(consumer.key.to_string()),
                consumer_secret: Some(consumer.secret.to_string()),
                oauth_token: Some(access.key.to_string()),
                oauth_token_secret: Some(access.secret.to_string()),
                bearer: None,
                screen_name,
                user_id,
            },
        }
    }

    /// Creates an app-only record out of a bearer string.
    pub fn bearer(app: Option<String>, bearer: impl Into<String>) -> TokenRecord {
        TokenRecord {
            kind: RecordKind::Bearer,
            app,
            endpoint: Some(Endpoint::twitter()),
            credentials: Credentials {
                bearer: Some(bearer.into()),
                ..Credentials::default()
            },
        }
    }

    /// Decides whether this record is a valid, usable credential.
    ///
    /// App-only records are accepted unconditionally. Account-bound records must carry an
    /// endpoint descriptor, and either name a `request` URL on the target API's domain
    /// (case-insensitively) or omit the `request` URL while carrying an `oauth_token`. Anything
    /// else — including records whose `kind` was not recognized — is rejected.
    pub fn is_usable(&self) -> bool {
        match self.kind {
            RecordKind::Bearer | RecordKind::OAuth2 => true,
            RecordKind::OAuth1 => {
                let endpoint = match &self.endpoint {
                    Some(endpoint) => endpoint,
                    None => return false,
                };
                match &endpoint.request {
                    Some(request) => request.to_lowercase().contains("api.twitter"),
                    None => self.credentials.oauth_token.is_some(),
                }
            }
            RecordKind::Unknown => false,
        }
    }

    /// The screen name of the account this record is bound to, if any.
    pub fn screen_name(&self) -> Option<&str> {
        self.credentials.screen_name.as_deref()
    }

    /// Converts this record into a `Token` that can sign requests.
    ///
    /// Account-bound records need all four keys present; app-only records need the bearer
    /// string. A record missing any of them cannot make calls, whatever the predicate said
    /// about its shape.
    pub fn token(&self) -> Result<Token> {
        match self.kind {
            RecordKind::OAuth1 => {
                let creds = &self.credentials;
                let consumer = KeyPair::new(
                    creds
                        .consumer_key
                        .clone()
                        .ok_or(Error::MissingValue("consumer_key"))?,
                    creds
                        .consumer_secret
                        .clone()
                        .ok_or(Error::MissingValue("consumer_secret"))?,
                );
                let access = KeyPair::new(
                    creds
                        .oauth_token
                        .clone()
                        .ok_or(Error::MissingValue("oauth_token"))?,
                    creds
                        .oauth_token_secret
                        .clone()
                        .ok_or(Error::MissingValue("oauth_token_secret"))?,
                );
                Ok(Token::Access { consumer, access })
            }
            RecordKind::OAuth2 | RecordKind::Bearer => Ok(Token::Bearer(
                self.credentials
                    .bearer
                    .clone()
                    .ok_or(Error::MissingValue("bearer"))?,
            )),
            RecordKind::Unknown => Err(Error::MissingCredentials),
        }
    }
}

/// `TokenRecord::is_usable`, lifted over an optional record: an absent credential is never
/// usable.
pub fn usable(record: Option<&TokenRecord>) -> bool {
    record.map_or(false, TokenRecord::is_usable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth1_record(request: Option<&str>, oauth_token: Option<&str>) -> TokenRecord {
        TokenRecord {
            kind: RecordKind::OAuth1,
            app: None,
            endpoint: Some(Endpoint {
                request: request.map(str::to_string),
                authorize: None,
                access: None,
            }),
            credentials: Credentials {
                oauth_token: oauth_token.map(str::to_string),
                ..Credentials::default()
            },
        }
    }

    #[test]
    fn absent_record_is_not_usable() {
        assert!(!usable(None));
    }

    #[test]
    fn bearer_records_are_always_usable() {
        let record = TokenRecord::bearer(None, "AAAA");
        assert!(usable(Some(&record)));

        // even a bare one with no endpoint or key material
        let record = TokenRecord {
            kind: RecordKind::OAuth2,
            app: None,
            endpoint: None,
            credentials: Credentials::default(),
        };
        assert!(record.is_usable());
    }

    #[test]
    fn record_without_endpoint_or_token_is_not_usable() {
        let record = TokenRecord {
            kind: RecordKind::OAuth1,
            app: None,
            endpoint: None,
            credentials: Credentials::default(),
        };
        assert!(!record.is_usable());
    }

    #[test]
    fn request_url_domain_is_checked_case_insensitively() {
        assert!(oauth1_record(Some("https://API.Twitter.com/oauth/request_token"), None).is_usable());
        assert!(oauth1_record(Some("https://api.twitter.com/oauth/request_token"), None).is_usable());
        assert!(!oauth1_record(Some("https://example.com/oauth/request_token"), None).is_usable());
    }

    #[test]
    fn missing_request_url_falls_back_to_oauth_token() {
        assert!(oauth1_record(None, Some("12345-abcdef")).is_usable());
        assert!(!oauth1_record(None, None).is_usable());
    }

    #[test]
    fn unknown_kinds_are_rejected() {
        let json = r#"{"kind": "saml", "credentials": {"oauth_token": "x"}}"#;
        let record: TokenRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, RecordKind::Unknown);
        assert!(!record.is_usable());
    }

    #[test]
    fn created_records_satisfy_the_predicate_and_convert() {
        let consumer = KeyPair::new("ck", "cs");
        let access = KeyPair::new("at", "as");
        let record = TokenRecord::access(
            Some("my_app".to_string()),
            &consumer,
            &access,
            Some(123),
            Some("alice".to_string()),
        );
        assert!(record.is_usable());
        match record.token().unwrap() {
            Token::Access { consumer, access } => {
                assert_eq!(consumer.key, "ck");
                assert_eq!(access.secret, "as");
            }
            other => panic!("expected an access token, got {:?}", other),
        }
    }
}
