// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A composite error type for errors that can occur while interacting with Twitter.
//!
//! Any action that crosses the network, touches the credential store, or parses a response can
//! fail in several ways, so the functions in this library all return `error::Result` with the
//! `Error` enum below as the error type. Failures that occur while *probing* for stored
//! credentials are deliberately not represented here: the vault swallows them and moves on to the
//! next source, and only an exhausted search surfaces as `MissingCredentials`.

use std::fmt;

use serde::Deserialize;

/// Convenient alias to a Result containing this module's `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents the types of errors that can occur when calling Twitter or resolving credentials.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The app consumer key or secret given to a token constructor was empty or contained
    /// characters other than ASCII letters and digits.
    #[error("Invalid app credentials: {0}")]
    InvalidAppCredentials(String),
    /// No usable credential could be found in the environment, on disk, or in the in-process
    /// registry.
    ///
    /// The message carried here points at the authentication guide; it is the only way a failed
    /// source search becomes visible to the caller.
    #[error("No stored Twitter credentials were found. Create one with `create_token` or \
             `sign_token`, or point TWITTER_PAT at a saved token file; see the authentication \
             guide at https://docs.rs/roost/#authentication")]
    MissingCredentials,
    /// The resolved token is bound to a different account than the one this process is
    /// configured to operate as.
    #[error("Stored token belongs to @{token}, but this process is configured for @{home}")]
    IdentityMismatch {
        /// The configured home account.
        home: String,
        /// The account the resolved token is bound to.
        token: String,
    },
    /// The response from Twitter was formatted incorrectly or in an unexpected manner.
    #[error("Invalid response received: {0}")]
    InvalidResponse(&'static str),
    /// The response from Twitter was missing an expected value.
    #[error("Value missing from response: {0}")]
    MissingValue(&'static str),
    /// The response from Twitter gave a response code that indicated an error.
    ///
    /// This variant is only returned when Twitter did not also include an error payload in the
    /// response body.
    #[error("Error status received: {0}")]
    BadStatus(hyper::StatusCode),
    /// The response from Twitter contained an error payload.
    #[error("Errors returned by Twitter: {0}")]
    TwitterError(TwitterErrors),
    /// The request was rate-limited; the enclosed value is the Unix timestamp when the current
    /// rate-limit window ends.
    #[error("Rate limit reached, hold until {0}")]
    RateLimit(i32),
    /// The network session experienced an error.
    #[error("Network error: {0}")]
    NetError(#[from] hyper::Error),
    /// An error occurred while reading or writing a file.
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    /// An error occurred while serializing or deserializing JSON.
    #[error("JSON deserialize error: {0}")]
    DeserializeError(#[from] serde_json::Error),
}

/// Represents a collection of errors returned from a Twitter API call.
///
/// This is returned as part of `Error::TwitterError` whenever Twitter has rejected a call.
#[derive(Debug, Deserialize)]
pub struct TwitterErrors {
    /// A collection of errors returned for the request.
    pub errors: Vec<TwitterErrorCode>,
}

impl fmt::Display for TwitterErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;

        for e in &self.errors {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
            first = false;
        }

        Ok(())
    }
}

/// Represents a specific error returned from a Twitter API call.
#[derive(Debug, Deserialize)]
pub struct TwitterErrorCode {
    /// The numeric error code. A list of possible codes can be found in the [API
    /// documentation][codes].
    ///
    /// [codes]: https://developer.twitter.com/en/docs/basics/response-codes
    pub code: i32,
    /// The message accompanying the error code.
    pub message: String,
}

impl fmt::Display for TwitterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}: {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_mismatch_names_both_accounts() {
        let err = Error::IdentityMismatch {
            home: "alice".to_string(),
            token: "bob".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("alice"));
        assert!(msg.contains("bob"));
    }

    #[test]
    fn missing_credentials_points_at_docs() {
        let msg = Error::MissingCredentials.to_string();
        assert!(msg.contains("authentication"));
        assert!(msg.contains("TWITTER_PAT"));
    }
}
