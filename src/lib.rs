// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A library for interacting with Twitter that remembers how you authenticated.
//!
//! Beyond signed request plumbing for a handful of API methods, the centerpiece of this library
//! is the credential *vault*: tokens created once are persisted to disk, found again by later
//! processes, and cached for the lifetime of the current one, so application code can ask for
//! "the stored token" instead of carrying key material around.
//!
//! # Getting Started
//!
//! Calls to Twitter are authenticated with a [`Token`]. If you already have the four keys from
//! your app's settings page, you can build one directly:
//!
//! [`Token`]: enum.Token.html
//!
//! ```rust,no_run
//! let consumer = roost::KeyPair::new("consumer key", "consumer secret");
//! let access = roost::KeyPair::new("access token", "access token secret");
//! let token = roost::Token::Access { consumer, access };
//! ```
//!
//! Every API function takes a `&Token` and returns a [`Response`] wrapping its output together
//! with the rate-limit headers of the call:
//!
//! [`Response`]: struct.Response.html
//!
//! ```rust,no_run
//! # use roost::Token;
//! # #[tokio::main]
//! # async fn main() {
//! # let token: Token = unimplemented!();
//! let rustlang = roost::user::show("rustlang", &token).await.unwrap();
//!
//! println!("{} (@{})", rustlang.response.name, rustlang.response.screen_name);
//! # }
//! ```
//!
//! # Authentication
//!
//! Most applications should not construct a `Token` by hand on every run. Instead, authorize
//! once and let the vault do the bookkeeping:
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> roost::error::Result<()> {
//! // first run: walks the user through authorizing the app, then saves the
//! // result to a token file and records its location in TWITTER_PAT
//! let record = roost::create_token("my_app", "consumer key", "consumer secret", true).await?;
//!
//! // every later run (and every later process): found without interaction
//! let record = roost::stored_token()?;
//! let token = record.token()?;
//!
//! let me = roost::verify_tokens(&token).await?;
//! println!("signed in as @{}", me.response.screen_name);
//! # Ok(())
//! # }
//! ```
//!
//! [`stored_tokens`] resolves credentials from, in order: the in-process stash, the token file
//! paths listed in the `TWITTER_PAT` environment variable (also read from `~/.twitter-env`),
//! and the in-process registry of named records. See the [`vault`] module docs for the fine
//! print, including [`sign_token`] for the non-interactive path and [`verify_home_account`]
//! for checking that a stored token belongs to the account the process expects to run as.
//!
//! [`stored_tokens`]: fn.stored_tokens.html
//! [`sign_token`]: fn.sign_token.html
//! [`verify_home_account`]: fn.verify_home_account.html
//! [`vault`]: vault/index.html
//!
//! To perform app-only calls, exchange your consumer keys for a [`Bearer`] token with
//! [`bearer_token`]; bearer credentials are not bound to any account, and the vault accepts
//! them unconditionally.
//!
//! [`Bearer`]: enum.Token.html#variant.Bearer
//! [`bearer_token`]: fn.bearer_token.html

mod auth;
mod common;
pub mod error;
mod links;
pub mod raw;
pub mod tweet;
pub mod user;
pub mod vault;

pub use crate::auth::{
    access_token, authenticate_url, authorize_url, bearer_token, request_token, verify_tokens,
    KeyPair, Token,
};
pub use crate::common::Response;
pub use crate::vault::{
    create_token, home_user, sign_token, stored_token, stored_tokens, use_token,
    verify_home_account,
};
