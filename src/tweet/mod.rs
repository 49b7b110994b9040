// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and methods for working with statuses ("tweets").
//!
//! The functions here cover direct status plumbing: loading a single tweet by ID, posting a new
//! one, and deleting one the authenticated user posted. They all need a `Token`, which the
//! `vault` module resolves from storage.

use serde::Deserialize;

use crate::common::*;
use crate::error::Result;
use crate::{auth, links, user};

/// Represents a single status update.
#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    /// Numeric ID for this tweet.
    pub id: u64,
    /// The text of the tweet.
    #[serde(alias = "full_text")]
    pub text: String,
    /// UTC timestamp from when the tweet was posted.
    #[serde(deserialize_with = "deserialize_datetime")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// The user who posted this tweet. Absent when the tweet is embedded in a user's own
    /// profile record.
    pub user: Option<Box<user::TwitterUser>>,
    /// The screen name of the user this tweet replies to, if it is a reply.
    pub in_reply_to_screen_name: Option<String>,
    /// The number of times this tweet has been retweeted.
    #[serde(default)]
    pub retweet_count: i32,
    /// The number of times this tweet has been liked.
    #[serde(default)]
    pub favorite_count: i32,
    /// The language Twitter detected for the tweet body, if any.
    pub lang: Option<String>,
}

/// Look up a single tweet by its numeric ID.
pub async fn show(id: u64, token: &auth::Token) -> Result<Response<Tweet>> {
    let params = ParamList::new()
        .add_param("id", id.to_string())
        .add_param("tweet_mode", "extended");

    let req = get(links::statuses::SHOW, token, Some(&params));

    request_with_json_response(req).await
}

/// Post a new tweet as the authenticated user.
///
/// ## Example
///
/// ```rust,no_run
/// # use roost::Token;
/// # #[tokio::main]
/// # async fn main() {
/// # let token: Token = unimplemented!();
/// let posted = roost::tweet::update("hello from roost", &token).await.unwrap();
///
/// println!("posted as id {}", posted.response.id);
/// # }
/// ```
pub async fn update(text: impl Into<String>, token: &auth::Token) -> Result<Response<Tweet>> {
    let params = ParamList::new()
        .add_param("status", text.into())
        .add_param("tweet_mode", "extended");

    let req = post(links::statuses::UPDATE, token, Some(&params));

    request_with_json_response(req).await
}

/// Delete the given tweet. The authenticated user must be the one who posted it.
pub async fn delete(id: u64, token: &auth::Token) -> Result<Response<Tweet>> {
    let url = format!("{}/{}.json", links::statuses::DELETE_STEM, id);

    let req = post(&url, token, None);

    request_with_json_response(req).await
}
