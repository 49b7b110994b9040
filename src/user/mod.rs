// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and methods for pulling user information from Twitter.
//!
//! ## Types
//!
//! - `UserID`: used as a generic input to the functions here, this enum allows referring to a
//!   user either by numeric ID or by screen name.
//! - `TwitterUser`: the content of a user's profile.
//! - `Relationship`/`RelationSource`/`RelationTarget`: returned by `relation`, these show the
//!   ways two specific accounts relate to each other.
//! - `RelationLookup`/`Connection`: returned as a collection by `relation_lookup`, these show
//!   how the authenticated user relates to each of several accounts.
//!
//! ## Functions
//!
//! - `show`/`lookup` for profile information
//! - `relation`/`relation_lookup` for friendship information

use serde::Deserialize;

use crate::common::*;

mod fun;

pub use self::fun::*;

/// Convenience enum to generalize between referring to an account by numeric ID or by screen
/// name.
///
/// Twitter's API methods accept either a `user_id` or a `screen_name` parameter; functions in
/// this module take `impl Into<UserID>` so both `u64` IDs and string screen names can be given
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub enum UserID {
    /// Referring via the account's numeric ID.
    ID(u64),
    /// Referring via the account's screen name.
    ScreenName(CowStr),
}

impl From<u64> for UserID {
    fn from(id: u64) -> UserID {
        UserID::ID(id)
    }
}

impl From<&u64> for UserID {
    fn from(id: &u64) -> UserID {
        UserID::ID(*id)
    }
}

impl From<&str> for UserID {
    fn from(name: &str) -> UserID {
        UserID::ScreenName(name.to_string().into())
    }
}

impl From<String> for UserID {
    fn from(name: String) -> UserID {
        UserID::ScreenName(name.into())
    }
}

impl From<&String> for UserID {
    fn from(name: &String) -> UserID {
        UserID::ScreenName(name.clone().into())
    }
}

impl From<&UserID> for UserID {
    fn from(id: &UserID) -> UserID {
        id.clone()
    }
}

/// Represents a Twitter user's profile.
#[derive(Debug, Clone, Deserialize)]
pub struct TwitterUser {
    /// Numeric ID for this user.
    pub id: u64,
    /// Screen name of this user, used for mentions and in URLs.
    pub screen_name: String,
    /// Display name of this user.
    pub name: String,
    /// Indicates whether this user is a verified account.
    #[serde(default)]
    pub verified: bool,
    /// Indicates whether this user has chosen to protect their tweets.
    #[serde(default)]
    pub protected: bool,
    /// The user-defined string describing their account.
    pub description: Option<String>,
    /// The user-defined location for this account's profile.
    pub location: Option<String>,
    /// The user-defined URL for their profile.
    pub url: Option<String>,
    /// The number of tweets (including retweets) posted by this user.
    #[serde(default)]
    pub statuses_count: i32,
    /// The number of users this account follows.
    #[serde(default)]
    pub friends_count: i32,
    /// The number of followers this account has.
    #[serde(default)]
    pub followers_count: i32,
    /// The number of tweets this user has liked.
    #[serde(default)]
    pub favourites_count: i32,
    /// The UTC timestamp for when this user account was created.
    #[serde(deserialize_with = "deserialize_datetime")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Represents the relationship between two accounts, as returned by `relation`.
#[derive(Debug, Deserialize)]
pub struct Relationship {
    /// The "source" account's view of the relationship.
    pub source: RelationSource,
    /// The "target" account's view of the relationship.
    pub target: RelationTarget,
}

/// The source (perspective) account's side of a relationship lookup.
#[derive(Debug, Deserialize)]
pub struct RelationSource {
    /// Numeric ID of the source account.
    pub id: u64,
    /// Screen name of the source account.
    pub screen_name: String,
    /// Whether the source account follows the target.
    pub following: bool,
    /// Whether the target account follows the source.
    pub followed_by: bool,
    /// Whether the source account has muted the target. Absent unless the source is the
    /// authenticated user.
    pub muting: Option<bool>,
    /// Whether the source account has blocked the target. Absent unless the source is the
    /// authenticated user.
    pub blocking: Option<bool>,
    /// Whether the source account wants device notifications from the target. Absent unless the
    /// source is the authenticated user.
    pub notifications_enabled: Option<bool>,
}

/// The target account's side of a relationship lookup.
#[derive(Debug, Deserialize)]
pub struct RelationTarget {
    /// Numeric ID of the target account.
    pub id: u64,
    /// Screen name of the target account.
    pub screen_name: String,
    /// Whether the target account follows the source.
    pub following: bool,
    /// Whether the source account follows the target.
    pub followed_by: bool,
}

/// How the authenticated user relates to one specific account, as returned in a collection by
/// `relation_lookup`.
#[derive(Debug, Deserialize)]
pub struct RelationLookup {
    /// Display name of the account.
    pub name: String,
    /// Screen name of the account.
    pub screen_name: String,
    /// Numeric ID of the account.
    pub id: u64,
    /// The ways the authenticated user is connected to this account.
    pub connections: Vec<Connection>,
}

/// A single connection between the authenticated user and another account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connection {
    /// The authenticated user follows this account.
    Following,
    /// The authenticated user has requested to follow this (protected) account.
    FollowingRequested,
    /// This account follows the authenticated user.
    FollowedBy,
    /// The authenticated user has blocked this account.
    Blocking,
    /// The authenticated user has muted this account.
    Muting,
    /// No connection in either direction.
    None,
}
