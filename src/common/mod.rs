// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Set of structs and methods that act as a sort of internal prelude.
//!
//! Everything in here is a basic building block that the rest of the library glob-imports as a
//! common language: the `ParamList` used to assemble API call parameters, the percent-encoder
//! that matches Twitter's signing rules, the `Response` wrapper with rate-limit information, and
//! a couple of serde glue functions for formats Twitter always uses.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::TimeZone;
use hyper::header::{HeaderMap, HeaderValue};
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode};
use serde::de::Error;
use serde::{Deserialize, Deserializer};

mod response;

pub use crate::auth::{get, post};
pub use crate::common::response::*;

use crate::user;

/// A set of headers returned with a response.
pub type Headers = HeaderMap<HeaderValue>;
pub type CowStr = Cow<'static, str>;

/// Represents a list of parameters to a Twitter API call.
///
/// This type wraps a `HashMap<Cow<'static, str>, Cow<'static, str>>` collecting the key/value
/// pairs that are used both to assemble a request and to sign it. The `Cow` keeps string
/// literals allocation-free; every function that adds a parameter takes
/// `impl Into<Cow<'static, str>>` so either a literal or an owned `String` works.
///
/// The adders follow a builder pattern, so a `ParamList` can be assembled in one statement:
///
/// ```
/// use roost::raw::ParamList;
///
/// let params = ParamList::new()
///     .add_param("screen_name", "rustlang")
///     .add_opt_param("include_entities", Some("false"));
/// ```
#[derive(Debug, Clone, Default, derive_more::Deref, derive_more::DerefMut, derive_more::From)]
pub struct ParamList(HashMap<Cow<'static, str>, Cow<'static, str>>);

impl ParamList {
    /// Creates a new, empty `ParamList`.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Adds the given key/value parameter to this `ParamList`.
    pub fn add_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    /// Adds the given key/value parameter to this `ParamList` only if the given value is `Some`.
    pub fn add_opt_param(
        self,
        key: impl Into<Cow<'static, str>>,
        value: Option<impl Into<Cow<'static, str>>>,
    ) -> Self {
        match value {
            Some(val) => self.add_param(key.into(), val.into()),
            None => self,
        }
    }

    /// Adds the given key/value to this `ParamList` by mutating it in place, rather than
    /// consuming it as in `add_param`.
    pub fn add_param_ref(
        &mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) {
        self.0.insert(key.into(), value.into());
    }

    /// Adds the given `UserID` as a parameter to this `ParamList` by adding either a `user_id` or
    /// `screen_name` parameter as appropriate.
    pub fn add_user_param(self, id: user::UserID) -> Self {
        match id {
            user::UserID::ID(id) => self.add_param("user_id", id.to_string()),
            user::UserID::ScreenName(name) => self.add_param("screen_name", name),
        }
    }

    /// Merge the parameters from the given `ParamList` into this one.
    pub(crate) fn combine(&mut self, other: ParamList) {
        self.0.extend(other.0);
    }

    /// Renders this `ParamList` as an `application/x-www-form-urlencoded` string.
    pub fn to_urlencoded(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Splits a set of user references into a comma-separated ID list and a comma-separated screen
/// name list, the two parameters Twitter accepts on bulk lookup calls.
pub fn multiple_names_param<T, I>(accts: I) -> (String, String)
where
    T: Into<user::UserID>,
    I: IntoIterator<Item = T>,
{
    let mut ids = Vec::new();
    let mut names = Vec::new();

    for x in accts {
        match x.into() {
            user::UserID::ID(id) => ids.push(id.to_string()),
            user::UserID::ScreenName(name) => names.push(name.into_owned()),
        }
    }

    (ids.join(","), names.join(","))
}

pub fn deserialize_datetime<'de, D>(ser: D) -> Result<chrono::DateTime<chrono::Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(ser)?;
    let date = (chrono::Utc)
        .datetime_from_str(&s, "%a %b %d %T %z %Y")
        .map_err(|e| D::Error::custom(e))?;
    Ok(date)
}

/// Percent-encodes the given string based on the Twitter API specification.
///
/// Twitter bases its encoding scheme on RFC 3986, Section 2.1: every *byte* that is not an ASCII
/// number or letter, or one of `-`, `.`, `_`, `~`, must be replaced with a percent sign and the
/// byte value in hexadecimal.
pub fn percent_encode(src: &str) -> PercentEncode {
    lazy_static::lazy_static! {
        static ref ENCODER: AsciiSet = percent_encoding::NON_ALPHANUMERIC
            .remove(b'-')
            .remove(b'.')
            .remove(b'_')
            .remove(b'~');
    }
    utf8_percent_encode(src, &*ENCODER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_encode_matches_twitter_rules() {
        assert_eq!(
            percent_encode("Ladies + Gentlemen").to_string(),
            "Ladies%20%2B%20Gentlemen"
        );
        assert_eq!(percent_encode("Dogs, Cats & Mice").to_string(), "Dogs%2C%20Cats%20%26%20Mice");
        assert_eq!(percent_encode("safe-._~chars").to_string(), "safe-._~chars");
    }

    #[test]
    fn urlencoded_params_are_all_present() {
        let params = ParamList::new()
            .add_param("id", "123")
            .add_param("text", "a b");
        let encoded = params.to_urlencoded();
        assert!(encoded.contains("id=123"));
        assert!(encoded.contains("text=a%20b"));
    }
}
