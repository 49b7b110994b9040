// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::common::*;
use crate::error::Result;
use crate::{auth, links};

use super::*;

/// Look up profile information for a single user.
///
/// ## Example
///
/// ```rust,no_run
/// # use roost::Token;
/// # #[tokio::main]
/// # async fn main() {
/// # let token: Token = unimplemented!();
/// let rustlang = roost::user::show("rustlang", &token).await.unwrap();
///
/// println!("{} (@{})", rustlang.response.name, rustlang.response.screen_name);
/// # }
/// ```
pub async fn show<T: Into<UserID>>(acct: T, token: &auth::Token) -> Result<Response<TwitterUser>> {
    let params = ParamList::new()
        .add_param("include_entities", "false")
        .add_user_param(acct.into());

    let req = get(links::users::SHOW, token, Some(&params));

    request_with_json_response(req).await
}

/// Look up profile information for several Twitter users.
///
/// This function can be called with IDs, screen names, or a mix of both (via `UserID` directly):
///
/// ```rust,no_run
/// # use roost::Token;
/// # #[tokio::main]
/// # async fn main() {
/// # let token: Token = unimplemented!();
/// let mut list: Vec<roost::user::UserID> = Vec::new();
///
/// list.push(1234.into());
/// list.push("rustlang".into());
///
/// let users = roost::user::lookup(list, &token).await.unwrap();
/// # }
/// ```
///
/// Note that while a single call can resolve up to 100 users, Twitter does not guarantee the
/// order of the response matches the order of the request.
pub async fn lookup<T, I>(accts: I, token: &auth::Token) -> Result<Response<Vec<TwitterUser>>>
where
    T: Into<UserID>,
    I: IntoIterator<Item = T>,
{
    let (id_param, name_param) = multiple_names_param(accts);
    let params = ParamList::new()
        .add_param("user_id", id_param)
        .add_param("screen_name", name_param);

    let req = post(links::users::LOOKUP, token, Some(&params));

    request_with_json_response(req).await
}

/// Look up the relationship between the two given accounts, from each one's perspective.
pub async fn relation<F, T>(from: F, to: T, token: &auth::Token) -> Result<Response<Relationship>>
where
    F: Into<UserID>,
    T: Into<UserID>,
{
    let mut params = ParamList::new();
    match from.into() {
        UserID::ID(id) => params.add_param_ref("source_id", id.to_string()),
        UserID::ScreenName(name) => params.add_param_ref("source_screen_name", name),
    }
    match to.into() {
        UserID::ID(id) => params.add_param_ref("target_id", id.to_string()),
        UserID::ScreenName(name) => params.add_param_ref("target_screen_name", name),
    }

    let req = get(links::users::FRIENDSHIP_SHOW, token, Some(&params));

    // the response nests the relationship under a wrapper key
    #[derive(serde::Deserialize)]
    struct Wrapper {
        relationship: Relationship,
    }

    let wrapped: Response<Wrapper> = request_with_json_response(req).await?;
    Ok(wrapped.map(|w| w.relationship))
}

/// Look up how the authenticated user is connected to each of the given accounts.
pub async fn relation_lookup<T, I>(
    accts: I,
    token: &auth::Token,
) -> Result<Response<Vec<RelationLookup>>>
where
    T: Into<UserID>,
    I: IntoIterator<Item = T>,
{
    let (id_param, name_param) = multiple_names_param(accts);
    let params = ParamList::new()
        .add_param("user_id", id_param)
        .add_param("screen_name", name_param);

    let req = get(links::users::FRIENDSHIP_LOOKUP, token, Some(&params));

    request_with_json_response(req).await
}
