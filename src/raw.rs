// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Raw access to the request- and response-building primitives used internally by this library.
//!
//! The functions and types exposed here allow you to call Twitter API methods that aren't
//! wrapped by this library, or to pass parameters the wrappers don't use. In return, more
//! knowledge of the Twitter API is required to use them effectively.
//!
//! Build a `ParamList` with the parameters listed on the API reference page for the endpoint
//! you want, hand it with a `Token` to `request_get`/`request_post` to receive a signed
//! `hyper` request, then execute it with one of the `response_*` functions depending on how
//! much processing you want done for you: `response_raw_bytes` gives back the headers and body
//! after checking for error payloads, while `response_json` also deserializes the body into a
//! target type alongside the rate-limit information.

pub use crate::common::Headers;
pub use crate::common::ParamList;

pub use crate::auth::get as request_get;
pub use crate::auth::post as request_post;

pub use crate::common::raw_request as response_raw_bytes;
pub use crate::common::request_with_json_response as response_json;
