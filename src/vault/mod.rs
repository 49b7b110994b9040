// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finding, creating, and holding on to stored credentials.
//!
//! Twitter API calls need a [`Token`], but nobody wants to thread one through every function of
//! an application, or re-authorize their app on every run. This module is the answer: it
//! resolves a usable credential once per process and keeps handing the same one back.
//!
//! [`stored_tokens`] is the entry point. Its search order:
//!
//! 1. the process-wide stash — a credential resolved earlier in this process (or injected
//!    directly with [`use_token`]) is returned as-is;
//! 2. the `TWITTER_PAT` environment variable (or its saved line in `~/.twitter-env`): a comma-
//!    or semicolon-delimited list of token file paths, each probed independently and the
//!    results concatenated in order. The literal entry `system` clears the variable and fails
//!    the search outright;
//! 3. the process-wide [`Namespace`] registry, where [`create_token`]/[`sign_token`] pre-stage
//!    the credentials they build and applications can [`register`] their own.
//!
//! When the search succeeds anywhere other than the environment tier, the result is persisted
//! to a fresh file under the home directory and `TWITTER_PAT` is pointed at it, so the next
//! process skips straight to tier 2. When the whole chain comes up empty the search fails with
//! an error pointing at the authentication guide; probing failures along the way (unreadable
//! files, junk content, unrecognized records) are silently treated as "keep looking".
//!
//! [`Token`]: ../enum.Token.html
//! [`Namespace`]: struct.Namespace.html
//! [`stored_tokens`]: fn.stored_tokens.html
//! [`use_token`]: fn.use_token.html
//! [`create_token`]: fn.create_token.html
//! [`sign_token`]: fn.sign_token.html
//! [`register`]: fn.register.html

use std::io::{self, Write};
use std::sync::Mutex;

use lazy_static::lazy_static;

use crate::auth::{self, KeyPair, Token};
use crate::error::{Error, Result};

pub mod locate;
pub mod record;
pub mod store;

pub use self::locate::{is_credential_file, register, Namespace};
pub use self::record::{usable, Credentials, Endpoint, RecordKind, TokenRecord};
pub use self::store::unique_path;

/// The environment variable naming the account this process operates as.
pub const SCREEN_NAME_ENV_VAR: &str = "TWITTER_SCREEN_NAME";

#[derive(Default)]
struct Stash {
    /// The resolved credential set for this process.
    tokens: Option<Vec<TokenRecord>>,
    /// A single directly-injected credential; seeds `tokens` on first read.
    token: Option<TokenRecord>,
}

impl Stash {
    fn resolved(&mut self) -> Option<Vec<TokenRecord>> {
        if self.tokens.is_none() {
            if let Some(single) = self.token.clone() {
                self.tokens = Some(vec![single]);
            }
        }
        self.tokens.clone()
    }
}

lazy_static! {
    static ref STASH: Mutex<Stash> = Mutex::new(Stash::default());
    static ref HOME_USER: Mutex<Option<String>> = Mutex::new(None);
}

/// Injects a credential directly into the process-wide stash, short-circuiting every other
/// source for the rest of the process.
pub fn use_token(record: TokenRecord) {
    STASH.lock().unwrap().token = Some(record);
}

/// Resolves the stored credentials for this process, searching the stash, the environment, and
/// the in-process registry in that order. See the [module docs](index.html) for the full rules.
///
/// The first successful resolution is cached for the lifetime of the process; later calls
/// return the same credentials without touching the environment or the disk again.
pub fn stored_tokens() -> Result<Vec<TokenRecord>> {
    if let Some(tokens) = STASH.lock().unwrap().resolved() {
        return Ok(tokens);
    }

    let env_list = store::env_paths();
    let tokens = resolve_sources(env_list.as_deref(), &locate::registered())?;

    if env_list.is_none() {
        persist_records(&tokens)?;
    }

    let mut stash = STASH.lock().unwrap();
    stash.tokens = Some(tokens.clone());
    Ok(tokens)
}

/// Resolves a single stored credential: the first entry of [`stored_tokens`].
///
/// [`stored_tokens`]: fn.stored_tokens.html
pub fn stored_token() -> Result<TokenRecord> {
    stored_tokens()?
        .into_iter()
        .next()
        .ok_or(Error::MissingCredentials)
}

/// The environment + registry tiers of the search, taking their inputs explicitly.
fn resolve_sources(env_list: Option<&str>, ns: &Namespace) -> Result<Vec<TokenRecord>> {
    if let Some(list) = env_list {
        let mut found = Vec::new();
        for entry in list.split(|c| c == ',' || c == ';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if entry == "system" {
                std::env::remove_var(store::PAT_ENV_VAR);
                return Err(Error::MissingCredentials);
            }
            if let Some(records) = locate::probe(entry, ns) {
                found.extend(records);
            }
        }
        if !found.is_empty() {
            return Ok(found);
        }
    }

    match ns.find() {
        Some(record) => Ok(vec![record]),
        None => Err(Error::MissingCredentials),
    }
}

/// Saves the given records to a fresh token file under the home directory and points
/// `TWITTER_PAT` at it.
fn persist_records(records: &[TokenRecord]) -> Result<()> {
    let path = store::unique_path(&store::default_token_path())?;
    store::save(records, &path)?;
    store::record_env_path(&path)
}

/// Strips whitespace out of an app key and checks what remains is non-empty ASCII
/// alphanumerics.
fn clean_app_key(label: &str, value: &str) -> Result<String> {
    let cleaned: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidAppCredentials(format!(
            "{} must be a non-empty alphanumeric string",
            label
        )));
    }
    Ok(cleaned)
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Creates an account-bound credential interactively, via the three-legged OAuth 1.0a exchange.
///
/// The consumer key and secret must be non-empty alphanumeric strings (whitespace is stripped
/// first); anything else fails with `Error::InvalidAppCredentials` before any network traffic.
/// The user is shown the authorization URL for the app and asked (on stdin) for the PIN Twitter
/// hands back after they approve it.
///
/// The finished credential is pre-staged in the process-wide registry, and — when `persist` is
/// true — saved to a fresh token file with `TWITTER_PAT` recorded to point at it, so future
/// processes resolve it without going through the exchange again.
pub async fn create_token(
    app: &str,
    consumer_key: &str,
    consumer_secret: &str,
    persist: bool,
) -> Result<TokenRecord> {
    let con_token = KeyPair::new(
        clean_app_key("consumer_key", consumer_key)?,
        clean_app_key("consumer_secret", consumer_secret)?,
    );

    let request = auth::request_token(&con_token, "oob").await?;
    println!(
        "Authorize the app by visiting:\n  {}",
        auth::authorize_url(&request)
    );
    let pin = prompt("Enter the PIN shown after authorizing: ")?;

    let (token, user_id, screen_name) = auth::access_token(con_token, &request, pin).await?;
    let record = match &token {
        Token::Access { consumer, access } => TokenRecord::access(
            Some(app.to_string()),
            consumer,
            access,
            Some(user_id),
            Some(screen_name),
        ),
        // the access-token exchange only ever yields an account-bound token
        Token::Bearer(_) => return Err(Error::InvalidResponse("bearer token from oauth exchange")),
    };

    finish_token(record, persist)
}

/// Creates an account-bound credential non-interactively, from an access token and secret
/// obtained elsewhere (for example, from the app's settings page).
///
/// The same key validation and persistence behavior as [`create_token`] applies; only the
/// browser round-trip is skipped.
///
/// [`create_token`]: fn.create_token.html
pub fn sign_token(
    app: &str,
    consumer_key: &str,
    consumer_secret: &str,
    access_token: &str,
    access_secret: &str,
    persist: bool,
) -> Result<TokenRecord> {
    let con_token = KeyPair::new(
        clean_app_key("consumer_key", consumer_key)?,
        clean_app_key("consumer_secret", consumer_secret)?,
    );
    let access = KeyPair::new(access_token.to_string(), access_secret.to_string());

    let record = TokenRecord::access(Some(app.to_string()), &con_token, &access, None, None);
    finish_token(record, persist)
}

fn finish_token(record: TokenRecord, persist: bool) -> Result<TokenRecord> {
    locate::register("twitter_tokens", record.clone());
    if persist {
        persist_records(std::slice::from_ref(&record))?;
    }
    Ok(record)
}

/// The screen name of the account this process is configured to operate as.
///
/// Read from `TWITTER_SCREEN_NAME` when set, asked for interactively otherwise, and cached for
/// the rest of the process either way.
pub fn home_user() -> Result<String> {
    if let Some(name) = HOME_USER.lock().unwrap().clone() {
        return Ok(name);
    }

    let name = match std::env::var(SCREEN_NAME_ENV_VAR) {
        Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            let answer = prompt("What account does this process run as? @")?;
            if answer.is_empty() {
                return Err(Error::MissingCredentials);
            }
            answer
        }
    };

    *HOME_USER.lock().unwrap() = Some(name.clone());
    Ok(name)
}

/// Checks that the resolved credential belongs to the configured home account.
///
/// Resolves the stored credential (unwrapping a single-element set) and requires it to be an
/// account-bound OAuth 1.0a record — anything else fails with `Error::MissingCredentials`.
/// Then the record's bound screen name is compared against [`home_user`]; a difference fails
/// with `Error::IdentityMismatch` naming both sides. Succeeding means requests made with the
/// stored credential act as the account this process expects them to.
///
/// [`home_user`]: fn.home_user.html
pub fn verify_home_account() -> Result<()> {
    let record = stored_token()?;
    if record.kind != RecordKind::OAuth1 {
        return Err(Error::MissingCredentials);
    }
    check_identity(&record, &home_user()?)
}

fn check_identity(record: &TokenRecord, home: &str) -> Result<()> {
    let bound = record.screen_name().unwrap_or("");
    if bound == home {
        Ok(())
    } else {
        Err(Error::IdentityMismatch {
            home: home.to_string(),
            token: bound.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(screen_name: &str) -> TokenRecord {
        TokenRecord::access(
            None,
            &KeyPair::new("ck", "cs"),
            &KeyPair::new("at", "as"),
            None,
            Some(screen_name.to_string()),
        )
    }

    #[test]
    fn app_keys_may_not_contain_symbols() {
        let err = clean_app_key("consumer_key", "abc 123!").unwrap_err();
        assert!(matches!(err, Error::InvalidAppCredentials(_)));
    }

    #[test]
    fn app_keys_have_whitespace_stripped() {
        assert_eq!(clean_app_key("consumer_key", " abc 123 ").unwrap(), "abc123");
    }

    #[test]
    fn empty_app_keys_are_rejected() {
        assert!(clean_app_key("consumer_secret", "   ").is_err());
        assert!(clean_app_key("consumer_secret", "").is_err());
    }

    #[test]
    fn sign_token_validates_before_building() {
        let err = sign_token("app", "abc 123!", "ok123", "at", "as", false).unwrap_err();
        assert!(matches!(err, Error::InvalidAppCredentials(_)));

        let record = sign_token("app", "ck123", "cs456", "at", "as", false).unwrap();
        assert!(record.is_usable());
        assert_eq!(record.kind, RecordKind::OAuth1);
    }

    #[test]
    fn resolving_nothing_reports_missing_credentials() {
        let err = resolve_sources(None, &Namespace::new()).unwrap_err();
        assert!(matches!(err, Error::MissingCredentials));
        assert!(err.to_string().contains("authentication"));
    }

    #[test]
    fn persisted_tokens_resolve_through_a_path_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        store::save(&[record("alice")], &path).unwrap();

        let resolved =
            resolve_sources(Some(&path.to_string_lossy()), &Namespace::new()).unwrap();
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].is_usable());
        assert_eq!(resolved[0].screen_name(), Some("alice"));
    }

    #[test]
    fn several_paths_concatenate_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        store::save(&[record("alice")], &first).unwrap();
        store::save(&[record("bob")], &second).unwrap();

        let list = format!("{};{}", first.display(), second.display());
        let resolved = resolve_sources(Some(&list), &Namespace::new()).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].screen_name(), Some("alice"));
        assert_eq!(resolved[1].screen_name(), Some("bob"));
    }

    #[test]
    fn unreadable_entries_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("token.json");
        store::save(&[record("alice")], &good).unwrap();
        let list = format!("{},{}", dir.path().join("missing.json").display(), good.display());

        let resolved = resolve_sources(Some(&list), &Namespace::new()).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].screen_name(), Some("alice"));
    }

    #[test]
    fn the_system_sentinel_fails_hard_and_clears_the_variable() {
        std::env::set_var(store::PAT_ENV_VAR, "system");
        let mut ns = Namespace::new();
        ns.insert("twitter_tokens", record("ambient"));

        let err = resolve_sources(Some("system"), &ns).unwrap_err();
        assert!(matches!(err, Error::MissingCredentials));
        assert!(std::env::var(store::PAT_ENV_VAR).is_err());
    }

    #[test]
    fn an_empty_path_list_falls_back_to_the_namespace() {
        let mut ns = Namespace::new();
        ns.insert("twitter_tokens", record("ambient"));

        let resolved = resolve_sources(Some(" ; "), &ns).unwrap();
        assert_eq!(resolved[0].screen_name(), Some("ambient"));
    }

    #[test]
    fn matching_identities_verify() {
        assert!(check_identity(&record("alice"), "alice").is_ok());
    }

    #[test]
    fn mismatched_identities_name_both_sides() {
        let err = check_identity(&record("bob"), "alice").unwrap_err();
        match err {
            Error::IdentityMismatch { home, token } => {
                assert_eq!(home, "alice");
                assert_eq!(token, "bob");
            }
            other => panic!("expected an identity mismatch, got {:?}", other),
        }
    }
}
