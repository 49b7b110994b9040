// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Searching named credential sources.
//!
//! Caller environments are uncurated: a process may have registered several token-like entries
//! under whatever names its author picked, and a `TWITTER_PAT` entry may point at a bare token
//! file, a bundle, or nothing at all. This module owns the rules for picking a credential out of
//! that mess: an ordered, explicitly-registered [`Namespace`] of named records searched with a
//! two-tier (exact-then-loose) name match, and a per-path probe chain where every failed load is
//! swallowed and the next strategy tried.
//!
//! [`Namespace`]: struct.Namespace.html

use std::path::Path;
use std::sync::Mutex;

use lazy_static::lazy_static;

use crate::vault::record::TokenRecord;
use crate::vault::store;

/// The names that win a lookup outright, in preference order.
const PREFERRED_NAMES: [&str; 4] = ["twitter_tokens", "twitter_token", "tokens", "token"];

/// An ordered set of named credential slots.
///
/// This is the explicit stand-in for "whatever token-shaped variables the caller has lying
/// around": applications register their records under a name, and the resolver searches the
/// registered set by the preference rules described on [`find`]. Inserting under an existing
/// name replaces that entry in place.
///
/// [`find`]: #method.find
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    entries: Vec<(String, TokenRecord)>,
}

impl Namespace {
    /// Creates an empty `Namespace`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record under the given name, replacing any record already there.
    pub fn insert(&mut self, name: impl Into<String>, record: TokenRecord) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = record,
            None => self.entries.push((name, record)),
        }
    }

    /// Removes the record registered under the given name, if any.
    pub fn remove(&mut self, name: &str) -> Option<TokenRecord> {
        let at = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(at).1)
    }

    /// Looks up a record by its exact name.
    pub fn get(&self, name: &str) -> Option<&TokenRecord> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, record)| record)
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Searches the registered names for a credential.
    ///
    /// The canonical names `twitter_tokens`, `twitter_token`, `tokens`, `token` win outright, in
    /// that order. Failing those, any name that merely *contains* "token" (case-insensitively)
    /// is considered: a sole such match is used as-is, while several are tie-broken by the
    /// preferred-name list again — and otherwise the search comes up empty, since there is no
    /// sound way to pick between loosely-named candidates.
    pub fn find(&self) -> Option<TokenRecord> {
        for name in &PREFERRED_NAMES {
            if let Some(record) = self.get(name) {
                return Some(record.clone());
            }
        }

        let loose: Vec<&str> = self
            .entries
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| name.to_lowercase().contains("token"))
            .collect();

        match loose.as_slice() {
            [] => None,
            [only] => self.get(only).cloned(),
            _ => {
                for name in &["twitter_tokens", "twitter_tokens", "tokens", "token"] {
                    if loose.contains(name) {
                        return self.get(name).cloned();
                    }
                }
                None
            }
        }
    }
}

lazy_static! {
    /// The process-wide `Namespace` backing `vault::register` and the resolver's in-memory tier.
    static ref REGISTRY: Mutex<Namespace> = Mutex::new(Namespace::new());
}

/// Registers a record in the process-wide namespace, where the resolver can find it.
pub fn register(name: impl Into<String>, record: TokenRecord) {
    REGISTRY.lock().unwrap().insert(name, record);
}

/// Snapshots the process-wide namespace.
pub(crate) fn registered() -> Namespace {
    REGISTRY.lock().unwrap().clone()
}

/// Probes one source entry for credentials.
///
/// Strategies, in order, each trying the next on any failure:
///
/// 1. the conventional dotfile, loaded as a bare record;
/// 2. a recognized token-file extension, loaded as a bare record or an array of them;
/// 3. any readable file treated as a name → record bundle, taking the first usable entry;
/// 4. the given namespace, searched by name preference.
///
/// Load and parse errors never escape; they just mean "not this strategy". Only usable records
/// (per the credential predicate) count as found.
pub(crate) fn probe(entry: &str, ns: &Namespace) -> Option<Vec<TokenRecord>> {
    let path = Path::new(entry);

    if path.file_name().map_or(false, |n| n == store::OAUTH_DOTFILE) {
        if let Some(found) = usable_records(store::load(path).ok()) {
            return Some(found);
        }
    }

    if path.extension().map_or(false, |ext| ext == "json") {
        if let Some(found) = usable_records(store::load(path).ok()) {
            return Some(found);
        }
    }

    if let Ok(bundle) = store::load_bundle(path) {
        if let Some(record) = bundle.into_iter().map(|(_, r)| r).find(TokenRecord::is_usable) {
            return Some(vec![record]);
        }
    }

    ns.find().map(|record| vec![record])
}

fn usable_records(loaded: Option<Vec<TokenRecord>>) -> Option<Vec<TokenRecord>> {
    let found: Vec<TokenRecord> = loaded?
        .into_iter()
        .filter(TokenRecord::is_usable)
        .collect();
    if found.is_empty() {
        None
    } else {
        Some(found)
    }
}

/// Whether the given path leads to a usable stored credential, by any probe strategy —
/// including, as a last resort, the process-wide namespace.
pub fn is_credential_file(path: impl AsRef<Path>) -> bool {
    probe(&path.as_ref().to_string_lossy(), &registered()).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::KeyPair;
    use crate::vault::record::TokenRecord;

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
    fn canonical_names_win_in_preference_order() {
        let mut ns = Namespace::new();
        ns.insert("token", record("from_token"));
        ns.insert("twitter_tokens", record("from_twitter_tokens"));

        let found = ns.find().unwrap();
        assert_eq!(found.screen_name(), Some("from_twitter_tokens"));

        ns.remove("twitter_tokens");
        let found = ns.find().unwrap();
        assert_eq!(found.screen_name(), Some("from_token"));
    }

    #[test]
    fn singular_canonical_name_beats_plain_tokens() {
        let mut ns = Namespace::new();
        ns.insert("tokens", record("from_tokens"));
        ns.insert("twitter_token", record("from_twitter_token"));

        let found = ns.find().unwrap();
        assert_eq!(found.screen_name(), Some("from_twitter_token"));
    }

    #[test]
    fn a_sole_loose_match_is_used() {
        let mut ns = Namespace::new();
        ns.insert("my_Token_thing", record("loose"));
        ns.insert("unrelated", record("nope"));

        let found = ns.find().unwrap();
        assert_eq!(found.screen_name(), Some("loose"));
    }

    #[test]
    fn ambiguous_loose_matches_resolve_to_nothing() {
        let mut ns = Namespace::new();
        ns.insert("mytoken", record("one"));
        ns.insert("othertoken", record("two"));

        assert!(ns.find().is_none());
    }

    #[test]
    fn empty_namespace_finds_nothing() {
        assert!(Namespace::new().find().is_none());
    }

    #[test]
    fn probe_loads_a_json_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        store::save(&[record("alice")], &path).unwrap();

        let found = probe(&path.to_string_lossy(), &Namespace::new()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].screen_name(), Some("alice"));
    }

    #[test]
    fn probe_loads_the_conventional_dotfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(store::OAUTH_DOTFILE);
        store::save(&[record("alice")], &path).unwrap();

        assert!(probe(&path.to_string_lossy(), &Namespace::new()).is_some());
    }

    #[test]
    fn probe_finds_a_usable_record_inside_a_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.dat");
        let text = format!(
            r#"{{"settings": {{"theme": "dark"}}, "my_token": {}}}"#,
            serde_json::to_string(&record("alice")).unwrap()
        );
        std::fs::write(&path, text).unwrap();

        let found = probe(&path.to_string_lossy(), &Namespace::new()).unwrap();
        assert_eq!(found[0].screen_name(), Some("alice"));
    }

    #[test]
    fn probe_swallows_garbage_files_and_falls_back_to_the_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, b"definitely not json").unwrap();

        let mut ns = Namespace::new();
        ns.insert("twitter_tokens", record("ambient"));

        let found = probe(&path.to_string_lossy(), &ns).unwrap();
        assert_eq!(found[0].screen_name(), Some("ambient"));

        assert!(probe(&path.to_string_lossy(), &Namespace::new()).is_none());
    }

    #[test]
    fn probe_rejects_unusable_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(
            &path,
            r#"{"kind": "oauth1", "credentials": {"screen_name": "alice"}}"#,
        )
        .unwrap();

        assert!(probe(&path.to_string_lossy(), &Namespace::new()).is_none());
    }
}
