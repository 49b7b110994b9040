// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading and writing token files, and recording where they were put.
//!
//! Token files are plain JSON: a single bare [`TokenRecord`] for a normal file, a JSON array
//! when several credentials were resolved together, or a map of name → record for "bundle"
//! files written by other tooling. The path of the most recently persisted file is recorded in
//! the `TWITTER_PAT` environment variable, and appended as a `KEY=VALUE` line to the
//! `~/.twitter-env` file so that future processes find it without any shell profile setup.
//!
//! [`TokenRecord`]: struct.TokenRecord.html

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::vault::record::TokenRecord;

/// The environment variable holding the list of places to look for saved credentials.
pub const PAT_ENV_VAR: &str = "TWITTER_PAT";

/// The per-user env file that `TWITTER_PAT` is persisted to, under the home directory.
pub const ENV_FILE: &str = ".twitter-env";

/// The file name that token files get by default, under the home directory.
pub const DEFAULT_TOKEN_FILE: &str = ".twitter_token.json";

/// The conventional dotfile name probed for directly during resolution.
pub const OAUTH_DOTFILE: &str = ".twitter-oauth";

/// Returns a path that does not collide with any file already in the target directory.
///
/// If nothing exists at `path` it is returned unchanged. Otherwise candidate names are generated
/// by inserting a numeric suffix immediately before the extension (`token.json` → `token1.json`,
/// `token2.json`, …) and checked against the directory listing, hidden files included; the first
/// free candidate wins. A file name whose tail doesn't look like `name.ext` (ASCII alphanumerics,
/// then a dot, then ASCII letters) has no insertion point, so the suffix goes at the very end
/// (`token` → `token1`).
///
/// Gives up with `AlreadyExists` after 1000 taken candidates.
pub fn unique_path(path: &Path) -> io::Result<PathBuf> {
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // non-UTF-8 names are dropped here; they can't collide with the generated candidates
    let taken: HashSet<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

    lazy_static::lazy_static! {
        static ref TAIL: regex::Regex = regex::Regex::new(r"[0-9A-Za-z]+\.[A-Za-z]+$").unwrap();
    }

    let (stem, ext) = if TAIL.is_match(name) {
        let dot = name.rfind('.').unwrap();
        (&name[..dot], Some(&name[dot + 1..]))
    } else {
        (name, None)
    };

    for n in 1..=1000u32 {
        let candidate = match ext {
            Some(ext) => format!("{}{}.{}", stem, n, ext),
            None => format!("{}{}", stem, n),
        };
        if !taken.contains(&candidate) {
            return Ok(dir.join(candidate));
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name next to {} after 1000 candidates", path.display()),
    ))
}

/// Writes the given records to a token file, failing loudly rather than leaving a partial file
/// silently behind.
///
/// A single record is written bare; several are written as a JSON array.
pub fn save(records: &[TokenRecord], path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    match records {
        [single] => serde_json::to_writer_pretty(&mut file, single)?,
        many => serde_json::to_writer_pretty(&mut file, many)?,
    }
    file.write_all(b"\n")?;
    Ok(())
}

/// Loads a token file holding either one bare record or an array of them.
pub fn load(path: &Path) -> Result<Vec<TokenRecord>> {
    let text = fs::read_to_string(path)?;
    if let Ok(single) = serde_json::from_str::<TokenRecord>(&text) {
        return Ok(vec![single]);
    }
    Ok(serde_json::from_str::<Vec<TokenRecord>>(&text)?)
}

/// Loads a "bundle" file: a map of name → record. Entries that don't parse as records are
/// dropped rather than failing the whole load.
pub fn load_bundle(path: &Path) -> Result<Vec<(String, TokenRecord)>> {
    let text = fs::read_to_string(path)?;
    let objects: BTreeMap<String, serde_json::Value> = serde_json::from_str(&text)?;
    Ok(objects
        .into_iter()
        .filter_map(|(name, value)| {
            serde_json::from_value::<TokenRecord>(value)
                .ok()
                .map(|record| (name, record))
        })
        .collect())
}

/// The default location a newly created token is persisted to, before collision avoidance.
pub fn default_token_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(DEFAULT_TOKEN_FILE),
        None => PathBuf::from(DEFAULT_TOKEN_FILE),
    }
}

fn env_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(ENV_FILE))
}

/// Records the given token file path as the value of `TWITTER_PAT`: in this process's
/// environment (overwriting any prior value), and appended to `~/.twitter-env` for future
/// processes.
pub fn record_env_path(path: &Path) -> Result<()> {
    std::env::set_var(PAT_ENV_VAR, path);
    if let Some(env_file) = env_file_path() {
        append_env_line(&env_file, PAT_ENV_VAR, &path.to_string_lossy())?;
    }
    Ok(())
}

/// Appends a `KEY=VALUE` line to the given env file, creating it if needed.
fn append_env_line(file: &Path, key: &str, value: &str) -> io::Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(file)?;
    writeln!(f, "{}={}", key, value)
}

/// The current `TWITTER_PAT` value: the process environment wins, else the last matching line
/// of `~/.twitter-env`.
pub fn env_paths() -> Option<String> {
    match std::env::var(PAT_ENV_VAR) {
        Ok(val) if !val.is_empty() => Some(val),
        _ => env_file_path().and_then(|file| env_file_value(&file, PAT_ENV_VAR)),
    }
}

/// Scans a `KEY=VALUE` env file for the last value assigned to `key`.
fn env_file_value(file: &Path, key: &str) -> Option<String> {
    let text = fs::read_to_string(file).ok()?;
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            let (k, v) = line.split_once('=')?;
            if k.trim() == key {
                Some(v.trim().to_string())
            } else {
                None
            }
        })
        .filter(|v| !v.is_empty())
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::KeyPair;
    use crate::vault::record::TokenRecord;

    fn sample_record(screen_name: &str) -> TokenRecord {
        TokenRecord::access(
            Some("test_app".to_string()),
            &KeyPair::new("ck", "cs"),
            &KeyPair::new("at", "as"),
            Some(42),
            Some(screen_name.to_string()),
        )
    }

    #[test]
    fn unique_path_leaves_missing_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("token.json");
        assert_eq!(unique_path(&target).unwrap(), target);
    }

    #[test]
    fn unique_path_inserts_suffix_before_extension() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("token.rds");
        fs::write(&target, b"x").unwrap();
        assert_eq!(unique_path(&target).unwrap(), dir.path().join("token1.rds"));
    }

    #[test]
    fn unique_path_skips_taken_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("token.rds");
        fs::write(&target, b"x").unwrap();
        fs::write(dir.path().join("token1.rds"), b"x").unwrap();
        fs::write(dir.path().join("token2.rds"), b"x").unwrap();
        assert_eq!(unique_path(&target).unwrap(), dir.path().join("token3.rds"));
    }

    #[test]
    fn unique_path_appends_when_extensionless() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("token");
        fs::write(&target, b"x").unwrap();
        assert_eq!(unique_path(&target).unwrap(), dir.path().join("token1"));
    }

    #[test]
    fn odd_tails_count_as_extensionless() {
        let dir = tempfile::tempdir().unwrap();
        // a tail like ".json" alone (no stem characters) is not a name.ext pattern
        let target = dir.path().join(".json");
        fs::write(&target, b"x").unwrap();
        assert_eq!(unique_path(&target).unwrap(), dir.path().join(".json1"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let record = sample_record("alice");
        save(std::slice::from_ref(&record), &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, vec![record]);
        assert!(loaded[0].is_usable());
    }

    #[test]
    fn save_several_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let records = vec![sample_record("alice"), sample_record("bob")];
        save(&records, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].screen_name(), Some("alice"));
        assert_eq!(loaded[1].screen_name(), Some("bob"));
    }

    #[test]
    fn bundles_keep_parseable_entries_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let record = sample_record("alice");
        let text = format!(
            r#"{{"my_token": {}, "unrelated": {{"some": "object"}}, "числа": [1, 2]}}"#,
            serde_json::to_string(&record).unwrap()
        );
        fs::write(&path, text).unwrap();

        let loaded = load_bundle(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, "my_token");
        assert_eq!(loaded[0].1, record);
    }

    #[test]
    fn env_file_last_assignment_wins() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(ENV_FILE);
        append_env_line(&file, "TWITTER_PAT", "/old/token.json").unwrap();
        append_env_line(&file, "OTHER", "x").unwrap();
        append_env_line(&file, "TWITTER_PAT", "/new/token.json").unwrap();

        assert_eq!(
            env_file_value(&file, "TWITTER_PAT"),
            Some("/new/token.json".to_string())
        );
        assert_eq!(env_file_value(&file, "MISSING"), None);
    }
}
