// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Credential and session persistence
//!
//! A small file-backed key-value area: one JSON document maps usernames
//! to credential records, a second holds the single current session.
//! Every operation is one synchronous read or write of a whole file;
//! there are no multi-step transactions and no concurrent writers in
//! the intended deployment. Malformed JSON surfaces as a parse error
//! with context; no recovery is attempted.
//!
//! Passwords are stored as salted SHA-256 digests. Verification is an
//! exact digest comparison; records are never updated or deleted.

use anyhow::{Context, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const USERS_FILE: &str = "users.json";
const SESSION_FILE: &str = "session.json";

/// One registered user, keyed by username in the users file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub email: String,
}

/// The single authenticated-user record
///
/// At most one exists at a time; created on login or registration,
/// destroyed on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub email: String,
    pub authenticated: bool,
}

/// File-backed store for credentials and the current session
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn users_path(&self) -> PathBuf {
        self.dir.join(USERS_FILE)
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Read the full username -> credential map. A missing file is an
    /// empty map; a malformed file is an error.
    pub fn list_credentials(&self) -> Result<BTreeMap<String, CredentialRecord>> {
        read_json_or(&self.users_path(), BTreeMap::new)
    }

    /// Register a credential record. Returns `Ok(false)` without
    /// touching the store when the username is already taken.
    pub fn add_credential(&self, username: &str, password: &str, email: &str) -> Result<bool> {
        let mut users = self.list_credentials()?;
        if users.contains_key(username) {
            tracing::info!(username, "registration rejected: username taken");
            return Ok(false);
        }

        let salt = random_salt();
        let record = CredentialRecord {
            username: username.to_string(),
            password_hash: digest(&salt, password),
            salt,
            email: email.to_string(),
        };
        users.insert(username.to_string(), record);
        write_json(&self.users_path(), &users)?;

        tracing::info!(username, "credential registered");
        Ok(true)
    }

    pub fn find_credential(&self, username: &str) -> Result<Option<CredentialRecord>> {
        Ok(self.list_credentials()?.remove(username))
    }

    /// Check a username/password pair against the stored digest.
    pub fn verify_login(&self, username: &str, password: &str) -> Result<bool> {
        Ok(match self.find_credential(username)? {
            Some(record) => digest(&record.salt, password) == record.password_hash,
            None => false,
        })
    }

    /// Verify credentials and, on success, create and persist the
    /// session. Returns `Ok(None)` on bad credentials.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<Session>> {
        let record = match self.find_credential(username)? {
            Some(record) if digest(&record.salt, password) == record.password_hash => record,
            _ => {
                tracing::info!(username, "login failed");
                return Ok(None);
            }
        };

        let session = Session {
            username: record.username,
            email: record.email,
            authenticated: true,
        };
        self.set_session(&session)?;
        tracing::info!(username, "login succeeded");
        Ok(Some(session))
    }

    /// Register a new user and immediately open a session for them.
    /// Returns `Ok(None)` when the username is already taken.
    pub fn register(&self, username: &str, password: &str, email: &str) -> Result<Option<Session>> {
        if !self.add_credential(username, password, email)? {
            return Ok(None);
        }
        let session = Session {
            username: username.to_string(),
            email: email.to_string(),
            authenticated: true,
        };
        self.set_session(&session)?;
        Ok(Some(session))
    }

    pub fn get_session(&self) -> Result<Option<Session>> {
        read_json_or(&self.session_path(), || None)
    }

    pub fn set_session(&self, session: &Session) -> Result<()> {
        write_json(&self.session_path(), &Some(session.clone()))
    }

    /// Remove the current session. A no-op when none exists.
    pub fn clear_session(&self) -> Result<()> {
        match fs::remove_file(self.session_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("failed to clear session"),
        }
    }
}

fn read_json_or<T: serde::de::DeserializeOwned>(path: &Path, default: impl FnOnce() -> T) -> Result<T> {
    if !path.exists() {
        return Ok(default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("malformed JSON in {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn random_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
