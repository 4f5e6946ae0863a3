//! # Administrator Credential Directory
//!
//! [`AdminDirectory`] owns the administrator accounts that may revoke
//! certificates. Passwords are never stored: each account keeps a
//! random 16-byte salt and the SHA-256 digest of salt ‖ password, and
//! authentication compares digests in constant time.
//!
//! The directory persists to a single JSON file (`admins.json`) with
//! the same rewrite-whole-file discipline as the certificate registry.
//! When the file is absent a default administrator is seeded so a fresh
//! deployment is immediately operable.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

use soulcert_core::{AdminId, ValidationError};

/// Seed credentials for a fresh deployment, matching the registry's
/// historical default account.
const DEFAULT_ADMIN_NAME: &str = "Global Admin";
const DEFAULT_ADMIN_ID: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "password123";

/// Error raised by admin directory operations.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Unknown administrator or wrong password. Deliberately does not
    /// say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this identifier already exists.
    #[error("administrator {0} already exists")]
    AlreadyExists(AdminId),

    /// No account with this identifier.
    #[error("administrator {0} not found")]
    NotFound(AdminId),

    /// An administrator attempted to remove their own account.
    #[error("administrators cannot remove themselves")]
    SelfRemoval,

    /// A required input was missing or empty.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The directory file could not be read.
    #[error("admin directory {path} could not be read: {source}")]
    Read {
        /// The directory file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The directory file does not parse.
    #[error("admin directory {path} is malformed: {source}")]
    Malformed {
        /// The directory file path.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The directory file could not be written. The triggering
    /// mutation has been rolled back.
    #[error("admin directory write to {path} failed: {source}")]
    Write {
        /// The directory file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// A stored administrator account. Holds hash material; never leaves
/// this module — callers see [`AdminProfile`].
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminAccount {
    name: String,
    admin_id: AdminId,
    /// Hex-encoded random salt.
    password_salt: String,
    /// Hex-encoded SHA-256 of salt bytes ‖ password bytes.
    password_hash: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("name", &self.name)
            .field("admin_id", &self.admin_id)
            .field("password_salt", &"[REDACTED]")
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// The public view of an administrator account — no hash material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    /// Display name.
    pub name: String,
    /// Login identifier.
    pub admin_id: AdminId,
}

impl From<&AdminAccount> for AdminProfile {
    fn from(account: &AdminAccount) -> Self {
        Self {
            name: account.name.clone(),
            admin_id: account.admin_id.clone(),
        }
    }
}

struct DirectoryInner {
    admins: Vec<AdminAccount>,
    path: Option<PathBuf>,
}

/// Thread-safe administrator directory, mirrored in memory and
/// persisted to a single JSON file.
#[derive(Clone)]
pub struct AdminDirectory {
    inner: Arc<RwLock<DirectoryInner>>,
}

impl AdminDirectory {
    /// An ephemeral directory seeded with the default administrator.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(DirectoryInner {
                admins: vec![seed_account()],
                path: None,
            })),
        }
    }

    /// Open a directory backed by the given file.
    ///
    /// Loads existing accounts, or seeds the default administrator and
    /// writes the file when it is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AdminError> {
        let path = path.into();
        let (admins, needs_seed_write) = if path.exists() {
            let data = std::fs::read_to_string(&path).map_err(|source| AdminError::Read {
                path: path.clone(),
                source,
            })?;
            let admins = serde_json::from_str::<Vec<AdminAccount>>(&data).map_err(|source| {
                AdminError::Malformed {
                    path: path.clone(),
                    source,
                }
            })?;
            (admins, false)
        } else {
            (vec![seed_account()], true)
        };
        tracing::info!(
            count = admins.len(),
            path = %path.display(),
            "loaded administrator directory"
        );
        let directory = Self {
            inner: Arc::new(RwLock::new(DirectoryInner {
                admins,
                path: Some(path),
            })),
        };
        if needs_seed_write {
            let inner = directory.inner.read();
            persist(&inner)?;
        }
        Ok(directory)
    }

    /// Check credentials. Returns the profile on success,
    /// [`AdminError::InvalidCredentials`] otherwise.
    ///
    /// The digest comparison is constant-time, and an unknown
    /// identifier still performs a comparison against a dummy account
    /// so the two rejection paths are not distinguishable by timing.
    pub fn authenticate(&self, admin_id: &str, password: &str) -> Result<AdminProfile, AdminError> {
        let inner = self.inner.read();
        let account = inner
            .admins
            .iter()
            .find(|a| a.admin_id.as_str() == admin_id.trim());
        match account {
            Some(account) => {
                if verify_password(account, password) {
                    Ok(AdminProfile::from(account))
                } else {
                    Err(AdminError::InvalidCredentials)
                }
            }
            None => {
                let dummy = seed_account();
                let _ = verify_password(&dummy, password);
                Err(AdminError::InvalidCredentials)
            }
        }
    }

    /// Add an administrator account.
    pub fn add_admin(
        &self,
        name: &str,
        admin_id: &str,
        password: &str,
    ) -> Result<AdminProfile, AdminError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "name" }.into());
        }
        if password.is_empty() {
            return Err(ValidationError::EmptyField { field: "password" }.into());
        }
        let admin_id = AdminId::new(admin_id)?;

        let mut inner = self.inner.write();
        if inner.admins.iter().any(|a| a.admin_id == admin_id) {
            return Err(AdminError::AlreadyExists(admin_id));
        }
        let account = new_account(name, admin_id, password);
        let profile = AdminProfile::from(&account);
        inner.admins.push(account);
        if let Err(e) = persist(&inner) {
            inner.admins.pop();
            return Err(e);
        }
        tracing::info!(admin_id = %profile.admin_id, "administrator added");
        Ok(profile)
    }

    /// Remove an administrator account. An account cannot remove
    /// itself, so the directory can never empty itself out.
    pub fn remove_admin(
        &self,
        target_admin_id: &str,
        requesting_admin_id: &str,
    ) -> Result<(), AdminError> {
        let target = AdminId::new(target_admin_id)?;
        if target.as_str() == requesting_admin_id.trim() {
            return Err(AdminError::SelfRemoval);
        }
        let mut inner = self.inner.write();
        let Some(pos) = inner.admins.iter().position(|a| a.admin_id == target) else {
            return Err(AdminError::NotFound(target));
        };
        let removed = inner.admins.remove(pos);
        if let Err(e) = persist(&inner) {
            inner.admins.insert(pos, removed);
            return Err(e);
        }
        tracing::info!(admin_id = %target, "administrator removed");
        Ok(())
    }

    /// All account profiles, without hash material.
    pub fn list(&self) -> Vec<AdminProfile> {
        self.inner.read().admins.iter().map(AdminProfile::from).collect()
    }

    /// Whether an account with this identifier exists.
    pub fn contains(&self, admin_id: &str) -> bool {
        self.inner
            .read()
            .admins
            .iter()
            .any(|a| a.admin_id.as_str() == admin_id.trim())
    }
}

impl std::fmt::Debug for AdminDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("AdminDirectory")
            .field("admins", &inner.admins.len())
            .field("path", &inner.path)
            .finish()
    }
}

/// Build an account with a fresh random salt.
fn new_account(name: &str, admin_id: AdminId, password: &str) -> AdminAccount {
    let salt: [u8; 16] = rand::random();
    let salt_hex: String = salt.iter().map(|b| format!("{b:02x}")).collect();
    let hash = salted_hash(&salt, password);
    AdminAccount {
        name: name.to_string(),
        admin_id,
        password_salt: salt_hex,
        password_hash: hash,
    }
}

/// The default account for fresh deployments.
fn seed_account() -> AdminAccount {
    let admin_id = AdminId::new(DEFAULT_ADMIN_ID).unwrap_or_else(|_| {
        // DEFAULT_ADMIN_ID is a non-empty literal; this cannot fail.
        unreachable!("default admin id is non-empty")
    });
    new_account(DEFAULT_ADMIN_NAME, admin_id, DEFAULT_ADMIN_PASSWORD)
}

/// Hex-encoded SHA-256 of salt ‖ password.
fn salted_hash(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Recompute the salted digest and compare in constant time.
fn verify_password(account: &AdminAccount, password: &str) -> bool {
    let Some(salt) = decode_hex(&account.password_salt) else {
        return false;
    };
    let recomputed = salted_hash(&salt, password);
    // Both sides are 64-char hex strings of SHA-256 output, so the
    // lengths always match and ct_eq sees fixed-size input.
    recomputed
        .as_bytes()
        .ct_eq(account.password_hash.as_bytes())
        .into()
}

/// Decode a lowercase hex string.
fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    s.as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let hi = hex_val(pair[0])?;
            let lo = hex_val(pair[1])?;
            Some((hi << 4) | lo)
        })
        .collect()
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

/// Rewrite the whole directory file from the in-memory accounts.
fn persist(inner: &DirectoryInner) -> Result<(), AdminError> {
    let Some(path) = &inner.path else {
        return Ok(());
    };
    let write_err = |source| AdminError::Write {
        path: path.clone(),
        source,
    };
    let json = serde_json::to_vec_pretty(&inner.admins).map_err(|e| AdminError::Write {
        path: path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);
    std::fs::write(&tmp, &json).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_admin_can_authenticate() {
        let directory = AdminDirectory::in_memory();
        let profile = directory.authenticate("admin", "password123").unwrap();
        assert_eq!(profile.admin_id, "admin");
        assert_eq!(profile.name, "Global Admin");
    }

    #[test]
    fn wrong_password_rejected() {
        let directory = AdminDirectory::in_memory();
        assert!(matches!(
            directory.authenticate("admin", "password124"),
            Err(AdminError::InvalidCredentials)
        ));
    }

    #[test]
    fn unknown_admin_rejected_with_same_error() {
        let directory = AdminDirectory::in_memory();
        assert!(matches!(
            directory.authenticate("ghost", "password123"),
            Err(AdminError::InvalidCredentials)
        ));
    }

    #[test]
    fn add_and_authenticate_new_admin() {
        let directory = AdminDirectory::in_memory();
        let profile = directory
            .add_admin("Second Admin", "admin2", "hunter22")
            .unwrap();
        assert_eq!(profile.admin_id, "admin2");
        assert!(directory.authenticate("admin2", "hunter22").is_ok());
        assert!(directory.authenticate("admin2", "hunter2").is_err());
    }

    #[test]
    fn duplicate_admin_rejected() {
        let directory = AdminDirectory::in_memory();
        assert!(matches!(
            directory.add_admin("Impostor", "admin", "whatever"),
            Err(AdminError::AlreadyExists(_))
        ));
    }

    #[test]
    fn add_admin_validates_fields() {
        let directory = AdminDirectory::in_memory();
        assert!(directory.add_admin("", "x", "pw").is_err());
        assert!(directory.add_admin("Name", "", "pw").is_err());
        assert!(directory.add_admin("Name", "x", "").is_err());
    }

    #[test]
    fn remove_admin() {
        let directory = AdminDirectory::in_memory();
        directory.add_admin("Second", "admin2", "pw").unwrap();
        directory.remove_admin("admin2", "admin").unwrap();
        assert!(!directory.contains("admin2"));
        assert!(matches!(
            directory.remove_admin("admin2", "admin"),
            Err(AdminError::NotFound(_))
        ));
    }

    #[test]
    fn self_removal_refused() {
        let directory = AdminDirectory::in_memory();
        assert!(matches!(
            directory.remove_admin("admin", "admin"),
            Err(AdminError::SelfRemoval)
        ));
        assert!(directory.contains("admin"));
    }

    #[test]
    fn list_never_exposes_hash_material() {
        let directory = AdminDirectory::in_memory();
        let json = serde_json::to_value(directory.list()).unwrap();
        let rendered = json.to_string();
        assert!(!rendered.contains("passwordHash"));
        assert!(!rendered.contains("passwordSalt"));
    }

    #[test]
    fn salts_differ_between_accounts() {
        let a = new_account("A", AdminId::new("a").unwrap(), "same-password");
        let b = new_account("B", AdminId::new("b").unwrap(), "same-password");
        assert_ne!(a.password_salt, b.password_salt);
        assert_ne!(a.password_hash, b.password_hash);
    }

    #[test]
    fn file_is_seeded_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admins.json");

        {
            let directory = AdminDirectory::open(&path).unwrap();
            directory.add_admin("Second", "admin2", "pw").unwrap();
        }
        assert!(path.exists());

        // No plaintext password in the file.
        let data = std::fs::read_to_string(&path).unwrap();
        assert!(!data.contains("password123"));
        assert!(data.contains("passwordHash"));

        let reloaded = AdminDirectory::open(&path).unwrap();
        assert!(reloaded.authenticate("admin", "password123").is_ok());
        assert!(reloaded.authenticate("admin2", "pw").is_ok());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let account = new_account("A", AdminId::new("a").unwrap(), "secret-pw");
        let debug = format!("{account:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(&account.password_hash));
    }
}
