//! Credential fixtures.
//!
//! The user records are read-only configuration: loaded once per process,
//! handed to tests by shared reference, never mutated.

use crate::result::{SauceError, SauceResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Environment variable naming a JSON file that replaces the bundled users
pub const USERS_FILE_ENV: &str = "SAUCEDEMO_USERS_FILE";

const BUNDLED_USERS: &str = include_str!("../test-data/users.json");

static USERS: OnceLock<Users> = OnceLock::new();

/// A username/password pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Named user records used by the suites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Users {
    /// Account that logs in successfully
    pub valid_user: Credentials,
    /// Account the storefront does not know
    pub invalid_user: Credentials,
    /// Account that exists but is locked out
    pub locked_user: Credentials,
}

impl Users {
    /// Parse user records from JSON
    pub fn from_json(json: &str) -> SauceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read user records from a JSON file
    pub fn from_file(path: &Path) -> SauceResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SauceError::Fixture {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_json(&content)
    }

    /// The records shipped with the crate
    pub fn bundled() -> SauceResult<Self> {
        Self::from_json(BUNDLED_USERS)
    }

    /// Process-wide records, loaded on first use.
    ///
    /// Reads the file named by `SAUCEDEMO_USERS_FILE` when set, the bundled
    /// records otherwise.
    pub fn global() -> SauceResult<&'static Self> {
        if let Some(users) = USERS.get() {
            return Ok(users);
        }
        let users = match std::env::var(USERS_FILE_ENV) {
            Ok(path) if !path.is_empty() => {
                debug!(path = %path, "loading user fixtures from file");
                Self::from_file(Path::new(&path))?
            }
            _ => Self::bundled()?,
        };
        Ok(USERS.get_or_init(|| users))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_users() {
        let users = Users::bundled().unwrap();
        assert_eq!(users.valid_user, Credentials::new("standard_user", "secret_sauce"));
        assert_eq!(users.locked_user.username, "locked_out_user");
        assert_ne!(users.invalid_user.username, users.valid_user.username);
    }

    #[test]
    fn test_global_is_loaded_once() {
        let first = Users::global().unwrap();
        let second = Users::global().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"validUser":{{"username":"a","password":"b"}},
                "invalidUser":{{"username":"c","password":"d"}},
                "lockedUser":{{"username":"e","password":"f"}}}}"#
        )
        .unwrap();

        let users = Users::from_file(file.path()).unwrap();
        assert_eq!(users.invalid_user, Credentials::new("c", "d"));
    }

    #[test]
    fn test_missing_file_is_fixture_error() {
        let err = Users::from_file(Path::new("/nonexistent/users.json")).unwrap_err();
        assert!(matches!(err, SauceError::Fixture { .. }));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = Users::from_json("{\"validUser\": 3}").unwrap_err();
        assert!(matches!(err, SauceError::Json(_)));
    }
}
