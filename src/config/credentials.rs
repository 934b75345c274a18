//! Access keys for the metadata API
//!
//! Keys come from a small TOML document (`--keys` or `[credentials].keys_file`)
//! or, when no document is configured, from `SUMO_ACCESS_ID` and
//! `SUMO_ACCESS_KEY`. Missing keys are not an error: the credential-gated
//! producers are simply not started.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;

/// Environment variable holding the access id
pub const ACCESS_ID_ENV: &str = "SUMO_ACCESS_ID";

/// Environment variable holding the access key
pub const ACCESS_KEY_ENV: &str = "SUMO_ACCESS_KEY";

/// An access id / access key pair
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(alias = "accessID")]
    pub access_id: String,

    #[serde(alias = "accessKey")]
    pub access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_id", &self.access_id)
            .field("access_key", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(access_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            access_key: access_key.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.access_id.trim().is_empty() && !self.access_key.trim().is_empty()
    }

    /// Read a keys document
    ///
    /// # Arguments
    /// * `path` - TOML document with `access_id`/`access_key`
    ///
    /// # Returns
    /// * `Result<Credentials>` - The keys, or the read/decode error
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Build from raw environment values; blank values count as missing
    pub fn from_vars(access_id: Option<String>, access_key: Option<String>) -> Option<Self> {
        let credentials = Self::new(access_id?, access_key?);
        credentials.is_complete().then_some(credentials)
    }

    /// Read `SUMO_ACCESS_ID` and `SUMO_ACCESS_KEY`
    pub fn from_env() -> Option<Self> {
        Self::from_vars(
            std::env::var(ACCESS_ID_ENV).ok(),
            std::env::var(ACCESS_KEY_ENV).ok(),
        )
    }

    /// Find credentials for this session
    ///
    /// A configured keys file is authoritative: when it cannot be used the
    /// session runs without credentials rather than falling through to the
    /// environment.
    pub fn resolve(keys_file: Option<&Path>) -> Option<Self> {
        let Some(path) = keys_file else {
            let found = Self::from_env();
            debug!("Credentials from environment: {}", found.is_some());
            return found;
        };

        match Self::from_file(path) {
            Ok(credentials) if credentials.is_complete() => Some(credentials),
            Ok(_) => {
                warn!("Keys file {} has an empty access id or key", path.display());
                None
            }
            Err(e) => {
                warn!("Cannot use keys file {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_snake_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.toml");
        std::fs::write(&path, "access_id = \"id\"\naccess_key = \"secret\"\n").unwrap();

        assert_eq!(
            Credentials::resolve(Some(&path)),
            Some(Credentials::new("id", "secret"))
        );
    }

    #[test]
    fn test_from_file_legacy_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.toml");
        std::fs::write(&path, "accessID = \"id\"\naccessKey = \"secret\"\n").unwrap();

        assert_eq!(
            Credentials::from_file(&path).unwrap(),
            Credentials::new("id", "secret")
        );
    }

    #[test]
    fn test_unusable_file_means_no_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(Credentials::resolve(Some(&missing)), None);

        let partial = dir.path().join("partial.toml");
        std::fs::write(&partial, "access_id = \"id\"\n").unwrap();
        assert_eq!(Credentials::resolve(Some(&partial)), None);

        let blank = dir.path().join("blank.toml");
        std::fs::write(&blank, "access_id = \"id\"\naccess_key = \" \"\n").unwrap();
        assert_eq!(Credentials::resolve(Some(&blank)), None);
    }

    #[test]
    fn test_from_vars() {
        assert_eq!(
            Credentials::from_vars(Some("id".into()), Some("key".into())),
            Some(Credentials::new("id", "key"))
        );
        assert_eq!(Credentials::from_vars(Some("id".into()), None), None);
        assert_eq!(Credentials::from_vars(Some(String::new()), Some("key".into())), None);
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", Credentials::new("id", "secret"));
        assert!(rendered.contains("id"));
        assert!(!rendered.contains("secret"));
    }
}
