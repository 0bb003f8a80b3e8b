//! Provider config file parsing.
//!
//! The file uses the INI layout of the provider's standard tooling:
//!
//! ```text
//! [DEFAULT]
//! user=ocid1.user.oc1..aaaa
//! fingerprint=20:3b:97:13
//! key_file=~/.oci/oci_api_key.pem
//! tenancy=ocid1.tenancy.oc1..aaaa
//! region=us-ashburn-1
//! ```
//!
//! Keys in `[DEFAULT]` are inherited by every other profile.

use super::ConfigError;
use crate::fs;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::io;
use tracing::debug;

/// Profile used when none is named.
pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// Parsed provider config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfigFile {
    path: Utf8PathBuf,
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl ProviderConfigFile {
    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when the file is absent,
    /// [`ConfigError::Io`] for other read failures, and
    /// [`ConfigError::Parse`] for malformed content.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        debug!(path = %path, "reading provider config file");
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(path, &content)
    }

    /// Parses config content that was read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for entries outside a section, lines
    /// without `=`, and unterminated section headers.
    pub fn parse(path: &Utf8Path, content: &str) -> Result<Self, ConfigError> {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let parse_error = |reason: &str| ConfigError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                reason: reason.to_owned(),
            };

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| parse_error("malformed section header"))?;
                sections.entry(name.to_owned()).or_default();
                current = Some(name.to_owned());
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| parse_error("expected 'key=value'"))?;
            let section_name = current
                .as_ref()
                .ok_or_else(|| parse_error("entry appears before any [profile] header"))?;
            sections
                .entry(section_name.clone())
                .or_default()
                .insert(key.trim().to_owned(), value.trim().to_owned());
        }

        Ok(Self {
            path: path.to_path_buf(),
            sections,
        })
    }

    /// Returns the path the file was read from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the names of all profiles in sorted order.
    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Selects a profile, layering it over `[DEFAULT]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProfileNotFound`] when no section has the
    /// requested name.
    pub fn profile(&self, name: &str) -> Result<ProviderProfile, ConfigError> {
        let selected = self
            .sections
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                profile: name.to_owned(),
                path: self.path.clone(),
            })?;

        let mut entries = self
            .sections
            .get(DEFAULT_PROFILE)
            .cloned()
            .unwrap_or_default();
        entries.extend(selected.iter().map(|(key, value)| (key.clone(), value.clone())));

        let base_dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_path_buf);

        Ok(ProviderProfile {
            name: name.to_owned(),
            base_dir,
            entries,
        })
    }
}

/// One resolved profile of the provider config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    name: String,
    base_dir: Utf8PathBuf,
    entries: BTreeMap<String, String>,
}

impl ProviderProfile {
    /// Builds a profile directly from entries, resolving relative paths
    /// against `base_dir`.
    #[must_use]
    pub fn from_entries<K, V>(
        name: impl Into<String>,
        base_dir: impl Into<Utf8PathBuf>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            base_dir: base_dir.into(),
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Returns the profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a non-empty value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Returns a value for `key` or a missing-key error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] when the key is absent or empty.
    pub fn require(&self, key: &'static str) -> Result<&str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::MissingKey {
            profile: self.name.clone(),
            key,
        })
    }

    /// Expands `~` and resolves relative paths against the config directory.
    #[must_use]
    pub fn resolve_path(&self, raw: &str) -> Utf8PathBuf {
        let expanded = Utf8PathBuf::from(shellexpand::tilde(raw).into_owned());
        if expanded.is_absolute() {
            expanded
        } else {
            self.base_dir.join(expanded)
        }
    }
}
