//! Startup settings for serving the tool surface.

use super::{
    ConfigError, CredentialContext, DEFAULT_PROFILE, EnvironmentOverrides, ProviderConfigFile,
    TransportMode,
};
use crate::compute::adapters::oci::{DEFAULT_REALM_DOMAIN, OciEndpoints};
use camino::Utf8PathBuf;

/// Environment variable naming the provider config file.
pub const CONFIG_FILE_VAR: &str = "OCI_CONFIG_FILE";

/// Environment variable naming the profile to use.
pub const PROFILE_VAR: &str = "PROFILE_NAME";

/// Environment variable naming the realm's second-level domain.
pub const REALM_DOMAIN_VAR: &str = "OCI_REALM_DOMAIN";

/// Returns `~/.oci/config` with the home directory expanded.
#[must_use]
pub fn default_config_file() -> Utf8PathBuf {
    Utf8PathBuf::from(shellexpand::tilde("~/.oci/config").into_owned())
}

/// Inputs for resolving the process-wide credential context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Provider config file.
    pub config_file: Utf8PathBuf,
    /// Profile within the config file.
    pub profile: String,
    /// Transport mode, which decides whether overrides apply.
    pub mode: TransportMode,
    /// Realm domain the live provider's endpoints are derived from.
    pub realm_domain: String,
    /// Tenancy snapshot served by the in-memory provider instead of the
    /// live services.
    pub snapshot: Option<Utf8PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            config_file: default_config_file(),
            profile: DEFAULT_PROFILE.to_owned(),
            mode: TransportMode::default(),
            realm_domain: DEFAULT_REALM_DOMAIN.to_owned(),
            snapshot: None,
        }
    }
}

impl ServerSettings {
    /// Loads the config file and resolves the context with `overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] from reading the file, selecting the profile,
    /// or resolving the context.
    pub fn resolve_context(
        &self,
        overrides: &EnvironmentOverrides,
    ) -> Result<CredentialContext, ConfigError> {
        let file = ProviderConfigFile::load(&self.config_file)?;
        let profile = file.profile(&self.profile)?;
        CredentialContext::resolve(&profile, overrides, self.mode)
    }

    /// Returns the live provider endpoints for the configured realm.
    #[must_use]
    pub fn endpoints(&self) -> OciEndpoints {
        OciEndpoints::Realm {
            domain: self.realm_domain.clone(),
        }
    }
}
