//! Credential context and environment overrides.

use super::{ConfigError, ProviderProfile};
use crate::fs;
use crate::compute::domain::{CompartmentId, RegionId};
use camino::Utf8Path;
use clap::ValueEnum;
use std::fmt;
use tracing::debug;

/// Environment variable replacing the profile's tenancy.
pub const TENANCY_OVERRIDE_VAR: &str = "TENANCY_ID_OVERRIDE";

/// Environment variable replacing the profile's region.
pub const REGION_OVERRIDE_VAR: &str = "REGION_ID_OVERRIDE";

/// Transport the tool surface is served over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum TransportMode {
    /// Served to a local client. Environment overrides are ignored.
    #[default]
    Local,
    /// Served behind a gateway that injects tenancy and region per
    /// deployment. Environment overrides apply.
    Restricted,
}

impl TransportMode {
    /// Returns whether environment overrides apply in this mode.
    #[must_use]
    pub const fn permits_overrides(self) -> bool {
        matches!(self, Self::Restricted)
    }
}

/// Tenancy and region overrides read from the environment.
///
/// Empty or whitespace-only values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentOverrides {
    tenancy_id: Option<String>,
    region_id: Option<String>,
}

impl EnvironmentOverrides {
    /// Reads overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            tenancy_id: normalize(lookup(TENANCY_OVERRIDE_VAR)),
            region_id: normalize(lookup(REGION_OVERRIDE_VAR)),
        }
    }

    /// Sets the tenancy override.
    #[must_use]
    pub fn with_tenancy_id(mut self, tenancy_id: impl Into<String>) -> Self {
        self.tenancy_id = normalize(Some(tenancy_id.into()));
        self
    }

    /// Sets the region override.
    #[must_use]
    pub fn with_region_id(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = normalize(Some(region_id.into()));
        self
    }

    /// Returns the tenancy override, if set.
    #[must_use]
    pub fn tenancy_id(&self) -> Option<&str> {
        self.tenancy_id.as_deref()
    }

    /// Returns the region override, if set.
    #[must_use]
    pub fn region_id(&self) -> Option<&str> {
        self.region_id.as_deref()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

/// String that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wraps secret text.
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns the secret text.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("[REDACTED]")
    }
}

/// Credential material handed to provider connectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMaterial {
    /// API signing key of a user.
    ApiKey {
        /// User identifier.
        user: String,
        /// Fingerprint of the uploaded public key.
        fingerprint: String,
        /// PEM-encoded private key.
        private_key: SecretString,
        /// Optional pass phrase of the private key.
        pass_phrase: Option<SecretString>,
    },
    /// Session token obtained by the provider CLI.
    SessionToken {
        /// Session token.
        token: SecretString,
        /// PEM-encoded session private key.
        private_key: SecretString,
    },
}

impl AuthMaterial {
    /// Loads key material named by a profile.
    ///
    /// A `security_token_file` entry selects session-token auth; otherwise
    /// `user` and `fingerprint` are required.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] for absent entries and
    /// [`ConfigError::CredentialMaterial`] when a file cannot be read.
    pub fn load(profile: &ProviderProfile) -> Result<Self, ConfigError> {
        let key_path = profile.resolve_path(profile.require("key_file")?);
        let private_key = read_secret(&key_path)?;

        if let Some(token_file) = profile.get("security_token_file") {
            let token_path = profile.resolve_path(token_file);
            return Ok(Self::SessionToken {
                token: read_secret(&token_path)?,
                private_key,
            });
        }

        Ok(Self::ApiKey {
            user: profile.require("user")?.to_owned(),
            fingerprint: profile.require("fingerprint")?.to_owned(),
            private_key,
            pass_phrase: profile
                .get("pass_phrase")
                .map(|phrase| SecretString::new(phrase.to_owned())),
        })
    }

    /// Returns a label describing the auth scheme, safe to log.
    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        match self {
            Self::ApiKey { .. } => "api_key",
            Self::SessionToken { .. } => "session_token",
        }
    }
}

fn read_secret(path: &Utf8Path) -> Result<SecretString, ConfigError> {
    fs::read_to_string(path)
        .map(|content| SecretString::new(content.trim().to_owned()))
        .map_err(|source| ConfigError::CredentialMaterial {
            path: path.to_path_buf(),
            source,
        })
}

/// Identity, tenancy and default region used for provider calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialContext {
    profile: String,
    tenancy_id: CompartmentId,
    default_region: RegionId,
    auth: AuthMaterial,
}

impl CredentialContext {
    /// Creates a context from already validated parts.
    #[must_use]
    pub fn new(
        profile: impl Into<String>,
        tenancy_id: CompartmentId,
        default_region: RegionId,
        auth: AuthMaterial,
    ) -> Self {
        Self {
            profile: profile.into(),
            tenancy_id,
            default_region,
            auth,
        }
    }

    /// Resolves a context from a profile and environment overrides.
    ///
    /// Overrides replace the profile's `tenancy` and `region` only when
    /// `mode` permits them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no tenancy or region can be determined,
    /// when either is invalid, or when credential material cannot be loaded.
    pub fn resolve(
        profile: &ProviderProfile,
        overrides: &EnvironmentOverrides,
        mode: TransportMode,
    ) -> Result<Self, ConfigError> {
        let applied = if mode.permits_overrides() {
            overrides.clone()
        } else {
            EnvironmentOverrides::default()
        };

        let tenancy_raw = match applied.tenancy_id() {
            Some(tenancy) => tenancy,
            None => profile.require("tenancy")?,
        };
        let tenancy_id = CompartmentId::new(tenancy_raw).map_err(ConfigError::InvalidTenancy)?;

        let region_raw = match applied.region_id() {
            Some(region) => region,
            None => profile.require("region")?,
        };
        let default_region = RegionId::new(region_raw).map_err(ConfigError::InvalidRegion)?;

        let auth = AuthMaterial::load(profile)?;

        debug!(
            profile = profile.name(),
            tenancy = %tenancy_id,
            region = %default_region,
            auth = auth.scheme(),
            tenancy_overridden = applied.tenancy_id().is_some(),
            region_overridden = applied.region_id().is_some(),
            "resolved credential context"
        );

        Ok(Self::new(profile.name(), tenancy_id, default_region, auth))
    }

    /// Returns the profile the context was resolved from.
    #[must_use]
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Returns the tenancy, which is also the root compartment.
    #[must_use]
    pub const fn tenancy_id(&self) -> &CompartmentId {
        &self.tenancy_id
    }

    /// Returns the default region.
    #[must_use]
    pub const fn default_region(&self) -> &RegionId {
        &self.default_region
    }

    /// Returns the credential material.
    #[must_use]
    pub const fn auth(&self) -> &AuthMaterial {
        &self.auth
    }
}
