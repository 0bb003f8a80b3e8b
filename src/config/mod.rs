//! Credential context resolution.
//!
//! A [`CredentialContext`] is built once at startup from the provider config
//! file, optionally overridden by environment variables when the transport
//! mode permits it. It is immutable afterwards and shared by reference with
//! every component that needs a client.

mod context;
mod error;
mod profile;
mod settings;

pub use context::{
    AuthMaterial, CredentialContext, EnvironmentOverrides, REGION_OVERRIDE_VAR, SecretString,
    TENANCY_OVERRIDE_VAR, TransportMode,
};
pub use error::ConfigError;
pub use profile::{DEFAULT_PROFILE, ProviderConfigFile, ProviderProfile};
pub use settings::{
    CONFIG_FILE_VAR, PROFILE_VAR, REALM_DOMAIN_VAR, ServerSettings, default_config_file,
};
