//! Identifier types for provider resources.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! provider_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from provider text.
            ///
            /// The value is trimmed but otherwise kept opaque.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::EmptyIdentifier`] when the value is
            /// empty after trimming.
            pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyIdentifier { kind: $kind });
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(self.as_str())
            }
        }
    };
}

provider_id!(
    /// Opaque identifier of a compartment. The tenancy root is a compartment.
    CompartmentId,
    "compartment"
);

provider_id!(
    /// Opaque identifier of a compute instance.
    InstanceId,
    "instance"
);
