//! Tenant scoping value objects
//!
//! Tenants and hospitals are identified by opaque strings assigned upstream.
//! Blank values are treated as absent so that a record with an empty tenant
//! column fails validation instead of being written under an empty scope.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_scope {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a value, returning `None` when it is blank
            pub fn parse(value: impl AsRef<str>) -> Option<Self> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Self(trimmed.to_string()))
                }
            }

            /// Wraps an optional value, treating blank as absent
            pub fn parse_optional(value: Option<impl AsRef<str>>) -> Option<Self> {
                value.and_then(Self::parse)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_scope!(TenantId);
define_scope!(HospitalId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_absent() {
        assert!(TenantId::parse("   ").is_none());
        assert!(HospitalId::parse_optional(None::<&str>).is_none());
    }

    #[test]
    fn test_value_is_trimmed() {
        let tenant = TenantId::parse(" tenant-a ").unwrap();
        assert_eq!(tenant.as_str(), "tenant-a");
        assert_eq!(tenant.to_string(), "tenant-a");
    }
}
