//! Identifiers of claims and the records normalization creates
//!
//! Each id wraps a UUIDv7, so ids sort by creation time and new rows land at
//! the end of their primary-key index. On the wire an id is the bare UUID;
//! log lines show it with a short type tag (`CLM-0190...`), and parsing
//! accepts either form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$doc:meta])* $name:ident => $tag:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Time-ordered id for a record created now
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Alias of [`Self::new`], kept for call sites that spell out the version
            pub fn new_v7() -> Self {
                Self::new()
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Tag shown before the UUID in log output
            pub fn prefix() -> &'static str {
                $tag
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $tag, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bare = s.strip_prefix(concat!($tag, "-")).unwrap_or(s);
                Uuid::parse_str(bare).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

record_id!(
    /// An uploaded claim, created by the upload service
    ClaimId => "CLM"
);
record_id!(
    /// A denial recorded against a claim
    DenialId => "DEN"
);
record_id!(PatientId => "PAT");
record_id!(PayerId => "PYR");
record_id!(
    /// An agent log entry
    AuditEventId => "AUD"
);
