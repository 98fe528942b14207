//! Payers (insurers and administrators) named on claim documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{PayerId, TenantId};

use crate::error::PartyError;

/// Name used when a document did not identify the payer
pub const UNKNOWN_PAYER: &str = "Unknown Payer";

/// Classification of a payer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayerType {
    /// Third-party administrator
    #[default]
    Tpa,
    Insurer,
    Government,
    Corporate,
}

impl PayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayerType::Tpa => "TPA",
            PayerType::Insurer => "INSURER",
            PayerType::Government => "GOVERNMENT",
            PayerType::Corporate => "CORPORATE",
        }
    }
}

impl fmt::Display for PayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayerType {
    type Err = PartyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TPA" => Ok(PayerType::Tpa),
            "INSURER" => Ok(PayerType::Insurer),
            "GOVERNMENT" => Ok(PayerType::Government),
            "CORPORATE" => Ok(PayerType::Corporate),
            other => Err(PartyError::InvalidData(format!("unknown payer type '{}'", other))),
        }
    }
}

/// A payer known to a tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub id: PayerId,
    pub tenant_id: TenantId,
    pub name: String,
    pub payer_type: PayerType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payer {
    pub fn new(tenant_id: TenantId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PayerId::new_v7(),
            tenant_id,
            name: name.into(),
            payer_type: PayerType::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
