//! Party snapshots and jurisdiction codes.
//!
//! An invoice carries frozen copies of both parties taken at computation
//! time, so later edits to a party directory never change what an issued
//! invoice says. The jurisdiction (state) code is the field the tax split
//! hinges on.

use serde::{Deserialize, Serialize};

/// Jurisdiction/state code of a registered party.
///
/// Normalized at construction (trimmed, ASCII-uppercased) so that equality
/// is a plain `==` - `" mh "` and `"MH"` are the same jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateCode(String);

impl StateCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for StateCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Frozen party data as printed on the invoice.
///
/// Only `state_code` participates in tax computation; the rest is the legal
/// party block. All of it is covered by the integrity fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state_code: StateCode,
    /// Tax registration number (e.g. GSTIN), when the party is registered.
    pub tax_registration: Option<String>,
}

impl PartySnapshot {
    pub fn new(name: impl Into<String>, state_code: StateCode) -> Self {
        Self {
            name: name.into(),
            address: None,
            city: None,
            state_code,
            tax_registration: None,
        }
    }

    /// True when both parties are registered in the same jurisdiction.
    pub fn same_jurisdiction(&self, other: &PartySnapshot) -> bool {
        self.state_code == other.state_code
    }
}
