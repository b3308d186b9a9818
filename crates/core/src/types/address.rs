//! Delivery address.

use serde::{Deserialize, Serialize};

/// A delivery address as filled in by the customer.
///
/// All fields are free text; `cep` keeps whatever mask the customer typed.
/// Street and number are the only fields the checkout preconditions require.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub complement: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

impl Address {
    /// Whether the required fields for checkout are present.
    #[must_use]
    pub fn is_deliverable(&self) -> bool {
        !self.street.trim().is_empty() && !self.number.trim().is_empty()
    }
}
