//! Payment method selection.

use serde::{Deserialize, Serialize};

/// How the customer intends to pay on delivery.
///
/// Wire names match the values persisted by the cart and posted by the
/// payment selector form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "credito")]
    Credit,
    #[serde(rename = "debito")]
    Debit,
    #[serde(rename = "pix")]
    Pix,
    #[serde(rename = "dinheiro")]
    Cash,
}

impl PaymentMethod {
    /// Parse a wire name as posted by the payment selector form.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "credito" => Some(Self::Credit),
            "debito" => Some(Self::Debit),
            "pix" => Some(Self::Pix),
            "dinheiro" => Some(Self::Cash),
            _ => None,
        }
    }

    /// Wire name used in forms and persisted state.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Credit => "credito",
            Self::Debit => "debito",
            Self::Pix => "pix",
            Self::Cash => "dinheiro",
        }
    }

    /// Display label used in the order message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Credit => "Cartão de Crédito",
            Self::Debit => "Cartão de Débito",
            Self::Pix => "PIX",
            Self::Cash => "Dinheiro",
        }
    }
}
