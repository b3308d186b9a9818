//! The persisted shape of a cart session.
//!
//! [`CartState`] is the single source of truth for everything the customer
//! has selected: order lines, delivery zone, address, payment choice and
//! condiment sachets. The UI is rendered from this state; handlers dispatch
//! intents that mutate it through [`super::CartService`].

use serde::{Deserialize, Serialize};

use localburger_core::{Address, PaymentMethod, Price};

/// Options selected for a single order line, stored structurally so that
/// edit-reopen never has to reparse the composed display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineOptions {
    /// Selected combo label, if any (single choice).
    #[serde(default)]
    pub combo: Option<String>,
    /// Selected add-on labels, in selection order.
    #[serde(default)]
    pub add_ons: Vec<String>,
    /// Whether the green mayo condiment is on.
    #[serde(default)]
    pub green_mayo: bool,
}

impl LineOptions {
    /// Whether no option is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combo.is_none() && self.add_ons.is_empty() && !self.green_mayo
    }

    /// Option labels in display order: combo, add-ons, then green mayo.
    #[must_use]
    pub fn labels(&self, green_mayo_label: &str) -> Vec<String> {
        let mut labels = Vec::new();
        if let Some(combo) = &self.combo {
            labels.push(combo.clone());
        }
        labels.extend(self.add_ons.iter().cloned());
        if self.green_mayo {
            labels.push(green_mayo_label.to_string());
        }
        labels
    }
}

/// A single line in the cart ledger.
///
/// `name` is the composed display name (base item plus a parenthesized list
/// of option labels) and is unique within the ledger - two configurations of
/// the same base item with different option sets are distinct lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Composed display name, e.g. `Smash (Bacon, Maionese verde)`.
    pub name: String,
    /// Base item name without any option suffix.
    #[serde(default)]
    pub base_name: String,
    /// Per-unit price including selected options.
    #[serde(rename = "price")]
    pub unit_price: Price,
    /// Quantity, always >= 1.
    #[serde(rename = "qty")]
    pub quantity: u32,
    /// The selected options, kept alongside the display name.
    #[serde(default)]
    pub options: LineOptions,
}

impl OrderLine {
    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// Delivery zone selection.
///
/// Invariant: `fee` and `neighborhood_label` are set together or both empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliverySelection {
    /// Flat delivery fee for the selected zone.
    #[serde(rename = "fee", default)]
    pub fee: Price,
    /// Full zone label as shown in the selector, e.g. `Centro - R$ 5,00`.
    #[serde(rename = "neighborhood", default)]
    pub neighborhood_label: String,
}

impl DeliverySelection {
    /// Whether a zone has been selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        !self.neighborhood_label.is_empty()
    }

    /// The zone label up to the ` - price` suffix, used in order messages.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.neighborhood_label
            .split(" - ")
            .next()
            .unwrap_or(&self.neighborhood_label)
    }
}

/// Payment choice, including the cash change-for amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentChoice {
    /// Selected method, empty until the customer picks one.
    #[serde(default)]
    pub method: Option<PaymentMethod>,
    /// Free-text "troco para" amount, only meaningful for cash.
    #[serde(rename = "changeFor", default)]
    pub change_for: String,
}

/// Condiment sachet selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condiments {
    #[serde(default)]
    pub ketchup: bool,
    #[serde(rename = "mostarda", default)]
    pub mustard: bool,
}

impl Condiments {
    /// Labels of the selected sachets, in fixed order.
    #[must_use]
    pub fn selected_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.ketchup {
            labels.push("Ketchup");
        }
        if self.mustard {
            labels.push("Mostarda");
        }
        labels
    }
}

/// The full cart session state, persisted after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub lines: Vec<OrderLine>,
    pub delivery: DeliverySelection,
    pub address: Address,
    pub payment: PaymentChoice,
    pub condiments: Condiments,
}

impl CartState {
    /// Sum of line totals over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    /// Subtotal plus the delivery fee.
    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal() + self.delivery.fee
    }

    /// Total unit count across all lines (the cart badge number).
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
