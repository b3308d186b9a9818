//! Option settings sourced from the external settings service.
//!
//! Combos, add-ons, the green-mayo toggle and the delivery-fee table are all
//! managed in the admin dashboard and read-only to the storefront within a
//! session. Every entry carries an `ativo` flag; the storefront must filter
//! to active entries before presenting options.

use serde::{Deserialize, Serialize};

use crate::types::price::Price;

/// A single selectable option (combo, add-on or condiment toggle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSetting {
    /// Display label, also used in composed line names.
    #[serde(rename = "nome")]
    pub name: String,
    /// Price added on top of the base item.
    #[serde(rename = "preco")]
    pub price: Price,
    /// Whether the option is currently offered.
    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,
}

/// A delivery zone with its fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryZone {
    /// Neighborhood name (the "short name" used in order messages).
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    /// Flat delivery fee for the zone.
    #[serde(rename = "preco")]
    pub fee: Price,
    /// Whether deliveries to this zone are currently offered.
    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,
}

impl DeliveryZone {
    /// Label shown in the zone selector, e.g. `Centro - R$ 5,00`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.neighborhood, self.fee)
    }
}

/// The full option-settings payload from the settings service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuSettings {
    /// Combo upgrades (single-choice).
    #[serde(default)]
    pub combos: Vec<OptionSetting>,
    /// Add-ons (multi-choice, capped per item).
    #[serde(rename = "adicionais", default)]
    pub add_ons: Vec<OptionSetting>,
    /// Green mayo condiment toggle.
    #[serde(rename = "maionese_verde", default)]
    pub green_mayo: Option<OptionSetting>,
    /// Delivery fee table by neighborhood.
    #[serde(rename = "taxas_entrega", default)]
    pub delivery_zones: Vec<DeliveryZone>,
}

impl MenuSettings {
    /// Drop every inactive entry, keeping only what may be presented.
    #[must_use]
    pub fn only_active(mut self) -> Self {
        self.combos.retain(|c| c.active);
        self.add_ons.retain(|a| a.active);
        if self.green_mayo.as_ref().is_some_and(|m| !m.active) {
            self.green_mayo = None;
        }
        self.delivery_zones.retain(|z| z.active);
        self
    }
}

const fn default_active() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_settings_payload() {
        let json = r#"{
            "combos": [{"nome": "Combo Batata + Refri", "preco": 12.0, "ativo": true}],
            "adicionais": [
                {"nome": "Bacon", "preco": 8.0, "ativo": true},
                {"nome": "Cheddar", "preco": 6.0, "ativo": false}
            ],
            "maionese_verde": {"nome": "Maionese verde", "preco": 4.0, "ativo": true},
            "taxas_entrega": [{"bairro": "Centro", "preco": 5.0, "ativo": true}]
        }"#;
        let settings: MenuSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.combos.len(), 1);
        assert_eq!(settings.add_ons.len(), 2);
        assert_eq!(settings.delivery_zones[0].label(), "Centro - R$ 5,00");
    }

    #[test]
    fn test_only_active_filters_every_group() {
        let json = r#"{
            "adicionais": [
                {"nome": "Bacon", "preco": 8.0, "ativo": true},
                {"nome": "Cheddar", "preco": 6.0, "ativo": false}
            ],
            "maionese_verde": {"nome": "Maionese verde", "preco": 4.0, "ativo": false},
            "taxas_entrega": [{"bairro": "Jardim", "preco": 7.0, "ativo": false}]
        }"#;
        let settings: MenuSettings = serde_json::from_str(json).unwrap();
        let active = settings.only_active();
        assert_eq!(active.add_ons.len(), 1);
        assert!(active.green_mayo.is_none());
        assert!(active.delivery_zones.is_empty());
    }

    #[test]
    fn test_missing_groups_default_empty() {
        let settings: MenuSettings = serde_json::from_str("{}").unwrap();
        assert!(settings.combos.is_empty());
        assert!(settings.green_mayo.is_none());
    }
}
