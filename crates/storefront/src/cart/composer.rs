//! Per-item option composition flow.
//!
//! A [`PendingComposition`] exists only while the options dialog is open for
//! one item. It tracks the transient selections (combo, add-ons, green mayo)
//! and prices them against the current [`MenuSettings`]; it is discarded on
//! commit or cancel and never persisted.

use thiserror::Error;

use localburger_core::{CatalogItem, Category, MenuSettings, OptionSetting, Price};

use super::state::{LineOptions, OrderLine};

/// Maximum number of add-ons simultaneously selectable on one item.
pub const MAX_ADD_ONS: usize = 6;

/// Which option sections the dialog shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionMode {
    /// Combos, add-ons and green mayo.
    Full,
    /// Green mayo only (sides).
    CondimentOnly,
}

impl CompositionMode {
    /// How a catalog category maps onto the dialog, if it opens one at all.
    ///
    /// Burgers and smashes get the full dialog, sides get the condiment-only
    /// dialog, and kids items and drinks are added directly.
    #[must_use]
    pub const fn for_category(category: Category) -> Option<Self> {
        match category {
            Category::Burger | Category::Smash => Some(Self::Full),
            Category::Side => Some(Self::CondimentOnly),
            Category::Kids | Category::Drink => None,
        }
    }
}

/// Errors from composition operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposerError {
    /// The add-on cap was hit; the toggle was rejected.
    #[error("no máximo {MAX_ADD_ONS} adicionais por item")]
    AddOnLimit,
}

/// Transient configuration state for one item being composed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingComposition {
    /// Base item display name.
    pub base_name: String,
    /// Base item price before options.
    pub base_price: Price,
    /// Section visibility.
    pub mode: CompositionMode,
    /// When editing, the ledger index of the line being replaced.
    pub editing_line: Option<usize>,
    /// Selected combo label (radio semantics, `None` = "sem combo").
    pub combo: Option<String>,
    /// Selected add-on labels, in selection order.
    pub add_ons: Vec<String>,
    /// Green mayo toggle.
    pub green_mayo: bool,
}

impl PendingComposition {
    /// Open a fresh composition for a catalog item, all selections at their
    /// defaults (no combo, no add-ons, mayo off).
    #[must_use]
    pub fn open(item: &CatalogItem, mode: CompositionMode) -> Self {
        Self {
            base_name: item.name.clone(),
            base_price: item.price,
            mode,
            editing_line: None,
            combo: None,
            add_ons: Vec::new(),
            green_mayo: false,
        }
    }

    /// Reopen the dialog for an existing line, pre-selecting its stored
    /// options. The base price comes from the catalog when the item still
    /// exists there, otherwise from the line's own unit price.
    #[must_use]
    pub fn open_for_edit(line: &OrderLine, index: usize, catalog: &[CatalogItem]) -> Self {
        // Lines persisted before structured options carry no base name.
        let base_name = if line.base_name.is_empty() {
            line.name.clone()
        } else {
            line.base_name.clone()
        };

        let base_price = catalog
            .iter()
            .find(|item| item.name.trim() == base_name.trim())
            .map_or(line.unit_price, |item| item.price);

        Self {
            base_name,
            base_price,
            mode: CompositionMode::Full,
            editing_line: Some(index),
            combo: line.options.combo.clone(),
            add_ons: line.options.add_ons.clone(),
            green_mayo: line.options.green_mayo,
        }
    }

    /// Select a combo (`None` clears back to "sem combo").
    pub fn set_combo(&mut self, combo: Option<String>) {
        self.combo = combo;
    }

    /// Toggle an add-on by label. Selecting past the cap is rejected and the
    /// selection set is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::AddOnLimit`] when a new selection would
    /// exceed [`MAX_ADD_ONS`].
    pub fn toggle_add_on(&mut self, label: &str) -> Result<(), ComposerError> {
        if let Some(pos) = self
            .add_ons
            .iter()
            .position(|a| a.eq_ignore_ascii_case(label))
        {
            self.add_ons.remove(pos);
            return Ok(());
        }
        if self.add_ons.len() >= MAX_ADD_ONS {
            return Err(ComposerError::AddOnLimit);
        }
        self.add_ons.push(label.to_string());
        Ok(())
    }

    /// Whether unselected add-on controls should render inert.
    #[must_use]
    pub fn add_ons_capped(&self) -> bool {
        self.add_ons.len() >= MAX_ADD_ONS
    }

    /// Set the green mayo toggle.
    pub fn set_green_mayo(&mut self, on: bool) {
        self.green_mayo = on;
    }

    /// Whether a given add-on label is currently selected (case-insensitive,
    /// matching how stored labels are compared against current settings).
    #[must_use]
    pub fn has_add_on(&self, label: &str) -> bool {
        self.add_ons.iter().any(|a| a.eq_ignore_ascii_case(label))
    }

    /// Whether a given combo label is currently selected.
    #[must_use]
    pub fn has_combo(&self, label: &str) -> bool {
        self.combo
            .as_ref()
            .is_some_and(|c| c.eq_ignore_ascii_case(label))
    }

    /// Displayed running total: base + combo + add-ons + condiment, priced
    /// against the current settings. Recomputed after every selection change.
    #[must_use]
    pub fn total(&self, settings: &MenuSettings) -> Price {
        let mut total = self.base_price;
        if let Some(combo) = &self.combo {
            total += option_price(&settings.combos, combo);
        }
        for add_on in &self.add_ons {
            total += option_price(&settings.add_ons, add_on);
        }
        if self.green_mayo
            && let Some(mayo) = &settings.green_mayo
        {
            total += mayo.price;
        }
        total
    }

    /// Build the priced, labeled order line for this composition.
    ///
    /// Labels are canonicalized against the current settings
    /// (case-insensitive); selections that no longer exist in the settings
    /// are dropped. The composed name is the base name followed by a
    /// parenthesized, comma-joined label list when any option is selected.
    #[must_use]
    pub fn compose(&self, settings: &MenuSettings) -> OrderLine {
        let mut unit_price = self.base_price;

        let combo = self.combo.as_ref().and_then(|label| {
            find_option(&settings.combos, label).map(|setting| {
                unit_price += setting.price;
                setting.name.clone()
            })
        });

        let add_ons: Vec<String> = self
            .add_ons
            .iter()
            .filter_map(|label| {
                find_option(&settings.add_ons, label).map(|setting| {
                    unit_price += setting.price;
                    setting.name.clone()
                })
            })
            .collect();

        let green_mayo = self.green_mayo && settings.green_mayo.is_some();
        let mayo_label = settings
            .green_mayo
            .as_ref()
            .map_or("Maionese verde", |m| m.name.as_str());
        if green_mayo
            && let Some(mayo) = &settings.green_mayo
        {
            unit_price += mayo.price;
        }

        let options = LineOptions {
            combo,
            add_ons,
            green_mayo,
        };

        let name = if options.is_empty() {
            self.base_name.clone()
        } else {
            format!("{} ({})", self.base_name, options.labels(mayo_label).join(", "))
        };

        OrderLine {
            name,
            base_name: self.base_name.clone(),
            unit_price,
            quantity: 1,
            options,
        }
    }
}

/// Price of the option matching `label`, zero when it no longer exists.
fn option_price(group: &[OptionSetting], label: &str) -> Price {
    find_option(group, label).map_or_else(Price::zero, |setting| setting.price)
}

fn find_option<'a>(group: &'a [OptionSetting], label: &str) -> Option<&'a OptionSetting> {
    group
        .iter()
        .find(|setting| setting.name.trim().eq_ignore_ascii_case(label.trim()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(name: &str, cents: i64, category: Category) -> CatalogItem {
        CatalogItem {
            id: String::new(),
            name: name.to_string(),
            description: String::new(),
            category,
            price: Price::from_cents(cents),
            image: String::new(),
            badge: None,
            active: true,
        }
    }

    fn settings() -> MenuSettings {
        let option = |name: &str, cents: i64| OptionSetting {
            name: name.to_string(),
            price: Price::from_cents(cents),
            active: true,
        };
        MenuSettings {
            combos: vec![option("Combo Batata + Refri", 1200)],
            add_ons: vec![
                option("Bacon", 800),
                option("Cheddar", 600),
                option("Ovo", 300),
                option("Calabresa", 500),
                option("Onion Rings", 700),
                option("Picles", 200),
                option("Tomate", 100),
            ],
            green_mayo: Some(option("Maionese verde", 400)),
            delivery_zones: Vec::new(),
        }
    }

    #[test]
    fn test_open_resets_selections() {
        let composition = PendingComposition::open(
            &item("Smash", 2499, Category::Smash),
            CompositionMode::Full,
        );
        assert!(composition.combo.is_none());
        assert!(composition.add_ons.is_empty());
        assert!(!composition.green_mayo);
        assert_eq!(composition.total(&settings()), Price::from_cents(2499));
    }

    #[test]
    fn test_total_sums_selected_options() {
        let mut composition = PendingComposition::open(
            &item("Smash", 2499, Category::Smash),
            CompositionMode::Full,
        );
        composition.set_combo(Some("Combo Batata + Refri".to_string()));
        composition.toggle_add_on("Bacon").unwrap();
        composition.set_green_mayo(true);
        assert_eq!(composition.total(&settings()), Price::from_cents(4899));
    }

    #[test]
    fn test_seventh_add_on_is_rejected() {
        let mut composition = PendingComposition::open(
            &item("Smash", 2499, Category::Smash),
            CompositionMode::Full,
        );
        for add_on in ["Bacon", "Cheddar", "Ovo", "Calabresa", "Onion Rings", "Picles"] {
            composition.toggle_add_on(add_on).unwrap();
        }
        assert!(composition.add_ons_capped());
        assert_eq!(
            composition.toggle_add_on("Tomate"),
            Err(ComposerError::AddOnLimit)
        );
        assert_eq!(composition.add_ons.len(), MAX_ADD_ONS);

        // Dropping one re-enables selection.
        composition.toggle_add_on("Bacon").unwrap();
        assert!(!composition.add_ons_capped());
        composition.toggle_add_on("Tomate").unwrap();
    }

    #[test]
    fn test_compose_name_and_price() {
        let mut composition = PendingComposition::open(
            &item("Smash", 2499, Category::Smash),
            CompositionMode::Full,
        );
        composition.toggle_add_on("Bacon").unwrap();
        composition.set_green_mayo(true);

        let line = composition.compose(&settings());
        assert_eq!(line.name, "Smash (Bacon, Maionese verde)");
        assert_eq!(line.unit_price, Price::from_cents(3699));
        assert_eq!(line.quantity, 1);
        assert_eq!(line.base_name, "Smash");
    }

    #[test]
    fn test_compose_orders_combo_then_add_ons_then_condiment() {
        let mut composition = PendingComposition::open(
            &item("Classic Burger", 3000, Category::Burger),
            CompositionMode::Full,
        );
        composition.set_combo(Some("Combo Batata + Refri".to_string()));
        composition.toggle_add_on("Cheddar").unwrap();
        composition.toggle_add_on("Bacon").unwrap();
        composition.set_green_mayo(true);

        let line = composition.compose(&settings());
        assert_eq!(
            line.name,
            "Classic Burger (Combo Batata + Refri, Cheddar, Bacon, Maionese verde)"
        );
    }

    #[test]
    fn test_compose_without_options_has_no_suffix() {
        let composition = PendingComposition::open(
            &item("Classic Burger", 3000, Category::Burger),
            CompositionMode::Full,
        );
        let line = composition.compose(&settings());
        assert_eq!(line.name, "Classic Burger");
        assert_eq!(line.unit_price, Price::from_cents(3000));
    }

    #[test]
    fn test_compose_drops_options_removed_from_settings() {
        let mut composition = PendingComposition::open(
            &item("Smash", 2499, Category::Smash),
            CompositionMode::Full,
        );
        composition.toggle_add_on("Bacon").unwrap();
        composition.toggle_add_on("Gorgonzola").unwrap(); // not offered anymore

        let line = composition.compose(&settings());
        assert_eq!(line.name, "Smash (Bacon)");
        assert_eq!(line.unit_price, Price::from_cents(3299));
    }

    #[test]
    fn test_open_for_edit_preselects_stored_options() {
        let catalog = vec![item("Smash", 2499, Category::Smash)];
        let mut composition = PendingComposition::open(&catalog[0], CompositionMode::Full);
        composition.toggle_add_on("Bacon").unwrap();
        composition.set_green_mayo(true);
        let line = composition.compose(&settings());

        let reopened = PendingComposition::open_for_edit(&line, 0, &catalog);
        assert_eq!(reopened.editing_line, Some(0));
        assert_eq!(reopened.base_price, Price::from_cents(2499));
        assert!(reopened.has_add_on("bacon")); // case-insensitive
        assert!(reopened.green_mayo);
        assert_eq!(reopened.mode, CompositionMode::Full);
    }

    #[test]
    fn test_open_for_edit_falls_back_to_unit_price() {
        let composition = PendingComposition::open(
            &item("Smash Antigo", 2000, Category::Smash),
            CompositionMode::Full,
        );
        let line = composition.compose(&settings());

        // Item no longer in the catalog.
        let reopened = PendingComposition::open_for_edit(&line, 0, &[]);
        assert_eq!(reopened.base_price, Price::from_cents(2000));
    }

    #[test]
    fn test_mode_for_category() {
        assert_eq!(
            CompositionMode::for_category(Category::Burger),
            Some(CompositionMode::Full)
        );
        assert_eq!(
            CompositionMode::for_category(Category::Side),
            Some(CompositionMode::CondimentOnly)
        );
        assert_eq!(CompositionMode::for_category(Category::Drink), None);
    }
}
