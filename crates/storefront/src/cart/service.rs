//! The cart service: single owner of the session's [`CartState`].
//!
//! One `CartService` is constructed per process and handed to route handlers
//! through [`crate::state::AppState`]. Every mutation runs to completion and
//! persists the full state before the next intent is processed; there is no
//! concurrent writer.

use tracing::debug;

use localburger_core::{Address, CatalogItem, DeliveryZone, MenuSettings, PaymentMethod, Price};

use super::composer::{ComposerError, CompositionMode, PendingComposition};
use super::state::{CartState, Condiments, DeliverySelection, OrderLine, PaymentChoice};
use super::store::{CartStore, StorageError};

/// Owns the cart state, the durable store, and the transient interaction
/// state (pending removal target and an open composition, if any).
pub struct CartService {
    state: CartState,
    store: CartStore,
    pending_removal: Option<String>,
    composition: Option<PendingComposition>,
}

impl CartService {
    /// Build a service over a store, loading any persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    pub fn new(store: CartStore) -> Result<Self, StorageError> {
        let state = store.load()?;
        Ok(Self {
            state,
            store,
            pending_removal: None,
            composition: None,
        })
    }

    /// The current cart state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.state.subtotal()
    }

    /// Subtotal plus delivery fee.
    #[must_use]
    pub fn total(&self) -> Price {
        self.state.total()
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Add one unit of a bare item (no options dialog). Merges into an
    /// existing line with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting fails.
    pub fn add(&mut self, name: &str, unit_price: Price) -> Result<(), StorageError> {
        self.merge_line(OrderLine {
            name: name.to_string(),
            base_name: name.to_string(),
            unit_price,
            quantity: 1,
            options: super::state::LineOptions::default(),
        });
        self.persist()
    }

    /// Adjust a line's quantity by `delta`, flooring at 1. Reaching the
    /// floor never removes the line; removal is its own explicit action.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting fails.
    pub fn update_quantity(&mut self, name: &str, delta: i64) -> Result<(), StorageError> {
        if let Some(line) = self.state.lines.iter_mut().find(|line| line.name == name) {
            let quantity = i64::from(line.quantity).saturating_add(delta);
            // Saturate at both ends: the floor is 1, overflow pins at max.
            line.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
            self.persist()?;
        }
        Ok(())
    }

    /// Mark a line for removal; nothing is deleted until confirmed.
    pub fn request_remove(&mut self, name: &str) {
        self.pending_removal = Some(name.to_string());
    }

    /// The line currently awaiting removal confirmation, if any.
    #[must_use]
    pub fn pending_removal(&self) -> Option<&str> {
        self.pending_removal.as_deref()
    }

    /// Drop the pending removal without deleting anything.
    pub fn cancel_remove(&mut self) {
        self.pending_removal = None;
    }

    /// Delete every line matching the pending removal target.
    ///
    /// Returns the removed name, or `None` when no removal was pending.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting fails.
    pub fn confirm_remove(&mut self) -> Result<Option<String>, StorageError> {
        let Some(name) = self.pending_removal.take() else {
            return Ok(None);
        };
        self.state.lines.retain(|line| line.name != name);
        self.persist()?;
        Ok(Some(name))
    }

    /// Empty the cart and reset every peripheral selection to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.state = CartState::default();
        self.pending_removal = None;
        self.composition = None;
        self.persist()
    }

    // =========================================================================
    // Peripheral selections
    // =========================================================================

    /// Select a delivery zone, or clear the selection. Fee and zone label
    /// are always set together.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting fails.
    pub fn set_delivery(&mut self, zone: Option<&DeliveryZone>) -> Result<(), StorageError> {
        self.state.delivery = zone.map_or_else(DeliverySelection::default, |zone| {
            DeliverySelection {
                fee: zone.fee,
                neighborhood_label: zone.label(),
            }
        });
        self.persist()
    }

    /// Replace the delivery address.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting fails.
    pub fn set_address(&mut self, address: Address) -> Result<(), StorageError> {
        self.state.address = address;
        self.persist()
    }

    /// Select the payment method. The change-for amount only survives for
    /// cash payments.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting fails.
    pub fn set_payment(
        &mut self,
        method: Option<PaymentMethod>,
        change_for: &str,
    ) -> Result<(), StorageError> {
        let change_for = if method == Some(PaymentMethod::Cash) {
            change_for.to_string()
        } else {
            String::new()
        };
        self.state.payment = PaymentChoice { method, change_for };
        self.persist()
    }

    /// Set the condiment sachet toggles.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting fails.
    pub fn set_condiments(&mut self, condiments: Condiments) -> Result<(), StorageError> {
        self.state.condiments = condiments;
        self.persist()
    }

    // =========================================================================
    // Option composition
    // =========================================================================

    /// Open the options dialog for a catalog item.
    pub fn open_composer(&mut self, item: &CatalogItem, mode: CompositionMode) {
        self.composition = Some(PendingComposition::open(item, mode));
    }

    /// Reopen the dialog for the line at `index`, pre-selecting its stored
    /// options. Returns `false` when the index does not exist.
    pub fn open_composer_for_edit(&mut self, index: usize, catalog: &[CatalogItem]) -> bool {
        let Some(line) = self.state.lines.get(index) else {
            return false;
        };
        self.composition = Some(PendingComposition::open_for_edit(line, index, catalog));
        true
    }

    /// The open composition, if any.
    #[must_use]
    pub const fn composition(&self) -> Option<&PendingComposition> {
        self.composition.as_ref()
    }

    /// Mutable access for selection changes; `None` when no dialog is open.
    pub const fn composition_mut(&mut self) -> Option<&mut PendingComposition> {
        self.composition.as_mut()
    }

    /// Discard the open composition without committing.
    pub fn cancel_composition(&mut self) {
        self.composition = None;
    }

    /// Commit the open composition: price it against the settings, then
    /// either replace the edited line (preserving its quantity) or merge it
    /// into the ledger. The composition is discarded either way.
    ///
    /// Returns the committed line's composed name, or `None` when no
    /// composition was open.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting fails.
    pub fn commit_composition(
        &mut self,
        settings: &MenuSettings,
    ) -> Result<Option<String>, StorageError> {
        let Some(composition) = self.composition.take() else {
            return Ok(None);
        };
        let line = composition.compose(settings);
        let name = line.name.clone();

        if let Some(index) = composition.editing_line
            && let Some(existing) = self.state.lines.get_mut(index)
        {
            let quantity = existing.quantity;
            *existing = OrderLine { quantity, ..line };
        } else {
            self.merge_line(line);
        }

        self.persist()?;
        Ok(Some(name))
    }

    /// Toggle an add-on on the open composition.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::AddOnLimit`] when the cap is hit.
    pub fn toggle_add_on(&mut self, label: &str) -> Result<(), ComposerError> {
        if let Some(composition) = self.composition.as_mut() {
            composition.toggle_add_on(label)?;
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Append a line, or merge into an existing line with the exact same
    /// composed name by incrementing its quantity.
    fn merge_line(&mut self, line: OrderLine) {
        if let Some(existing) = self
            .state
            .lines
            .iter_mut()
            .find(|existing| existing.name == line.name)
        {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.state.lines.push(line);
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.store.save(&self.state)?;
        debug!(
            lines = self.state.lines.len(),
            items = self.state.total_items(),
            "Cart state persisted"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::store::MemoryStore;
    use localburger_core::{Category, OptionSetting};

    fn service() -> CartService {
        CartService::new(CartStore::new(Box::new(MemoryStore::new()))).unwrap()
    }

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
        MenuSettings {
            combos: vec![OptionSetting {
                name: "Combo Batata + Refri".to_string(),
                price: Price::from_cents(1200),
                active: true,
            }],
            add_ons: vec![OptionSetting {
                name: "Bacon".to_string(),
                price: Price::from_cents(800),
                active: true,
            }],
            green_mayo: Some(OptionSetting {
                name: "Maionese verde".to_string(),
                price: Price::from_cents(400),
                active: true,
            }),
            delivery_zones: vec![DeliveryZone {
                neighborhood: "Centro".to_string(),
                fee: Price::from_cents(500),
                active: true,
            }],
        }
    }

    #[test]
    fn test_repeated_add_merges_into_one_line() {
        let mut cart = service();
        for _ in 0..3 {
            cart.add("Classic Burger", Price::from_cents(3000)).unwrap();
        }
        assert_eq!(cart.state().lines.len(), 1);
        assert_eq!(cart.state().lines[0].quantity, 3);
    }

    #[test]
    fn test_worked_example_from_menu() {
        let mut cart = service();
        cart.add("Classic Burger", Price::from_cents(3000)).unwrap();
        cart.add("Classic Burger", Price::from_cents(3000)).unwrap();
        assert_eq!(cart.subtotal().to_string(), "R$ 60,00");

        cart.update_quantity("Classic Burger", -1).unwrap();
        assert_eq!(cart.subtotal().to_string(), "R$ 30,00");

        let zones = settings().delivery_zones;
        cart.set_delivery(zones.first()).unwrap();
        assert_eq!(cart.total().to_string(), "R$ 35,00");
    }

    #[test]
    fn test_quantity_floors_at_one() {
        let mut cart = service();
        cart.add("Suco", Price::from_cents(800)).unwrap();
        cart.update_quantity("Suco", -999).unwrap();
        assert_eq!(cart.state().lines[0].quantity, 1);
        // The line is still there; removal is explicit.
        assert_eq!(cart.state().lines.len(), 1);
    }

    #[test]
    fn test_quantity_saturates_at_max_instead_of_wrapping() {
        let mut cart = service();
        cart.add("Suco", Price::from_cents(800)).unwrap();
        cart.update_quantity("Suco", i64::MAX).unwrap();
        assert_eq!(cart.state().lines[0].quantity, u32::MAX);

        // A further bump stays pinned rather than collapsing back down.
        cart.update_quantity("Suco", 1).unwrap();
        assert_eq!(cart.state().lines[0].quantity, u32::MAX);
    }

    #[test]
    fn test_two_step_removal() {
        let mut cart = service();
        cart.add("Suco", Price::from_cents(800)).unwrap();

        cart.request_remove("Suco");
        assert_eq!(cart.pending_removal(), Some("Suco"));
        cart.cancel_remove();
        assert_eq!(cart.state().lines.len(), 1);

        cart.request_remove("Suco");
        assert_eq!(cart.confirm_remove().unwrap().as_deref(), Some("Suco"));
        assert!(cart.state().lines.is_empty());

        // Confirming with nothing pending is a no-op.
        assert!(cart.confirm_remove().unwrap().is_none());
    }

    #[test]
    fn test_distinct_option_sets_are_distinct_lines() {
        let mut cart = service();
        let smash = item("Smash", 2499, Category::Smash);

        cart.open_composer(&smash, CompositionMode::Full);
        cart.commit_composition(&settings()).unwrap();

        cart.open_composer(&smash, CompositionMode::Full);
        cart.toggle_add_on("Bacon").unwrap();
        cart.commit_composition(&settings()).unwrap();

        // Same composed config merges instead.
        cart.open_composer(&smash, CompositionMode::Full);
        cart.toggle_add_on("Bacon").unwrap();
        cart.commit_composition(&settings()).unwrap();

        assert_eq!(cart.state().lines.len(), 2);
        assert_eq!(cart.state().lines[0].name, "Smash");
        assert_eq!(cart.state().lines[1].name, "Smash (Bacon)");
        assert_eq!(cart.state().lines[1].quantity, 2);
    }

    #[test]
    fn test_edit_replaces_line_preserving_quantity() {
        let mut cart = service();
        let smash = item("Smash", 2499, Category::Smash);
        let catalog = vec![smash.clone()];

        cart.open_composer(&smash, CompositionMode::Full);
        cart.toggle_add_on("Bacon").unwrap();
        cart.commit_composition(&settings()).unwrap();
        cart.update_quantity("Smash (Bacon)", 2).unwrap();

        assert!(cart.open_composer_for_edit(0, &catalog));
        let composition = cart.composition_mut().unwrap();
        composition.set_green_mayo(true);
        cart.commit_composition(&settings()).unwrap();

        assert_eq!(cart.state().lines.len(), 1);
        let line = &cart.state().lines[0];
        assert_eq!(line.name, "Smash (Bacon, Maionese verde)");
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price, Price::from_cents(3699));
    }

    #[test]
    fn test_edit_of_missing_index_is_rejected() {
        let mut cart = service();
        assert!(!cart.open_composer_for_edit(5, &[]));
        assert!(cart.composition().is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = service();
        cart.add("Suco", Price::from_cents(800)).unwrap();
        cart.set_delivery(settings().delivery_zones.first()).unwrap();
        cart.set_payment(Some(PaymentMethod::Cash), "100").unwrap();
        cart.set_condiments(Condiments {
            ketchup: true,
            mustard: false,
        })
        .unwrap();

        cart.clear().unwrap();
        assert_eq!(cart.state(), &CartState::default());
    }

    #[test]
    fn test_delivery_fee_and_label_set_together() {
        let mut cart = service();
        cart.set_delivery(settings().delivery_zones.first()).unwrap();
        assert!(cart.state().delivery.is_selected());
        assert_eq!(cart.state().delivery.fee, Price::from_cents(500));

        cart.set_delivery(None).unwrap();
        assert!(!cart.state().delivery.is_selected());
        assert!(cart.state().delivery.fee.is_zero());
    }

    #[test]
    fn test_change_for_cleared_for_non_cash() {
        let mut cart = service();
        cart.set_payment(Some(PaymentMethod::Cash), "100").unwrap();
        assert_eq!(cart.state().payment.change_for, "100");

        cart.set_payment(Some(PaymentMethod::Pix), "100").unwrap();
        assert!(cart.state().payment.change_for.is_empty());
    }

    #[test]
    fn test_state_survives_service_restart() {
        let shared = std::sync::Arc::new(MemoryStore::new());

        struct Shared(std::sync::Arc<MemoryStore>);
        impl crate::cart::store::KeyValueStore for Shared {
            fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
                self.0.get(key)
            }
            fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
                self.0.set(key, value)
            }
        }

        {
            let store = CartStore::new(Box::new(Shared(shared.clone())));
            let mut cart = CartService::new(store).unwrap();
            cart.add("Suco", Price::from_cents(800)).unwrap();
            cart.set_payment(Some(PaymentMethod::Pix), "").unwrap();
        }

        let store = CartStore::new(Box::new(Shared(shared)));
        let cart = CartService::new(store).unwrap();
        assert_eq!(cart.state().lines.len(), 1);
        assert_eq!(cart.state().payment.method, Some(PaymentMethod::Pix));
    }
}
