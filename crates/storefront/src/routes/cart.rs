//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation returns the refreshed cart panel fragment and fires the
//! `cart-updated` trigger so the count badge refreshes itself. Handlers
//! dispatch intents to the [`CartService`]; no handler reads UI state back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use localburger_core::{Address, MenuSettings, PaymentMethod};

use crate::cart::{CartService, CompositionMode, Condiments};
use crate::error::AppError;
use crate::routes::options::OptionsModalTemplate;
use crate::state::AppState;

/// One ledger line as displayed in the cart panel.
#[derive(Clone)]
pub struct CartLineView {
    pub index: usize,
    pub name: String,
    pub quantity: u32,
    pub line_price: String,
}

/// A delivery zone option in the selector.
#[derive(Clone)]
pub struct ZoneView {
    pub neighborhood: String,
    pub label: String,
    pub selected: bool,
}

/// Cart panel display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: String,
    pub delivery_fee: String,
    pub total: String,
    pub zones: Vec<ZoneView>,
    pub address: Address,
    pub pay_credit: bool,
    pub pay_debit: bool,
    pub pay_pix: bool,
    pub pay_cash: bool,
    pub change_for: String,
    pub ketchup: bool,
    pub mustard: bool,
}

impl CartView {
    /// Project the cart state (plus the current delivery zone table) into
    /// display data.
    #[must_use]
    pub fn build(cart: &CartService, settings: &MenuSettings) -> Self {
        let state = cart.state();
        let lines = state
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| CartLineView {
                index,
                name: line.name.clone(),
                quantity: line.quantity,
                line_price: line.line_total().to_string(),
            })
            .collect();

        let zones = settings
            .delivery_zones
            .iter()
            .map(|zone| ZoneView {
                neighborhood: zone.neighborhood.clone(),
                label: zone.label(),
                selected: state.delivery.neighborhood_label == zone.label(),
            })
            .collect();

        let method = state.payment.method;
        Self {
            lines,
            item_count: state.total_items(),
            subtotal: state.subtotal().to_string(),
            delivery_fee: state.delivery.fee.to_string(),
            total: state.total().to_string(),
            zones,
            address: state.address.clone(),
            pay_credit: method == Some(PaymentMethod::Credit),
            pay_debit: method == Some(PaymentMethod::Debit),
            pay_pix: method == Some(PaymentMethod::Pix),
            pay_cash: method == Some(PaymentMethod::Cash),
            change_for: state.payment.change_for.clone(),
            ketchup: state.condiments.ketchup,
            mustard: state.condiments.mustard,
        }
    }
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Removal confirmation dialog fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/confirm_remove.html")]
pub struct ConfirmRemoveTemplate {
    pub name: String,
}

/// Transient notice fragment template (toast).
#[derive(Template, WebTemplate)]
#[template(path = "partials/notice.html")]
pub struct NoticeTemplate {
    pub message: String,
}

// =============================================================================
// Form payloads
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub name: String,
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryForm {
    /// Selected neighborhood, empty to clear the selection.
    #[serde(default)]
    pub neighborhood: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressForm {
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

#[derive(Debug, Deserialize)]
pub struct CepLookupForm {
    #[serde(default)]
    pub cep: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub method: String,
    #[serde(default)]
    pub change_for: String,
}

#[derive(Debug, Deserialize)]
pub struct CondimentsForm {
    /// Checkbox values; absent means unchecked.
    #[serde(default)]
    pub ketchup: Option<String>,
    #[serde(default)]
    pub mustard: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Current settings, or defaults when the settings service is unreachable.
/// The cart itself must keep working without the settings service.
pub async fn settings_or_default(state: &AppState) -> MenuSettings {
    match state.catalog().settings().await {
        Ok(settings) => (*settings).clone(),
        Err(e) => {
            tracing::warn!("Falling back to empty settings: {e}");
            MenuSettings::default()
        }
    }
}

/// The refreshed cart panel plus the `cart-updated` trigger.
///
/// Mutations can originate from elements targeting the dialog or notice
/// containers; the retarget headers steer the fragment back into the panel
/// regardless. The panel itself clears the dialog out-of-band.
pub(crate) async fn panel_response(state: &AppState) -> Response {
    let settings = settings_or_default(state).await;
    let cart = state.cart().lock().await;
    let view = CartView::build(&cart, &settings);
    drop(cart);
    (
        AppendHeaders([
            ("HX-Trigger", "cart-updated"),
            ("HX-Retarget", "#cart-panel"),
            ("HX-Reswap", "innerHTML"),
        ]),
        CartPanelTemplate { cart: view },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Cart panel fragment.
#[instrument(skip(state))]
pub async fn panel(State(state): State<AppState>) -> Response {
    let settings = settings_or_default(&state).await;
    let cart = state.cart().lock().await;
    let view = CartView::build(&cart, &settings);
    drop(cart);
    CartPanelTemplate { cart: view }.into_response()
}

/// Cart count badge fragment.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    let cart = state.cart().lock().await;
    CartCountTemplate {
        count: cart.state().total_items(),
    }
}

/// Add an item by catalog name.
///
/// Burgers and smashes open the full options dialog, sides open the
/// condiment-only dialog, and everything else is added directly.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddForm>,
) -> Result<Response, AppError> {
    let Some(item) = state.catalog().find_item(&form.name).await? else {
        return Ok(NoticeTemplate {
            message: "Produto indisponível no momento.".to_string(),
        }
        .into_response());
    };

    if let Some(mode) = CompositionMode::for_category(item.category) {
        let settings = settings_or_default(&state).await;
        let mut cart = state.cart().lock().await;
        cart.open_composer(&item, mode);
        let modal = OptionsModalTemplate::from_composition(&cart, &settings);
        drop(cart);
        return match modal {
            Some(modal) => Ok(modal.into_response()),
            None => Ok(panel_response(&state).await),
        };
    }

    {
        let mut cart = state.cart().lock().await;
        cart.add(&item.name, item.price)?;
    }
    Ok(panel_response(&state).await)
}

/// Adjust a line quantity by a signed delta (floored at 1).
#[instrument(skip(state))]
pub async fn quantity(
    State(state): State<AppState>,
    Form(form): Form<QuantityForm>,
) -> Result<Response, AppError> {
    {
        let mut cart = state.cart().lock().await;
        cart.update_quantity(&form.name, form.delta)?;
    }
    Ok(panel_response(&state).await)
}

/// Request removal of a line: returns the confirmation dialog, nothing is
/// deleted yet.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveForm>,
) -> impl IntoResponse {
    let mut cart = state.cart().lock().await;
    cart.request_remove(&form.name);
    ConfirmRemoveTemplate { name: form.name }
}

/// Confirm the pending removal.
#[instrument(skip(state))]
pub async fn remove_confirm(State(state): State<AppState>) -> Result<Response, AppError> {
    {
        let mut cart = state.cart().lock().await;
        cart.confirm_remove()?;
    }
    Ok(panel_response(&state).await)
}

/// Cancel the pending removal; clears the dialog.
#[instrument(skip(state))]
pub async fn remove_cancel(State(state): State<AppState>) -> impl IntoResponse {
    let mut cart = state.cart().lock().await;
    cart.cancel_remove();
    Html("")
}

/// Clear the cart and every peripheral selection.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Response, AppError> {
    {
        let mut cart = state.cart().lock().await;
        cart.clear()?;
    }
    Ok(panel_response(&state).await)
}

/// Reopen the options dialog for an existing line, options pre-selected.
#[instrument(skip(state))]
pub async fn edit(
    State(state): State<AppState>,
    Form(form): Form<EditForm>,
) -> Result<Response, AppError> {
    let catalog = match state.catalog().products().await {
        Ok(products) => (*products).clone(),
        Err(e) => {
            // Editing still works without the catalog; the base price then
            // falls back to the line's own unit price.
            tracing::warn!("Editing without catalog: {e}");
            Vec::new()
        }
    };
    let settings = settings_or_default(&state).await;

    let mut cart = state.cart().lock().await;
    if !cart.open_composer_for_edit(form.index, &catalog) {
        drop(cart);
        return Ok(panel_response(&state).await);
    }
    let modal = OptionsModalTemplate::from_composition(&cart, &settings);
    drop(cart);
    match modal {
        Some(modal) => Ok(modal.into_response()),
        None => Ok(panel_response(&state).await),
    }
}

/// Select (or clear) the delivery zone. Fee and label always move together.
#[instrument(skip(state))]
pub async fn delivery(
    State(state): State<AppState>,
    Form(form): Form<DeliveryForm>,
) -> Result<Response, AppError> {
    let settings = settings_or_default(&state).await;
    let zone = settings
        .delivery_zones
        .iter()
        .find(|zone| zone.neighborhood == form.neighborhood);

    {
        let mut cart = state.cart().lock().await;
        cart.set_delivery(zone)?;
    }
    Ok(panel_response(&state).await)
}

/// Save the delivery address.
#[instrument(skip(state))]
pub async fn address(
    State(state): State<AppState>,
    Form(form): Form<AddressForm>,
) -> Result<Response, AppError> {
    {
        let mut cart = state.cart().lock().await;
        cart.set_address(Address {
            cep: form.cep,
            street: form.street,
            number: form.number,
            complement: form.complement,
            neighborhood: form.neighborhood,
            city: form.city,
            state: form.state,
        })?;
    }
    Ok(panel_response(&state).await)
}

/// Look up a CEP and fill the address fields from the result. Lookup
/// failure is a retryable notice, not an error response.
#[instrument(skip(state))]
pub async fn cep_lookup(
    State(state): State<AppState>,
    Form(form): Form<CepLookupForm>,
) -> Result<Response, AppError> {
    let found = match state.cep().lookup(&form.cep).await {
        Ok(found) => found,
        Err(e) => {
            return Ok(NoticeTemplate {
                message: e.to_string(),
            }
            .into_response());
        }
    };

    {
        let mut cart = state.cart().lock().await;
        let mut address = cart.state().address.clone();
        address.cep = form.cep;
        address.street = found.street;
        address.neighborhood = found.neighborhood;
        address.city = found.city;
        address.state = found.state;
        cart.set_address(address)?;
    }
    Ok(panel_response(&state).await)
}

/// Select the payment method; change-for only survives for cash.
#[instrument(skip(state))]
pub async fn payment(
    State(state): State<AppState>,
    Form(form): Form<PaymentForm>,
) -> Result<Response, AppError> {
    let method = PaymentMethod::from_wire(&form.method);
    if method.is_none() && !form.method.is_empty() {
        return Err(AppError::BadRequest(format!(
            "unknown payment method: {}",
            form.method
        )));
    }

    {
        let mut cart = state.cart().lock().await;
        cart.set_payment(method, &form.change_for)?;
    }
    Ok(panel_response(&state).await)
}

/// Toggle the condiment sachets.
#[instrument(skip(state))]
pub async fn condiments(
    State(state): State<AppState>,
    Form(form): Form<CondimentsForm>,
) -> Result<Response, AppError> {
    {
        let mut cart = state.cart().lock().await;
        cart.set_condiments(Condiments {
            ketchup: form.ketchup.is_some(),
            mustard: form.mustard.is_some(),
        })?;
    }
    Ok(panel_response(&state).await)
}
