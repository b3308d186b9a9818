//! Options dialog handlers.
//!
//! Every selection change re-renders the whole dialog from the pending
//! composition, so prices, the running total and the add-on counter can
//! never drift from the selections.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use localburger_core::{MenuSettings, OptionSetting};

use crate::cart::{CartService, CompositionMode, MAX_ADD_ONS, PendingComposition};
use crate::error::AppError;
use crate::routes::cart::panel_response;
use crate::state::AppState;

/// One selectable option row in the dialog.
#[derive(Clone)]
pub struct OptionRow {
    pub name: String,
    pub price: String,
    pub selected: bool,
    pub disabled: bool,
}

impl OptionRow {
    fn new(setting: &OptionSetting, selected: bool, disabled: bool) -> Self {
        Self {
            name: setting.name.clone(),
            price: setting.price.to_string(),
            selected,
            disabled,
        }
    }
}

/// Options dialog fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/options_modal.html")]
pub struct OptionsModalTemplate {
    pub base_name: String,
    pub base_price: String,
    pub full_mode: bool,
    pub editing: bool,
    pub no_combo: bool,
    pub combos: Vec<OptionRow>,
    pub add_ons: Vec<OptionRow>,
    pub green_mayo: Option<OptionRow>,
    pub add_on_count: usize,
    pub max_add_ons: usize,
    pub total: String,
}

impl OptionsModalTemplate {
    /// Render the open composition against the current settings, or `None`
    /// when no dialog is open.
    #[must_use]
    pub fn from_composition(cart: &CartService, settings: &MenuSettings) -> Option<Self> {
        cart.composition()
            .map(|composition| Self::build(composition, settings))
    }

    fn build(composition: &PendingComposition, settings: &MenuSettings) -> Self {
        let full_mode = composition.mode == CompositionMode::Full;
        let capped = composition.add_ons_capped();

        let combos = settings
            .combos
            .iter()
            .map(|combo| OptionRow::new(combo, composition.has_combo(&combo.name), false))
            .collect();

        let add_ons = settings
            .add_ons
            .iter()
            .map(|add_on| {
                let selected = composition.has_add_on(&add_on.name);
                OptionRow::new(add_on, selected, capped && !selected)
            })
            .collect();

        let green_mayo = settings
            .green_mayo
            .as_ref()
            .map(|mayo| OptionRow::new(mayo, composition.green_mayo, false));

        Self {
            base_name: composition.base_name.clone(),
            base_price: composition.base_price.to_string(),
            full_mode,
            editing: composition.editing_line.is_some(),
            no_combo: composition.combo.is_none(),
            combos,
            add_ons,
            green_mayo,
            add_on_count: composition.add_ons.len(),
            max_add_ons: MAX_ADD_ONS,
            total: composition.total(settings).to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ComboForm {
    /// Combo label, or `"none"` for "sem combo".
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddOnForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MayoForm {
    /// Checkbox value; absent means unchecked.
    #[serde(default)]
    pub on: Option<String>,
}

/// Re-render the dialog, or fall back to the cart panel when no
/// composition is open (stale fragment after a commit or cancel).
async fn modal_or_panel(state: &AppState) -> Response {
    let settings = super::cart::settings_or_default(state).await;
    let cart = state.cart().lock().await;
    let Some(composition) = cart.composition() else {
        drop(cart);
        return panel_response(state).await;
    };
    let modal = OptionsModalTemplate::build(composition, &settings);
    drop(cart);
    modal.into_response()
}

/// Select a combo. Radio semantics; `"none"` clears the selection.
#[instrument(skip(state))]
pub async fn combo(State(state): State<AppState>, Form(form): Form<ComboForm>) -> Response {
    {
        let mut cart = state.cart().lock().await;
        if let Some(composition) = cart.composition_mut() {
            let combo = if form.name == "none" {
                None
            } else {
                Some(form.name)
            };
            composition.set_combo(combo);
        }
    }
    modal_or_panel(&state).await
}

/// Toggle an add-on. Hitting the cap leaves the selection unchanged; the
/// re-rendered dialog shows the remaining rows disabled.
#[instrument(skip(state))]
pub async fn add_on(State(state): State<AppState>, Form(form): Form<AddOnForm>) -> Response {
    {
        let mut cart = state.cart().lock().await;
        if let Err(e) = cart.toggle_add_on(&form.name) {
            tracing::debug!("Add-on toggle rejected: {e}");
        }
    }
    modal_or_panel(&state).await
}

/// Toggle green mayo.
#[instrument(skip(state))]
pub async fn mayo(State(state): State<AppState>, Form(form): Form<MayoForm>) -> Response {
    {
        let mut cart = state.cart().lock().await;
        if let Some(composition) = cart.composition_mut() {
            composition.set_green_mayo(form.on.is_some());
        }
    }
    modal_or_panel(&state).await
}

/// Commit the composition into the ledger and close the dialog.
#[instrument(skip(state))]
pub async fn commit(State(state): State<AppState>) -> Result<Response, AppError> {
    let settings = super::cart::settings_or_default(&state).await;
    {
        let mut cart = state.cart().lock().await;
        cart.commit_composition(&settings)?;
    }
    Ok(panel_response(&state).await)
}

/// Close the dialog without committing anything.
#[instrument(skip(state))]
pub async fn cancel(State(state): State<AppState>) -> impl IntoResponse {
    let mut cart = state.cart().lock().await;
    cart.cancel_composition();
    Html("")
}
