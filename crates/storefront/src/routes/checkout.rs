//! Checkout handler.
//!
//! Checkout does not take payments; it hands the composed order off to
//! WhatsApp. Precondition failures render as notices so the customer can
//! fix the cart and try again.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse, response::Response};
use tracing::instrument;

use crate::routes::cart::NoticeTemplate;
use crate::state::AppState;
use crate::whatsapp;

/// Checkout redirect fragment: HTMX opens the WhatsApp URL client-side.
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_redirect.html")]
pub struct CheckoutRedirectTemplate {
    pub url: String,
}

/// Validate the cart and hand the order off to WhatsApp.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Response {
    let cart = state.cart().lock().await;
    let result = whatsapp::checkout_url(cart.state(), &state.config().whatsapp_number);
    drop(cart);

    match result {
        Ok(url) => CheckoutRedirectTemplate { url }.into_response(),
        Err(e) => NoticeTemplate {
            message: e.to_string(),
        }
        .into_response(),
    }
}
