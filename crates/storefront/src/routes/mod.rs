//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Menu page (with cart panel)
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart/panel             - Full cart panel fragment
//! GET  /cart/count             - Cart count badge fragment
//! POST /cart/add               - Add item (direct, or opens options dialog)
//! POST /cart/quantity          - Adjust line quantity (floored at 1)
//! POST /cart/remove            - Request removal (confirm dialog)
//! POST /cart/remove/confirm    - Confirm pending removal
//! POST /cart/remove/cancel     - Cancel pending removal
//! POST /cart/clear             - Clear cart and peripheral selections
//! POST /cart/edit              - Reopen options dialog for a line
//! POST /cart/delivery          - Select delivery zone
//! POST /cart/address           - Save delivery address
//! POST /cart/address/lookup    - CEP lookup, fills address fields
//! POST /cart/payment           - Select payment method
//! POST /cart/condiments        - Toggle condiment sachets
//!
//! # Options dialog (HTMX fragments)
//! POST /options/combo          - Select combo (radio, "none" clears)
//! POST /options/addon          - Toggle add-on (capped at 6)
//! POST /options/mayo           - Toggle green mayo
//! POST /options/commit         - Commit composition to the cart
//! POST /options/cancel         - Discard composition
//!
//! # Checkout
//! POST /checkout               - Validate and redirect to WhatsApp
//! ```

pub mod cart;
pub mod checkout;
pub mod menu;
pub mod options;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/panel", get(cart::panel))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/quantity", post(cart::quantity))
        .route("/remove", post(cart::remove))
        .route("/remove/confirm", post(cart::remove_confirm))
        .route("/remove/cancel", post(cart::remove_cancel))
        .route("/clear", post(cart::clear))
        .route("/edit", post(cart::edit))
        .route("/delivery", post(cart::delivery))
        .route("/address", post(cart::address))
        .route("/address/lookup", post(cart::cep_lookup))
        .route("/payment", post(cart::payment))
        .route("/condiments", post(cart::condiments))
}

/// Create the options dialog routes router.
pub fn options_routes() -> Router<AppState> {
    Router::new()
        .route("/combo", post(options::combo))
        .route("/addon", post(options::add_on))
        .route("/mayo", post(options::mayo))
        .route("/commit", post(options::commit))
        .route("/cancel", post(options::cancel))
}

/// Create the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::index))
        .route("/health", get(menu::health))
        .nest("/cart", cart_routes())
        .nest("/options", options_routes())
        .route("/checkout", post(checkout::checkout))
}
