//! WhatsApp checkout: order message formatting and the outbound deep link.
//!
//! The storefront's sole write-side effect is handing a URL-encoded order
//! message to `wa.me`. Formatting is deterministic: same state, same
//! message. The preconditions fail closed - an order with no delivery zone,
//! no street/number or no payment method is never formatted, each missing
//! piece surfacing its own user-facing notice.

use thiserror::Error;

use localburger_core::PaymentMethod;

use crate::cart::CartState;

/// Checkout preconditions that block the formatter, each with the notice
/// text shown to the customer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing in the cart; checkout silently aborts.
    #[error("Seu carrinho está vazio!")]
    EmptyCart,

    /// No delivery zone selected.
    #[error("Selecione o bairro para entrega!")]
    MissingDelivery,

    /// Street or number missing from the address.
    #[error("Preencha o endereço de entrega!")]
    MissingAddress,

    /// No payment method selected.
    #[error("Selecione a forma de pagamento!")]
    MissingPayment,
}

/// Check every checkout precondition, failing on the first missing one.
///
/// # Errors
///
/// Returns the first failing [`CheckoutError`] in fixed order: empty cart,
/// delivery zone, address, payment method.
pub fn validate(state: &CartState) -> Result<(), CheckoutError> {
    if state.lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if !state.delivery.is_selected() {
        return Err(CheckoutError::MissingDelivery);
    }
    if !state.address.is_deliverable() {
        return Err(CheckoutError::MissingAddress);
    }
    if state.payment.method.is_none() {
        return Err(CheckoutError::MissingPayment);
    }
    Ok(())
}

/// Serialize the cart into the human-readable order message.
///
/// Callers must run [`validate`] first; formatting an incomplete state
/// produces an incomplete order message (missing address or payment lines),
/// never a panic.
#[must_use]
pub fn format_order(state: &CartState) -> String {
    let mut message = String::from("Olá! Gostaria de fazer o seguinte pedido:\n\n");

    for line in &state.lines {
        message.push_str(&format!(
            "• {}x {} - {}\n",
            line.quantity,
            line.name,
            line.line_total()
        ));
    }

    let sachets = state.condiments.selected_labels();
    if sachets.is_empty() {
        message.push_str("\n*Sachês:* Não");
    } else {
        message.push_str(&format!("\n*Sachês:* {}", sachets.join(", ")));
    }

    message.push_str(&format!("\n\n*Subtotal: {}*", state.subtotal()));
    message.push_str(&format!(
        "\n*Entrega ({}): {}*",
        state.delivery.short_name(),
        state.delivery.fee
    ));
    message.push_str(&format!("\n*TOTAL: {}*", state.total()));

    let address = &state.address;
    message.push_str("\n\n📍 *Endereço de Entrega:*");
    message.push_str(&format!("\n{}, {}", address.street, address.number));
    if !address.complement.is_empty() {
        message.push_str(&format!(" - {}", address.complement));
    }
    message.push_str(&format!(
        "\n{} - {}/{}",
        address.neighborhood, address.city, address.state
    ));
    message.push_str(&format!("\nCEP: {}", address.cep));

    if let Some(method) = state.payment.method {
        message.push_str(&format!("\n\n💳 *Forma de Pagamento:* {}", method.label()));
        if method == PaymentMethod::Cash && !state.payment.change_for.is_empty() {
            message.push_str(&format!("\n*Troco para:* {}", state.payment.change_for));
        }
    }

    message
}

/// Validate the state, format the order, and build the `wa.me` deep link.
///
/// # Errors
///
/// Returns the first failing [`CheckoutError`]; no partial link is built.
pub fn checkout_url(state: &CartState, whatsapp_number: &str) -> Result<String, CheckoutError> {
    validate(state)?;
    let message = format_order(state);
    Ok(format!(
        "https://wa.me/{whatsapp_number}?text={}",
        urlencoding::encode(&message)
    ))
}
