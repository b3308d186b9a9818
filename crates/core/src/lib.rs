//! LocalBurger Core - Shared domain types.
//!
//! This crate provides the types shared by the LocalBurger components:
//! - `storefront` - Public menu and cart site
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Prices, menu catalog entries, option settings, delivery
//!   zones, payment methods, and delivery addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
