//! Core types for LocalBurger.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod catalog;
pub mod payment;
pub mod price;
pub mod settings;

pub use address::Address;
pub use catalog::{CatalogItem, Category};
pub use payment::PaymentMethod;
pub use price::Price;
pub use settings::{DeliveryZone, MenuSettings, OptionSetting};
