//! The shopping-cart / order-composition engine.
//!
//! # Architecture
//!
//! - [`state`] - `CartState`, the single source of truth for the session
//! - [`service`] - `CartService`, the one writer over that state
//! - [`composer`] - transient per-item option configuration
//! - [`store`] - durable key-value persistence (five JSON blobs)
//!
//! Handlers never hold cart state of their own; they dispatch intents to the
//! service and render fragments from the resulting state.

pub mod composer;
pub mod service;
pub mod state;
pub mod store;

pub use composer::{ComposerError, CompositionMode, MAX_ADD_ONS, PendingComposition};
pub use service::CartService;
pub use state::{CartState, Condiments, DeliverySelection, LineOptions, OrderLine, PaymentChoice};
pub use store::{CartStore, FileStore, KeyValueStore, MemoryStore, StorageError};
