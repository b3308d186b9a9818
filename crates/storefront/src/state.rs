//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cart::{CartService, CartStore, FileStore, StorageError};
use crate::catalog::CatalogClient;
use crate::cep::CepClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The cart service sits behind an async mutex:
/// it is the single writer over the session state, and every mutation runs
/// to completion while the lock is held.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cep: CepClient,
    cart: Mutex<CartService>,
}

impl AppState {
    /// Create the application state, opening the cart store file and loading
    /// any persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart store cannot be opened.
    pub fn new(config: StorefrontConfig) -> Result<Self, StorageError> {
        let catalog = CatalogClient::new(&config.menu_api_url);
        let cep = CepClient::new(&config.cep_api_url);
        let store = CartStore::new(Box::new(FileStore::open(&config.cart_path)?));
        let cart = CartService::new(store)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cep,
                cart: Mutex::new(cart),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product/settings API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the CEP lookup client.
    #[must_use]
    pub fn cep(&self) -> &CepClient {
        &self.inner.cep
    }

    /// Get the cart service lock.
    #[must_use]
    pub fn cart(&self) -> &Mutex<CartService> {
        &self.inner.cart
    }
}
