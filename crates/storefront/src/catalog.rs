//! Client for the product/settings read API.
//!
//! The menu catalog and option settings are managed in the admin dashboard
//! and served as JSON envelopes (`{ success, products }` and
//! `{ success, settings }`). This client fetches both, filters to active
//! entries, and caches the results with `moka` (5-minute TTL) so every cart
//! interaction does not refetch the menu.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use localburger_core::{CatalogItem, MenuSettings};

/// Errors from the product/settings API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered but reported failure.
    #[error("API error: {0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    products: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
struct SettingsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    settings: MenuSettings,
}

/// Cached API responses. `moka` values must be cheap to clone, so payloads
/// sit behind `Arc`.
#[derive(Clone)]
enum CacheValue {
    Products(Arc<Vec<CatalogItem>>),
    Settings(Arc<MenuSettings>),
}

const PRODUCTS_KEY: &str = "products";
const SETTINGS_KEY: &str = "settings";

/// Client for the read side of the product/settings service.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<&'static str, CacheValue>,
}

impl CatalogClient {
    /// Create a client for the API rooted at `base_url` (e.g.
    /// `https://localburger.com.br/api`).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Active catalog items, cached.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the API is unreachable or reports
    /// failure. Callers degrade to their last-known state on error.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<CatalogItem>>, CatalogError> {
        let value = self
            .inner
            .cache
            .try_get_with(PRODUCTS_KEY, self.fetch_products())
            .await
            .map_err(flatten_cache_error)?;
        match value {
            CacheValue::Products(products) => Ok(products),
            CacheValue::Settings(_) => unreachable!("products key holds products"),
        }
    }

    /// Active option settings, cached.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the API is unreachable or reports
    /// failure.
    #[instrument(skip(self))]
    pub async fn settings(&self) -> Result<Arc<MenuSettings>, CatalogError> {
        let value = self
            .inner
            .cache
            .try_get_with(SETTINGS_KEY, self.fetch_settings())
            .await
            .map_err(flatten_cache_error)?;
        match value {
            CacheValue::Settings(settings) => Ok(settings),
            CacheValue::Products(_) => unreachable!("settings key holds settings"),
        }
    }

    /// Find an active catalog item by display name (trimmed exact match).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the catalog cannot be fetched.
    pub async fn find_item(&self, name: &str) -> Result<Option<CatalogItem>, CatalogError> {
        let products = self.products().await?;
        Ok(products
            .iter()
            .find(|item| item.name.trim() == name.trim())
            .cloned())
    }

    async fn fetch_products(&self) -> Result<CacheValue, CatalogError> {
        let url = format!("{}/products", self.inner.base_url);
        let envelope: ProductsEnvelope = self
            .inner
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !envelope.success {
            return Err(CatalogError::Api("products request failed".to_string()));
        }

        let products: Vec<CatalogItem> = envelope
            .products
            .into_iter()
            .filter(|item| item.active)
            .collect();
        debug!(count = products.len(), "Fetched active products");
        Ok(CacheValue::Products(Arc::new(products)))
    }

    async fn fetch_settings(&self) -> Result<CacheValue, CatalogError> {
        let url = format!("{}/settings", self.inner.base_url);
        let envelope: SettingsEnvelope = self
            .inner
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !envelope.success {
            return Err(CatalogError::Api("settings request failed".to_string()));
        }

        Ok(CacheValue::Settings(Arc::new(
            envelope.settings.only_active(),
        )))
    }
}

/// `moka::try_get_with` wraps init errors in `Arc`; unwrap back into our
/// error type, cloning the message when the `Arc` is shared.
fn flatten_cache_error(err: Arc<CatalogError>) -> CatalogError {
    Arc::try_unwrap(err).unwrap_or_else(|shared| match &*shared {
        CatalogError::Http(_) => CatalogError::Api(shared.to_string()),
        CatalogError::Api(msg) => CatalogError::Api(msg.clone()),
    })
}
