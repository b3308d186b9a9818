//! Durable key-value persistence for the cart session.
//!
//! The cart survives restarts by round-tripping five independent JSON blobs
//! through a [`KeyValueStore`]: order lines, delivery selection, address,
//! payment choice and condiments. A blob that fails to parse is treated as
//! "empty/default" rather than propagated - a corrupt store never takes the
//! cart down.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::state::{CartState, Condiments, DeliverySelection, OrderLine, PaymentChoice};
use localburger_core::Address;

/// Storage keys, one per persisted blob.
pub mod keys {
    /// Order lines.
    pub const CART: &str = "localburger_cart";
    /// Delivery fee and zone label.
    pub const DELIVERY: &str = "localburger_delivery";
    /// Delivery address.
    pub const ADDRESS: &str = "localburger_address";
    /// Payment method and change-for amount.
    pub const PAYMENT: &str = "localburger_payment";
    /// Condiment sachets.
    pub const SACHETS: &str = "localburger_sachets";
}

/// Errors from the durable store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serializing a blob for persistence failed.
    #[error("storage encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The store mutex was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// String key-value persistence with a get/set contract.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed store: all entries live in one JSON object on disk,
/// rewritten atomically (write-new, rename) on every `set`.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries.
    ///
    /// A missing file starts empty; an unreadable or malformed file also
    /// starts empty (it will be rewritten on the next mutation).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding malformed cart store {}: {e}", path.display());
                HashMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }
}

/// In-memory store used by tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Round-trips [`CartState`] through the five storage keys.
pub struct CartStore {
    inner: Box<dyn KeyValueStore>,
}

impl CartStore {
    #[must_use]
    pub fn new(inner: Box<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Load the persisted state. Missing or malformed blobs load as their
    /// defaults; this never fails because of bad stored data.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only if the backing store itself cannot be
    /// read.
    pub fn load(&self) -> Result<CartState, StorageError> {
        Ok(CartState {
            lines: self.load_blob::<Vec<OrderLine>>(keys::CART)?,
            delivery: self.load_blob::<DeliverySelection>(keys::DELIVERY)?,
            address: self.load_blob::<Address>(keys::ADDRESS)?,
            payment: self.load_blob::<PaymentChoice>(keys::PAYMENT)?,
            condiments: self.load_blob::<Condiments>(keys::SACHETS)?,
        })
    }

    /// Persist the full state as five independent blobs.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if any blob cannot be written.
    pub fn save(&self, state: &CartState) -> Result<(), StorageError> {
        self.save_blob(keys::CART, &state.lines)?;
        self.save_blob(keys::DELIVERY, &state.delivery)?;
        self.save_blob(keys::ADDRESS, &state.address)?;
        self.save_blob(keys::PAYMENT, &state.payment)?;
        self.save_blob(keys::SACHETS, &state.condiments)?;
        Ok(())
    }

    fn load_blob<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StorageError> {
        let Some(raw) = self.inner.get(key)? else {
            return Ok(T::default());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Discarding malformed blob under {key}: {e}");
            T::default()
        }))
    }

    fn save_blob<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.inner.set(key, &raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::state::LineOptions;
    use localburger_core::{PaymentMethod, Price};

    fn sample_state() -> CartState {
        CartState {
            lines: vec![OrderLine {
                name: "Smash (Bacon, Maionese verde)".to_string(),
                base_name: "Smash".to_string(),
                unit_price: Price::from_cents(3699),
                quantity: 2,
                options: LineOptions {
                    combo: None,
                    add_ons: vec!["Bacon".to_string()],
                    green_mayo: true,
                },
            }],
            delivery: DeliverySelection {
                fee: Price::from_cents(500),
                neighborhood_label: "Centro - R$ 5,00".to_string(),
            },
            address: Address {
                cep: "12345-678".to_string(),
                street: "Rua das Flores".to_string(),
                number: "42".to_string(),
                complement: "Apto 3".to_string(),
                neighborhood: "Centro".to_string(),
                city: "Taubaté".to_string(),
                state: "SP".to_string(),
            },
            payment: PaymentChoice {
                method: Some(PaymentMethod::Cash),
                change_for: "100".to_string(),
            },
            condiments: Condiments {
                ketchup: true,
                mustard: false,
            },
        }
    }

    #[test]
    fn test_round_trip_reconstructs_equal_state() {
        let store = CartStore::new(Box::new(MemoryStore::new()));
        let state = sample_state();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = CartStore::new(Box::new(MemoryStore::new()));
        assert_eq!(store.load().unwrap(), CartState::default());
    }

    #[test]
    fn test_malformed_blob_loads_as_default() {
        let raw = MemoryStore::new();
        raw.set(keys::CART, "{not json").unwrap();
        raw.set(keys::PAYMENT, "[]").unwrap();
        let store = CartStore::new(Box::new(raw));
        let state = store.load().unwrap();
        assert!(state.lines.is_empty());
        assert!(state.payment.method.is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!(
            "localburger-store-test-{}",
            std::process::id()
        ));
        let path = dir.join("cart.json");
        let _ = std::fs::remove_file(&path);

        {
            let store = CartStore::new(Box::new(FileStore::open(&path).unwrap()));
            store.save(&sample_state()).unwrap();
        }
        // Reopen from disk.
        let store = CartStore::new(Box::new(FileStore::open(&path).unwrap()));
        assert_eq!(store.load().unwrap(), sample_state());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_survives_garbage_file() {
        let dir = std::env::temp_dir().join(format!(
            "localburger-garbage-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cart.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = CartStore::new(Box::new(FileStore::open(&path).unwrap()));
        assert_eq!(store.load().unwrap(), CartState::default());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
