//! Observable store for reading preferences
//!
//! One owned [`ReadingPreferences`] value sits behind the store. Every
//! mutation is broadcast to subscribers and then written to the injected
//! [`StorageProvider`] under a fixed key. Notification does not wait on, or
//! depend on, the write succeeding. Mutations run one at a time, so the
//! stored object always ends as the last value applied.

use super::preferences::{PreferencesUpdate, ReadingPreferences};
use crate::error::{PreferencesError, StorageError};
use crate::storage::StorageProvider;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::{Mutex, RwLock};

/// Storage key the preferences object is persisted under
pub const READING_PREFERENCES_KEY: &str = "palabreo-reading-preferences.json";

const EVENT_CAPACITY: usize = 32;

/// Where a change came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// A mutation made through this store
    Local,
    /// A value written by another store sharing the same storage, picked up on reload
    Storage,
}

/// Change notification carrying the complete new value
#[derive(Debug, Clone, PartialEq)]
pub struct PreferencesEvent {
    pub source: ChangeSource,
    pub preferences: ReadingPreferences,
}

/// Shared reading preferences with change fan-out and injected persistence
pub struct PreferencesStore {
    current: RwLock<ReadingPreferences>,
    // Held from apply through persist
    mutation: Mutex<()>,
    storage: Arc<dyn StorageProvider>,
    key: String,
    events: broadcast::Sender<PreferencesEvent>,
}

impl PreferencesStore {
    /// Create a store holding defaults, without reading storage
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            current: RwLock::new(ReadingPreferences::default()),
            mutation: Mutex::new(()),
            storage,
            key: READING_PREFERENCES_KEY.to_string(),
            events,
        }
    }

    /// Use a different storage key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Create a store initialised from storage
    pub async fn open(storage: Arc<dyn StorageProvider>) -> Self {
        let store = Self::new(storage);
        let loaded = load_preferences(store.storage.as_ref(), &store.key).await;
        *store.current.write().await = loaded;
        store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Snapshot of the current value
    pub async fn current(&self) -> ReadingPreferences {
        self.current.read().await.clone()
    }

    /// Apply a partial update, notify subscribers, then persist.
    ///
    /// Returns the new value, or the persistence error. Subscribers are
    /// notified either way.
    pub async fn set(
        &self,
        update: &PreferencesUpdate,
    ) -> Result<ReadingPreferences, PreferencesError> {
        let _guard = self.mutation.lock().await;
        let updated = {
            let mut current = self.current.write().await;
            update.apply_to(&mut current);
            *current = current.clone().normalized();
            current.clone()
        };
        self.commit(updated).await
    }

    /// Replace the whole value
    pub async fn replace(
        &self,
        preferences: ReadingPreferences,
    ) -> Result<ReadingPreferences, PreferencesError> {
        let _guard = self.mutation.lock().await;
        let updated = preferences.normalized();
        *self.current.write().await = updated.clone();
        self.commit(updated).await
    }

    /// Restore defaults
    pub async fn reset(&self) -> Result<ReadingPreferences, PreferencesError> {
        self.replace(ReadingPreferences::default()).await
    }

    /// Re-read storage, picking up values written by other stores.
    ///
    /// Subscribers are notified only when the stored value differs from the
    /// current one.
    pub async fn reload(&self) -> ReadingPreferences {
        let _guard = self.mutation.lock().await;
        let stored = load_preferences(self.storage.as_ref(), &self.key).await;
        let changed = {
            let mut current = self.current.write().await;
            let changed = *current != stored;
            *current = stored.clone();
            changed
        };
        if changed {
            self.publish(ChangeSource::Storage, stored.clone());
        }
        stored
    }

    /// Raw event receiver
    pub fn subscribe(&self) -> broadcast::Receiver<PreferencesEvent> {
        self.events.subscribe()
    }

    /// Subscription initialised from the current value
    pub async fn watch(&self) -> PreferencesSubscription {
        // Subscribe first so no change between the snapshot and the receiver is lost
        let rx = self.events.subscribe();
        let current = self.current().await;
        PreferencesSubscription { current, rx }
    }

    async fn commit(
        &self,
        updated: ReadingPreferences,
    ) -> Result<ReadingPreferences, PreferencesError> {
        self.publish(ChangeSource::Local, updated.clone());
        self.persist(&updated).await?;
        Ok(updated)
    }

    fn publish(&self, source: ChangeSource, preferences: ReadingPreferences) {
        // No subscribers is fine
        let _ = self.events.send(PreferencesEvent {
            source,
            preferences,
        });
    }

    async fn persist(&self, preferences: &ReadingPreferences) -> Result<(), PreferencesError> {
        let data = serde_json::to_vec_pretty(preferences)?;
        self.storage.write(&self.key, data).await.map_err(|e| {
            tracing::warn!("Failed to persist reading preferences: {}", e);
            PreferencesError::from(e)
        })
    }
}

/// Read stored preferences, falling back to defaults when missing or malformed
pub async fn load_preferences(storage: &dyn StorageProvider, key: &str) -> ReadingPreferences {
    match storage.read(key).await {
        Ok(data) => match serde_json::from_slice::<ReadingPreferences>(&data) {
            Ok(prefs) => prefs.normalized(),
            Err(e) => {
                tracing::warn!("Malformed reading preferences under {}, using defaults: {}", key, e);
                ReadingPreferences::default()
            }
        },
        Err(StorageError::NotFound(_)) => {
            tracing::debug!("No stored reading preferences under {}", key);
            ReadingPreferences::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read reading preferences, using defaults: {}", e);
            ReadingPreferences::default()
        }
    }
}

/// A consumer's view of the preferences, kept in sync with the store
pub struct PreferencesSubscription {
    current: ReadingPreferences,
    rx: broadcast::Receiver<PreferencesEvent>,
}

impl PreferencesSubscription {
    pub fn current(&self) -> &ReadingPreferences {
        &self.current
    }

    /// Wait for the next change. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<PreferencesEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    self.current = event.preferences.clone();
                    return Some(event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Preferences subscriber lagged by {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Apply every change already queued without waiting.
    /// Returns whether the value was updated.
    pub fn sync(&mut self) -> bool {
        let mut updated = false;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    self.current = event.preferences;
                    updated = true;
                }
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        updated
    }
}
