//! Application state

use crate::config::ServerConfig;
use anyhow::Result;
use palabreo_core::render::content_fingerprint;
use palabreo_core::{render_markdown_html, Catalog, TrustedHtml};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use uuid::Uuid;

/// File the catalog is persisted to, below the storage path
pub const CATALOG_FILE: &str = "catalog.json";

/// Rendered chapters kept before the cache is flushed
const RENDER_CACHE_LIMIT: usize = 512;

/// Inputs larger than this are rendered on the blocking pool
const BLOCKING_RENDER_BYTES: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Base path for storage
    pub storage_path: PathBuf,

    /// Works, profiles and interactions (would be a database in production)
    pub catalog: Arc<RwLock<Catalog>>,

    /// Rendered HTML keyed by content fingerprint
    pub render_cache: Arc<RwLock<HashMap<String, TrustedHtml>>>,

    /// Channel for SSE events
    pub event_tx: broadcast::Sender<ServerEvent>,

    /// Held across each catalog write and rename; saves share one temp file
    save_lock: Arc<Mutex<()>>,
}

/// Load the catalog from a JSON file; a missing file is an empty catalog
pub async fn load_catalog(path: &Path) -> Result<Catalog> {
    match tokio::fs::read_to_string(path).await {
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Catalog::default()),
        Err(e) => Err(e.into()),
    }
}

/// Save the catalog to a JSON file atomically
pub async fn save_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    let data = serde_json::to_string_pretty(catalog)?;

    // Same directory keeps the rename on one filesystem
    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &data).await?;
    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Server-sent events
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    WorkCreated { id: Uuid, title: String },
    WorkUpdated { id: Uuid },
    WorkPublished { id: Uuid, title: String },
    WorkArchived { id: Uuid },
    WorkDeleted { id: Uuid },
    CommentAdded { work_id: Uuid, comment_id: Uuid },
    ProfileCreated { id: Uuid, username: String },
}

impl ServerEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::WorkCreated { .. } => "work_created",
            Self::WorkUpdated { .. } => "work_updated",
            Self::WorkPublished { .. } => "work_published",
            Self::WorkArchived { .. } => "work_archived",
            Self::WorkDeleted { .. } => "work_deleted",
            Self::CommentAdded { .. } => "comment_added",
            Self::ProfileCreated { .. } => "profile_created",
        }
    }
}

impl AppState {
    /// Create application state from configuration, loading any saved catalog
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        let storage_path = config.storage_path.clone();
        tokio::fs::create_dir_all(&storage_path).await?;

        let catalog = match load_catalog(&storage_path.join(CATALOG_FILE)).await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("Failed to load catalog, starting fresh: {}", e);
                Catalog::default()
            }
        };
        tracing::info!(
            "Loaded catalog with {} works and {} profiles",
            catalog.work_count(),
            catalog.profile_count()
        );

        Ok(Self::with_catalog(storage_path, catalog))
    }

    /// Create application state around an existing catalog
    pub fn with_catalog(storage_path: impl Into<PathBuf>, catalog: Catalog) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            storage_path: storage_path.into(),
            catalog: Arc::new(RwLock::new(catalog)),
            render_cache: Arc::new(RwLock::new(HashMap::new())),
            event_tx,
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get path to the catalog file
    pub fn catalog_path(&self) -> PathBuf {
        self.storage_path.join(CATALOG_FILE)
    }

    /// Save the catalog
    pub async fn save_catalog(&self) -> Result<()> {
        let _guard = self.save_lock.lock().await;
        let catalog = self.catalog.read().await;
        save_catalog(&catalog, &self.catalog_path()).await
    }

    /// Render markdown, reusing an earlier render of identical content
    pub async fn render(&self, content: &str) -> TrustedHtml {
        let key = content_fingerprint(content);
        if let Some(html) = self.render_cache.read().await.get(&key) {
            return html.clone();
        }

        let html = if content.len() > BLOCKING_RENDER_BYTES {
            let owned = content.to_string();
            match tokio::task::spawn_blocking(move || render_markdown_html(&owned)).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::error!("Render task failed, rendering inline: {}", e);
                    render_markdown_html(content)
                }
            }
        } else {
            render_markdown_html(content)
        };

        let mut cache = self.render_cache.write().await;
        if cache.len() >= RENDER_CACHE_LIMIT {
            tracing::debug!("Render cache full, flushing {} entries", cache.len());
            cache.clear();
        }
        cache.insert(key, html.clone());
        html
    }

    /// Subscribe to server events
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast an event
    pub fn broadcast(&self, event: ServerEvent) {
        // Ignore errors (no subscribers)
        let _ = self.event_tx.send(event);
    }
}
