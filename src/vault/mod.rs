//! Document locker: uploaded PDFs go to Supabase Storage when configured,
//! otherwise (or when the cloud call fails) to a local directory.

pub mod local;
pub mod supabase;

pub use local::LocalDocumentStore;
pub use supabase::SupabaseStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Storage API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected storage response: {0}")]
    InvalidResponse(String),
}

/// One entry of the document listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub name: String,
    pub created_at: Option<String>,
}

/// A place PDFs can be written to and listed from.
pub trait DocumentStore: Send + Sync {
    fn label(&self) -> &'static str;

    /// Store `bytes` under the already-sanitized `filename`.
    fn put(&self, filename: &str, bytes: &[u8]) -> Result<(), VaultError>;

    fn list(&self) -> Result<Vec<StoredDocument>, VaultError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultLocation {
    Cloud,
    Local,
}

impl VaultLocation {
    pub fn message(&self) -> &'static str {
        match self {
            VaultLocation::Cloud => "Vaulted in Cloud",
            VaultLocation::Local => "Vaulted Locally",
        }
    }
}

/// What the client is told after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultReceipt {
    pub message: &'static str,
    pub filename: String,
    #[serde(skip)]
    pub location: VaultLocation,
}

pub struct Vault {
    cloud: Option<Box<dyn DocumentStore>>,
    local: Box<dyn DocumentStore>,
}

impl Vault {
    pub fn new(cloud: Option<Box<dyn DocumentStore>>, local: Box<dyn DocumentStore>) -> Self {
        Self { cloud, local }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, VaultError> {
        let cloud: Option<Box<dyn DocumentStore>> = match &config.supabase {
            Some(settings) => {
                tracing::info!(bucket = %settings.bucket, "Cloud vault configured");
                Some(Box::new(SupabaseStore::new(
                    settings,
                    config.llm.timeout_secs,
                )?))
            }
            None => {
                tracing::info!(dir = %config.upload_dir.display(), "Cloud vault not configured, storing locally");
                None
            }
        };
        let local = Box::new(LocalDocumentStore::new(config.upload_dir.clone()));
        Ok(Self::new(cloud, local))
    }

    pub fn has_cloud(&self) -> bool {
        self.cloud.is_some()
    }

    /// Cloud first; any cloud failure falls back to the local store.
    pub fn store(&self, filename: &str, bytes: &[u8]) -> Result<VaultReceipt, VaultError> {
        let filename = sanitize_filename(filename);

        if let Some(cloud) = &self.cloud {
            match cloud.put(&filename, bytes) {
                Ok(()) => {
                    tracing::info!(store = cloud.label(), filename = %filename, bytes = bytes.len(), "Document vaulted");
                    return Ok(VaultReceipt {
                        message: VaultLocation::Cloud.message(),
                        filename,
                        location: VaultLocation::Cloud,
                    });
                }
                Err(e) => {
                    tracing::warn!(store = cloud.label(), error = %e, "Cloud upload failed, falling back to local");
                }
            }
        }

        self.local.put(&filename, bytes)?;
        tracing::info!(store = self.local.label(), filename = %filename, bytes = bytes.len(), "Document vaulted");
        Ok(VaultReceipt {
            message: VaultLocation::Local.message(),
            filename,
            location: VaultLocation::Local,
        })
    }

    /// Cloud entries (skipped on failure) followed by local PDFs.
    pub fn list(&self) -> Result<Vec<StoredDocument>, VaultError> {
        let mut documents = Vec::new();

        if let Some(cloud) = &self.cloud {
            match cloud.list() {
                Ok(entries) => documents.extend(entries),
                Err(e) => {
                    tracing::warn!(store = cloud.label(), error = %e, "Cloud listing failed, showing local documents only");
                }
            }
        }

        documents.extend(self.local.list()?);
        Ok(documents)
    }
}

/// Sanitize an uploaded filename: no path separators, no `..`, at most
/// 100 characters, never empty.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|&c| c != '/' && c != '\\' && c != '\0')
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Collapse dot runs until none remain
    let mut sanitized = sanitized;
    while sanitized.contains("..") {
        sanitized = sanitized.replace("..", ".");
    }
    let sanitized = sanitized.trim_start_matches('.');

    let sanitized: String = sanitized.chars().take(100).collect();

    if sanitized.is_empty() {
        "document".into()
    } else {
        sanitized
    }
}
