use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{DocumentStore, StoredDocument, VaultError};

/// Upload directory on the local disk.
pub struct LocalDocumentStore {
    dir: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DocumentStore for LocalDocumentStore {
    fn label(&self) -> &'static str {
        "local"
    }

    /// Written to a temp file in the same directory, then renamed into place,
    /// so a partially written upload is never visible under its final name.
    fn put(&self, filename: &str, bytes: &[u8]) -> Result<(), VaultError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut staging = tempfile::NamedTempFile::new_in(&self.dir)?;
        staging.write_all(bytes)?;
        staging.flush()?;
        staging
            .persist(self.dir.join(filename))
            .map_err(|e| VaultError::Io(e.error))?;
        Ok(())
    }

    /// PDF files in the upload directory, by name. A missing directory
    /// lists as empty.
    fn list(&self) -> Result<Vec<StoredDocument>, VaultError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let is_pdf = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
            if !is_pdf {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let created_at = metadata
                .modified()
                .ok()
                .map(|t| DateTime::<Utc>::from(t).to_rfc3339());
            documents.push(StoredDocument {
                name: entry.file_name().to_string_lossy().into_owned(),
                created_at,
            });
        }

        documents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(documents)
    }
}
