use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::SupabaseSettings;

use super::{DocumentStore, StoredDocument, VaultError};

const LIST_LIMIT: u32 = 100;

/// Supabase Storage bucket reached over its REST API.
pub struct SupabaseStore {
    base_url: String,
    key: String,
    bucket: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: u32,
    offset: u32,
    #[serde(rename = "sortBy")]
    sort_by: SortBy<'a>,
}

#[derive(Serialize)]
struct SortBy<'a> {
    column: &'a str,
    order: &'a str,
}

#[derive(Deserialize)]
struct ListEntry {
    name: String,
    #[serde(default)]
    created_at: Option<String>,
}

impl SupabaseStore {
    pub fn new(settings: &SupabaseSettings, timeout_secs: u64) -> Result<Self, VaultError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| VaultError::Http(e.to_string()))?;

        Ok(Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            key: settings.key.clone(),
            bucket: settings.bucket.clone(),
            client,
        })
    }

    fn object_url(&self, filename: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, filename)
    }

    fn list_url(&self) -> String {
        format!("{}/storage/v1/object/list/{}", self.base_url, self.bucket)
    }

    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, VaultError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(VaultError::Api {
            status: status.as_u16(),
            body: body.chars().take(300).collect(),
        })
    }
}

impl DocumentStore for SupabaseStore {
    fn label(&self) -> &'static str {
        "supabase"
    }

    fn put(&self, filename: &str, bytes: &[u8]) -> Result<(), VaultError> {
        let content_type = mime_guess::from_path(filename)
            .first_or_octet_stream()
            .to_string();

        let response = self
            .client
            .post(self.object_url(filename))
            .bearer_auth(&self.key)
            .header("apikey", &self.key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .map_err(|e| VaultError::Http(e.to_string()))?;

        Self::check(response)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<StoredDocument>, VaultError> {
        let body = ListRequest {
            prefix: "",
            limit: LIST_LIMIT,
            offset: 0,
            sort_by: SortBy {
                column: "created_at",
                order: "desc",
            },
        };

        let response = self
            .client
            .post(self.list_url())
            .bearer_auth(&self.key)
            .header("apikey", &self.key)
            .json(&body)
            .send()
            .map_err(|e| VaultError::Http(e.to_string()))?;

        let entries: Vec<ListEntry> = Self::check(response)?
            .json()
            .map_err(|e| VaultError::InvalidResponse(e.to_string()))?;

        // Supabase lists folder placeholders as dot-files
        Ok(entries
            .into_iter()
            .filter(|e| !e.name.starts_with('.'))
            .map(|e| StoredDocument {
                name: e.name,
                created_at: e.created_at,
            })
            .collect())
    }
}
