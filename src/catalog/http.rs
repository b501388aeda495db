//! Blocking HTTP implementation of the catalog contract.
//!
//! Uses a single `ureq` agent with a bounded timeout; a timed-out request is
//! reported like any other transport failure.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::catalog::backend::CatalogBackend;
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::model::{CatalogItem, QueryFields, parse_items};
use crate::collection::error::{CollectionError, CollectionResult};
use crate::config::ShelfConfig;

/// Maximum number of error-body bytes carried into an error message.
const MAX_ERROR_BODY: usize = 300;

/// Client for the book service REST API.
pub struct HttpBackend {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url` (e.g. `http://localhost:8080/api/books`).
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn from_config(config: &ShelfConfig) -> Self {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, String> {
        let url = self.url(path);
        let mut request = self.agent.get(&url);
        for (name, value) in params {
            request = request.query(name, value);
        }
        tracing::debug!(%url, ?params, "GET");
        let resp = request.call().map_err(describe_error)?;
        resp.into_json()
            .map_err(|e| format!("failed to parse JSON: {e}"))
    }

    fn get_items(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> CatalogResult<Vec<CatalogItem>> {
        let values: Vec<serde_json::Value> = self
            .get_json(path, params)
            .map_err(|message| CatalogError::unavailable(path, message))?;
        Ok(parse_items(values, path))
    }
}

impl CatalogBackend for HttpBackend {
    fn search(
        &self,
        fields: &QueryFields,
        page: u32,
        size: u32,
    ) -> CatalogResult<Vec<CatalogItem>> {
        let path = if fields.is_advanced() {
            "search-advanced"
        } else {
            "search"
        };
        let mut params = fields.params();
        params.extend(paging(page, size));
        self.get_items(path, &params)
    }

    fn popular(&self, page: u32, size: u32) -> CatalogResult<Vec<CatalogItem>> {
        self.get_items("popular", &paging(page, size))
    }

    fn subjects(&self) -> CatalogResult<Vec<String>> {
        self.get_json("subjects", &[])
            .map_err(|message| CatalogError::unavailable("subjects", message))
    }

    fn collection(&self) -> CollectionResult<Vec<CatalogItem>> {
        let values: Vec<serde_json::Value> = self
            .get_json("collection", &[])
            .map_err(|message| CollectionError::Unavailable { message })?;
        Ok(parse_items(values, "collection"))
    }

    fn save(&self, item: &CatalogItem) -> CollectionResult<CatalogItem> {
        let url = self.url("save");
        tracing::debug!(%url, id = %item.id, "POST");
        let save_failed = |message: String| CollectionError::SaveFailed {
            id: item.id.clone(),
            message,
        };
        let resp = self
            .agent
            .post(&url)
            .send_json(item)
            .map_err(|e| save_failed(describe_error(e)))?;
        let stored: CatalogItem = resp
            .into_json()
            .map_err(|e| save_failed(format!("failed to parse JSON: {e}")))?;
        stored
            .sanitized()
            .ok_or(CollectionError::Validation { field: "identifier" })
    }

    fn remove(&self, id: &str) -> CollectionResult<()> {
        let url = self.url(&format!("collection/{}", urlencoding::encode(id)));
        tracing::debug!(%url, "DELETE");
        self.agent
            .delete(&url)
            .call()
            .map(|_| ())
            .map_err(|e| CollectionError::RemoveFailed {
                id: id.to_string(),
                message: describe_error(e),
            })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

fn paging(page: u32, size: u32) -> [(&'static str, String); 2] {
    [("page", page.to_string()), ("size", size.to_string())]
}

/// Render a ureq failure, preferring the service's `{"error": ...}` body.
fn describe_error(err: ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"].as_str().map(str::to_string))
                .unwrap_or_else(|| truncate(&body, MAX_ERROR_BODY));
            if detail.is_empty() {
                format!("HTTP {code}")
            } else {
                format!("HTTP {code}: {detail}")
            }
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}

fn truncate(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}
