//! Backend endpoints and their JSON shapes.

use crate::config::{API_BASE, SELECTOR_OPTIONS_PATH, SESSION_DATA_PATH};
use crate::error::UiError;
use crate::SelectorOptions;
use futures::future::{FutureExt, LocalBoxFuture};
use gloo_net::http::Request;
use log::debug;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/selector-options`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectorOptionsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub options: Option<SelectorOptions>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SelectorOptionsResponse {
    /// Options on success; anything else is a server-reported failure.
    pub fn into_result(self) -> Result<SelectorOptions, UiError> {
        match (self.success, self.options) {
            (true, Some(options)) => Ok(options),
            _ => Err(UiError::ServerReported {
                message: self.message,
            }),
        }
    }
}

/// One stored element of a scrape session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub index: Option<u64>,
    #[serde(default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub attributes: Option<String>,
}

/// Summary of a scrape session as returned alongside its items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub selector_type: Option<String>,
    #[serde(default)]
    pub selector_value: Option<String>,
    #[serde(default)]
    pub item_count: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Body of `GET /api/data/{sessionId}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub session: Option<SessionSummary>,
    #[serde(default)]
    pub items: Vec<ScrapedItem>,
}

/// Network seam for the UI controllers.
pub trait Backend {
    fn selector_options(&self, url: &str)
        -> LocalBoxFuture<'_, Result<SelectorOptionsResponse, UiError>>;

    fn session_data(&self, session_id: &str) -> LocalBoxFuture<'_, Result<SessionData, UiError>>;
}

/// Browser `fetch` implementation of [`Backend`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpBackend {
    base: String,
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

fn js_err(e: wasm_bindgen::JsValue) -> UiError {
    UiError::Fetch(format!("{:?}", e))
}

impl HttpBackend {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl Backend for HttpBackend {
    fn selector_options(
        &self,
        url: &str,
    ) -> LocalBoxFuture<'_, Result<SelectorOptionsResponse, UiError>> {
        let endpoint = format!("{}{}", self.base, SELECTOR_OPTIONS_PATH);
        let url = url.to_string();
        async move {
            let form = web_sys::UrlSearchParams::new().map_err(js_err)?;
            form.append("url", &url);

            let response = Request::post(&endpoint)
                .body(form)
                .map_err(|e| UiError::Fetch(e.to_string()))?
                .send()
                .await
                .map_err(|e| UiError::Fetch(e.to_string()))?;

            debug!("selector options for {url}: HTTP {}", response.status());
            // A 400 still carries the `{success, message}` body.
            match response.json::<SelectorOptionsResponse>().await {
                Ok(body) => Ok(body),
                Err(e) if response.ok() => Err(UiError::Fetch(e.to_string())),
                Err(_) => Err(UiError::Fetch(format!("HTTP {}", response.status()))),
            }
        }
        .boxed_local()
    }

    fn session_data(&self, session_id: &str) -> LocalBoxFuture<'_, Result<SessionData, UiError>> {
        let endpoint = format!("{}{}/{}", self.base, SESSION_DATA_PATH, session_id);
        async move {
            let response = Request::get(&endpoint)
                .send()
                .await
                .map_err(|e| UiError::Fetch(e.to_string()))?;
            if !response.ok() {
                return Err(UiError::Fetch("Network response was not ok".to_string()));
            }
            response
                .json::<SessionData>()
                .await
                .map_err(|e| UiError::Fetch(e.to_string()))
        }
        .boxed_local()
    }
}
