//! Error type shared by the mapper core and its browser host.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use wasm_bindgen::JsValue;

/// Everything that can go wrong while setting up or driving a mapper.
#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    /// A container id did not resolve to an element in the page.
    #[error("container not found: #{0}")]
    ContainerNotFound(String),
    /// The page has no `window` or `document` (not running in a browser).
    #[error("no browser document available")]
    NoDocument,
    /// The image fired `error` instead of `load`.
    #[error("failed to load image: {url}")]
    ImageLoad { url: String },
    /// `load()` was called while a load is running or after one succeeded.
    #[error("image already loaded or loading")]
    AlreadyLoaded,
    /// The options JSON passed to the constructor could not be parsed.
    #[error("invalid mapper options: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    /// A browser API call threw.
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for MapperError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<MapperError> for JsValue {
    fn from(err: MapperError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
