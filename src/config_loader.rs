//! Fetches the site's JSON config files
//!
//! Every file is optional: a missing, unreachable or invalid file is logged
//! and replaced by built-in defaults, so the widgets always start.

use gloo_net::http::Request;
use inkwell_core::{ConfigError, ReaderConfig, SiteConfig, WriterConfig};
use tracing::{debug, warn};

use crate::content::Library;

pub const SITE_CONFIG_URL: &str = "config/site.json";
pub const READER_CONFIG_URL: &str = "config/bookReader.json";
pub const WRITER_CONFIG_URL: &str = "config/writerSimulator.json";
pub const LIBRARY_URL: &str = "content/library.json";

/// Everything the page needs before mounting its widgets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub site: SiteConfig,
    pub reader: ReaderConfig,
    pub writer: WriterConfig,
    pub library: Library,
}

pub async fn load() -> Settings {
    let (site, reader, writer, library) = futures::join!(
        load_or_default(SITE_CONFIG_URL, SiteConfig::from_json),
        load_or_default(READER_CONFIG_URL, ReaderConfig::from_json),
        load_or_default(WRITER_CONFIG_URL, WriterConfig::from_json),
        load_or_default(LIBRARY_URL, |json| {
            serde_json::from_str::<Library>(json).map_err(ConfigError::from)
        }),
    );
    debug!(
        books = library.books.len(),
        essays = library.essays.len(),
        mobile_breakpoint = site.breakpoints.mobile,
        "Settings loaded"
    );
    Settings {
        site,
        reader,
        writer,
        library,
    }
}

async fn fetch_text(url: &str) -> Result<Option<String>, gloo_net::Error> {
    let response = Request::get(url).send().await?;
    if !response.ok() {
        return Ok(None);
    }
    response.text().await.map(Some)
}

async fn load_or_default<T, P>(url: &str, parse: P) -> T
where
    T: Default,
    P: FnOnce(&str) -> Result<T, ConfigError>,
{
    match fetch_text(url).await {
        Ok(Some(body)) => parse(&body).unwrap_or_else(|e| {
            warn!(url, error = %e, "Invalid config, using defaults");
            T::default()
        }),
        Ok(None) => {
            debug!(url, "No config file, using defaults");
            T::default()
        }
        Err(e) => {
            warn!(url, error = %e, "Could not fetch config, using defaults");
            T::default()
        }
    }
}
