//! Restricted web search used when the corpus has no answer.
//!
//! Results are only usable when their link's host is an allow-listed
//! domain or one of its subdomains.

pub mod duckduckgo;
pub mod google;

pub use duckduckgo::DuckDuckGoSearch;
pub use google::GoogleSearch;

use crate::config::{WebProvider, WebSearchConfig};
use assist_core::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::{Host, Url};

/// One ranked snippet from a web search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,

    /// Hostname of `link`
    pub source: String,
}

impl WebSearchResult {
    pub fn new(title: impl Into<String>, link: impl Into<String>, snippet: impl Into<String>) -> Self {
        let link = link.into();
        let source = host_of(&link).unwrap_or_else(|| link.clone());
        Self {
            title: title.into(),
            link,
            snippet: snippet.into(),
            source,
        }
    }
}

/// Lower-cased domain name of an http(s) link.
pub fn host_of(link: &str) -> Option<String> {
    let parsed = Url::parse(link).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    match parsed.host()? {
        Host::Domain(d) => Some(d.trim_end_matches('.').to_lowercase()),
        Host::Ipv4(_) | Host::Ipv6(_) => None,
    }
}

/// Web search collaborator: query in, ranked snippets out.
#[async_trait]
pub trait WebSearch: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Search for `query`, returning at most `max_results` results.
    ///
    /// # Errors
    /// `AppError::SearchUnavailable` when the backend cannot be reached or
    /// answers with something unusable.
    async fn search(&self, query: &str, max_results: usize) -> AppResult<Vec<WebSearchResult>>;
}

/// Hostnames web results may come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainAllowList {
    domains: Vec<String>,
}

impl DomainAllowList {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| d.as_ref().trim().trim_matches('.').to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Whether `link` points at an allowed domain or a subdomain of one.
    ///
    /// `www.planalto.gov.br` matches `planalto.gov.br`; `notgov.br` does
    /// not match `gov.br`.
    pub fn permits(&self, link: &str) -> bool {
        let Some(host) = host_of(link) else {
            return false;
        };
        self.domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// Keep only the permitted results, in order.
    pub fn filter(&self, results: Vec<WebSearchResult>) -> Vec<WebSearchResult> {
        let before = results.len();
        let kept: Vec<_> = results.into_iter().filter(|r| self.permits(&r.link)).collect();
        if kept.len() < before {
            tracing::debug!("Dropped {} web results outside the allow-list", before - kept.len());
        }
        kept
    }

    /// The first `max_results` permitted results. Filtering runs before the
    /// cut so off-domain results never crowd out allowed ones.
    pub fn select(&self, results: Vec<WebSearchResult>, max_results: usize) -> Vec<WebSearchResult> {
        let mut kept = self.filter(results);
        kept.truncate(max_results);
        kept
    }

    /// `site:` clause restricting a search engine query to the allow-list.
    pub fn site_restriction(&self) -> String {
        self.domains
            .iter()
            .map(|d| format!("site:{}", d))
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

/// Log the raw failure and return a detail-free error.
pub(crate) fn unavailable(provider: &str, err: impl std::fmt::Display) -> AppError {
    tracing::warn!("{} search failed: {}", provider, err);
    AppError::SearchUnavailable(format!("{} search failed", provider))
}

pub(crate) fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Build the configured web search backend, or `None` when disabled.
///
/// Google without credentials in the environment falls back to DuckDuckGo.
pub fn create_web_search(config: &WebSearchConfig) -> AppResult<Option<Arc<dyn WebSearch>>> {
    if !config.enabled {
        tracing::debug!("Web search fallback disabled");
        return Ok(None);
    }

    let allow_list = DomainAllowList::new(&config.allowed_domains);
    let timeout = Duration::from_secs(config.timeout_secs);

    if config.provider == WebProvider::Google {
        let api_key = std::env::var(&config.api_key_env).ok().filter(|v| !v.is_empty());
        let engine_id = std::env::var(&config.engine_id_env).ok().filter(|v| !v.is_empty());

        match (api_key, engine_id) {
            (Some(key), Some(cx)) => {
                return Ok(Some(Arc::new(GoogleSearch::new(key, cx, allow_list, timeout)?)));
            }
            _ => tracing::warn!(
                "{} / {} not set, using DuckDuckGo for web search",
                config.api_key_env,
                config.engine_id_env
            ),
        }
    }

    Ok(Some(Arc::new(DuckDuckGoSearch::new(allow_list, timeout)?)))
}
