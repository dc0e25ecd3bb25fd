//! Google Custom Search backend.

use super::{build_http_client, unavailable, DomainAllowList, WebSearch, WebSearchResult};
use assist_core::AppResult;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// The API rejects `num` above this.
const MAX_NUM: usize = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchItem {
    title: String,
    link: String,
    snippet: String,
}

pub struct GoogleSearch {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    engine_id: String,
    allow_list: DomainAllowList,
}

impl GoogleSearch {
    pub fn new(
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
        allow_list: DomainAllowList,
        timeout: Duration,
    ) -> AppResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            allow_list,
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn restricted_query(&self, query: &str) -> String {
        if self.allow_list.is_empty() {
            query.to_string()
        } else {
            format!("{} ({})", query, self.allow_list.site_restriction())
        }
    }
}

#[async_trait]
impl WebSearch for GoogleSearch {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn search(&self, query: &str, max_results: usize) -> AppResult<Vec<WebSearchResult>> {
        let restricted = self.restricted_query(query);
        let num = max_results.clamp(1, MAX_NUM).to_string();

        let response = self
            .client
            .get(format!(
                "{}/customsearch/v1",
                self.base_url.trim_end_matches('/')
            ))
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", restricted.as_str()),
                ("num", num.as_str()),
                ("lr", "lang_pt"),
                ("gl", "br"),
            ])
            .send()
            .await
            .map_err(|e| unavailable("google", e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable("google", format!("HTTP {}", status)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| unavailable("google", e.without_url()))?;

        let results: Vec<WebSearchResult> = body
            .items
            .into_iter()
            .filter(|item| !item.link.is_empty())
            .map(|item| WebSearchResult::new(item.title, item.link, item.snippet))
            .collect();
        let results = self.allow_list.select(results, max_results);

        tracing::info!("Google found {} results", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assist_core::AppError;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GoogleSearch {
        GoogleSearch::new(
            "test-key",
            "engine-1",
            DomainAllowList::new(["gov.br", "tcu.gov.br"]),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_search_parses_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("key", "test-key"))
            .and(query_param("cx", "engine-1"))
            .and(query_param("q", "dispensa de licitação (site:gov.br OR site:tcu.gov.br)"))
            .and(query_param("num", "5"))
            .and(query_param("lr", "lang_pt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    { "title": "Dispensa", "link": "https://portal.tcu.gov.br/dispensa", "snippet": "Hipóteses de dispensa." },
                    { "title": "Sem link", "snippet": "ignorado" }
                ]
            })))
            .mount(&server)
            .await;

        let results = client(&server).search("dispensa de licitação", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, "portal.tcu.gov.br");
    }

    #[tokio::test]
    async fn test_off_domain_items_are_dropped_before_cut() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    { "title": "Blog", "link": "https://example.com/dispensa", "snippet": "Opinião." },
                    { "title": "Fórum", "link": "https://forum.example.org/dispensa", "snippet": "Dúvida." },
                    { "title": "Dispensa", "link": "https://www.gov.br/dispensa", "snippet": "Hipóteses." }
                ]
            })))
            .mount(&server)
            .await;

        let results = client(&server).search("dispensa", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].link, "https://www.gov.br/dispensa");
    }

    #[tokio::test]
    async fn test_num_is_capped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("num", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let results = client(&server).search("x", 50).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_key_is_search_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = client(&server).search("x", 5).await.unwrap_err();
        assert!(matches!(err, AppError::SearchUnavailable(_)));
        assert!(!err.to_string().contains("test-key"));
    }
}
