//! DuckDuckGo Instant Answer search. Needs no API key, but returns few
//! results.

use super::{build_http_client, unavailable, DomainAllowList, WebSearch, WebSearchResult};
use assist_core::AppResult;
use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstantAnswer {
    #[serde(rename = "Heading")]
    heading: String,

    #[serde(rename = "AbstractText")]
    abstract_text: String,

    #[serde(rename = "AbstractURL")]
    abstract_url: String,

    #[serde(rename = "RelatedTopics")]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Topic {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL")]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
    #[allow(dead_code)]
    Unknown(IgnoredAny),
}

pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    base_url: String,
    allow_list: DomainAllowList,
}

impl DuckDuckGoSearch {
    pub fn new(allow_list: DomainAllowList, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: DEFAULT_BASE_URL.to_string(),
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
            format!("{} {}", query, self.allow_list.site_restriction())
        }
    }
}

fn flatten(topics: Vec<RelatedTopic>, out: &mut Vec<WebSearchResult>) {
    for topic in topics {
        match topic {
            RelatedTopic::Topic { text, first_url } => {
                if text.is_empty() || first_url.is_empty() {
                    continue;
                }
                let title = text.split(" - ").next().unwrap_or(&text).to_string();
                out.push(WebSearchResult::new(title, first_url, text));
            }
            RelatedTopic::Group { topics } => flatten(topics, out),
            RelatedTopic::Unknown(_) => {}
        }
    }
}

fn into_results(answer: InstantAnswer) -> Vec<WebSearchResult> {
    let mut results = Vec::new();

    if !answer.abstract_text.is_empty() && !answer.abstract_url.is_empty() {
        let title = if answer.heading.is_empty() {
            "Resultado".to_string()
        } else {
            answer.heading
        };
        results.push(WebSearchResult::new(title, answer.abstract_url, answer.abstract_text));
    }

    flatten(answer.related_topics, &mut results);
    results
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    fn provider_name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, max_results: usize) -> AppResult<Vec<WebSearchResult>> {
        let restricted = self.restricted_query(query);
        tracing::debug!("DuckDuckGo search: {}", restricted);

        let response = self
            .client
            .get(format!("{}/", self.base_url.trim_end_matches('/')))
            .query(&[
                ("q", restricted.as_str()),
                ("format", "json"),
                ("no_html", "1"),
            ])
            .send()
            .await
            .map_err(|e| unavailable("duckduckgo", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable("duckduckgo", format!("HTTP {}", status)));
        }

        let answer: InstantAnswer = response
            .json()
            .await
            .map_err(|e| unavailable("duckduckgo", e))?;

        let results = self.allow_list.select(into_results(answer), max_results);

        tracing::info!("DuckDuckGo found {} results", results.len());
        Ok(results)
    }
}
