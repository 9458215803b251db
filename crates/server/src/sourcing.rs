//! 图片来源：Google Custom Search 图片搜索与下载。
//!
//! HTTP 客户端与凭据在启动时构建并注入，未配置凭据时搜索为空操作。

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use guess_core::domain::{ImageSource, SearchQuery, SourcingError};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{SearchConfig, SearchCredentials};

/// 分页起始偏移，每页最多 10 条。
const PAGE_STARTS: [u32; 4] = [1, 11, 21, 31];
const LINKS_PER_PAGE: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    link: Option<String>,
}

pub struct GoogleImageSearch {
    client: Client,
    config: SearchConfig,
}

impl GoogleImageSearch {
    pub fn new(client: Client, config: SearchConfig) -> Self {
        if config.credentials.is_none() {
            info!("image search credentials are not configured, sourcing is disabled");
        }
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.credentials.is_some()
    }

    async fn download_one(&self, link: String) -> Option<Vec<u8>> {
        let limit = self.config.max_image_bytes;
        let fetch = async {
            let mut response = self.client.get(&link).send().await?.error_for_status()?;
            if response.content_length().is_some_and(|len| len > limit as u64) {
                return Ok(None);
            }

            let mut bytes = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                if bytes.len() + chunk.len() > limit {
                    return Ok(None);
                }
                bytes.extend_from_slice(&chunk);
            }
            Ok::<_, reqwest::Error>(Some(bytes))
        };

        match tokio::time::timeout(self.config.download_timeout, fetch).await {
            Ok(Ok(Some(bytes))) if !bytes.is_empty() => Some(bytes),
            Ok(Ok(Some(_))) => {
                warn!(%link, "downloaded image is empty");
                None
            }
            Ok(Ok(None)) => {
                warn!(%link, limit, "downloaded image exceeds size limit");
                None
            }
            Ok(Err(err)) => {
                warn!(%link, error = %err, "failed to load image");
                None
            }
            Err(_) => {
                warn!(%link, "image download timed out");
                None
            }
        }
    }
}

#[async_trait]
impl ImageSource for GoogleImageSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourcingError> {
        let Some(credentials) = &self.config.credentials else {
            debug!(name = %query.name, "image search skipped, no credentials");
            return Ok(Vec::new());
        };

        let mut links = Vec::new();
        for start in PAGE_STARTS {
            let params = search_params(credentials, query, start);
            let response = self
                .client
                .get(&self.config.endpoint)
                .query(&params)
                .timeout(self.config.search_timeout)
                .send()
                .await
                .map_err(map_search_error)?;

            let status = response.status();
            if status != StatusCode::OK {
                let body = response.text().await.unwrap_or_default();
                warn!(%status, start, body = %body, "failed to load images");
                break;
            }

            let body = response.text().await.map_err(map_search_error)?;
            debug!(start, bytes = body.len(), "received search page");

            let page_links = extract_links(&body, LINKS_PER_PAGE).map_err(|e| {
                SourcingError::Unavailable(format!("malformed search response: {e}"))
            })?;
            if page_links.is_empty() {
                break;
            }
            links.extend(page_links);
        }

        info!(name = %query.name, count = links.len(), "image search finished");
        Ok(links)
    }

    async fn download(&self, links: Vec<String>) -> Vec<Vec<u8>> {
        let requested = links.len();
        let payloads: Vec<Vec<u8>> = stream::iter(links)
            .map(|link| self.download_one(link))
            .buffer_unordered(self.config.max_concurrent_downloads.max(1))
            .filter_map(std::future::ready)
            .collect()
            .await;

        debug!(requested, downloaded = payloads.len(), "images are loaded");
        payloads
    }
}

fn map_search_error(err: reqwest::Error) -> SourcingError {
    if err.is_timeout() {
        SourcingError::Timeout
    } else {
        SourcingError::Unavailable(err.to_string())
    }
}

fn search_params(
    credentials: &SearchCredentials,
    query: &SearchQuery,
    start: u32,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.name.clone()),
        ("key", credentials.api_key.clone()),
        ("cx", credentials.engine_id.clone()),
        ("prettyPrint", "false".to_string()),
        ("safe", "active".to_string()),
        ("fields", "items/link".to_string()),
        ("searchType", "image".to_string()),
        ("imgType", "face".to_string()),
        ("start", start.to_string()),
    ];
    if let Some(ip) = &query.client_ip {
        params.push(("userIp", ip.clone()));
    }
    params
}

fn extract_links(body: &str, limit: usize) -> Result<Vec<String>, serde_json::Error> {
    let page: SearchPage = serde_json::from_str(body)?;

    Ok(page
        .items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| item.link)
        .take(limit)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> SearchCredentials {
        SearchCredentials {
            api_key: "key".to_string(),
            engine_id: "engine".to_string(),
        }
    }

    #[test]
    fn params_include_client_ip_when_known() {
        let query = SearchQuery::new("Ada Lovelace", Some("203.0.113.9".to_string()));

        let params = search_params(&credentials(), &query, 11);

        assert!(params.contains(&("q", "Ada Lovelace".to_string())));
        assert!(params.contains(&("cx", "engine".to_string())));
        assert!(params.contains(&("start", "11".to_string())));
        assert!(params.contains(&("searchType", "image".to_string())));
        assert!(params.contains(&("userIp", "203.0.113.9".to_string())));
    }

    #[test]
    fn params_omit_unknown_client_ip() {
        let query = SearchQuery::new("Ada Lovelace", None);

        let params = search_params(&credentials(), &query, 1);

        assert!(params.iter().all(|(key, _)| *key != "userIp"));
    }

    #[test]
    fn extract_links_caps_each_page() {
        let items: Vec<String> = (0..12)
            .map(|i| format!(r#"{{"link": "https://img.example/{i}.jpg"}}"#))
            .collect();
        let body = format!(r#"{{"items": [{}]}}"#, items.join(","));

        let links = extract_links(&body, LINKS_PER_PAGE).expect("valid page");

        assert_eq!(links.len(), 10);
        assert_eq!(links[0], "https://img.example/0.jpg");
    }

    #[test]
    fn extract_links_tolerates_missing_items() {
        assert!(extract_links("{}", LINKS_PER_PAGE).expect("valid page").is_empty());
        assert!(extract_links("not json", LINKS_PER_PAGE).is_err());
    }

    #[tokio::test]
    async fn unconfigured_search_is_a_no_op() {
        let source = GoogleImageSearch::new(Client::new(), SearchConfig::default());
        assert!(!source.is_configured());

        let links = source
            .search(&SearchQuery::new("Ada", None))
            .await
            .expect("no-op search should not fail");

        assert!(links.is_empty());
    }
}
