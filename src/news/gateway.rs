use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Article;

use super::sentiment;
use super::ArticleSource;

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    articles: Vec<RawArticle>,
}

/// Article as returned by the GNews API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<String>,
}

pub struct NewsGateway {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    country: String,
    search_country: String,
    annotate_sentiment: bool,
}

impl NewsGateway {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("newspalette/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: "en".to_string(),
            country: "us".to_string(),
            search_country: "any".to_string(),
            annotate_sentiment: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut gateway = Self::new(
            &config.news_api_url,
            config.news_api_key.as_deref().unwrap_or_default(),
        );
        gateway.language = config.language.clone();
        gateway.country = config.country.clone();
        gateway.search_country = config.search_country.clone();
        gateway.annotate_sentiment = config.annotate_sentiment;
        gateway
    }

    pub fn with_sentiment(mut self, enabled: bool) -> Self {
        self.annotate_sentiment = enabled;
        self
    }

    async fn get_articles(&self, path: &str, query: &[(&str, &str)], limit: u32) -> Result<Vec<Article>> {
        let max = limit.to_string();
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(query)
            .query(&[("max", max.as_str()), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(retrieval_error)?;

        let body = read_success(response).await?;

        let articles: Vec<Article> = body
            .articles
            .into_iter()
            .filter_map(|raw| normalize(raw, self.annotate_sentiment))
            .take(limit as usize)
            .collect();

        Ok(articles)
    }
}

#[async_trait]
impl ArticleSource for NewsGateway {
    async fn fetch_by_category(&self, category: &str, limit: u32) -> Result<Vec<Article>> {
        let category = category.to_lowercase();
        let articles = self
            .get_articles(
                "top-headlines",
                &[
                    ("category", category.as_str()),
                    ("lang", self.language.as_str()),
                    ("country", self.country.as_str()),
                ],
                limit,
            )
            .await?;

        tracing::debug!(category = %category, count = articles.len(), "Fetched headlines");
        Ok(articles)
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Article>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Enter something to search for".to_string()));
        }

        let articles = self
            .get_articles(
                "search",
                &[
                    ("q", query),
                    ("lang", self.language.as_str()),
                    ("country", self.search_country.as_str()),
                ],
                limit,
            )
            .await?;

        tracing::debug!(query = %query, count = articles.len(), "Search finished");
        Ok(articles)
    }
}

fn retrieval_error(err: reqwest::Error) -> AppError {
    AppError::Retrieval(err.to_string())
}

async fn read_success(response: Response) -> Result<HeadlinesResponse> {
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(AppError::Retrieval(format!("HTTP {}: {}", status, detail.trim())));
    }

    let bytes = response.bytes().await.map_err(retrieval_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Retrieval(format!("malformed response: {e}")))
}

/// Maps a raw feed item onto `Article`. Items missing a title or url are
/// dropped since they cannot be shown or logged.
pub fn normalize(raw: RawArticle, annotate_sentiment: bool) -> Option<Article> {
    let title = raw.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
    let url = raw.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())?;

    let description = raw
        .description
        .map(|d| plain_text(&d))
        .filter(|d| !d.is_empty());

    let sentiment = if annotate_sentiment {
        description.as_deref().map(sentiment::classify)
    } else {
        None
    };

    Some(Article {
        id: url,
        title,
        description,
        image_url: raw.image.filter(|i| !i.is_empty()),
        published_at: raw.published_at.as_deref().and_then(parse_published),
        sentiment,
    })
}

fn plain_text(text: &str) -> String {
    let text = if text.contains('<') {
        html2text::from_read(text.as_bytes(), 10_000).unwrap_or_else(|_| text.to_string())
    } else {
        text.to_string()
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_published(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
