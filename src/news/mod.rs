mod gateway;
pub mod sentiment;

pub use gateway::{normalize, NewsGateway, RawArticle};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Article;

pub const DEFAULT_HEADLINE_LIMIT: u32 = 12;
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Remote article source. Every call goes to the network; nothing is cached.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Top headlines for `category`, at most `limit` of them.
    async fn fetch_by_category(&self, category: &str, limit: u32) -> Result<Vec<Article>>;

    /// Articles matching the caller's literal `query`, at most `limit` of them.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Article>>;
}
