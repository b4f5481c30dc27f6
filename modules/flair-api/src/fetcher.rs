use async_trait::async_trait;
use reddit_client::{RedditClient, Thread};

/// Source of Reddit threads for the handlers.
#[async_trait]
pub trait ThreadFetcher: Send + Sync {
    async fn fetch_thread(&self, url: &str) -> reddit_client::Result<Thread>;
}

#[async_trait]
impl ThreadFetcher for RedditClient {
    async fn fetch_thread(&self, url: &str) -> reddit_client::Result<Thread> {
        RedditClient::fetch_thread(self, url).await
    }
}
