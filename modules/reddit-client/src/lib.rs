pub mod error;
pub mod types;

pub use error::{RedditError, Result};
pub use types::{Comment, Listing, ListingData, MoreComments, Submission, Thing, Thread};

use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tokio::sync::Mutex;
use types::AccessTokenResponse;

const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";

const API_BASE_URL: &str = "https://oauth.reddit.com";

/// Tokens are refreshed this long before Reddit's stated expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Application-only (read-only) Reddit client.
pub struct RedditClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
    auth_url: String,
    api_base_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(client_id: String, client_secret: String, user_agent: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
            client_secret,
            user_agent,
            auth_url: AUTH_URL.to_string(),
            api_base_url: API_BASE_URL.to_string(),
            token: Mutex::new(None),
        }
    }

    /// Point the client at different token/API hosts (proxies, test servers).
    pub fn with_endpoints(
        mut self,
        auth_url: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        self.auth_url = auth_url.into();
        self.api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Return a valid bearer token, exchanging client credentials when the cached one is stale.
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("Requesting Reddit application token");
        let resp = self
            .client
            .post(&self.auth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(USER_AGENT, &self.user_agent)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Auth(format!("status {}: {}", status.as_u16(), body)));
        }

        let body = resp.text().await?;
        let token: AccessTokenResponse = serde_json::from_str(&body)
            .map_err(|e| RedditError::Auth(format!("unexpected token response: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        tracing::debug!(token_type = %token.token_type, expires_in = token.expires_in, "Reddit token acquired");

        Ok(token.access_token)
    }

    /// Fetch the raw submission + comment listings for a submission id.
    pub async fn get_comment_listings(&self, submission_id: &str) -> Result<Vec<Listing>> {
        let token = self.access_token().await?;
        let url = format!("{}/comments/{}?raw_json=1", self.api_base_url, submission_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RedditError::NotFound(submission_id.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let listings: Vec<Listing> = serde_json::from_str(&body)?;
        Ok(listings)
    }

    /// Fetch a thread end-to-end: resolve the id from the URL, fetch listings, flatten.
    pub async fn fetch_thread(&self, url: &str) -> Result<Thread> {
        let id = submission_id_from_url(url)?;
        tracing::info!(id = %id, "Fetching Reddit thread");

        let listings = self.get_comment_listings(&id).await?;
        let thread = Thread::from_listings(url, listings)?;
        tracing::info!(
            id = %id,
            comments = thread.comments.len(),
            flair = thread.link_flair_text.as_deref().unwrap_or(""),
            "Fetched Reddit thread"
        );

        Ok(thread)
    }
}

/// Resolve the submission id from a thread URL.
///
/// Accepts `/r/{sub}/comments/{id}/...`, `/comments/{id}`, `/gallery/{id}` and
/// `redd.it/{id}` short links. Surrounding whitespace is ignored.
pub fn submission_id_from_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let invalid = || RedditError::InvalidUrl(trimmed.to_string());

    let parsed = url::Url::parse(trimmed).map_err(|_| invalid())?;
    if parsed.host_str().is_none() {
        return Err(invalid());
    }

    let parts: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let id = if let Some(idx) = parts.iter().position(|p| *p == "gallery") {
        parts.get(idx + 1).copied()
    } else if let Some(idx) = parts.iter().position(|p| *p == "comments") {
        parts.get(idx + 1).copied()
    } else if parts.contains(&"r") {
        // Subreddit URL, not a submission
        None
    } else {
        parts.last().copied()
    };

    match id {
        Some(id) if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) => {
            Ok(id.to_string())
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_full_thread_url() {
        let id = submission_id_from_url(
            "https://www.reddit.com/r/india/comments/fj0tq4/coronavirus_update/",
        )
        .unwrap();
        assert_eq!(id, "fj0tq4");
    }

    #[test]
    fn id_ignores_trailing_newline() {
        let id = submission_id_from_url("https://www.reddit.com/r/india/comments/abc123/title\n")
            .unwrap();
        assert_eq!(id, "abc123");
    }

    #[test]
    fn id_from_comment_permalink() {
        let id = submission_id_from_url(
            "https://www.reddit.com/r/india/comments/abc123/title/fk1xyz9/",
        )
        .unwrap();
        assert_eq!(id, "abc123");
    }

    #[test]
    fn id_from_short_link() {
        assert_eq!(submission_id_from_url("https://redd.it/fj0tq4").unwrap(), "fj0tq4");
    }

    #[test]
    fn id_from_gallery_link() {
        assert_eq!(
            submission_id_from_url("https://www.reddit.com/gallery/xyz789").unwrap(),
            "xyz789"
        );
    }

    #[test]
    fn subreddit_url_is_rejected() {
        assert!(matches!(
            submission_id_from_url("https://www.reddit.com/r/india/"),
            Err(RedditError::InvalidUrl(_))
        ));
    }

    #[test]
    fn comments_without_id_is_rejected() {
        assert!(submission_id_from_url("https://www.reddit.com/r/india/comments/").is_err());
    }

    #[test]
    fn not_a_url_is_rejected() {
        assert!(matches!(
            submission_id_from_url("not a url"),
            Err(RedditError::InvalidUrl(_))
        ));
        assert!(submission_id_from_url("").is_err());
    }
}
