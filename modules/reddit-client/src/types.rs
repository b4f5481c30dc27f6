use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{RedditError, Result};

// --- Raw API types ---

/// Response body of the `client_credentials` token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// A Reddit listing wrapper: `{"kind": "Listing", "data": {"children": [...]}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData {
    pub children: Vec<Thing>,
    pub after: Option<String>,
}

/// A listing child, tagged by Reddit's "kind" prefix.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Thing {
    #[serde(rename = "t1")]
    Comment(Comment),
    #[serde(rename = "t3")]
    Link(Submission),
    /// Pagination placeholder standing in for comments that were not expanded.
    #[serde(rename = "more")]
    More(MoreComments),
}

/// A link submission (the thread itself).
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    pub subreddit: Option<String>,
    pub link_flair_text: Option<String>,
    pub permalink: Option<String>,
    pub created_utc: Option<f64>,
    pub num_comments: Option<i64>,
}

impl Submission {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_utc
            .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
    }
}

/// A single comment.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub body: String,
    pub author: Option<String>,
    pub score: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreComments {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub children: Vec<String>,
}

// --- Thread ---

/// A fetched discussion thread: its title plus top-level comment bodies in API order.
#[derive(Debug, Clone)]
pub struct Thread {
    pub url: String,
    pub id: String,
    pub title: String,
    pub subreddit: Option<String>,
    /// The flair currently assigned on Reddit, if any.
    pub link_flair_text: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub comments: Vec<String>,
}

impl Thread {
    /// Build a thread from the two listings returned by `/comments/{id}`.
    /// `more` placeholders are skipped; everything else keeps API order.
    pub fn from_listings(url: &str, listings: Vec<Listing>) -> Result<Self> {
        let mut listings = listings.into_iter();

        let submission = listings
            .next()
            .and_then(|listing| {
                listing.data.children.into_iter().find_map(|thing| match thing {
                    Thing::Link(submission) => Some(submission),
                    _ => None,
                })
            })
            .ok_or_else(|| RedditError::NotFound(url.trim().to_string()))?;

        let comments = listings
            .next()
            .map(|listing| {
                listing
                    .data
                    .children
                    .into_iter()
                    .filter_map(|thing| match thing {
                        Thing::Comment(comment) => Some(comment.body),
                        Thing::More(_) | Thing::Link(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            url: url.to_string(),
            created_at: submission.created_at(),
            id: submission.id,
            title: submission.title,
            subreddit: submission.subreddit,
            link_flair_text: submission.link_flair_text,
            comments,
        })
    }

    /// Comment bodies concatenated with no separator, followed by the title.
    pub fn combined_text(&self) -> String {
        let mut text = self.comments.concat();
        text.push_str(&self.title);
        text
    }
}
