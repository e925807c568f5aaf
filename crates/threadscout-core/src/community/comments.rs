//! Comment enrichment for community threads
//!
//! Fetches top-level replies from the Arctic Shift archive and renders the
//! best of them as a bullet block appended to a search hit.

use crate::config::CommentSourceConfig;
use crate::error::{Result, ThreadScoutError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Comments requested per thread unless configured otherwise
pub const DEFAULT_COMMENT_LIMIT: usize = 10;

/// Comments rendered per block unless configured otherwise
pub const DEFAULT_TOP_N: usize = 5;

const COMMENT_BLOCK_HEADER: &str = "Top comments:";

/// Bodies left behind by moderation or deleted accounts
const PLACEHOLDER_BODIES: &[&str] = &["", "[deleted]", "[removed]"];

/// A comment as returned by the archive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    /// Upvotes, used when `score` is missing
    #[serde(default)]
    pub ups: Option<i64>,
    /// Creation time (Unix seconds)
    #[serde(default)]
    pub created_utc: Option<f64>,
}

impl RawComment {
    fn effective_score(&self) -> i64 {
        self.score.or(self.ups).unwrap_or(0)
    }

    fn created(&self) -> f64 {
        self.created_utc.unwrap_or(0.0)
    }

    fn trimmed_body(&self) -> &str {
        self.body.as_deref().unwrap_or("").trim()
    }
}

/// Source of comments for a thread
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Fetch comments whose link is `post_fullname`
    ///
    /// A non-success response is a [`ThreadScoutError::Retrieval`].
    async fn fetch_top_comments(&self, post_fullname: &str, limit: usize)
        -> Result<Vec<RawComment>>;
}

/// Client for the Arctic Shift comment search API
pub struct ArcticShiftClient {
    client: Client,
    base_url: String,
}

impl ArcticShiftClient {
    pub fn new(config: &CommentSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("threadscout/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CommentSource for ArcticShiftClient {
    async fn fetch_top_comments(
        &self,
        post_fullname: &str,
        limit: usize,
    ) -> Result<Vec<RawComment>> {
        let url = format!("{}/comments/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string()), ("link_id", post_fullname.to_string())])
            .send()
            .await
            .map_err(|e| {
                ThreadScoutError::Retrieval(format!(
                    "Failed to fetch comments for {}: {}",
                    post_fullname, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ThreadScoutError::Retrieval(format!(
                "Comment source returned HTTP {} for {}",
                status.as_u16(),
                post_fullname
            )));
        }

        let payload: Value = response.json().await.map_err(|e| {
            ThreadScoutError::Retrieval(format!("Invalid comment payload: {}", e))
        })?;

        let comments = parse_comments_payload(payload);
        tracing::debug!(
            "Comment source returned {} comments for {}",
            comments.len(),
            post_fullname
        );
        Ok(comments)
    }
}

/// Decode `{"data": [...]}` or a bare list; anything else is empty
///
/// Entries that are not comment objects are skipped.
pub fn parse_comments_payload(payload: Value) -> Vec<RawComment> {
    let list = match payload {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        other => other,
    };

    match list {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Render the best top-level replies as a text block
///
/// Keeps replies whose parent is the post itself and whose body is real
/// text, sorts by score then recency (both descending, stable otherwise) and
/// renders up to `top_n` bullets. Returns an empty string when nothing
/// qualifies; otherwise the block starts with a blank line so it can be
/// appended to other text.
pub fn build_comment_block(comments: &[RawComment], post_fullname: &str, top_n: usize) -> String {
    let mut top_level: Vec<&RawComment> = comments
        .iter()
        .filter(|c| c.parent_id.as_deref() == Some(post_fullname))
        .filter(|c| !PLACEHOLDER_BODIES.contains(&c.trimmed_body()))
        .collect();

    if top_level.is_empty() {
        return String::new();
    }

    top_level.sort_by(|a, b| {
        b.effective_score()
            .cmp(&a.effective_score())
            .then_with(|| b.created().total_cmp(&a.created()))
    });

    let bullets = top_level
        .iter()
        .take(top_n)
        .map(|c| format!("- {}", c.trimmed_body()))
        .collect::<Vec<_>>()
        .join("\n");

    format!("\n\n{}\n{}", COMMENT_BLOCK_HEADER, bullets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn comment(parent: &str, body: &str, score: i64, created: f64) -> RawComment {
        RawComment {
            parent_id: Some(parent.to_string()),
            body: Some(body.to_string()),
            score: Some(score),
            ups: None,
            created_utc: Some(created),
        }
    }

    #[test]
    fn test_block_filters_deleted() {
        let comments = vec![
            comment("t3_abc", "Reinstall the driver", 5, 1.0),
            comment("t3_abc", "[deleted]", 50, 2.0),
        ];

        let block = build_comment_block(&comments, "t3_abc", 5);
        assert_eq!(block, "\n\nTop comments:\n- Reinstall the driver");
    }

    #[test]
    fn test_block_empty_input() {
        assert_eq!(build_comment_block(&[], "t3_abc", 5), "");
    }

    #[test]
    fn test_block_only_top_level() {
        let comments = vec![
            comment("t1_reply", "nested answer", 100, 1.0),
            comment("t3_other", "other thread", 100, 1.0),
            comment("t3_abc", "   [removed]  ", 3, 1.0),
            comment("t3_abc", "   ", 3, 1.0),
        ];
        assert_eq!(build_comment_block(&comments, "t3_abc", 5), "");
    }

    #[test]
    fn test_block_sorted_by_score_then_recency() {
        let comments = vec![
            comment("t3_abc", "old low", 1, 10.0),
            comment("t3_abc", "  high  ", 9, 5.0),
            comment("t3_abc", "new low", 1, 20.0),
            comment("t3_abc", "tie first", 1, 10.0),
        ];

        let block = build_comment_block(&comments, "t3_abc", 3);
        assert_eq!(
            block,
            "\n\nTop comments:\n- high\n- new low\n- old low"
        );
    }

    #[test]
    fn test_block_uses_ups_when_score_missing() {
        let mut by_ups = comment("t3_abc", "by ups", 0, 1.0);
        by_ups.score = None;
        by_ups.ups = Some(7);
        let comments = vec![comment("t3_abc", "scored", 3, 1.0), by_ups];

        let block = build_comment_block(&comments, "t3_abc", 1);
        assert_eq!(block, "\n\nTop comments:\n- by ups");
    }

    #[test]
    fn test_parse_payload_shapes() {
        let wrapped = json!({"data": [{"parent_id": "t3_a", "body": "x", "score": 2, "created_utc": 1700000000}]});
        let parsed = parse_comments_payload(wrapped);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].created_utc, Some(1700000000.0));

        let bare = json!([{"parent_id": "t3_a", "body": "y"}, "junk"]);
        assert_eq!(parse_comments_payload(bare).len(), 1);

        assert!(parse_comments_payload(json!({"data": "nope"})).is_empty());
        assert!(parse_comments_payload(json!({"error": "x"})).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_retrieval_error() {
        let client = ArcticShiftClient::new(&CommentSourceConfig {
            url: "http://127.0.0.1:1/api".to_string(),
            limit: DEFAULT_COMMENT_LIMIT,
            top_n: DEFAULT_TOP_N,
            timeout_secs: 2,
        })
        .unwrap();

        let result = client.fetch_top_comments("t3_abc", 10).await;
        assert!(matches!(result, Err(ThreadScoutError::Retrieval(_))));
    }
}
