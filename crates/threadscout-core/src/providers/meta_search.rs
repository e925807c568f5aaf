//! Community meta-search provider
//!
//! Searches one community through a meta-search backend, keeps the hits the
//! reranker judges most relevant and appends each thread's top comments.

use crate::community::{
    build_comment_block, extract_topic_id, post_fullname, CommentSource, MetaSearch,
    DEFAULT_COMMENT_LIMIT, DEFAULT_TOP_N,
};
use crate::error::Result;
use crate::llm::HitReranker;
use crate::models::{EvidenceItem, Question, RawSearchHit};
use crate::providers::SearchProvider;
use async_trait::async_trait;
use std::sync::Arc;

pub struct MetaSearchProvider {
    id: String,
    display_name: String,
    search: Arc<dyn MetaSearch>,
    reranker: HitReranker,
    comments: Arc<dyn CommentSource>,
    comment_limit: usize,
    top_n: usize,
}

impl MetaSearchProvider {
    pub fn new(
        search: Arc<dyn MetaSearch>,
        reranker: HitReranker,
        comments: Arc<dyn CommentSource>,
    ) -> Self {
        Self {
            id: "searxng".to_string(),
            display_name: "SearXNG".to_string(),
            search,
            reranker,
            comments,
            comment_limit: DEFAULT_COMMENT_LIMIT,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_identity(mut self, id: &str, display_name: &str) -> Self {
        self.id = id.to_string();
        self.display_name = display_name.to_string();
        self
    }

    /// Comments fetched per thread and bullets rendered per block
    pub fn with_comment_limits(mut self, limit: usize, top_n: usize) -> Self {
        self.comment_limit = limit;
        self.top_n = top_n;
        self
    }

    /// Source tag on successful items, e.g. `searxng:reddit`
    pub fn source_tag(&self) -> String {
        format!("{}:{}", self.id, self.search.target())
    }

    async fn comment_block(&self, url: Option<&str>) -> String {
        let Some(topic_id) = extract_topic_id(url) else {
            return String::new();
        };
        let fullname = post_fullname(&topic_id);

        match self
            .comments
            .fetch_top_comments(&fullname, self.comment_limit)
            .await
        {
            Ok(comments) => build_comment_block(&comments, &fullname, self.top_n),
            Err(e) => {
                tracing::warn!("Skipping comments for {}: {}", fullname, e);
                String::new()
            }
        }
    }

    async fn to_evidence(&self, hit: RawSearchHit, source: &str) -> EvidenceItem {
        let block = self.comment_block(hit.url.as_deref()).await;
        let summary = format!("{}{}", hit.body_text(), block);

        EvidenceItem::new(source, summary)
            .with_url(hit.url)
            .with_title(hit.title)
    }
}

#[async_trait]
impl SearchProvider for MetaSearchProvider {
    fn provider_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    async fn search(&self, question: &Question, keyword_query: &str) -> Result<Vec<EvidenceItem>> {
        let raw_hits = self.search.search(keyword_query).await?;
        tracing::debug!("{} returned {} raw hits", self.display_name, raw_hits.len());

        let selected = self.reranker.rerank(question, raw_hits).await?;
        tracing::debug!("{} kept {} hits after rerank", self.display_name, selected.len());

        let source = self.source_tag();
        let mut items = Vec::with_capacity(selected.len());
        for hit in selected {
            items.push(self.to_evidence(hit, &source).await);
        }

        Ok(items)
    }
}
