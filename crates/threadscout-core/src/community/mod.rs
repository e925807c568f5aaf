//! Community backends: thread ids, comment enrichment and meta-search

pub mod comments;
pub mod searxng;
pub mod topic;

pub use comments::{
    build_comment_block, ArcticShiftClient, CommentSource, RawComment, DEFAULT_COMMENT_LIMIT,
    DEFAULT_TOP_N,
};
pub use searxng::{MetaSearch, SearxngClient};
pub use topic::{extract_topic_id, post_fullname};
