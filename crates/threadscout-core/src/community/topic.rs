//! Thread identifiers extracted from community URLs

use url::Url;

/// Short-link domain (`https://redd.it/<id>`)
pub const SHORT_LINK_DOMAIN: &str = "redd.it";

/// Canonical community domain (`https://www.reddit.com/r/<sub>/comments/<id>/...`)
pub const CANONICAL_DOMAIN: &str = "reddit.com";

/// Path segment preceding the thread id on the canonical domain
const COMMENTS_MARKER: &str = "comments";

/// Kind prefix of a link (post) fullname
pub const LINK_KIND_PREFIX: &str = "t3_";

/// Extract the thread id from a community URL
///
/// Returns `None` for empty, unparsable or unrelated URLs; never errors.
pub fn extract_topic_id(url: Option<&str>) -> Option<String> {
    let raw = url?.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    // Only outer slashes are trimmed; an empty inner segment is an empty id.
    let segments: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();

    let id = if host.ends_with(SHORT_LINK_DOMAIN) {
        segments.first()
    } else if host.contains(CANONICAL_DOMAIN) {
        segments
            .iter()
            .position(|seg| *seg == COMMENTS_MARKER)
            .and_then(|i| segments.get(i + 1))
    } else {
        None
    };

    id.filter(|seg| !seg.is_empty()).map(|seg| seg.to_string())
}

/// Turn a post id into the fullname used as comment `parent_id`
pub fn post_fullname(post_id: &str) -> String {
    format!("{}{}", LINK_KIND_PREFIX, post_id)
}
