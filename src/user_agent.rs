//! User-Agent string sent with image requests.

/// Tool description carried in the User-Agent comment.
const UA_COMMENT: &str = "image-grayscale-tool";

/// Default User-Agent for fetch requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_fetch_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("noir/{version} ({UA_COMMENT})")
}
