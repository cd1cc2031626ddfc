//! URL encoding for identifiers interpolated into API paths.
//!
//! Grafana uids are usually URL-safe, but uids supplied by users or copied
//! from templates are not guaranteed to be. Every uid placed in a request
//! path goes through [`encode_path_segment`] so that a stray `/`, `?` or `#`
//! cannot change which resource is addressed.
//!
//! # Example
//!
//! ```
//! use grafana_client::endpoints::url_encoding::encode_path_segment;
//!
//! assert_eq!(encode_path_segment("team/a"), "team%2Fa");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Characters that must be percent-encoded in URL path segments.
///
/// Based on RFC 3986 section 3.3, plus characters that would otherwise
/// re-route a request (slash, question mark, hash) or be decoded twice
/// (percent).
pub const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'~')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'+')
    .add(b',')
    .add(b';')
    .add(b'[')
    .add(b']');

/// Percent-encode a string for safe use as a URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}
