//! URL encoding for identifiers interpolated into API paths.
//!
//! Watch ids come straight from ConfigMap content (or from titles run
//! through ID generation), so they are percent-encoded before being placed
//! in a path. Without encoding, `a/b` would address a nested resource and
//! `a?b` would start a query string.
//!
//! # Example
//!
//! ```
//! use sidecar_client::endpoints::url_encoding::encode_path_segment;
//!
//! assert_eq!(encode_path_segment("cpu/high"), "cpu%2Fhigh");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Characters that must be percent-encoded in URL path segments.
///
/// RFC 3986 section 3.3 plus the characters Elasticsearch treats specially
/// in paths. `*`, `-`, `_` and `.` pass through since generated ids use them.
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
