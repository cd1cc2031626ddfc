//! Addresses of Grafana objects and their filesystem-safe encoding.
//!
//! A Grafana object is addressed as `org/folder/name`, where `org` is
//! optional and `folder` defaults to `General`. [`PathCodec`] converts these
//! addresses to and from paths whose segments are escaped independently, so
//! titles containing `/`, spaces or unicode survive a trip through the
//! filesystem.
//!
//! Responsibilities:
//! - Escape and unescape single segments (`+` for space, `%XX` otherwise).
//! - Normalize 1, 2 or 3 segments into a [`GrafanaPath`].
//!
//! Does NOT handle:
//! - Looking objects up (see [`crate::finder`]).
//!
//! Invariants:
//! - `decode(encode(xs)) == xs` for every sequence of segments.
//! - Encoded segments never contain a path separator and are never `.`,
//!   `..` or empty.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use grafana_config::constants::GENERAL_FOLDER;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bytes escaped inside a segment: everything except ASCII alphanumerics and `_.-~`.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Encoding of the empty segment. A lone `%` is never produced for a
/// non-empty segment because `%` itself is escaped.
const EMPTY_SEGMENT: &str = "%";

/// Structured address of a dashboard or alert rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrafanaPath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default = "default_folder")]
    pub folder: String,
    pub name: String,
}

fn default_folder() -> String {
    GENERAL_FOLDER.to_string()
}

impl GrafanaPath {
    /// An object in the General folder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            org: None,
            folder: default_folder(),
            name: name.into(),
        }
    }

    pub fn in_folder(folder: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            org: None,
            folder: folder.into(),
            name: name.into(),
        }
    }

    pub fn in_org(org: impl Into<String>, folder: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            org: Some(org.into()),
            folder: folder.into(),
            name: name.into(),
        }
    }

    /// Segments `[org?, folder, name]`.
    pub fn segments(&self) -> Vec<String> {
        let mut segments = Vec::with_capacity(3);
        if let Some(org) = &self.org {
            segments.push(org.clone());
        }
        segments.push(self.folder.clone());
        segments.push(self.name.clone());
        segments
    }
}

impl fmt::Display for GrafanaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments().join("/"))
    }
}

/// Anything that can name a Grafana object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLike {
    Path(GrafanaPath),
    /// Raw, unescaped segments.
    Segments(Vec<String>),
    /// A `/`-separated string. Empty parts are ignored; nothing is unescaped.
    Raw(String),
}

impl From<GrafanaPath> for PathLike {
    fn from(path: GrafanaPath) -> Self {
        PathLike::Path(path)
    }
}

impl From<&GrafanaPath> for PathLike {
    fn from(path: &GrafanaPath) -> Self {
        PathLike::Path(path.clone())
    }
}

impl From<Vec<String>> for PathLike {
    fn from(segments: Vec<String>) -> Self {
        PathLike::Segments(segments)
    }
}

impl From<&[&str]> for PathLike {
    fn from(segments: &[&str]) -> Self {
        PathLike::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl From<String> for PathLike {
    fn from(raw: String) -> Self {
        PathLike::Raw(raw)
    }
}

impl From<&str> for PathLike {
    fn from(raw: &str) -> Self {
        PathLike::Raw(raw.to_string())
    }
}

impl fmt::Display for PathLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathLike::Path(path) => write!(f, "{path}"),
            PathLike::Segments(segments) => write!(f, "{}", segments.join("/")),
            PathLike::Raw(raw) => write!(f, "{raw}"),
        }
    }
}

/// Conversions between [`GrafanaPath`]s, segment lists and escaped paths.
pub struct PathCodec;

impl PathCodec {
    /// Escape one segment so it is a single, safe filename.
    pub fn encode_segment(segment: &str) -> String {
        match segment {
            "" => EMPTY_SEGMENT.to_string(),
            "." => "%2E".to_string(),
            ".." => "%2E%2E".to_string(),
            _ => utf8_percent_encode(segment, SEGMENT_ENCODE_SET)
                .to_string()
                .replace("%20", "+"),
        }
    }

    /// Reverse [`PathCodec::encode_segment`].
    pub fn decode_segment(segment: &str) -> String {
        if segment == EMPTY_SEGMENT {
            return String::new();
        }
        let spaced = segment.replace('+', " ");
        percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
    }

    /// Escape each segment and join them with the native separator.
    pub fn encode<S: AsRef<str>>(segments: &[S]) -> PathBuf {
        segments
            .iter()
            .map(|s| Self::encode_segment(s.as_ref()))
            .collect()
    }

    /// Split a path (ignoring any root) and unescape each segment.
    pub fn decode(path: &Path) -> Vec<String> {
        path.components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(Self::decode_segment(&part.to_string_lossy())),
                _ => None,
            })
            .collect()
    }

    /// Normalize anything path-like into a [`GrafanaPath`].
    pub fn try_parse(path: impl Into<PathLike>) -> Result<GrafanaPath> {
        let segments = match path.into() {
            PathLike::Path(path) => return Ok(path),
            PathLike::Segments(segments) => segments,
            PathLike::Raw(raw) => raw
                .split('/')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        };
        Self::from_segments(segments)
    }

    fn from_segments(mut segments: Vec<String>) -> Result<GrafanaPath> {
        match segments.len() {
            1 => Ok(GrafanaPath::new(segments.remove(0))),
            2 => {
                let name = segments.remove(1);
                Ok(GrafanaPath::in_folder(segments.remove(0), name))
            }
            3 => {
                let name = segments.remove(2);
                let folder = segments.remove(1);
                Ok(GrafanaPath::in_org(segments.remove(0), folder, name))
            }
            _ => Err(Error::MalformedPath { segments }),
        }
    }

    /// Encode a [`GrafanaPath`] as `[org?]/folder/name`.
    pub fn encode_grafana(path: &GrafanaPath) -> PathBuf {
        Self::encode(&path.segments())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_segment_escapes_separators_and_spaces() {
        assert_eq!(PathCodec::encode_segment("a/b c"), "a%2Fb+c");
        assert_eq!(PathCodec::encode_segment("a+b"), "a%2Bb");
        assert_eq!(PathCodec::encode_segment("v1.2_x-y~"), "v1.2_x-y~");
        assert_eq!(PathCodec::encode_segment("é"), "%C3%A9");
    }

    #[test]
    fn test_special_segments_are_never_path_components() {
        assert_eq!(PathCodec::encode_segment(""), "%");
        assert_eq!(PathCodec::encode_segment("."), "%2E");
        assert_eq!(PathCodec::encode_segment(".."), "%2E%2E");
        assert_eq!(PathCodec::decode_segment("%"), "");
        assert_eq!(PathCodec::decode_segment("%2E%2E"), "..");
    }

    #[test]
    fn test_decode_strips_root() {
        let decoded = PathCodec::decode(Path::new("/Main+Org./Ops/CPU%2FMemory"));
        assert_eq!(decoded, vec!["Main Org.", "Ops", "CPU/Memory"]);
    }

    #[test]
    fn test_try_parse_normalizes_segment_counts() {
        assert_eq!(
            PathCodec::try_parse("CPU").unwrap(),
            GrafanaPath::in_folder("General", "CPU")
        );
        assert_eq!(
            PathCodec::try_parse("Ops/CPU").unwrap(),
            GrafanaPath::in_folder("Ops", "CPU")
        );
        assert_eq!(
            PathCodec::try_parse("/Main/Ops/CPU").unwrap(),
            GrafanaPath::in_org("Main", "Ops", "CPU")
        );
        assert!(matches!(
            PathCodec::try_parse("a/b/c/d"),
            Err(Error::MalformedPath { segments }) if segments.len() == 4
        ));
        assert!(matches!(
            PathCodec::try_parse(""),
            Err(Error::MalformedPath { .. })
        ));
    }

    #[test]
    fn test_try_parse_segments_keeps_slashes_in_titles() {
        let path = PathCodec::try_parse(vec!["Ops".to_string(), "CPU/Memory".to_string()]).unwrap();
        assert_eq!(path.name, "CPU/Memory");
    }

    #[test]
    fn test_try_parse_string_does_not_unescape() {
        let path = PathCodec::try_parse("Ops/CPU%2FMemory").unwrap();
        assert_eq!(path.name, "CPU%2FMemory");
    }

    #[test]
    fn test_encode_grafana_includes_org_only_when_set() {
        assert_eq!(
            PathCodec::encode_grafana(&GrafanaPath::in_folder("Ops", "CPU usage")),
            PathBuf::from("Ops").join("CPU+usage")
        );
        assert_eq!(
            PathCodec::encode_grafana(&GrafanaPath::in_org("Main Org.", "Ops", "CPU")),
            PathBuf::from("Main+Org.").join("Ops").join("CPU")
        );
    }

    #[test]
    fn test_decode_then_parse_recovers_path() {
        let path = GrafanaPath::in_org("Main", "Ops/Infra", "CPU usage");
        let encoded = PathCodec::encode_grafana(&path);
        assert_eq!(PathCodec::try_parse(PathCodec::decode(&encoded)).unwrap(), path);
    }

    proptest! {
        #[test]
        fn prop_codec_round_trip(segments in proptest::collection::vec(".*", 0..6)) {
            let encoded = PathCodec::encode(&segments);
            prop_assert_eq!(PathCodec::decode(&encoded), segments);
        }

        #[test]
        fn prop_segment_never_contains_separator(segment in ".*") {
            let encoded = PathCodec::encode_segment(&segment);
            prop_assert!(!encoded.contains('/'));
            prop_assert!(!encoded.contains(std::path::MAIN_SEPARATOR));
            prop_assert!(!encoded.is_empty());
        }
    }
}
