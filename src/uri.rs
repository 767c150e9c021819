//! URI classification and resolution (C1).
//!
//! glTF buffer and image `uri` fields may be data URIs, absolute URLs, or
//! paths relative to the `.gltf` file. This mirrors the scheme handling the
//! teacher's `FromPath` source performs ad hoc, generalized into a standalone,
//! base-independent resolver.

/// A classified, fetchable reference to external data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Uri {
    /// A `data:` URI; the payload is embedded in the string itself.
    Data(String),
    /// An absolute URL (has its own scheme), used as-is.
    Absolute(String),
    /// A path relative to the document's base URI.
    Relative(String),
}

impl Uri {
    /// The string the caller should actually fetch.
    pub fn as_str(&self) -> &str {
        match self {
            Uri::Data(s) | Uri::Absolute(s) | Uri::Relative(s) => s,
        }
    }
}

fn is_data_uri(candidate: &str) -> bool {
    candidate.starts_with("data:")
}

fn scheme_end(candidate: &str) -> Option<usize> {
    let mut chars = candidate.char_indices();
    let (_, first) = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    for (i, c) in chars {
        match c {
            ':' if i > 0 => {
                // Require "://" to follow, per RFC 3986 scheme syntax used here.
                if candidate[i..].starts_with("://") {
                    return Some(i);
                }
                return None;
            }
            c if c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.' => continue,
            _ => return None,
        }
    }
    None
}

fn is_absolute_uri(candidate: &str) -> bool {
    scheme_end(candidate).is_some()
}

/// Strips the final path segment of `base` (keeping the trailing `/`), or
/// returns an empty prefix if `base` has no `/`.
fn base_prefix(base: &str) -> &str {
    match base.rfind('/') {
        Some(idx) => &base[..=idx],
        None => "",
    }
}

/// Classifies `candidate` and, if relative, resolves it against `base`.
///
/// Resolution rules, checked in order:
/// 1. `^data:` → returned as-is (`Uri::Data`).
/// 2. `^[a-z][-+.0-9a-z]*://` → returned as-is (`Uri::Absolute`).
/// 3. Otherwise, concatenated onto the last-segment-stripped `base`.
pub fn resolve(candidate: &str, base: &str) -> Uri {
    if is_data_uri(candidate) {
        return Uri::Data(candidate.to_string());
    }
    if is_absolute_uri(candidate) {
        return Uri::Absolute(candidate.to_string());
    }
    let mut resolved = base_prefix(base).to_string();
    resolved.push_str(candidate);
    Uri::Relative(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_data_uri() {
        let uri = resolve("data:application/octet-stream;base64,AAA=", "http://x/y.gltf");
        assert!(matches!(uri, Uri::Data(_)));
    }

    #[test]
    fn classifies_absolute_uri() {
        let uri = resolve("https://cdn.example/model.bin", "http://x/y.gltf");
        assert_eq!(uri, Uri::Absolute("https://cdn.example/model.bin".into()));
    }

    #[test]
    fn resolves_relative_against_base() {
        let uri = resolve("buffer0.bin", "http://host/assets/model.gltf");
        assert_eq!(uri, Uri::Relative("http://host/assets/buffer0.bin".into()));
    }

    #[test]
    fn resolves_relative_with_no_base_segment() {
        let uri = resolve("buffer0.bin", "model.gltf");
        assert_eq!(uri, Uri::Relative("buffer0.bin".into()));
    }

    #[test]
    fn resolves_relative_nested_path() {
        let uri = resolve("../textures/a.png", "http://host/assets/sub/model.gltf");
        assert_eq!(
            uri,
            Uri::Relative("http://host/assets/sub/../textures/a.png".into())
        );
    }
}
