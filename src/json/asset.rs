use serde::{Deserialize, Serialize};

/// Metadata about the glTF asset, most importantly its `version` string.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Asset {
    /// glTF version in the form `"<major>.<minor>"`. Must parse with a
    /// major component `>= 2`, else [`crate::error::Error::VersionUnsupported`].
    pub version: String,

    /// Tool that generated this asset, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,

    /// Copyright message suitable for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            version: "2.0".to_string(),
            generator: None,
            copyright: None,
        }
    }
}

impl Asset {
    /// Parses `^(\d+)\.(\d+)` out of `version` and checks the major
    /// component is at least 2.
    pub fn major_minor(&self) -> Option<(u32, u32)> {
        let mut parts = self.version.splitn(2, '.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        Some((major, minor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_major_minor() {
        let asset = Asset {
            version: "2.0".into(),
            generator: None,
            copyright: None,
        };
        assert_eq!(asset.major_minor(), Some((2, 0)));
    }

    #[test]
    fn rejects_malformed_version() {
        let asset = Asset {
            version: "not-a-version".into(),
            generator: None,
            copyright: None,
        };
        assert_eq!(asset.major_minor(), None);
    }
}
