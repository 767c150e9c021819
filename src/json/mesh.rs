use serde::{de, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::json::{accessor, material, Extras, Index};

/// The topology primitives are rendered with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// `GL_POINTS`.
    Points,
    /// `GL_LINES`.
    Lines,
    /// `GL_LINE_LOOP`.
    LineLoop,
    /// `GL_LINE_STRIP`.
    LineStrip,
    /// `GL_TRIANGLES`.
    Triangles,
    /// `GL_TRIANGLE_STRIP`.
    TriangleStrip,
    /// `GL_TRIANGLE_FAN`.
    TriangleFan,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Triangles
    }
}

impl Mode {
    /// Maps a raw glTF mode integer (`0..=6`) to its variant.
    pub fn from_gl_enum(value: u32) -> Option<Self> {
        match value {
            0 => Some(Mode::Points),
            1 => Some(Mode::Lines),
            2 => Some(Mode::LineLoop),
            3 => Some(Mode::LineStrip),
            4 => Some(Mode::Triangles),
            5 => Some(Mode::TriangleStrip),
            6 => Some(Mode::TriangleFan),
            _ => None,
        }
    }

    fn as_gl_enum(self) -> u32 {
        match self {
            Mode::Points => 0,
            Mode::Lines => 1,
            Mode::LineLoop => 2,
            Mode::LineStrip => 3,
            Mode::Triangles => 4,
            Mode::TriangleStrip => 5,
            Mode::TriangleFan => 6,
        }
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        Mode::from_gl_enum(raw).ok_or_else(|| de::Error::custom(format!("unrecognized primitive mode {raw}")))
    }
}

impl Serialize for Mode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.as_gl_enum())
    }
}

/// A single drawable unit: attributes, optional indices, material, and mode.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Primitive {
    /// Maps glTF attribute semantics (`POSITION`, `NORMAL`, `TEXCOORD_0`, ...)
    /// to the accessor holding that attribute's data.
    pub attributes: BTreeMap<Semantic, Index<accessor::Accessor>>,

    /// Index accessor, when the primitive is indexed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Index<accessor::Accessor>>,

    /// Material applied to this primitive, or the glTF 2.0 default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Index<material::Material>>,

    /// Topology of the primitive's vertices.
    #[serde(default)]
    pub mode: Mode,

    /// Application-specific data, passed through unexamined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}

/// A vertex attribute semantic name.
///
/// Known semantics are parsed into their own variant so the primitive builder
/// can map them to renderer attribute ids (`§4.7`); anything else is kept
/// verbatim and passed through unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Semantic {
    /// `POSITION`.
    Position,
    /// `NORMAL`.
    Normal,
    /// `TANGENT`.
    Tangent,
    /// `TEXCOORD_0`.
    TexCoord0,
    /// `TEXCOORD_1`.
    TexCoord1,
    /// `COLOR_0`.
    Color0,
    /// Any other semantic, kept verbatim.
    Other(String),
}

impl Semantic {
    /// The renderer-facing vertex attribute identifier for this semantic.
    pub fn renderer_attribute(&self) -> &str {
        match self {
            Semantic::Position => "a_position",
            Semantic::Normal => "a_normal",
            Semantic::Tangent => "a_tangent",
            Semantic::TexCoord0 => "a_texcoord",
            Semantic::TexCoord1 => "a_texcoord1",
            Semantic::Color0 => "a_color",
            Semantic::Other(name) => name,
        }
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Semantic::Position => "POSITION",
            Semantic::Normal => "NORMAL",
            Semantic::Tangent => "TANGENT",
            Semantic::TexCoord0 => "TEXCOORD_0",
            Semantic::TexCoord1 => "TEXCOORD_1",
            Semantic::Color0 => "COLOR_0",
            Semantic::Other(name) => name,
        };
        f.write_str(s)
    }
}

impl From<&str> for Semantic {
    fn from(value: &str) -> Self {
        match value {
            "POSITION" => Semantic::Position,
            "NORMAL" => Semantic::Normal,
            "TANGENT" => Semantic::Tangent,
            "TEXCOORD_0" => Semantic::TexCoord0,
            "TEXCOORD_1" => Semantic::TexCoord1,
            "COLOR_0" => Semantic::Color0,
            other => Semantic::Other(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Semantic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Semantic::from(s.as_str()))
    }
}

impl Serialize for Semantic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// An ordered list of primitives rendered together.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Mesh {
    /// The primitives that make up this mesh.
    pub primitives: Vec<Primitive>,

    /// Optional user-defined name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application-specific data, passed through unexamined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}
