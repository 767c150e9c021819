use serde::{de, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::json::{buffer, Extras, Index};

/// The component data type, as named in the design rather than by raw GL
/// enum value (that mapping lives in [`ComponentType::from_gl_enum`]).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComponentType {
    /// Corresponds to `GL_BYTE` (5120).
    I8,
    /// Corresponds to `GL_UNSIGNED_BYTE` (5121).
    U8,
    /// Corresponds to `GL_SHORT` (5122).
    I16,
    /// Corresponds to `GL_UNSIGNED_SHORT` (5123).
    U16,
    /// Corresponds to `GL_UNSIGNED_INT` (5125).
    U32,
    /// Corresponds to `GL_FLOAT` (5126).
    F32,
}

impl ComponentType {
    /// Size in bytes of a single component.
    pub fn size(self) -> usize {
        match self {
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }

    fn from_gl_enum(value: u32) -> Option<Self> {
        match value {
            5120 => Some(ComponentType::I8),
            5121 => Some(ComponentType::U8),
            5122 => Some(ComponentType::I16),
            5123 => Some(ComponentType::U16),
            5125 => Some(ComponentType::U32),
            5126 => Some(ComponentType::F32),
            _ => None,
        }
    }

    fn as_gl_enum(self) -> u32 {
        match self {
            ComponentType::I8 => 5120,
            ComponentType::U8 => 5121,
            ComponentType::I16 => 5122,
            ComponentType::U16 => 5123,
            ComponentType::U32 => 5125,
            ComponentType::F32 => 5126,
        }
    }
}

impl<'de> Deserialize<'de> for ComponentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        ComponentType::from_gl_enum(raw)
            .ok_or_else(|| de::Error::custom(format!("unrecognized accessor componentType {raw}")))
    }
}

impl Serialize for ComponentType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.as_gl_enum())
    }
}

/// Specifies whether an accessor addresses a scalar, vector, or matrix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Type {
    /// Scalar quantity (1 component).
    Scalar,
    /// 2D vector.
    Vec2,
    /// 3D vector.
    Vec3,
    /// 4D vector.
    Vec4,
    /// 2x2 matrix.
    Mat2,
    /// 3x3 matrix.
    Mat3,
    /// 4x4 matrix.
    Mat4,
}

impl Type {
    /// Number of scalar components this type represents.
    pub fn multiplicity(self) -> usize {
        match self {
            Type::Scalar => 1,
            Type::Vec2 => 2,
            Type::Vec3 => 3,
            Type::Vec4 | Type::Mat2 => 4,
            Type::Mat3 => 9,
            Type::Mat4 => 16,
        }
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct Visitor;
        impl de::Visitor<'_> for Visitor {
            type Value = Type;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("one of SCALAR, VEC2, VEC3, VEC4, MAT2, MAT3, MAT4")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Type, E> {
                match value {
                    "SCALAR" => Ok(Type::Scalar),
                    "VEC2" => Ok(Type::Vec2),
                    "VEC3" => Ok(Type::Vec3),
                    "VEC4" => Ok(Type::Vec4),
                    "MAT2" => Ok(Type::Mat2),
                    "MAT3" => Ok(Type::Mat3),
                    "MAT4" => Ok(Type::Mat4),
                    other => Err(de::Error::custom(format!("unrecognized accessor type {other:?}"))),
                }
            }
        }
        deserializer.deserialize_str(Visitor)
    }
}

impl Serialize for Type {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            Type::Scalar => "SCALAR",
            Type::Vec2 => "VEC2",
            Type::Vec3 => "VEC3",
            Type::Vec4 => "VEC4",
            Type::Mat2 => "MAT2",
            Type::Mat3 => "MAT3",
            Type::Mat4 => "MAT4",
        };
        serializer.serialize_str(s)
    }
}

/// A typed view over a region of a [`buffer::View`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Accessor {
    /// The buffer view this accessor reads from.
    #[serde(rename = "bufferView")]
    pub buffer_view: Index<buffer::View>,

    /// Offset relative to the start of the buffer view, in bytes.
    #[serde(default, rename = "byteOffset")]
    pub byte_offset: u64,

    /// Number of addressed elements.
    pub count: u64,

    /// The data type of each component.
    #[serde(rename = "componentType")]
    pub component_type: ComponentType,

    /// Whether a vector, scalar, or matrix.
    #[serde(rename = "type")]
    pub type_: Type,

    /// Whether integer data should be normalized to `[0, 1]`/`[-1, 1]`.
    #[serde(default)]
    pub normalized: bool,

    /// Per-component minimum, when present in the source asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,

    /// Per-component maximum, when present in the source asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,

    /// Optional user-defined name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application-specific data, passed through unexamined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}

/// Reads `min`/`max` as an `f32` tuple/array of the accessor's multiplicity,
/// returning `None` if absent or malformed.
pub fn read_f32_array(value: &Value, len: usize) -> Option<Vec<f32>> {
    let arr = value.as_array()?;
    if arr.len() != len {
        return None;
    }
    arr.iter().map(|v| v.as_f64().map(|f| f as f32)).collect()
}
