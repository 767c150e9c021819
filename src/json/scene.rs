use serde::{Deserialize, Serialize};

use crate::json::{mesh, Extras, Index};

/// A node in the node hierarchy.
///
/// A node can have either an explicit `matrix` or TRS (translation/rotation/
/// scale) properties, which are composed to a matrix the same way: `T * R * S`.
/// If neither is present, the local transform is the identity.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Node {
    /// Child node indices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Index<Node>>,

    /// The mesh instantiated by this node, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<Index<mesh::Mesh>>,

    /// 4x4 column-major local transformation matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f32; 16]>,

    /// TRS translation, used when `matrix` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<[f32; 3]>,

    /// TRS rotation quaternion `(x, y, z, w)`, used when `matrix` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 4]>,

    /// TRS non-uniform scale, used when `matrix` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 3]>,

    /// Optional user-defined name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application-specific data, passed through unexamined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}

/// A set of root nodes forming one renderable scene.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Scene {
    /// Indices of the root nodes of this scene.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Index<Node>>,

    /// Optional user-defined name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application-specific data, passed through unexamined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}
