//! Parser for the embedded non-glTF binary mesh format (A4).
//!
//! Standalone from the glTF pipeline: the scene-description layer's
//! `mesh_register.binary` field references files in this format, but wiring
//! that up is left to that layer, not this crate (see the design notes on
//! the binary-mesh format's scope).

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Error, Result};

/// Vertex layout: which attributes follow position in each vertex record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VertexType {
    /// Position only (12 bytes/vertex).
    Position,
    /// Position + normal (24 bytes/vertex).
    PositionNormal,
    /// Position + texcoord (20 bytes/vertex).
    PositionTexCoord,
    /// Position + normal + texcoord (32 bytes/vertex).
    PositionNormalTexCoord,
}

impl VertexType {
    fn from_byte(value: u8) -> Option<Self> {
        match value {
            0 => Some(VertexType::Position),
            1 => Some(VertexType::PositionNormal),
            2 => Some(VertexType::PositionTexCoord),
            3 => Some(VertexType::PositionNormalTexCoord),
            _ => None,
        }
    }

    /// Size in bytes of one vertex record in this layout.
    pub fn stride(self) -> usize {
        match self {
            VertexType::Position => 12,
            VertexType::PositionNormal => 24,
            VertexType::PositionTexCoord => 20,
            VertexType::PositionNormalTexCoord => 32,
        }
    }
}

/// Index element width.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexType {
    /// `u16` indices.
    U16,
    /// `u32` indices.
    U32,
}

impl IndexType {
    fn from_byte(value: u8) -> Option<Self> {
        match value {
            0 => Some(IndexType::U16),
            1 => Some(IndexType::U32),
            _ => None,
        }
    }

    fn size(self) -> usize {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Draw topology.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrimitiveType {
    /// Triangle list.
    Triangles,
    /// Line list.
    Lines,
}

impl PrimitiveType {
    fn from_byte(value: u8) -> Option<Self> {
        match value {
            0 => Some(PrimitiveType::Triangles),
            1 => Some(PrimitiveType::Lines),
            _ => None,
        }
    }
}

/// A parsed binary mesh: header fields plus raw vertex/index byte slices,
/// borrowed from the input buffer.
#[derive(Debug)]
pub struct BinaryMesh<'a> {
    /// Vertex attribute layout.
    pub vertex_type: VertexType,
    /// Index element width.
    pub index_type: IndexType,
    /// Draw topology.
    pub primitive_type: PrimitiveType,
    /// Number of vertex records.
    pub vertex_count: u32,
    /// Number of indices.
    pub index_count: u32,
    /// Raw vertex bytes, `vertex_count * vertex_type.stride()` long.
    pub vertex_data: &'a [u8],
    /// Raw index bytes, `index_count * index_type.size()` long.
    pub index_data: &'a [u8],
}

const HEADER_LEN: usize = 12;

/// Parses a binary mesh header and slices out its vertex/index data,
/// rejecting truncated headers and unrecognized type bytes as
/// [`Error::MalformedAsset`].
pub fn parse(bytes: &[u8]) -> Result<BinaryMesh<'_>> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::MalformedAsset(format!(
            "binary mesh header truncated: got {} byte(s), need at least {HEADER_LEN}",
            bytes.len()
        )));
    }

    let vertex_type = VertexType::from_byte(bytes[0])
        .ok_or_else(|| Error::MalformedAsset(format!("unrecognized binary mesh vtype {}", bytes[0])))?;
    let index_type = IndexType::from_byte(bytes[1])
        .ok_or_else(|| Error::MalformedAsset(format!("unrecognized binary mesh itype {}", bytes[1])))?;
    let primitive_type = PrimitiveType::from_byte(bytes[2])
        .ok_or_else(|| Error::MalformedAsset(format!("unrecognized binary mesh ptype {}", bytes[2])))?;
    // bytes[3] is padding, ignored.

    let mut cursor = Cursor::new(&bytes[4..HEADER_LEN]);
    let vertex_count = cursor.read_u32::<LittleEndian>()?;
    let index_count = cursor.read_u32::<LittleEndian>()?;

    let vertex_bytes = vertex_count as usize * vertex_type.stride();
    let index_bytes = index_count as usize * index_type.size();
    let total = HEADER_LEN
        .checked_add(vertex_bytes)
        .and_then(|n| n.checked_add(index_bytes))
        .ok_or_else(|| Error::MalformedAsset("binary mesh size overflow".into()))?;
    if bytes.len() < total {
        return Err(Error::MalformedAsset(format!(
            "binary mesh truncated: declares {total} byte(s), got {}",
            bytes.len()
        )));
    }

    Ok(BinaryMesh {
        vertex_type,
        index_type,
        primitive_type,
        vertex_count,
        index_count,
        vertex_data: &bytes[HEADER_LEN..HEADER_LEN + vertex_bytes],
        index_data: &bytes[HEADER_LEN + vertex_bytes..total],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(vtype: u8, itype: u8, ptype: u8, vertex_count: u32, index_count: u32) -> Vec<u8> {
        let mut bytes = vec![vtype, itype, ptype, 0];
        bytes.extend_from_slice(&vertex_count.to_le_bytes());
        bytes.extend_from_slice(&index_count.to_le_bytes());
        bytes
    }

    #[test]
    fn parses_minimal_position_only_mesh() {
        let mut bytes = header(0, 0, 0, 1, 3);
        bytes.extend_from_slice(&[0u8; 12]); // one P vertex
        bytes.extend_from_slice(&[0u8; 6]); // three u16 indices
        let mesh = parse(&bytes).unwrap();
        assert_eq!(mesh.vertex_type, VertexType::Position);
        assert_eq!(mesh.index_type, IndexType::U16);
        assert_eq!(mesh.primitive_type, PrimitiveType::Triangles);
        assert_eq!(mesh.vertex_data.len(), 12);
        assert_eq!(mesh.index_data.len(), 6);
    }

    #[test]
    fn rejects_truncated_header() {
        let bytes = vec![0u8; 8];
        assert!(matches!(parse(&bytes), Err(Error::MalformedAsset(_))));
    }

    #[test]
    fn rejects_unknown_vtype() {
        let bytes = header(9, 0, 0, 0, 0);
        assert!(matches!(parse(&bytes), Err(Error::MalformedAsset(_))));
    }

    #[test]
    fn rejects_body_shorter_than_declared() {
        let bytes = header(3, 1, 1, 10, 10);
        assert!(matches!(parse(&bytes), Err(Error::MalformedAsset(_))));
    }
}
