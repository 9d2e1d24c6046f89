//! A2E model header
//!
//! # Layout
//! ```text
//! 0x00: magic "A2EMODEL" (8 bytes, no terminator)
//! 0x08: version u32 (= 2)
//! 0x0C: model_type u8 (0x00 = no collision mesh, 0x02 = has collision mesh)
//! 0x0D: vertex_count u32 (sum across all sub-objects)
//! 0x11: tex_coord_count u32 (sum across all sub-objects)
//! ```

use super::A2mFormatError;

/// File magic
pub const A2M_MAGIC: &[u8; 8] = b"A2EMODEL";

/// Only version written and accepted
pub const A2M_VERSION: u32 = 2;

/// File extension for converted models
pub const A2M_EXT: &str = "a2m";

/// Kind of model stored in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ModelType {
    /// Render mesh only
    Static = 0x00,
    /// Render mesh followed by a collision mesh
    WithCollision = 0x02,
}

impl ModelType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Static),
            0x02 => Some(Self::WithCollision),
            _ => None,
        }
    }
}

/// A2E model header (21 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct A2mHeader {
    pub version: u32,
    pub model_type: ModelType,
    pub vertex_count: u32,
    pub tex_coord_count: u32,
}

impl A2mHeader {
    pub const SIZE: usize = 21;

    pub fn new(model_type: ModelType, vertex_count: u32, tex_coord_count: u32) -> Self {
        Self {
            version: A2M_VERSION,
            model_type,
            vertex_count,
            tex_coord_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..8].copy_from_slice(A2M_MAGIC);
        bytes[8..12].copy_from_slice(&self.version.to_le_bytes());
        bytes[12] = self.model_type as u8;
        bytes[13..17].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[17..21].copy_from_slice(&self.tex_coord_count.to_le_bytes());
        bytes
    }

    /// Parse and validate a header
    pub fn parse(bytes: &[u8]) -> Result<Self, A2mFormatError> {
        if bytes.len() < Self::SIZE {
            return Err(A2mFormatError::UnexpectedEof {
                offset: bytes.len(),
                needed: Self::SIZE - bytes.len(),
            });
        }
        if &bytes[0..8] != A2M_MAGIC {
            return Err(A2mFormatError::BadMagic);
        }

        let version = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        if version != A2M_VERSION {
            return Err(A2mFormatError::UnsupportedVersion(version));
        }
        let model_type =
            ModelType::from_u8(bytes[12]).ok_or(A2mFormatError::UnknownModelType(bytes[12]))?;

        Ok(Self {
            version,
            model_type,
            vertex_count: u32::from_le_bytes([bytes[13], bytes[14], bytes[15], bytes[16]]),
            tex_coord_count: u32::from_le_bytes([bytes[17], bytes[18], bytes[19], bytes[20]]),
        })
    }

    pub fn has_collision(&self) -> bool {
        self.model_type == ModelType::WithCollision
    }
}
