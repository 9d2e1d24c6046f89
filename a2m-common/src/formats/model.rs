//! A2E model body
//!
//! # Layout (after the 21-byte [`A2mHeader`])
//! ```text
//! 12*V:  vertex positions (f32 x, y, z)
//! 8*T:   texture coordinates (f32 u, v)
//! 4:     sub-object count S (u32)
//! var:   S names, each terminated by 0xFF
//! per sub-object:
//!   4:     face count F (u32)
//!   12*F:  vertex index triples (u32 x3)
//!   12*F:  texcoord index triples (u32 x3)
//! if model_type == 0x02:
//!   4:     collision vertex count Cv (u32)
//!   12*Cv: collision positions (f32 x, y, z)
//!   4:     collision triangle count Ci (u32)
//!   12*Ci: collision index triples (u32 x3)
//! ```

use std::io::Write;

use super::{A2mFormatError, A2mHeader, ModelType};

/// Byte terminating every sub-object name
pub const NAME_TERMINATOR: u8 = 0xFF;

/// One named sub-object: a face list over the model-wide vertex and
/// texcoord arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct A2mObject {
    pub name: String,
    pub vertex_indices: Vec<[u32; 3]>,
    pub tex_indices: Vec<[u32; 3]>,
}

/// Collision mesh appended to models of type [`ModelType::WithCollision`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct A2mCollision {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<[u32; 3]>,
}

/// A complete `.a2m` model as stored on disk.
///
/// Positions are stored already remapped; encoding writes them verbatim, so
/// `from_bytes` followed by `to_bytes` reproduces the input exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct A2mModel {
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub objects: Vec<A2mObject>,
    pub collision: Option<A2mCollision>,
}

fn count_u32(what: &'static str, count: usize) -> Result<u32, A2mFormatError> {
    u32::try_from(count).map_err(|_| A2mFormatError::CountOverflow { what, count })
}

impl A2mModel {
    pub fn model_type(&self) -> ModelType {
        if self.collision.is_some() {
            ModelType::WithCollision
        } else {
            ModelType::Static
        }
    }

    /// Build the header describing this model
    pub fn header(&self) -> Result<A2mHeader, A2mFormatError> {
        Ok(A2mHeader::new(
            self.model_type(),
            count_u32("vertex", self.positions.len())?,
            count_u32("texture coordinate", self.tex_coords.len())?,
        ))
    }

    /// Total number of faces across all sub-objects
    pub fn face_count(&self) -> usize {
        self.objects.iter().map(|o| o.vertex_indices.len()).sum()
    }

    /// Encode into a byte buffer.
    ///
    /// Everything is validated before the first byte is produced.
    pub fn to_bytes(&self) -> Result<Vec<u8>, A2mFormatError> {
        let mut out = Vec::with_capacity(self.encoded_len());
        write_a2m(&mut out, self)?;
        Ok(out)
    }

    fn encoded_len(&self) -> usize {
        let mut len = A2mHeader::SIZE + self.positions.len() * 12 + self.tex_coords.len() * 8 + 4;
        for object in &self.objects {
            len += object.name.len() + 1 + 4 + object.vertex_indices.len() * 24;
        }
        if let Some(collision) = &self.collision {
            len += 8 + collision.vertices.len() * 12 + collision.indices.len() * 12;
        }
        len
    }

    fn validate(&self) -> Result<(), A2mFormatError> {
        self.header()?;
        count_u32("sub-object", self.objects.len())?;
        for object in &self.objects {
            if object.vertex_indices.len() != object.tex_indices.len() {
                return Err(A2mFormatError::MismatchedFaceStreams {
                    name: object.name.clone(),
                    vertex: object.vertex_indices.len(),
                    tex: object.tex_indices.len(),
                });
            }
            count_u32("face", object.vertex_indices.len())?;
        }
        if let Some(collision) = &self.collision {
            count_u32("collision vertex", collision.vertices.len())?;
            count_u32("collision triangle", collision.indices.len())?;
        }
        Ok(())
    }

    /// Decode a complete `.a2m` file
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, A2mFormatError> {
        let header = A2mHeader::parse(bytes)?;
        let mut r = Reader::new(bytes, A2mHeader::SIZE);

        let positions = r.read_vec3s(header.vertex_count)?;
        let tex_coords = r.read_vec2s(header.tex_coord_count)?;

        let object_count = r.read_u32()?;
        let mut names = Vec::new();
        for index in 0..object_count as usize {
            let raw = r.read_terminated(NAME_TERMINATOR)?;
            let name = std::str::from_utf8(raw)
                .map_err(|_| A2mFormatError::InvalidName { index })?;
            names.push(name.to_string());
        }

        let mut objects = Vec::with_capacity(names.len());
        for name in names {
            let face_count = r.read_u32()?;
            let vertex_indices = r.read_triples(face_count)?;
            let tex_indices = r.read_triples(face_count)?;
            objects.push(A2mObject {
                name,
                vertex_indices,
                tex_indices,
            });
        }

        let collision = if header.has_collision() {
            let vertex_count = r.read_u32()?;
            let vertices = r.read_vec3s(vertex_count)?;
            let triangle_count = r.read_u32()?;
            let indices = r.read_triples(triangle_count)?;
            Some(A2mCollision { vertices, indices })
        } else {
            None
        };

        if r.remaining() > 0 {
            return Err(A2mFormatError::TrailingBytes(r.remaining()));
        }

        Ok(Self {
            positions,
            tex_coords,
            objects,
            collision,
        })
    }
}

/// Write a complete `.a2m` model
pub fn write_a2m<W: Write>(w: &mut W, model: &A2mModel) -> Result<(), A2mFormatError> {
    model.validate()?;

    w.write_all(&model.header()?.to_bytes())?;

    for p in &model.positions {
        write_f32s(w, p)?;
    }
    for uv in &model.tex_coords {
        write_f32s(w, uv)?;
    }

    w.write_all(&(model.objects.len() as u32).to_le_bytes())?;
    // Names are UTF-8, which never contains the 0xFF terminator.
    for object in &model.objects {
        w.write_all(object.name.as_bytes())?;
        w.write_all(&[NAME_TERMINATOR])?;
    }

    for object in &model.objects {
        w.write_all(&(object.vertex_indices.len() as u32).to_le_bytes())?;
        for triple in &object.vertex_indices {
            write_u32s(w, triple)?;
        }
        for triple in &object.tex_indices {
            write_u32s(w, triple)?;
        }
    }

    if let Some(collision) = &model.collision {
        w.write_all(&(collision.vertices.len() as u32).to_le_bytes())?;
        for p in &collision.vertices {
            write_f32s(w, p)?;
        }
        w.write_all(&(collision.indices.len() as u32).to_le_bytes())?;
        for triple in &collision.indices {
            write_u32s(w, triple)?;
        }
    }

    Ok(())
}

fn write_f32s<W: Write>(w: &mut W, values: &[f32]) -> std::io::Result<()> {
    for v in values {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

fn write_u32s<W: Write>(w: &mut W, values: &[u32]) -> std::io::Result<()> {
    for v in values {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Bounds-checked little-endian cursor
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], A2mFormatError> {
        if len > self.remaining() {
            return Err(A2mFormatError::UnexpectedEof {
                offset: self.pos,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Take `count` records of `stride` bytes, checking length before allocating
    fn take_records(&mut self, count: u32, stride: usize) -> Result<&'a [u8], A2mFormatError> {
        let len = (count as usize)
            .checked_mul(stride)
            .ok_or(A2mFormatError::UnexpectedEof {
                offset: self.pos,
                needed: usize::MAX,
            })?;
        self.take(len)
    }

    fn read_u32(&mut self) -> Result<u32, A2mFormatError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_terminated(&mut self, terminator: u8) -> Result<&'a [u8], A2mFormatError> {
        let rest = &self.bytes[self.pos.min(self.bytes.len())..];
        let end = rest
            .iter()
            .position(|&b| b == terminator)
            .ok_or(A2mFormatError::UnexpectedEof {
                offset: self.bytes.len(),
                needed: 1,
            })?;
        let slice = &rest[..end];
        self.pos += end + 1;
        Ok(slice)
    }

    fn read_vec3s(&mut self, count: u32) -> Result<Vec<[f32; 3]>, A2mFormatError> {
        let data = self.take_records(count, 12)?;
        Ok(data
            .chunks_exact(12)
            .map(|c| [le_f32(&c[0..4]), le_f32(&c[4..8]), le_f32(&c[8..12])])
            .collect())
    }

    fn read_vec2s(&mut self, count: u32) -> Result<Vec<[f32; 2]>, A2mFormatError> {
        let data = self.take_records(count, 8)?;
        Ok(data
            .chunks_exact(8)
            .map(|c| [le_f32(&c[0..4]), le_f32(&c[4..8])])
            .collect())
    }

    fn read_triples(&mut self, count: u32) -> Result<Vec<[u32; 3]>, A2mFormatError> {
        let data = self.take_records(count, 12)?;
        Ok(data
            .chunks_exact(12)
            .map(|c| [le_u32(&c[0..4]), le_u32(&c[4..8]), le_u32(&c[8..12])])
            .collect())
    }
}

fn le_f32(b: &[u8]) -> f32 {
    f32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_model() -> A2mModel {
        A2mModel {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            tex_coords: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            objects: vec![A2mObject {
                name: "tri".to_string(),
                vertex_indices: vec![[0, 1, 2]],
                tex_indices: vec![[0, 1, 2]],
            }],
            collision: None,
        }
    }

    #[test]
    fn test_encoded_layout() {
        let bytes = triangle_model().to_bytes().unwrap();

        // header + 3 positions + 3 coords + count + "tri\xFF" + F + 2 triples
        assert_eq!(bytes.len(), 21 + 36 + 24 + 4 + 4 + 4 + 24);
        assert_eq!(&bytes[0..8], b"A2EMODEL");
        assert_eq!(bytes[12], 0x00);

        // Second position x = 1.0
        assert_eq!(&bytes[33..37], &1.0f32.to_le_bytes());

        // Sub-object count and terminated name
        let names_at = 21 + 36 + 24;
        assert_eq!(&bytes[names_at..names_at + 4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[names_at + 4..names_at + 8], b"tri\xFF");

        // Face count followed by vertex then texcoord triples
        let faces_at = names_at + 8;
        assert_eq!(&bytes[faces_at..faces_at + 4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[faces_at + 8..faces_at + 12], &[1, 0, 0, 0]);
    }

    #[test]
    fn test_encoded_len_matches_output() {
        let mut model = triangle_model();
        model.collision = Some(A2mCollision {
            vertices: vec![[0.0; 3]; 4],
            indices: vec![[0, 1, 2], [0, 2, 3]],
        });
        assert_eq!(model.to_bytes().unwrap().len(), model.encoded_len());
    }

    #[test]
    fn test_decode_reencode_identical() {
        let mut model = triangle_model();
        model.objects.push(A2mObject {
            name: String::new(),
            vertex_indices: vec![],
            tex_indices: vec![],
        });
        model.collision = Some(A2mCollision {
            vertices: vec![[0.5, -1.0, 2.0], [1.0, 1.0, 1.0], [-0.0, 0.0, 3.0]],
            indices: vec![[0, 1, 2]],
        });

        let bytes = model.to_bytes().unwrap();
        let decoded = A2mModel::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, model);
        assert_eq!(decoded.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_collision_sets_model_type() {
        let mut model = triangle_model();
        model.collision = Some(A2mCollision::default());
        let bytes = model.to_bytes().unwrap();
        assert_eq!(bytes[12], 0x02);
        // Empty collision mesh still writes both counts
        assert_eq!(&bytes[bytes.len() - 8..], &[0; 8]);
    }

    #[test]
    fn test_mismatched_face_streams_rejected() {
        let mut model = triangle_model();
        model.objects[0].tex_indices.clear();
        let mut out = Vec::new();
        assert!(matches!(
            write_a2m(&mut out, &model),
            Err(A2mFormatError::MismatchedFaceStreams { vertex: 1, tex: 0, .. })
        ));
        assert!(out.is_empty(), "nothing is written for an invalid model");
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = triangle_model().to_bytes().unwrap();
        for cut in [10, 30, bytes.len() - 1] {
            assert!(matches!(
                A2mModel::from_bytes(&bytes[..cut]),
                Err(A2mFormatError::UnexpectedEof { .. })
            ));
        }
    }

    #[test]
    fn test_decode_huge_count_does_not_allocate() {
        let mut bytes = A2mHeader::new(ModelType::Static, u32::MAX, 0).to_bytes().to_vec();
        bytes.extend_from_slice(&[0; 16]);
        assert!(matches!(
            A2mModel::from_bytes(&bytes),
            Err(A2mFormatError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut bytes = triangle_model().to_bytes().unwrap();
        bytes.push(0);
        assert!(matches!(
            A2mModel::from_bytes(&bytes),
            Err(A2mFormatError::TrailingBytes(1))
        ));
    }

    #[test]
    fn test_decode_invalid_name() {
        let mut bytes = triangle_model().to_bytes().unwrap();
        let name_at = 21 + 36 + 24 + 4;
        bytes[name_at] = 0xC3; // lone UTF-8 lead byte
        assert!(matches!(
            A2mModel::from_bytes(&bytes),
            Err(A2mFormatError::InvalidName { index: 0 })
        ));
    }
}
