//! Types and constants for mesh reduction

use std::cmp::Ordering;

use glam::{Vec2, Vec3};

/// Per-axis position tolerance used when collapsing duplicate vertices
pub const VERTEX_EPSILON: f32 = 0.001;

/// Per-axis texture coordinate tolerance used when pooling coordinates.
/// Tighter than [`VERTEX_EPSILON`]: UV seams must survive.
pub const COORD_EPSILON: f32 = 0.000_001;

pub type Vertex = Vec3;
pub type TexCoord = Vec2;

/// Index into a sub-object's vertex pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexHandle(pub u32);

/// Index into a sub-object's coordinate pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordHandle(pub u32);

impl VertexHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl CoordHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One triangle as read from the source: 0-based indices into the flat
/// position and coordinate arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceIndexPair {
    pub vertices: [u32; 3],
    pub coords: [u32; 3],
}

/// One triangle after pooling.
///
/// `vertex_indices` and `tex_indices` stay zero until the global indexer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertices: [VertexHandle; 3],
    pub coords: [CoordHandle; 3],
    pub vertex_indices: [u32; 3],
    pub tex_indices: [u32; 3],
}

impl Face {
    pub fn new(vertices: [VertexHandle; 3], coords: [CoordHandle; 3]) -> Self {
        Self {
            vertices,
            coords,
            vertex_indices: [0; 3],
            tex_indices: [0; 3],
        }
    }
}

/// A named partition of the mesh and the unit of deduplication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubObject {
    pub name: String,
    pub material: String,
    pub vertices: Vec<Vertex>,
    pub coords: Vec<TexCoord>,
    pub faces: Vec<Face>,
}

impl SubObject {
    pub fn new(name: impl Into<String>, material: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: material.into(),
            ..Default::default()
        }
    }

    pub(crate) fn push_vertex(&mut self, vertex: Vertex) -> VertexHandle {
        self.vertices.push(vertex);
        VertexHandle((self.vertices.len() - 1) as u32)
    }

    pub(crate) fn push_coord(&mut self, coord: TexCoord) -> CoordHandle {
        self.coords.push(coord);
        CoordHandle((self.coords.len() - 1) as u32)
    }
}

/// Component-wise box test against [`VERTEX_EPSILON`]
#[inline]
pub fn equal_vertex(a: Vertex, b: Vertex) -> bool {
    within(a.x, b.x, VERTEX_EPSILON)
        && within(a.y, b.y, VERTEX_EPSILON)
        && within(a.z, b.z, VERTEX_EPSILON)
}

/// Component-wise box test against [`COORD_EPSILON`]
#[inline]
pub fn equal_coord(a: TexCoord, b: TexCoord) -> bool {
    within(a.x, b.x, COORD_EPSILON) && within(a.y, b.y, COORD_EPSILON)
}

#[inline]
pub(crate) fn within(a: f32, b: f32, epsilon: f32) -> bool {
    (a - epsilon) < b && b < (a + epsilon)
}

/// Lexicographic (x, y, z) ordering
pub fn cmp_vertex(a: &Vertex, b: &Vertex) -> Ordering {
    a.x.total_cmp(&b.x)
        .then_with(|| a.y.total_cmp(&b.y))
        .then_with(|| a.z.total_cmp(&b.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_vertex_box_tolerance() {
        let origin = Vec3::ZERO;
        assert!(equal_vertex(origin, Vec3::new(0.0005, 0.0, 0.0)));
        assert!(equal_vertex(origin, Vec3::new(0.0009, -0.0009, 0.0009)));
        assert!(!equal_vertex(origin, Vec3::new(0.0, 0.002, 0.0)));
        // Box, not Euclidean: corner of the box still matches
        assert!(equal_vertex(origin, Vec3::splat(0.00099)));
    }

    #[test]
    fn test_equal_coord_is_tighter() {
        let a = Vec2::new(0.5, 0.5);
        assert!(equal_coord(a, Vec2::new(0.5, 0.5)));
        assert!(!equal_coord(a, Vec2::new(0.5005, 0.5)));
        assert!(!equal_coord(a, Vec2::new(0.5, 0.50001)));
    }

    #[test]
    fn test_nan_never_equal() {
        let nan = Vec3::new(f32::NAN, 0.0, 0.0);
        assert!(!equal_vertex(nan, nan));
    }

    #[test]
    fn test_cmp_vertex_lexicographic() {
        let a = Vec3::new(0.0, 5.0, 0.0);
        let b = Vec3::new(0.0, 5.0, 1.0);
        let c = Vec3::new(1.0, -5.0, 0.0);
        assert_eq!(cmp_vertex(&a, &b), Ordering::Less);
        assert_eq!(cmp_vertex(&b, &c), Ordering::Less);
        assert_eq!(cmp_vertex(&a, &a), Ordering::Equal);
    }
}
