//! Global indexer
//!
//! Assigns one flat, zero-based index space to all surviving vertices and
//! (independently) all coordinates, in sub-object order. Pools iterate in
//! handle order, so a face's global index is `base + handle`.

use super::types::SubObject;
use crate::error::{ConvertError, Result};

/// Reduced model with final flat indices. Immutable from here on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedModel {
    sub_objects: Vec<SubObject>,
    vertex_count: u32,
    tex_coord_count: u32,
}

impl IndexedModel {
    pub fn sub_objects(&self) -> &[SubObject] {
        &self.sub_objects
    }

    /// Sum of pooled vertex counts
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Sum of pooled coordinate counts
    pub fn tex_coord_count(&self) -> u32 {
        self.tex_coord_count
    }

    pub fn face_count(&self) -> usize {
        self.sub_objects.iter().map(|s| s.faces.len()).sum()
    }
}

/// Renumber every face of every sub-object into the global index space
pub fn assign_global_indices(mut sub_objects: Vec<SubObject>) -> Result<IndexedModel> {
    let vertex_total: usize = sub_objects.iter().map(|s| s.vertices.len()).sum();
    let coord_total: usize = sub_objects.iter().map(|s| s.coords.len()).sum();
    let vertex_count =
        u32::try_from(vertex_total).map_err(|_| ConvertError::IndexOverflow { what: "vertex" })?;
    let tex_coord_count = u32::try_from(coord_total).map_err(|_| ConvertError::IndexOverflow {
        what: "texture coordinate",
    })?;

    let mut vertex_base = 0u32;
    let mut coord_base = 0u32;
    for sub in &mut sub_objects {
        for face in &mut sub.faces {
            face.vertex_indices = face.vertices.map(|v| vertex_base + v.0);
            face.tex_indices = face.coords.map(|c| coord_base + c.0);
        }
        vertex_base += sub.vertices.len() as u32;
        coord_base += sub.coords.len() as u32;
    }

    Ok(IndexedModel {
        sub_objects,
        vertex_count,
        tex_coord_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::types::{CoordHandle, Face, VertexHandle};
    use glam::{Vec2, Vec3};

    fn sub_object(vertices: usize, coords: usize, faces: &[([u32; 3], [u32; 3])]) -> SubObject {
        SubObject {
            name: String::new(),
            material: String::new(),
            vertices: vec![Vec3::ZERO; vertices],
            coords: vec![Vec2::ZERO; coords],
            faces: faces
                .iter()
                .map(|(v, c)| Face::new(v.map(VertexHandle), c.map(CoordHandle)))
                .collect(),
        }
    }

    #[test]
    fn test_bases_accumulate_in_sub_object_order() {
        let model = assign_global_indices(vec![
            sub_object(3, 4, &[([0, 1, 2], [0, 1, 3])]),
            sub_object(2, 1, &[([1, 0, 1], [0, 0, 0])]),
        ])
        .unwrap();

        assert_eq!(model.vertex_count(), 5);
        assert_eq!(model.tex_coord_count(), 5);
        let second = &model.sub_objects()[1].faces[0];
        assert_eq!(second.vertex_indices, [4, 3, 4]);
        assert_eq!(second.tex_indices, [4, 4, 4]);
    }

    #[test]
    fn test_first_sub_object_starts_at_zero() {
        let model = assign_global_indices(vec![sub_object(3, 3, &[([0, 1, 2], [0, 1, 2])])]).unwrap();
        let face = &model.sub_objects()[0].faces[0];
        assert_eq!(face.vertex_indices, [0, 1, 2]);
        assert_eq!(face.tex_indices, [0, 1, 2]);
    }

    #[test]
    fn test_empty_sub_object_takes_no_indices() {
        let model = assign_global_indices(vec![
            sub_object(0, 0, &[]),
            sub_object(1, 1, &[([0, 0, 0], [0, 0, 0])]),
        ])
        .unwrap();
        assert_eq!(model.sub_objects()[1].faces[0].vertex_indices, [0, 0, 0]);
        assert_eq!(model.face_count(), 1);
    }
}
