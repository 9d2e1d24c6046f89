//! Collision mesh: a single-group triangle soup without texture coordinates

use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::mesh::{IntakeOptions, RawGeometry, Vertex, load_obj};

/// Physics geometry appended to the model.
///
/// Vertices are the source positions as-is (no deduplication); triangles
/// are 0-based indices into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionMesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<[u32; 3]>,
    /// Number of groups the source declared; only 1 is encodable
    pub source_groups: usize,
}

impl CollisionMesh {
    /// Build from raw geometry that must contain exactly one group
    pub fn from_geometry(raw: &RawGeometry) -> Result<Self> {
        let mesh = Self {
            vertices: raw.positions.clone(),
            triangles: raw
                .groups
                .first()
                .map(|group| group.faces.iter().map(|f| f.vertices).collect())
                .unwrap_or_default(),
            source_groups: raw.groups.len(),
        };
        mesh.ensure_single_group()?;
        Ok(mesh)
    }

    /// Fails with [`ConvertError::CollisionMeshShape`] unless the source had
    /// exactly one group
    pub fn ensure_single_group(&self) -> Result<()> {
        if self.source_groups == 1 {
            Ok(())
        } else {
            Err(ConvertError::CollisionMeshShape {
                groups: self.source_groups,
            })
        }
    }
}

/// Load a collision mesh from an OBJ file
pub fn load_collision(input: &Path) -> Result<CollisionMesh> {
    tracing::debug!("loading collision obj {:?} ...", input);
    let raw = load_obj(
        input,
        IntakeOptions {
            collision_source: true,
            ..Default::default()
        },
    )?;
    CollisionMesh::from_geometry(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::parse_obj;

    fn collision_options() -> IntakeOptions {
        IntakeOptions {
            collision_source: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_group_collision() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\ng collision\nf 1 2 3 4\n";
        let raw = parse_obj(text, collision_options()).unwrap();
        let mesh = CollisionMesh::from_geometry(&raw).unwrap();

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_two_groups_rejected() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\ng a\nf 1 2 3\ng b\nf 1 2 3\n";
        let raw = parse_obj(text, collision_options()).unwrap();
        assert!(matches!(
            CollisionMesh::from_geometry(&raw),
            Err(ConvertError::CollisionMeshShape { groups: 2 })
        ));
    }

    #[test]
    fn test_no_groups_rejected() {
        let raw = parse_obj("v 0 0 0\n", collision_options()).unwrap();
        assert!(matches!(
            CollisionMesh::from_geometry(&raw),
            Err(ConvertError::CollisionMeshShape { groups: 0 })
        ));
    }
}
