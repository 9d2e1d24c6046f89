//! Mesh ingestion and deduplication (OBJ -> indexed sub-objects)
//!
//! Stages run strictly in order, each consuming the previous stage's output:
//! intake -> reduce -> collapse -> index.

pub mod collapse;
pub mod index;
pub mod intake;
pub mod obj;
pub mod reduce;
pub mod types;

// Re-export public API
pub use collapse::{AliasMap, collapse, collapse_sub_object};
pub use index::{IndexedModel, assign_global_indices};
pub use intake::{FaceCorner, GeometryBuilder, IntakeOptions, RawGeometry, RawGroup};
pub use obj::{load_obj, parse_obj};
pub use reduce::reduce;
pub use types::{
    COORD_EPSILON, CoordHandle, Face, FaceIndexPair, SubObject, TexCoord, VERTEX_EPSILON, Vertex,
    VertexHandle,
};

use crate::error::Result;

/// Run reduce, collapse and index over validated raw geometry
pub fn process(raw: &RawGeometry) -> Result<IndexedModel> {
    tracing::debug!("reducing data ...");
    let sub_objects = reduce(raw)?;

    tracing::debug!("removing duplicate vertices ...");
    let sub_objects = collapse(sub_objects);

    tracing::debug!("creating new indices ...");
    assign_global_indices(sub_objects)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TRIANGLES: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0.0005 0 0
vt 0 0
vt 1 0
vt 1 1
g first
f 1/1 2/2 3/3
g second
f 5/1 3/3 4/2
";

    #[test]
    fn test_process_end_to_end() {
        let raw = parse_obj(TWO_TRIANGLES, IntakeOptions::default()).unwrap();
        let model = process(&raw).unwrap();

        assert_eq!(model.sub_objects().len(), 2);
        assert_eq!(model.vertex_count(), 6);
        assert_eq!(model.tex_coord_count(), 6);

        for sub in model.sub_objects() {
            for face in &sub.faces {
                assert!(face.vertex_indices.iter().all(|&i| i < model.vertex_count()));
                assert!(face.tex_indices.iter().all(|&i| i < model.tex_coord_count()));
            }
        }
    }

    #[test]
    fn test_duplicate_across_source_indices_collapses() {
        // Vertex 1 (0,0,0) and vertex 5 (0.0005,0,0) in one sub-object
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
v 0.0005 0 0
vt 0 0
g only
f 1/1 2/1 3/1
f 5/1 4/1 2/1
";
        let raw = parse_obj(text, IntakeOptions::default()).unwrap();
        let model = process(&raw).unwrap();
        let sub = &model.sub_objects()[0];

        assert_eq!(sub.vertices.len(), 4);
        assert_eq!(sub.faces[0].vertex_indices[0], sub.faces[1].vertex_indices[0]);
    }

    #[test]
    fn test_process_is_deterministic() {
        let raw = parse_obj(TWO_TRIANGLES, IntakeOptions::default()).unwrap();
        assert_eq!(process(&raw).unwrap(), process(&raw).unwrap());
    }
}
