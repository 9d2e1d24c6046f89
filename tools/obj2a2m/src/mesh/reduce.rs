//! Per-sub-object reducer
//!
//! Builds each sub-object's local vertex/coordinate pool from its faces.
//! Vertices are keyed on the exact source position index; each pooled vertex
//! keeps a list of coordinate variants (UV seams) matched under
//! [`COORD_EPSILON`](super::types::COORD_EPSILON).

use hashbrown::HashMap;
use rayon::prelude::*;

use super::intake::{RawGeometry, RawGroup};
use super::types::{CoordHandle, Face, SubObject, TexCoord, VertexHandle, equal_coord};
use crate::error::{ConvertError, Result};

/// Reduce every group of `raw` into a pooled sub-object, in group order
pub fn reduce(raw: &RawGeometry) -> Result<Vec<SubObject>> {
    raw.groups
        .par_iter()
        .map(|group| reduce_group(raw, group))
        .collect()
}

/// Reduce a single group
pub fn reduce_group(raw: &RawGeometry, group: &RawGroup) -> Result<SubObject> {
    let mut sub = SubObject::new(group.name.as_str(), group.material.as_str());
    let mut pooled: HashMap<u32, VertexHandle> = HashMap::new();
    let mut variants: HashMap<VertexHandle, Vec<(TexCoord, CoordHandle)>> = HashMap::new();

    sub.faces.reserve(group.faces.len());
    for pair in &group.faces {
        let mut vertices = [VertexHandle(0); 3];
        let mut coords = [CoordHandle(0); 3];

        for k in 0..3 {
            let source_index = pair.vertices[k];
            let coord = lookup(&raw.tex_coords, pair.coords[k], &group.name, "texture coordinate")?;

            match pooled.get(&source_index) {
                None => {
                    let position = lookup(&raw.positions, source_index, &group.name, "vertex")?;
                    let vertex = sub.push_vertex(position);
                    let handle = sub.push_coord(coord);
                    pooled.insert(source_index, vertex);
                    variants.entry(vertex).or_default().push((coord, handle));
                    vertices[k] = vertex;
                    coords[k] = handle;
                }
                Some(&vertex) => {
                    let known = variants.entry(vertex).or_default();
                    // Latest matching variant wins
                    let handle = match known.iter().rev().find(|(uv, _)| equal_coord(*uv, coord)) {
                        Some(&(_, handle)) => handle,
                        None => {
                            let handle = sub.push_coord(coord);
                            known.push((coord, handle));
                            handle
                        }
                    };
                    vertices[k] = vertex;
                    coords[k] = handle;
                }
            }
        }

        sub.faces.push(Face::new(vertices, coords));
    }

    Ok(sub)
}

fn lookup<T: Copy>(values: &[T], index: u32, group: &str, what: &str) -> Result<T> {
    values.get(index as usize).copied().ok_or_else(|| {
        ConvertError::malformed(format!(
            "sub-object '{group}' references {what} {} but only {} are defined",
            index + 1,
            values.len()
        ))
    })
}
