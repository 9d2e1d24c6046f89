//! Binary encoding of reduced models
//!
//! Re-exports the on-disk format from a2m-common and adds the glue from an
//! [`IndexedModel`] to an [`A2mModel`].

pub use a2m_common::formats::*;

use std::io::Write;
use std::path::Path;

use a2m_common::AxisRemap;

use crate::collision::CollisionMesh;
use crate::error::{ConvertError, Result};
use crate::mesh::IndexedModel;

/// Axis remaps applied while flattening; mesh and collision are independent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub model_remap: AxisRemap,
    pub collision_remap: AxisRemap,
}

/// Flatten an indexed model (and optional collision mesh) into the file layout
pub fn build_a2m(
    mesh: &IndexedModel,
    collision: Option<&CollisionMesh>,
    options: &EncodeOptions,
) -> Result<A2mModel> {
    if let Some(collision) = collision {
        collision.ensure_single_group()?;
    }

    let sub_objects = mesh.sub_objects();
    let positions = sub_objects
        .iter()
        .flat_map(|s| &s.vertices)
        .map(|v| options.model_remap.apply(v.to_array()))
        .collect();
    let tex_coords = sub_objects
        .iter()
        .flat_map(|s| &s.coords)
        .map(|c| c.to_array())
        .collect();
    let objects = sub_objects
        .iter()
        .map(|s| A2mObject {
            name: s.name.clone(),
            vertex_indices: s.faces.iter().map(|f| f.vertex_indices).collect(),
            tex_indices: s.faces.iter().map(|f| f.tex_indices).collect(),
        })
        .collect();
    let collision = collision.map(|c| A2mCollision {
        vertices: c
            .vertices
            .iter()
            .map(|v| options.collision_remap.apply(v.to_array()))
            .collect(),
        indices: c.triangles.clone(),
    });

    Ok(A2mModel {
        positions,
        tex_coords,
        objects,
        collision,
    })
}

/// Encode to `.a2m` bytes
pub fn encode(
    mesh: &IndexedModel,
    collision: Option<&CollisionMesh>,
    options: &EncodeOptions,
) -> Result<Vec<u8>> {
    Ok(build_a2m(mesh, collision, options)?.to_bytes()?)
}

/// Encode and write an `.a2m` file.
///
/// The whole artifact is encoded before the destination is touched, and the
/// file only appears once it has been written completely.
pub fn write_a2m_file(
    output: &Path,
    mesh: &IndexedModel,
    collision: Option<&CollisionMesh>,
    options: &EncodeOptions,
) -> Result<()> {
    let bytes = encode(mesh, collision, options)?;
    write_atomic(output, &bytes)
}

/// Write `bytes` to a temporary sibling of `path`, then rename it into place.
/// The temporary file is removed on every error path.
///
/// A replaced file keeps its permissions; a new file gets the same mode
/// `fs::write` would give it (0o666 under the umask on unix).
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let io_error = |source: std::io::Error| ConvertError::io(path, source);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut file = builder.tempfile_in(dir).map_err(io_error)?;

    if let Ok(existing) = std::fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(io_error)?;
    }
    file.write_all(bytes).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}
