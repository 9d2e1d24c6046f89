//! Debug OBJ output (`--to-obj`)
//!
//! Writes the reduced model back out as Wavefront text so the result of
//! pooling and collapsing can be inspected in any viewer.

use std::path::{Path, PathBuf};

use a2m_common::AxisRemap;

use crate::error::{ConvertError, Result};
use crate::formats::write_atomic;
use crate::mesh::IndexedModel;

/// Path of the debug OBJ for a given `.a2m` output path
pub fn debug_obj_path(output: &Path) -> PathBuf {
    output.with_extension("obj")
}

/// Render the reduced model as OBJ text
pub fn render_debug_obj(mesh: &IndexedModel, remap: AxisRemap) -> String {
    let mut out = String::new();
    let subs = mesh.sub_objects();

    for (i, sub) in subs.iter().enumerate() {
        out.push_str(&format!("# vc {i}: {}\n", sub.vertices.len()));
        out.push_str(&format!("# tc {i}: {}\n", sub.coords.len()));
        out.push_str(&format!("# fc {i}: {}\n", sub.faces.len()));
    }

    for v in subs.iter().flat_map(|s| &s.vertices) {
        let [x, y, z] = remap.apply(v.to_array());
        out.push_str(&format!("v {x} {y} {z}\n"));
    }
    for c in subs.iter().flat_map(|s| &s.coords) {
        out.push_str(&format!("vt {} {}\n", c.x, c.y));
    }

    for sub in subs {
        out.push_str(&format!("g {}\nusemtl {}\n", sub.name, sub.material));
        for face in &sub.faces {
            let v = face.vertex_indices;
            let t = face.tex_indices;
            out.push_str(&format!(
                "f {}/{} {}/{} {}/{}\n",
                v[0] + 1,
                t[0] + 1,
                v[1] + 1,
                t[1] + 1,
                v[2] + 1,
                t[2] + 1
            ));
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Write the debug OBJ next to `output`, refusing to overwrite `source`
pub fn write_debug_obj(
    source: &Path,
    output: &Path,
    mesh: &IndexedModel,
    remap: AxisRemap,
) -> Result<PathBuf> {
    let path = debug_obj_path(output);
    if path == source {
        return Err(ConvertError::io(
            &path,
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "debug output would overwrite the source obj",
            ),
        ));
    }

    tracing::debug!("saving to {:?} ...", path);
    write_atomic(&path, render_debug_obj(mesh, remap).as_bytes())?;
    Ok(path)
}
