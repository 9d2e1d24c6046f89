//! Material mapping side file (`--mat-mapping`)
//!
//! Maps every sub-object to the id of its material in the OBJ's material
//! library. Ids follow `newmtl` declaration order. Every failure here is
//! logged and skipped; the model itself is already written.

use std::path::{Path, PathBuf};

use hashbrown::HashMap;

use crate::formats::write_atomic;
use crate::mesh::SubObject;

/// Material name -> id, in `newmtl` declaration order
pub fn parse_mtl_names(text: &str) -> HashMap<String, u32> {
    let mut ids = HashMap::new();
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("newmtl") {
            continue;
        }
        if let Some(name) = tokens.next() {
            let next = ids.len() as u32;
            ids.entry(name.to_string()).or_insert(next);
        }
    }
    ids
}

/// Render the mapping; unknown materials map to id 0 with a warning
pub fn render_mapping(sub_objects: &[SubObject], ids: &HashMap<String, u32>) -> String {
    let mut out = String::from("\t<material_mapping>\n");
    for sub in sub_objects {
        let id = match ids.get(&sub.material) {
            Some(&id) => id,
            None => {
                tracing::warn!("material '{}' doesn't exist in the mtl file", sub.material);
                0
            }
        };
        out.push_str(&format!("\t\t<object material_id=\"{id}\" />\n"));
    }
    out.push_str("\t</material_mapping>\n");
    out
}

/// Path of the mapping file for a given `.a2m` output path
pub fn mapping_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".mapping.txt");
    PathBuf::from(name)
}

/// Resolve `mtllib`, read it and write `<output>.mapping.txt`.
///
/// Returns the written path, or `None` when the mapping was skipped.
pub fn write_material_mapping(
    source: &Path,
    mtllib: Option<&str>,
    output: &Path,
    sub_objects: &[SubObject],
) -> Option<PathBuf> {
    let Some(mtllib) = mtllib else {
        tracing::warn!("--mat-mapping specified, but {:?} names no mtllib", source);
        return None;
    };

    let mtl_path = source
        .parent()
        .map(|dir| dir.join(mtllib))
        .unwrap_or_else(|| PathBuf::from(mtllib));
    let text = match std::fs::read_to_string(&mtl_path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("--mat-mapping specified, but couldn't read {:?}: {}", mtl_path, e);
            return None;
        }
    };

    let ids = parse_mtl_names(&text);
    let path = mapping_path(output);
    match write_atomic(&path, render_mapping(sub_objects, &ids).as_bytes()) {
        Ok(()) => Some(path),
        Err(e) => {
            tracing::warn!("couldn't write material mapping: {}", e);
            None
        }
    }
}
