//! OBJ -> .a2m conversion entry points

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use a2m_common::{A2mModel, AxisRemap};

use crate::collision::{CollisionMesh, load_collision};
use crate::debug_obj::write_debug_obj;
use crate::error::Result;
use crate::formats::{EncodeOptions, build_a2m, write_a2m_file};
use crate::material_mapping::write_material_mapping;
use crate::mesh::{IndexedModel, IntakeOptions, RawGeometry, load_obj, process};

/// Per-conversion settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Separate OBJ holding the collision mesh
    pub collision: Option<PathBuf>,
    pub rotate_model: bool,
    pub rotate_collision: bool,
    /// Split sub-objects by material instead of by group
    pub join_mat_objects: bool,
    /// Write a debug OBJ instead of the .a2m
    pub to_obj: bool,
    /// Also write `<output>.mapping.txt`
    pub mat_mapping: bool,
}

impl ExportOptions {
    pub fn intake_options(&self) -> IntakeOptions {
        IntakeOptions {
            merge_by_material: self.join_mat_objects,
            collision_source: false,
        }
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            model_remap: AxisRemap::from_flag(self.rotate_model),
            collision_remap: AxisRemap::from_flag(self.rotate_collision),
        }
    }
}

/// Everything read and reduced for one conversion
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub raw: RawGeometry,
    pub mesh: IndexedModel,
    pub collision: Option<CollisionMesh>,
}

/// Result of a finished conversion
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// The .a2m, or the debug OBJ with `to_obj`
    pub output: PathBuf,
    pub mapping: Option<PathBuf>,
    pub source_vertices: usize,
    pub source_tex_coords: usize,
    pub vertex_count: u32,
    pub tex_coord_count: u32,
    pub sub_objects: usize,
    pub faces: usize,
    pub collision_triangles: Option<usize>,
    pub warnings: usize,
    pub elapsed: Duration,
}

impl ExportSummary {
    /// Source positions that no longer appear in the output
    pub fn vertices_removed(&self) -> usize {
        self.source_vertices.saturating_sub(self.vertex_count as usize)
    }

    /// Source coordinates that no longer appear in the output
    pub fn tex_coords_removed(&self) -> usize {
        self.source_tex_coords
            .saturating_sub(self.tex_coord_count as usize)
    }
}

/// Read the model (and collision mesh, if any) and run the reduction
pub fn load_model(input: &Path, options: &ExportOptions) -> Result<LoadedModel> {
    tracing::debug!("loading obj {:?} ...", input);
    let raw = load_obj(input, options.intake_options())?;
    let collision = options
        .collision
        .as_deref()
        .map(load_collision)
        .transpose()?;
    let mesh = process(&raw)?;

    Ok(LoadedModel {
        raw,
        mesh,
        collision,
    })
}

/// Convert an OBJ file to an in-memory model (no files written)
pub fn convert_obj_to_memory(input: &Path, options: &ExportOptions) -> Result<A2mModel> {
    let loaded = load_model(input, options)?;
    build_a2m(
        &loaded.mesh,
        loaded.collision.as_ref(),
        &options.encode_options(),
    )
}

/// Convert an OBJ file to `.a2m` (or a debug OBJ)
pub fn convert_obj(input: &Path, output: &Path, options: &ExportOptions) -> Result<ExportSummary> {
    let start = Instant::now();
    let loaded = load_model(input, options)?;
    let encode = options.encode_options();

    let written = if options.to_obj {
        write_debug_obj(input, output, &loaded.mesh, encode.model_remap)?
    } else {
        tracing::debug!("saving a2m ...");
        write_a2m_file(output, &loaded.mesh, loaded.collision.as_ref(), &encode)?;
        output.to_path_buf()
    };

    let mapping = if options.mat_mapping {
        write_material_mapping(
            input,
            loaded.raw.mtllib.as_deref(),
            output,
            loaded.mesh.sub_objects(),
        )
    } else {
        None
    };

    let summary = ExportSummary {
        output: written,
        mapping,
        source_vertices: loaded.raw.positions.len(),
        source_tex_coords: loaded.raw.tex_coords.len(),
        vertex_count: loaded.mesh.vertex_count(),
        tex_coord_count: loaded.mesh.tex_coord_count(),
        sub_objects: loaded.mesh.sub_objects().len(),
        faces: loaded.mesh.face_count(),
        collision_triangles: loaded.collision.as_ref().map(|c| c.triangles.len()),
        warnings: loaded.raw.warnings.len(),
        elapsed: start.elapsed(),
    };
    log_summary(input, &summary);
    Ok(summary)
}

fn log_summary(input: &Path, summary: &ExportSummary) {
    if summary.vertices_removed() > 0 {
        tracing::info!("reduced model by {} vertices", summary.vertices_removed());
    }
    if summary.tex_coords_removed() > 0 {
        tracing::info!(
            "reduced model by {} texture coordinates",
            summary.tex_coords_removed()
        );
    }
    tracing::info!(
        "Converted {:?} -> {:?}: {} sub-object{}, {} vertices, {} texture coordinates, {} faces",
        input,
        summary.output,
        summary.sub_objects,
        if summary.sub_objects == 1 { "" } else { "s" },
        summary.vertex_count,
        summary.tex_coord_count,
        summary.faces
    );
    if let Some(triangles) = summary.collision_triangles {
        tracing::info!("collision mesh: {} triangles", triangles);
    }
    tracing::info!("time needed: {}ms", summary.elapsed.as_millis());
}
