//! Manifest parsing and build orchestration
//!
//! Parses a2m.toml and converts every listed model. Source paths are
//! relative to the manifest's directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use a2m_common::A2M_EXT;

use crate::export::{ExportOptions, ExportSummary, convert_obj};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    /// Sorted by name, so builds run in a stable order
    #[serde(default)]
    pub models: BTreeMap<String, ModelEntry>,
    /// Directory the manifest was loaded from
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ModelEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        collision: Option<PathBuf>,
        /// Shorthand for both rotate flags
        #[serde(default)]
        rotate: bool,
        #[serde(default)]
        rotate_model: bool,
        #[serde(default)]
        rotate_collision: bool,
        #[serde(default)]
        join_mat_objects: bool,
        #[serde(default)]
        mat_mapping: bool,
    },
}

impl ModelEntry {
    pub fn path(&self) -> &Path {
        match self {
            ModelEntry::Simple(p) => p,
            ModelEntry::Detailed { path, .. } => path,
        }
    }

    pub fn collision(&self) -> Option<&Path> {
        match self {
            ModelEntry::Simple(_) => None,
            ModelEntry::Detailed { collision, .. } => collision.as_deref(),
        }
    }

    /// Conversion options, with paths resolved against `base_dir`
    pub fn export_options(&self, base_dir: &Path) -> ExportOptions {
        match self {
            ModelEntry::Simple(_) => ExportOptions::default(),
            ModelEntry::Detailed {
                collision,
                rotate,
                rotate_model,
                rotate_collision,
                join_mat_objects,
                mat_mapping,
                ..
            } => ExportOptions {
                collision: collision.as_ref().map(|p| base_dir.join(p)),
                rotate_model: *rotate || *rotate_model,
                rotate_collision: *rotate || *rotate_collision,
                join_mat_objects: *join_mat_objects,
                to_obj: false,
                mat_mapping: *mat_mapping,
            },
        }
    }
}

impl Manifest {
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(manifest)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.models.is_empty() {
        tracing::warn!("Manifest lists no models");
    }
    // Check that all source files exist
    for (name, entry) in &manifest.models {
        let source = manifest.resolve(entry.path());
        if !source.exists() {
            anyhow::bail!("Model '{}' source not found: {:?}", name, source);
        }
        if let Some(collision) = entry.collision() {
            let collision = manifest.resolve(collision);
            if !collision.exists() {
                anyhow::bail!("Model '{}' collision mesh not found: {:?}", name, collision);
            }
        }
    }
    Ok(())
}

/// Build all models from a manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<Vec<ExportSummary>> {
    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => manifest.resolve(&manifest.output.dir),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut summaries = Vec::with_capacity(manifest.models.len());
    for (name, entry) in &manifest.models {
        let input = manifest.resolve(entry.path());
        let output = output_dir.join(format!("{}.{}", name, A2M_EXT));
        tracing::info!("Converting model: {} -> {:?}", name, output);

        let options = entry.export_options(&manifest.base_dir);
        let summary = convert_obj(&input, &output, &options)
            .with_context(|| format!("Failed to convert model '{}'", name))?;
        summaries.push(summary);
    }
    Ok(summaries)
}
