//! obj2a2m - A2E static model converter
//!
//! Converts Wavefront .obj meshes (plus an optional collision mesh) to the
//! .a2m binary format.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use obj2a2m::{A2mModel, ExportOptions, manifest};

#[derive(Parser)]
#[command(name = "obj2a2m")]
#[command(about = "Wavefront .obj to A2E static model converter")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single .obj file
    Convert {
        /// Input .obj file
        input: PathBuf,

        /// Output .a2m file
        output: PathBuf,

        /// Separate .obj holding the collision mesh
        #[arg(short, long)]
        collision: Option<PathBuf>,

        /// Convert Z-up to Y-up for both model and collision mesh
        #[arg(long)]
        rotate: bool,

        /// Convert Z-up to Y-up for the model only
        #[arg(long)]
        rotate_model: bool,

        /// Convert Z-up to Y-up for the collision mesh only
        #[arg(long)]
        rotate_collision: bool,

        /// Write a debug .obj of the reduced model instead of the .a2m
        #[arg(long)]
        to_obj: bool,

        /// Create sub-objects per material instead of per group
        #[arg(long)]
        join_mat_objects: bool,

        /// Also write <output>.mapping.txt from the obj's mtllib
        #[arg(long)]
        mat_mapping: bool,
    },

    /// Build models from a manifest file
    Build {
        /// Path to a2m.toml manifest
        #[arg(default_value = "a2m.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to a2m.toml manifest
        #[arg(default_value = "a2m.toml")]
        manifest: PathBuf,
    },

    /// Decode an .a2m file and print a summary
    Inspect {
        /// Input .a2m file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            collision,
            rotate,
            rotate_model,
            rotate_collision,
            to_obj,
            join_mat_objects,
            mat_mapping,
        } => {
            let options = ExportOptions {
                collision,
                rotate_model: rotate || rotate_model,
                rotate_collision: rotate || rotate_collision,
                join_mat_objects,
                to_obj,
                mat_mapping,
            };
            tracing::info!("Converting {:?} -> {:?}", input, output);
            obj2a2m::convert_obj(&input, &output, &options)
                .with_context(|| format!("Failed to convert {:?}", input))?;
            tracing::info!("Done!");
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building models from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let summaries = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! ({} models)", summaries.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Inspect { input } => {
            let bytes =
                std::fs::read(&input).with_context(|| format!("Failed to read {:?}", input))?;
            let model = A2mModel::from_bytes(&bytes)
                .with_context(|| format!("Failed to decode {:?}", input))?;

            let header = model.header()?;
            tracing::info!(
                "{:?}: version {}, type {:?}, {} vertices, {} texture coordinates",
                input,
                header.version,
                header.model_type,
                header.vertex_count,
                header.tex_coord_count
            );
            for object in &model.objects {
                tracing::info!("  sub-object '{}': {} faces", object.name, object.vertex_indices.len());
            }
            if let Some(collision) = &model.collision {
                tracing::info!(
                    "  collision: {} vertices, {} triangles",
                    collision.vertices.len(),
                    collision.indices.len()
                );
            }
        }
    }

    Ok(())
}
