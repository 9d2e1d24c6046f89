//! obj2a2m library
//!
//! Converts Wavefront OBJ meshes into A2E static models (.a2m): groups
//! become sub-objects, vertices are pooled and near-duplicates collapsed,
//! then everything is renumbered into one flat index space and encoded.

pub mod collision;
pub mod debug_obj;
pub mod error;
pub mod export;
pub mod formats;
pub mod manifest;
pub mod material_mapping;
pub mod mesh;

// Re-export the format crate's types
pub use a2m_common::{A2mModel, AxisRemap};

pub use collision::{CollisionMesh, load_collision};
pub use error::{ConvertError, Result, Warning};
pub use export::{ExportOptions, ExportSummary, LoadedModel, convert_obj, convert_obj_to_memory, load_model};
pub use formats::{EncodeOptions, build_a2m, encode, write_a2m_file};
pub use mesh::{IndexedModel, RawGeometry, process};
