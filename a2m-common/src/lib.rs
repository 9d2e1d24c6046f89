//! Shared types for the A2E static model format
//!
//! This crate holds everything that describes an `.a2m` file on disk, with no
//! knowledge of where the geometry came from:
//!
//! - [`formats`] - header, model layout, encoder and decoder
//! - [`axis`] - coordinate-axis remap applied to emitted positions

pub mod axis;
pub mod formats;

pub use axis::AxisRemap;

pub use formats::{
    A2M_EXT, A2M_MAGIC, A2M_VERSION, A2mCollision, A2mFormatError, A2mHeader, A2mModel,
    A2mObject, ModelType, NAME_TERMINATOR, write_a2m,
};
