//! A2E static model binary format (.a2m)
//!
//! The header is a fixed 21-byte block ([`A2mHeader`]); the body is described
//! on [`A2mModel`]. All integers and floats are little-endian.

mod error;
mod header;
mod model;

pub use error::A2mFormatError;
pub use header::*;
pub use model::*;
