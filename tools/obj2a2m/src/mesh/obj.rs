//! Wavefront OBJ source adapter
//!
//! Tokenizes `.obj` text and feeds [`GeometryBuilder`]. Recognized
//! directives: `v`, `vt`, `f`, `g`, `usemtl`, `mtllib`. Everything else
//! (`vn`, `s`, `o`, ...) is ignored.

use std::path::Path;
use std::str::SplitWhitespace;

use glam::{Vec2, Vec3};

use super::intake::{FaceCorner, GeometryBuilder, IntakeOptions, RawGeometry};
use crate::error::{ConvertError, Result};

/// Load and parse an OBJ file
///
/// Bytes that are not valid UTF-8 (Latin-1 comments and names from older
/// exporters) are replaced with U+FFFD rather than rejected.
pub fn load_obj(input: &Path, options: IntakeOptions) -> Result<RawGeometry> {
    let bytes = std::fs::read(input).map_err(|e| ConvertError::io(input, e))?;
    parse_obj(&String::from_utf8_lossy(&bytes), options)
}

/// Parse OBJ text into raw geometry
pub fn parse_obj(text: &str, options: IntakeOptions) -> Result<RawGeometry> {
    let mut builder = GeometryBuilder::new(options);

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = match line.find('#') {
            Some(comment) => &line[..comment],
            None => line,
        };

        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let [x, y, z] =
                    parse_floats::<3>(&mut parts, "v").map_err(|e| e.at_line(line_no))?;
                builder.push_position(Vec3::new(x, y, z));
            }
            // A third (w) component on uvw coordinates is ignored
            "vt" => {
                let [u, v] =
                    parse_floats::<2>(&mut parts, "vt").map_err(|e| e.at_line(line_no))?;
                builder.push_tex_coord(Vec2::new(u, v));
            }
            "f" => {
                let corners = parts
                    .map(parse_corner)
                    .collect::<Result<Vec<_>>>()
                    .map_err(|e| e.at_line(line_no))?;
                builder.push_face(&corners).map_err(|e| e.at_line(line_no))?;
            }
            "g" => {
                if let Some(name) = parts.next() {
                    builder.open_group(name).map_err(|e| e.at_line(line_no))?;
                }
            }
            "usemtl" => {
                if let Some(tag) = parts.next() {
                    builder.use_material(tag);
                }
            }
            "mtllib" => {
                if let Some(name) = parts.next() {
                    builder.set_mtllib(name);
                }
            }
            _ => {}
        }
    }

    builder.finish()
}

fn parse_floats<const N: usize>(
    parts: &mut SplitWhitespace<'_>,
    directive: &str,
) -> Result<[f32; N]> {
    let mut values = [0.0f32; N];
    for value in values.iter_mut() {
        let token = parts.next().ok_or_else(|| {
            ConvertError::malformed(format!("`{directive}` needs {N} components"))
        })?;
        *value = token.parse().map_err(|_| {
            ConvertError::malformed(format!("`{directive}` has invalid number {token:?}"))
        })?;
    }
    Ok(values)
}

/// Parse a face corner: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_corner(token: &str) -> Result<FaceCorner> {
    let mut fields = token.split('/');
    let position = parse_index(fields.next().unwrap_or_default(), token)?;
    let coord = match fields.next() {
        Some(field) if !field.is_empty() => Some(parse_index(field, token)?),
        _ => None,
    };
    Ok(FaceCorner { position, coord })
}

fn parse_index(field: &str, token: &str) -> Result<u32> {
    match field.parse::<i64>() {
        Ok(value) if value < 0 => Err(ConvertError::malformed(format!(
            "relative index in face corner {token:?} is not supported"
        ))),
        Ok(value) => u32::try_from(value).map_err(|_| {
            ConvertError::malformed(format!("index in face corner {token:?} is out of range"))
        }),
        Err(_) => Err(ConvertError::malformed(format!(
            "invalid face corner {token:?}"
        ))),
    }
}
