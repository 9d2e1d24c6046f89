//! Geometry intake: raw positions, coordinates and faces grouped into
//! sub-objects, not yet deduplicated.
//!
//! Source adapters (see [`super::obj`]) drive a [`GeometryBuilder`]; the
//! builder owns every policy decision about sub-object boundaries,
//! triangulation and missing coordinates.

use glam::{Vec2, Vec3};
use hashbrown::HashMap;

use super::types::{FaceIndexPair, TexCoord, Vertex};
use crate::error::{ConvertError, Result, Warning};

/// Group name reserved by the legacy embedded-collision layout
const LEGACY_COLLISION_GROUP: &str = "collision";

/// Intake policy
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeOptions {
    /// Open sub-objects on first use of a material tag instead of on
    /// explicit group markers; faces sharing a tag share a sub-object.
    pub merge_by_material: bool,
    /// Source is a collision mesh: texture coordinates are irrelevant and
    /// the `collision` group name is allowed.
    pub collision_source: bool,
}

/// One face corner as written in the source: 1-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    pub position: u32,
    pub coord: Option<u32>,
}

impl FaceCorner {
    pub fn new(position: u32, coord: u32) -> Self {
        Self {
            position,
            coord: Some(coord),
        }
    }

    pub fn position_only(position: u32) -> Self {
        Self {
            position,
            coord: None,
        }
    }
}

/// Faces of one sub-object, by 0-based source index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGroup {
    pub name: String,
    pub material: String,
    pub faces: Vec<FaceIndexPair>,
}

impl RawGroup {
    fn new(name: &str, material: &str) -> Self {
        Self {
            name: name.to_string(),
            material: material.to_string(),
            faces: Vec::new(),
        }
    }
}

/// The raw, validated model produced by intake.
///
/// Every face index is in range for `positions` / `tex_coords`, and
/// `tex_coords` is never empty.
#[derive(Debug, Clone, Default)]
pub struct RawGeometry {
    pub positions: Vec<Vertex>,
    pub tex_coords: Vec<TexCoord>,
    pub groups: Vec<RawGroup>,
    /// Material library named by the source, if any
    pub mtllib: Option<String>,
    pub warnings: Vec<Warning>,
}

impl RawGeometry {
    pub fn face_count(&self) -> usize {
        self.groups.iter().map(|g| g.faces.len()).sum()
    }
}

/// Incremental builder for [`RawGeometry`]
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    options: IntakeOptions,
    positions: Vec<Vertex>,
    tex_coords: Vec<TexCoord>,
    groups: Vec<RawGroup>,
    current: Option<usize>,
    material_groups: HashMap<String, usize>,
    mtllib: Option<String>,
    warnings: Vec<Warning>,
    faces_seen: usize,
}

impl GeometryBuilder {
    pub fn new(options: IntakeOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn push_position(&mut self, position: Vec3) {
        self.positions.push(position);
    }

    pub fn push_tex_coord(&mut self, coord: Vec2) {
        self.tex_coords.push(coord);
    }

    pub fn set_mtllib(&mut self, name: &str) {
        self.mtllib = Some(name.to_string());
    }

    /// Explicit sub-object marker
    pub fn open_group(&mut self, name: &str) -> Result<()> {
        if !self.options.collision_source && name == LEGACY_COLLISION_GROUP {
            return Err(ConvertError::malformed(
                "old obj layout - no sub-object named \"collision\" allowed, pass the collision mesh separately",
            ));
        }
        if self.options.merge_by_material {
            return Ok(());
        }

        self.groups.push(RawGroup::new(name, ""));
        self.current = Some(self.groups.len() - 1);
        Ok(())
    }

    /// Material tag for subsequent faces
    pub fn use_material(&mut self, tag: &str) {
        if self.options.merge_by_material {
            let index = match self.material_groups.get(tag) {
                Some(&index) => index,
                None => {
                    let index = self.groups.len();
                    self.groups.push(RawGroup::new(tag, tag));
                    self.material_groups.insert(tag.to_string(), index);
                    index
                }
            };
            self.current = Some(index);
        } else if let Some(index) = self.current {
            self.groups[index].material = tag.to_string();
        } else {
            tracing::debug!("usemtl {} before any sub-object, ignored", tag);
        }
    }

    /// Add a triangle or quad to the current sub-object.
    ///
    /// Quads (a, b, c, d) are fan-split into (a, b, c) and (a, c, d).
    pub fn push_face(&mut self, corners: &[FaceCorner]) -> Result<()> {
        let group = self.current.ok_or_else(|| {
            ConvertError::malformed("face outside of any sub-object (missing group or material)")
        })?;

        match corners.len() {
            3 | 4 => {}
            n if n > 4 => return Err(ConvertError::UnsupportedTopology { corners: n }),
            n => {
                return Err(ConvertError::malformed(format!(
                    "face has only {n} vertices"
                )));
            }
        }

        let face = self.faces_seen;
        self.faces_seen += 1;

        let mut missing_coord = false;
        let mut resolved = [(0u32, 0u32); 4];
        for (slot, corner) in resolved.iter_mut().zip(corners) {
            let position = to_zero_based(corner.position, "vertex")?;
            let coord = if self.options.collision_source {
                0
            } else {
                match corner.coord {
                    Some(coord) => to_zero_based(coord, "texture coordinate")?,
                    None => {
                        missing_coord = true;
                        0
                    }
                }
            };
            *slot = (position, coord);
        }

        if missing_coord {
            self.warn(Warning::TooFewTextureComponents { face });
        }

        let faces = &mut self.groups[group].faces;
        faces.push(triangle(&resolved, [0, 1, 2]));
        if corners.len() == 4 {
            faces.push(triangle(&resolved, [0, 2, 3]));
        }
        Ok(())
    }

    /// Validate indices and produce the raw model
    pub fn finish(mut self) -> Result<RawGeometry> {
        if self.tex_coords.is_empty() {
            if !self.options.collision_source {
                self.warn(Warning::MissingTextureCoordinates);
            }
            self.tex_coords.push(Vec2::ZERO);
        }

        let position_count = self.positions.len();
        let coord_count = self.tex_coords.len();
        for group in &self.groups {
            for face in &group.faces {
                check_range(&group.name, "vertex", &face.vertices, position_count)?;
                check_range(&group.name, "texture coordinate", &face.coords, coord_count)?;
            }
        }

        Ok(RawGeometry {
            positions: self.positions,
            tex_coords: self.tex_coords,
            groups: self.groups,
            mtllib: self.mtllib,
            warnings: self.warnings,
        })
    }

    fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

fn to_zero_based(index: u32, what: &str) -> Result<u32> {
    index
        .checked_sub(1)
        .ok_or_else(|| ConvertError::malformed(format!("{what} index 0 (indices are 1-based)")))
}

fn triangle(corners: &[(u32, u32); 4], order: [usize; 3]) -> FaceIndexPair {
    FaceIndexPair {
        vertices: order.map(|i| corners[i].0),
        coords: order.map(|i| corners[i].1),
    }
}

fn check_range(group: &str, what: &str, indices: &[u32; 3], len: usize) -> Result<()> {
    match indices.iter().find(|&&i| i as usize >= len) {
        Some(&index) => Err(ConvertError::malformed(format!(
            "sub-object '{group}' references {what} {} but only {len} are defined",
            index + 1
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_positions(builder: &mut GeometryBuilder, count: usize) {
        for i in 0..count {
            builder.push_position(Vec3::new(i as f32, 0.0, 0.0));
        }
    }

    #[test]
    fn test_triangle_is_zero_based() {
        let mut b = GeometryBuilder::default();
        unit_positions(&mut b, 3);
        b.push_tex_coord(Vec2::new(0.0, 0.0));
        b.open_group("tri").unwrap();
        b.push_face(&[FaceCorner::new(1, 1), FaceCorner::new(2, 1), FaceCorner::new(3, 1)])
            .unwrap();

        let raw = b.finish().unwrap();
        assert_eq!(raw.groups.len(), 1);
        assert_eq!(raw.groups[0].faces[0].vertices, [0, 1, 2]);
        assert_eq!(raw.groups[0].faces[0].coords, [0, 0, 0]);
        assert!(raw.warnings.is_empty());
    }

    #[test]
    fn test_quad_fan_split() {
        let mut b = GeometryBuilder::default();
        unit_positions(&mut b, 4);
        for i in 0..4 {
            b.push_tex_coord(Vec2::new(i as f32, 0.0));
        }
        b.open_group("quad").unwrap();
        b.push_face(&[
            FaceCorner::new(1, 1),
            FaceCorner::new(2, 2),
            FaceCorner::new(3, 3),
            FaceCorner::new(4, 4),
        ])
        .unwrap();

        let faces = &b.finish().unwrap().groups[0].faces;
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].vertices, [0, 1, 2]);
        assert_eq!(faces[1].vertices, [0, 2, 3]);
        assert_eq!(faces[1].coords, [0, 2, 3]);
    }

    #[test]
    fn test_ngon_unsupported() {
        let mut b = GeometryBuilder::default();
        unit_positions(&mut b, 5);
        b.open_group("g").unwrap();
        let corners: Vec<_> = (1..=5).map(|i| FaceCorner::new(i, 1)).collect();
        assert!(matches!(
            b.push_face(&corners),
            Err(ConvertError::UnsupportedTopology { corners: 5 })
        ));
    }

    #[test]
    fn test_degenerate_face_malformed() {
        let mut b = GeometryBuilder::default();
        b.open_group("g").unwrap();
        assert!(matches!(
            b.push_face(&[FaceCorner::new(1, 1), FaceCorner::new(2, 1)]),
            Err(ConvertError::MalformedSource(_))
        ));
    }

    #[test]
    fn test_face_before_group_malformed() {
        let mut b = GeometryBuilder::default();
        unit_positions(&mut b, 3);
        let err = b
            .push_face(&[FaceCorner::new(1, 1), FaceCorner::new(2, 1), FaceCorner::new(3, 1)])
            .unwrap_err();
        assert!(matches!(err, ConvertError::MalformedSource(_)));
    }

    #[test]
    fn test_zero_index_malformed() {
        let mut b = GeometryBuilder::default();
        unit_positions(&mut b, 3);
        b.open_group("g").unwrap();
        assert!(matches!(
            b.push_face(&[FaceCorner::new(0, 1), FaceCorner::new(2, 1), FaceCorner::new(3, 1)]),
            Err(ConvertError::MalformedSource(_))
        ));
        assert!(matches!(
            b.push_face(&[FaceCorner::new(1, 0), FaceCorner::new(2, 1), FaceCorner::new(3, 1)]),
            Err(ConvertError::MalformedSource(_))
        ));
    }

    #[test]
    fn test_out_of_range_index_malformed() {
        let mut b = GeometryBuilder::default();
        unit_positions(&mut b, 3);
        b.push_tex_coord(Vec2::ZERO);
        b.open_group("g").unwrap();
        b.push_face(&[FaceCorner::new(1, 1), FaceCorner::new(2, 1), FaceCorner::new(4, 1)])
            .unwrap();

        let err = b.finish().unwrap_err();
        assert!(matches!(err, ConvertError::MalformedSource(ref m) if m.contains("vertex 4")));
    }

    #[test]
    fn test_missing_coord_component_defaults_to_first() {
        let mut b = GeometryBuilder::default();
        unit_positions(&mut b, 3);
        b.push_tex_coord(Vec2::new(0.25, 0.75));
        b.open_group("g").unwrap();
        b.push_face(&[
            FaceCorner::position_only(1),
            FaceCorner::position_only(2),
            FaceCorner::position_only(3),
        ])
        .unwrap();

        let raw = b.finish().unwrap();
        assert_eq!(raw.groups[0].faces[0].coords, [0, 0, 0]);
        assert_eq!(
            raw.warnings,
            vec![Warning::TooFewTextureComponents { face: 0 }]
        );
    }

    #[test]
    fn test_missing_tex_coords_use_dummy() {
        let mut b = GeometryBuilder::default();
        unit_positions(&mut b, 3);
        b.open_group("g").unwrap();
        b.push_face(&[FaceCorner::new(1, 1), FaceCorner::new(2, 1), FaceCorner::new(3, 1)])
            .unwrap();

        let raw = b.finish().unwrap();
        assert_eq!(raw.tex_coords, vec![Vec2::ZERO]);
        assert!(raw.warnings.contains(&Warning::MissingTextureCoordinates));
    }

    #[test]
    fn test_groups_numbered_in_order() {
        let mut b = GeometryBuilder::default();
        b.open_group("a").unwrap();
        b.use_material("stone");
        b.open_group("b").unwrap();
        b.open_group("a").unwrap();

        let raw = b.finish().unwrap();
        let names: Vec<_> = raw.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "a"]);
        assert_eq!(raw.groups[0].material, "stone");
        assert_eq!(raw.groups[1].material, "");
    }

    #[test]
    fn test_merge_by_material_reuses_sub_object() {
        let mut b = GeometryBuilder::new(IntakeOptions {
            merge_by_material: true,
            ..Default::default()
        });
        unit_positions(&mut b, 3);
        b.push_tex_coord(Vec2::ZERO);
        let tri = [FaceCorner::new(1, 1), FaceCorner::new(2, 1), FaceCorner::new(3, 1)];

        b.open_group("ignored").unwrap();
        b.use_material("wood");
        b.push_face(&tri).unwrap();
        b.use_material("metal");
        b.push_face(&tri).unwrap();
        b.use_material("wood");
        b.push_face(&tri).unwrap();

        let raw = b.finish().unwrap();
        assert_eq!(raw.groups.len(), 2);
        assert_eq!(raw.groups[0].name, "wood");
        assert_eq!(raw.groups[0].material, "wood");
        assert_eq!(raw.groups[0].faces.len(), 2);
        assert_eq!(raw.groups[1].name, "metal");
        assert_eq!(raw.groups[1].faces.len(), 1);
    }

    #[test]
    fn test_legacy_collision_group_rejected() {
        let mut b = GeometryBuilder::default();
        assert!(matches!(
            b.open_group("collision"),
            Err(ConvertError::MalformedSource(_))
        ));

        let mut b = GeometryBuilder::new(IntakeOptions {
            collision_source: true,
            ..Default::default()
        });
        assert!(b.open_group("collision").is_ok());
    }

    #[test]
    fn test_collision_source_ignores_coords() {
        let mut b = GeometryBuilder::new(IntakeOptions {
            collision_source: true,
            ..Default::default()
        });
        unit_positions(&mut b, 3);
        b.open_group("hull").unwrap();
        b.push_face(&[
            FaceCorner::position_only(1),
            FaceCorner::position_only(2),
            FaceCorner::position_only(3),
        ])
        .unwrap();

        let raw = b.finish().unwrap();
        assert!(raw.warnings.is_empty());
        assert_eq!(raw.groups[0].faces[0].vertices, [0, 1, 2]);
    }
}
