//! Coordinate-axis remap for emitted positions

/// Axis convention applied to every position written to an artifact.
///
/// The mesh and the collision mesh carry independent remaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AxisRemap {
    /// Positions are written as-is.
    #[default]
    Identity,
    /// `(x, y, z) -> (x, z, -y)`: converts a Z-up source to Y-up.
    SwapYZ,
}

impl AxisRemap {
    /// Map a `--rotate`-style flag onto a remap.
    pub fn from_flag(rotate: bool) -> Self {
        if rotate { Self::SwapYZ } else { Self::Identity }
    }

    #[inline]
    pub fn apply(self, p: [f32; 3]) -> [f32; 3] {
        match self {
            Self::Identity => p,
            Self::SwapYZ => [p[0], p[2], -p[1]],
        }
    }
}
