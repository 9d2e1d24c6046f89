//! Error and warning types for the conversion pipeline

use std::fmt;
use std::path::PathBuf;

use a2m_common::A2mFormatError;

/// Fatal conversion error. Any of these aborts the run before an output
/// file is finalized.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Malformed source: {0}")]
    MalformedSource(String),

    #[error("Unsupported topology: face has {corners} vertices (only triangles and quads are supported)")]
    UnsupportedTopology { corners: usize },

    #[error("Collision mesh must contain exactly one sub-object, found {groups}")]
    CollisionMeshShape { groups: usize },

    #[error("{what} count exceeds the u32 index range")]
    IndexOverflow { what: &'static str },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Format(#[from] A2mFormatError),
}

impl ConvertError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSource(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Prefix a source line number onto malformed-source messages
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            Self::MalformedSource(message) => {
                Self::MalformedSource(format!("line {line}: {message}"))
            }
            other => other,
        }
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Recoverable condition: logged, substituted, and processing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Source has no texture coordinates; a single (0, 0) dummy is used.
    MissingTextureCoordinates,
    /// Face (0-based, in intake order) lacks a coordinate index; index 1 is used.
    TooFewTextureComponents { face: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTextureCoordinates => {
                write!(f, "source contains no texture coordinates - using dummy coordinates")
            }
            Self::TooFewTextureComponents { face } => {
                write!(f, "face #{face} contains no texture coordinate index - using \"1\"")
            }
        }
    }
}
