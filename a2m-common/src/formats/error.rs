//! Errors raised while encoding or decoding `.a2m` data

/// Error type for `.a2m` encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum A2mFormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not an A2E model (bad magic)")]
    BadMagic,

    #[error("Unsupported a2m version: {0}")]
    UnsupportedVersion(u32),

    #[error("Unknown model type: {0:#04x}")]
    UnknownModelType(u8),

    #[error("Unexpected end of data at offset {offset}: needed {needed} more bytes")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("{0} trailing bytes after model data")]
    TrailingBytes(usize),

    #[error("Sub-object name #{index} is not valid UTF-8")]
    InvalidName { index: usize },

    #[error("Sub-object '{name}' has {vertex} vertex triples but {tex} texcoord triples")]
    MismatchedFaceStreams {
        name: String,
        vertex: usize,
        tex: usize,
    },

    #[error("{what} count {count} does not fit in u32")]
    CountOverflow { what: &'static str, count: usize },
}
