use quartz_nbt::io::NbtIoError;
use thiserror::Error;

use crate::block_storage::Position;

pub type Result<T> = std::result::Result<T, StructureError>;

#[derive(Debug, Error)]
pub enum StructureError {
    /// Bad constructor input: empty author, non-positive version or size.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("position {position} is out of bounds of ({}, {}, {})", size[0], size[1], size[2])]
    OutOfBounds { position: Position, size: [u32; 3] },

    /// The tag tree was malformed or incomplete.
    #[error("malformed structure data: {0}")]
    Decode(String),

    /// A palette item could not be turned into a block state by the destination registry.
    #[error("failed to resolve block {name:?}: {reason}")]
    Resolution { name: String, reason: String },

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl StructureError {
    pub(crate) fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<NbtIoError> for StructureError {
    fn from(e: NbtIoError) -> Self {
        match e {
            NbtIoError::StdIo(io) => Self::Io(io),
            other => Self::Decode(other.to_string()),
        }
    }
}
