use thiserror::Error;

#[derive(Debug, Error)]
pub enum StegoError {
    #[error("frame {frame}: palette has {len} colors, expected 256")]
    InvalidPalette { frame: usize, len: usize },

    #[error("floor must be at least 17, got {0}")]
    InvalidFloor(u8),

    #[error("frame {frame}: index buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        frame: usize,
        len: usize,
        width: u16,
        height: u16,
    },

    #[error("payload needs {required} eligible pixels, image has {available}")]
    InsufficientCapacity { required: usize, available: usize },

    #[error("no end marker found after scanning {scanned} pixels")]
    NoMarker { scanned: usize },

    #[error("frame {frame} at ({x}, {y}): rank {rank} is below the floor but carries no symbol")]
    UnexpectedRank {
        rank: u8,
        frame: usize,
        x: u16,
        y: u16,
    },

    #[error("payload decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[cfg(feature = "gif")]
    #[error(transparent)]
    Container(#[from] crate::container::ContainerError),
}

/// Failures while turning recovered symbols back into payload bytes.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("symbol count {0} is odd, symbols pair into bytes")]
    OddSymbolCount(usize),

    #[error("hex stage rejected symbol text: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("base64 stage rejected transport text: {0}")]
    Transport(#[from] base64::DecodeError),
}
