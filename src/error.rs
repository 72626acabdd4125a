//! Error types for the crate.
//!
//! Game over is not an error; see [`crate::engine::Outcome`].

use thiserror::Error;

/// Errors raised for malformed construction input or broken move contracts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid board dimensions: {rows}x{cols} (both must be positive)")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("invalid depth limit: must be at least 1")]
    InvalidDepthLimit,

    #[error("coordinate ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },

    #[error("no piece at move origin ({x}, {y})")]
    EmptyOrigin { x: i32, y: i32 },

    #[error("move destination ({x}, {y}) is occupied")]
    OccupiedDestination { x: i32, y: i32 },

    #[error("malformed move from ({from_x}, {from_y}) to ({to_x}, {to_y}): {reason}")]
    MalformedMove {
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
        reason: &'static str,
    },

    #[error("capture target ({x}, {y}) holds no opposing piece")]
    MissingCapturedPiece { x: i32, y: i32 },

    #[error("no move with index {index} ({available} available)")]
    NoSuchMove { index: usize, available: usize },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
