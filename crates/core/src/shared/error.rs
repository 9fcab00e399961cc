use std::fmt;

use thiserror::Error;

/// Width, height and buffer length of a frame, as declared or as observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub len: usize,
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} ({} bytes)", self.width, self.height, self.len)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("frame dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: Geometry, actual: Geometry },
    #[error("cannot extract regions from an empty {columns}x{rows} block grid")]
    EmptyGrid { columns: usize, rows: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message_names_both_geometries() {
        let err = MotionError::DimensionMismatch {
            expected: Geometry {
                width: 20,
                height: 20,
                len: 1600,
            },
            actual: Geometry {
                width: 10,
                height: 20,
                len: 800,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("20x20 (1600 bytes)"));
        assert!(msg.contains("10x20 (800 bytes)"));
    }

    #[test]
    fn test_empty_grid_message() {
        let err = MotionError::EmptyGrid {
            columns: 0,
            rows: 3,
        };
        assert_eq!(
            err.to_string(),
            "cannot extract regions from an empty 0x3 block grid"
        );
    }
}
