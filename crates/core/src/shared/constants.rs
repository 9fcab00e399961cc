/// Pixels per block side when no configuration is given.
pub const DEFAULT_BLOCK_SIZE: u32 = 10;

/// Averaged per-channel difference a pixel must exceed to count as motion.
pub const DEFAULT_THRESHOLD: f64 = 30.0;

pub const MAX_THRESHOLD: f64 = 255.0;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Outline colour for annotated frames (opaque red).
pub const DEFAULT_OUTLINE_COLOR: [u8; 4] = [255, 0, 0, 255];

pub const DEFAULT_OUTLINE_WIDTH: u32 = 2;
