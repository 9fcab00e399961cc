use std::path::PathBuf;

/// What a frame source knows about its stream once opened.
///
/// `width`/`height` describe the first frame; later frames are not
/// guaranteed to match, which the motion core reports per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let meta = SourceMetadata {
            width: 640,
            height: 480,
            total_frames: 120,
            source_path: Some(PathBuf::from("/tmp/frames")),
        };
        assert_eq!(meta.width, 640);
        assert_eq!(meta.height, 480);
        assert_eq!(meta.total_frames, 120);
        assert_eq!(meta.source_path, Some(PathBuf::from("/tmp/frames")));
    }

    #[test]
    fn test_clone_is_equal() {
        let meta = SourceMetadata {
            width: 20,
            height: 20,
            total_frames: 0,
            source_path: None,
        };
        assert_eq!(meta.clone(), meta);
    }
}
