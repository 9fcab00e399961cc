use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_source::FrameSource;

/// Adapts a directory of still images to the [`FrameSource`] interface.
///
/// Files with a known image extension are taken in file-name order and
/// decoded lazily with the `image` crate, one frame per file, expanded to
/// RGBA8. Each frame keeps the dimensions of its own file.
pub struct ImageSequenceReader {
    paths: Option<Vec<PathBuf>>,
}

impl ImageSequenceReader {
    pub fn new() -> Self {
        Self { paths: None }
    }
}

impl Default for ImageSequenceReader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn decode(path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)
        .map_err(|e| format!("failed to decode {}: {e}", path.display()))?
        .to_rgba8();
    Ok(Frame::from_rgba_image(img, index))
}

impl FrameSource for ImageSequenceReader {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        if !path.is_dir() {
            return Err(format!("Not a directory: {}", path.display()).into());
        }

        let paths = list_images(path)?;
        let first = paths
            .first()
            .ok_or_else(|| format!("No image files found in {}", path.display()))?;
        let (width, height) = image::image_dimensions(first)?;

        let metadata = SourceMetadata {
            width,
            height,
            total_frames: paths.len(),
            source_path: Some(path.to_path_buf()),
        };
        log::info!(
            "Opened {} frames ({width}x{height}) from {}",
            paths.len(),
            path.display()
        );
        self.paths = Some(paths);
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        match self.paths.take() {
            Some(paths) => Box::new(
                paths
                    .into_iter()
                    .enumerate()
                    .map(|(index, path)| decode(&path, index)),
            ),
            None => Box::new(std::iter::once(Err(
                "ImageSequenceReader: not opened".into()
            ))),
        }
    }

    fn close(&mut self) {
        self.paths = None;
    }
}
