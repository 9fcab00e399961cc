use crate::detection::domain::block_differencer::compute_motion_grid;
use crate::detection::domain::motion_detector::MotionDetector;
use crate::detection::domain::region_merger::extract_regions;
use crate::shared::error::MotionError;
use crate::shared::frame::Frame;
use crate::shared::motion_config::MotionConfig;
use crate::shared::region::Region;

/// Double-buffered motion detector.
///
/// Owns the previous frame between calls. A frame becomes the new previous
/// frame only after it was processed successfully; a rejected frame leaves
/// the stored one untouched.
pub struct MotionProcessor {
    config: MotionConfig,
    previous: Option<Frame>,
}

impl MotionProcessor {
    pub fn new(config: MotionConfig) -> Result<Self, MotionError> {
        config.validate()?;
        Ok(Self {
            config,
            previous: None,
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn process_frame(&mut self, current: Frame) -> Result<Vec<Region>, MotionError> {
        let grid = compute_motion_grid(
            &current,
            self.previous.as_ref(),
            self.config.block_size,
            self.config.threshold,
        )?;
        let regions = extract_regions(&grid)?;

        log::debug!(
            "frame {}: {} moving blocks, {} regions",
            current.index(),
            grid.moving_count(),
            regions.len()
        );

        self.previous = Some(current);
        Ok(regions)
    }
}

impl MotionDetector for MotionProcessor {
    fn detect(&mut self, frame: Frame) -> Result<Vec<Region>, MotionError> {
        self.process_frame(frame)
    }

    fn previous(&self) -> Option<&Frame> {
        self.previous.as_ref()
    }

    fn reset(&mut self) {
        self.previous = None;
    }
}
