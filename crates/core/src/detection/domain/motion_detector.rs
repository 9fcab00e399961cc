use crate::shared::error::MotionError;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for per-frame motion detection.
///
/// Implementations are stateful (they keep the previous frame), hence
/// `&mut self`, and take ownership of each frame so it can be retained.
pub trait MotionDetector: Send {
    /// Returns the motion regions of `frame` relative to the last accepted frame.
    fn detect(&mut self, frame: Frame) -> Result<Vec<Region>, MotionError>;

    /// Most recently accepted frame, if any.
    fn previous(&self) -> Option<&Frame>;

    /// Forgets the previous frame so the next one starts a new run.
    fn reset(&mut self);
}
