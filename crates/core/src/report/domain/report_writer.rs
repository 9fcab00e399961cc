use serde::Serialize;

use crate::shared::region::Region;

/// Regions found in one processed frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_index: usize,
    pub regions: Vec<Region>,
}

/// Receives one report per processed frame.
pub trait ReportWriter: Send {
    fn write(&mut self, report: &FrameReport) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes buffered output at the end of a run.
    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
