use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::pipeline::frame_stages::FrameStages;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::video::domain::frame_source::FrameSource;

/// What to do when the core rejects a frame with `DimensionMismatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Drop the frame and treat the next one as a new first frame.
    Reset,
}

/// Callback `(frames_read, total_frames) -> keep_going`.
pub type ProgressFn = Box<dyn Fn(usize, usize) -> bool + Send>;

/// Configuration for a pipeline execution run.
pub struct PipelineConfig {
    pub total_frames: usize,
    pub mismatch_policy: MismatchPolicy,
    pub on_progress: Option<ProgressFn>,
    pub cancelled: Arc<AtomicBool>,
}

/// Frame accounting for one run.
///
/// On a run that is neither cancelled nor aborted,
/// `frames_processed + frames_rejected + frames_dropped == frames_read`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_read: usize,
    pub frames_processed: usize,
    pub frames_rejected: usize,
    pub frames_dropped: usize,
    pub regions_reported: usize,
}

/// Abstracts how the read → detect → report pipeline is driven.
///
/// This is a port (application-layer interface). Infrastructure provides the
/// sequential and threaded implementations. Executors own the source for the
/// duration of the run and close it before returning.
pub trait PipelineExecutor: Send {
    fn execute(
        &self,
        source: Box<dyn FrameSource>,
        stages: &mut FrameStages,
        config: PipelineConfig,
        logger: &mut dyn PipelineLogger,
    ) -> Result<RunSummary, Box<dyn std::error::Error>>;
}
