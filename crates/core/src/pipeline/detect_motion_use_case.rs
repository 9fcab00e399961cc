use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::motion_detector::MotionDetector;
use crate::report::domain::report_writer::ReportWriter;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::image_writer::ImageWriter;

use super::frame_stages::{FrameStages, ImageOutput};
use super::pipeline_executor::{
    MismatchPolicy, PipelineConfig, PipelineExecutor, ProgressFn, RunSummary,
};
use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

/// Orchestrates a motion-detection run over one frame source.
///
/// Wires the source, detector and optional sinks together and delegates the
/// frame loop to a `PipelineExecutor`. This is a single-use struct:
/// `execute` consumes the owned components, so calling it twice will fail.
pub struct DetectMotionUseCase {
    source: Option<Box<dyn FrameSource>>,
    stages: Option<FrameStages>,
    executor: Box<dyn PipelineExecutor>,
    logger: Box<dyn PipelineLogger>,
    mismatch_policy: MismatchPolicy,
    on_progress: Option<ProgressFn>,
    cancelled: Arc<AtomicBool>,
}

impl DetectMotionUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn MotionDetector>,
        executor: Box<dyn PipelineExecutor>,
    ) -> Self {
        Self {
            source: Some(source),
            stages: Some(FrameStages::new(detector)),
            executor,
            logger: Box::new(NullPipelineLogger),
            mismatch_policy: MismatchPolicy::default(),
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Writes every processed frame to `dir`, outlined by `annotator` if given.
    pub fn with_image_output(
        mut self,
        writer: Box<dyn ImageWriter>,
        annotator: Option<Box<dyn FrameAnnotator>>,
        dir: PathBuf,
    ) -> Self {
        if let Some(stages) = self.stages.as_mut() {
            stages.image_output = Some(ImageOutput {
                writer,
                annotator,
                dir,
            });
        }
        self
    }

    pub fn with_report_writer(mut self, writer: Box<dyn ReportWriter>) -> Self {
        if let Some(stages) = self.stages.as_mut() {
            stages.report_writer = Some(writer);
        }
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_mismatch_policy(mut self, policy: MismatchPolicy) -> Self {
        self.mismatch_policy = policy;
        self
    }

    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn execute(&mut self, input: &Path) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let mut source = self.source.take().ok_or("Pipeline already executed")?;
        let mut stages = self.stages.take().ok_or("Pipeline already executed")?;

        let metadata = match source.open(input) {
            Ok(metadata) => metadata,
            Err(e) => {
                source.close();
                return Err(e);
            }
        };
        self.logger.info(&format!(
            "Detecting motion in {} frames ({}x{})",
            metadata.total_frames, metadata.width, metadata.height
        ));

        let config = PipelineConfig {
            total_frames: metadata.total_frames,
            mismatch_policy: self.mismatch_policy,
            on_progress: self.on_progress.take(),
            cancelled: self.cancelled.clone(),
        };

        let result = self
            .executor
            .execute(source, &mut stages, config, self.logger.as_mut());
        let finished = stages.finish();
        self.logger.summary();

        let summary = result?;
        finished?;
        log::info!(
            "Processed {} of {} frames, {} regions reported",
            summary.frames_processed,
            summary.frames_read,
            summary.regions_reported
        );
        Ok(summary)
    }
}
