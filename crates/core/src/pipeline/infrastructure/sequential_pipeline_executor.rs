use std::sync::atomic::Ordering;

use crate::pipeline::frame_stages::{report_progress, FrameStages};
use crate::pipeline::pipeline_executor::{PipelineConfig, PipelineExecutor, RunSummary};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::video::domain::frame_source::FrameSource;

/// Pulls frames and processes each one to completion on the calling thread.
///
/// Lossless: every frame the source yields reaches the detector.
pub struct SequentialPipelineExecutor;

impl SequentialPipelineExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SequentialPipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineExecutor for SequentialPipelineExecutor {
    fn execute(
        &self,
        mut source: Box<dyn FrameSource>,
        stages: &mut FrameStages,
        config: PipelineConfig,
        logger: &mut dyn PipelineLogger,
    ) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let mut summary = RunSummary::default();
        let result = run_loop(&mut *source, stages, &config, logger, &mut summary);
        source.close();
        result.map(|()| summary)
    }
}

fn run_loop(
    source: &mut dyn FrameSource,
    stages: &mut FrameStages,
    config: &PipelineConfig,
    logger: &mut dyn PipelineLogger,
    summary: &mut RunSummary,
) -> Result<(), Box<dyn std::error::Error>> {
    for frame_result in source.frames() {
        if config.cancelled.load(Ordering::Relaxed) {
            log::info!("Run cancelled after {} frames", summary.frames_read);
            break;
        }
        let frame = frame_result?;
        summary.frames_read += 1;
        stages.handle(frame, config, logger, summary)?;
        if !report_progress(summary.frames_read, config, logger) {
            break;
        }
    }
    Ok(())
}
