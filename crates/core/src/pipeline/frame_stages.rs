use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::motion_detector::MotionDetector;
use crate::pipeline::pipeline_executor::{MismatchPolicy, PipelineConfig, RunSummary};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::report::domain::report_writer::{FrameReport, ReportWriter};
use crate::shared::error::MotionError;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Where annotated copies of processed frames go.
pub struct ImageOutput {
    pub writer: Box<dyn ImageWriter>,
    pub annotator: Option<Box<dyn FrameAnnotator>>,
    pub dir: PathBuf,
}

impl ImageOutput {
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

/// The per-frame work shared by every executor: detect, report, annotate, write.
pub struct FrameStages {
    pub detector: Box<dyn MotionDetector>,
    pub report_writer: Option<Box<dyn ReportWriter>>,
    pub image_output: Option<ImageOutput>,
}

impl FrameStages {
    pub fn new(detector: Box<dyn MotionDetector>) -> Self {
        Self {
            detector,
            report_writer: None,
            image_output: None,
        }
    }

    /// Runs one frame through the stages and updates `summary`.
    ///
    /// A `DimensionMismatch` under [`MismatchPolicy::Reset`] is absorbed:
    /// the frame is counted as rejected and the detector starts over.
    pub fn handle(
        &mut self,
        frame: Frame,
        config: &PipelineConfig,
        logger: &mut dyn PipelineLogger,
        summary: &mut RunSummary,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let index = frame.index();

        let started = Instant::now();
        let detected = self.detector.detect(frame);
        logger.timing("differencing", elapsed_ms(started));

        let regions = match detected {
            Ok(regions) => regions,
            Err(e @ MotionError::DimensionMismatch { .. })
                if config.mismatch_policy == MismatchPolicy::Reset =>
            {
                log::warn!("Frame {index} rejected ({e}); starting a new run");
                self.detector.reset();
                summary.frames_rejected += 1;
                return Ok(());
            }
            Err(e) => return Err(format!("frame {index}: {e}").into()),
        };

        summary.frames_processed += 1;
        summary.regions_reported += regions.len();
        logger.metric("regions", regions.len() as f64);

        if let Some(writer) = self.report_writer.as_mut() {
            writer.write(&FrameReport {
                frame_index: index,
                regions: regions.clone(),
            })?;
        }

        if let Some(output) = &self.image_output {
            let mut annotated = self
                .detector
                .previous()
                .cloned()
                .ok_or("detector did not retain the processed frame")?;

            if let Some(annotator) = &output.annotator {
                let started = Instant::now();
                annotator.annotate(&mut annotated, &regions)?;
                logger.timing("annotate", elapsed_ms(started));
            }

            let started = Instant::now();
            output.writer.write(&output.frame_path(index), &annotated)?;
            logger.timing("write", elapsed_ms(started));
        }

        Ok(())
    }

    /// Flushes the report writer, if any.
    pub fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(writer) = self.report_writer.as_mut() {
            writer.finish()?;
        }
        Ok(())
    }
}

/// Reports progress and returns `false` once the run should stop.
pub fn report_progress(
    frames_read: usize,
    config: &PipelineConfig,
    logger: &mut dyn PipelineLogger,
) -> bool {
    logger.progress(frames_read, config.total_frames);
    if let Some(cb) = &config.on_progress {
        if !cb(frames_read, config.total_frames) {
            config.cancelled.store(true, Ordering::Relaxed);
        }
    }
    !config.cancelled.load(Ordering::Relaxed)
}

pub(crate) fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
