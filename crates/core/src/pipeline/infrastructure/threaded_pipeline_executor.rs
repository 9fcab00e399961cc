use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::pipeline::frame_stages::{report_progress, FrameStages};
use crate::pipeline::pipeline_executor::{PipelineConfig, PipelineExecutor, RunSummary};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

const DEFAULT_CHANNEL_CAPACITY: usize = 4;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// How the reader thread behaves when the detector falls behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backpressure {
    /// Wait for room in the queue; no frame is lost.
    #[default]
    Block,
    /// Single-slot queue; a waiting frame is discarded in favour of a newer one.
    DropOldest,
}

/// Decodes frames on a dedicated reader thread while detection runs on the
/// calling thread.
///
/// Layout: `reader → slot → main [detect/report/annotate/write]`
///
/// Calls into the detector stay serialized on the calling thread.
pub struct ThreadedPipelineExecutor {
    channel_capacity: usize,
    backpressure: Backpressure,
}

impl ThreadedPipelineExecutor {
    pub fn new(backpressure: Backpressure) -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            backpressure,
        }
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    fn capacity(&self) -> usize {
        match self.backpressure {
            Backpressure::Block => self.channel_capacity,
            Backpressure::DropOldest => 1,
        }
    }
}

impl Default for ThreadedPipelineExecutor {
    fn default() -> Self {
        Self::new(Backpressure::Block)
    }
}

impl PipelineExecutor for ThreadedPipelineExecutor {
    fn execute(
        &self,
        source: Box<dyn FrameSource>,
        stages: &mut FrameStages,
        config: PipelineConfig,
        logger: &mut dyn PipelineLogger,
    ) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let (frame_tx, frame_rx) =
            crossbeam_channel::bounded::<Result<Frame, SendError>>(self.capacity());
        let drain_rx = match self.backpressure {
            Backpressure::DropOldest => Some(frame_rx.clone()),
            Backpressure::Block => None,
        };

        let stop = Arc::new(AtomicBool::new(false));
        let dropped = Arc::new(AtomicUsize::new(0));
        let reader_handle = spawn_reader(
            source,
            frame_tx,
            drain_rx,
            ReaderControl {
                stop: stop.clone(),
                cancelled: config.cancelled.clone(),
                dropped: dropped.clone(),
            },
        );

        let mut summary = RunSummary::default();
        let main_result = run_main_loop(frame_rx, stages, &config, logger, &mut summary);

        stop.store(true, Ordering::Relaxed);
        let frames_read = reader_handle
            .join()
            .map_err(|_| "frame reader thread panicked")?;

        summary.frames_read = frames_read;
        summary.frames_dropped = dropped.load(Ordering::Relaxed);
        if summary.frames_dropped > 0 {
            log::warn!(
                "Dropped {} of {} frames to keep up with the source",
                summary.frames_dropped,
                summary.frames_read
            );
            logger.metric("dropped_frames", summary.frames_dropped as f64);
        }

        main_result.map(|()| summary)
    }
}

struct ReaderControl {
    stop: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
    dropped: Arc<AtomicUsize>,
}

impl ReaderControl {
    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed) || self.cancelled.load(Ordering::Relaxed)
    }
}

/// Returns the number of frames decoded.
fn spawn_reader(
    mut source: Box<dyn FrameSource>,
    frame_tx: Sender<Result<Frame, SendError>>,
    drain_rx: Option<Receiver<Result<Frame, SendError>>>,
    control: ReaderControl,
) -> JoinHandle<usize> {
    std::thread::spawn(move || {
        let mut frames_read = 0;
        for frame_result in source.frames() {
            if control.should_stop() {
                break;
            }
            let (message, last) = match frame_result {
                Ok(frame) => {
                    frames_read += 1;
                    (Ok(frame), false)
                }
                Err(e) => (Err(e.to_string().into()), true),
            };
            let delivered = match &drain_rx {
                Some(rx) => offer_latest(&frame_tx, rx, message, &control),
                None => frame_tx.send(message).is_ok(),
            };
            if !delivered || last {
                break;
            }
        }
        source.close();
        frames_read
    })
}

/// Puts `message` into the single slot, evicting a frame still waiting there.
fn offer_latest(
    frame_tx: &Sender<Result<Frame, SendError>>,
    drain_rx: &Receiver<Result<Frame, SendError>>,
    message: Result<Frame, SendError>,
    control: &ReaderControl,
) -> bool {
    let mut pending = message;
    loop {
        match frame_tx.try_send(pending) {
            Ok(()) => return true,
            Err(TrySendError::Disconnected(_)) => return false,
            Err(TrySendError::Full(back)) => {
                if control.should_stop() {
                    return false;
                }
                if let Ok(Ok(stale)) = drain_rx.try_recv() {
                    control.dropped.fetch_add(1, Ordering::Relaxed);
                    log::debug!("Dropped frame {} (detector busy)", stale.index());
                }
                pending = back;
            }
        }
    }
}

fn run_main_loop(
    frame_rx: Receiver<Result<Frame, SendError>>,
    stages: &mut FrameStages,
    config: &PipelineConfig,
    logger: &mut dyn PipelineLogger,
    summary: &mut RunSummary,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut received = 0;
    for frame_result in frame_rx {
        if config.cancelled.load(Ordering::Relaxed) {
            log::info!("Run cancelled after {received} frames");
            break;
        }
        let frame = frame_result.map_err(|e| -> Box<dyn std::error::Error> { e })?;
        received += 1;
        stages.handle(frame, config, logger, summary)?;
        if !report_progress(received, config, logger) {
            break;
        }
    }
    Ok(())
}
