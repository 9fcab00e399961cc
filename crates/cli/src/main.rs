use std::path::PathBuf;
use std::process;

use clap::Parser;

use motionwatch_core::annotation::domain::frame_annotator::FrameAnnotator;
use motionwatch_core::annotation::infrastructure::outline_annotator::OutlineAnnotator;
use motionwatch_core::detection::domain::motion_processor::MotionProcessor;
use motionwatch_core::pipeline::detect_motion_use_case::DetectMotionUseCase;
use motionwatch_core::pipeline::infrastructure::sequential_pipeline_executor::SequentialPipelineExecutor;
use motionwatch_core::pipeline::infrastructure::threaded_pipeline_executor::{
    Backpressure, ThreadedPipelineExecutor,
};
use motionwatch_core::pipeline::pipeline_executor::{MismatchPolicy, PipelineExecutor, RunSummary};
use motionwatch_core::pipeline::pipeline_logger::LogPipelineLogger;
use motionwatch_core::report::domain::report_writer::ReportWriter;
use motionwatch_core::report::infrastructure::json_lines_report_writer::JsonLinesReportWriter;
use motionwatch_core::report::infrastructure::log_report_writer::LogReportWriter;
use motionwatch_core::shared::constants::{DEFAULT_OUTLINE_COLOR, DEFAULT_OUTLINE_WIDTH};
use motionwatch_core::shared::motion_config::MotionConfig;
use motionwatch_core::video::infrastructure::image_file_writer::ImageFileWriter;
use motionwatch_core::video::infrastructure::image_sequence_reader::ImageSequenceReader;

/// Block-based motion detection over a directory of frames.
#[derive(Parser)]
#[command(name = "motionwatch")]
struct Cli {
    /// Directory of frames, processed in file-name order.
    input: PathBuf,

    /// Write annotated frames to this directory.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write one JSON line of regions per frame to this file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// JSON file with `block_size` and `threshold`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Block edge length in pixels (overrides --config).
    #[arg(long)]
    block_size: Option<u32>,

    /// Mean RGB difference a pixel must exceed, 0-255 (overrides --config).
    #[arg(long)]
    threshold: Option<f64>,

    /// Decode frames on a separate thread.
    #[arg(long)]
    threaded: bool,

    /// Skip stale frames when detection falls behind (requires --threaded).
    #[arg(long)]
    drop_frames: bool,

    /// On a frame size change: abort or reset.
    #[arg(long, default_value = "abort")]
    on_mismatch: String,

    /// Outline width in pixels for annotated frames.
    #[arg(long, default_value_t = DEFAULT_OUTLINE_WIDTH)]
    line_width: u32,

    /// Log progress every N frames.
    #[arg(long, default_value = "25")]
    progress_every: usize,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = load_config(&cli)?;
    log::info!(
        "Block size {} px, threshold {}",
        config.block_size,
        config.threshold
    );

    let summary = run_detection(&cli, config)?;
    if summary.frames_dropped > 0 {
        log::info!("{} frames dropped", summary.frames_dropped);
    }
    if let Some(dir) = &cli.output {
        log::info!("Annotated frames written to {}", dir.display());
    }
    if let Some(path) = &cli.report {
        log::info!("Report written to {}", path.display());
    }
    Ok(())
}

fn run_detection(cli: &Cli, config: MotionConfig) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let detector = Box::new(MotionProcessor::new(config)?);

    let mut use_case = DetectMotionUseCase::new(
        Box::new(ImageSequenceReader::new()),
        detector,
        build_executor(cli),
    )
    .with_logger(Box::new(LogPipelineLogger::new(cli.progress_every)))
    .with_mismatch_policy(parse_mismatch_policy(&cli.on_mismatch)?);

    if let Some(writer) = build_report_writer(cli)? {
        use_case = use_case.with_report_writer(writer);
    }

    if let Some(dir) = &cli.output {
        let annotator: Box<dyn FrameAnnotator> =
            Box::new(OutlineAnnotator::new(DEFAULT_OUTLINE_COLOR, cli.line_width)?);
        use_case =
            use_case.with_image_output(Box::new(ImageFileWriter::new()), Some(annotator), dir.clone());
    }

    use_case.execute(&cli.input)
}

fn build_executor(cli: &Cli) -> Box<dyn PipelineExecutor> {
    if !cli.threaded {
        return Box::new(SequentialPipelineExecutor::new());
    }
    let backpressure = if cli.drop_frames {
        Backpressure::DropOldest
    } else {
        Backpressure::Block
    };
    Box::new(ThreadedPipelineExecutor::new(backpressure))
}

/// The JSON report when `--report` is set, log output when no other sink is.
fn build_report_writer(
    cli: &Cli,
) -> Result<Option<Box<dyn ReportWriter>>, Box<dyn std::error::Error>> {
    match (&cli.report, &cli.output) {
        (Some(path), _) => Ok(Some(Box::new(JsonLinesReportWriter::create(path)?))),
        (None, None) => Ok(Some(Box::new(LogReportWriter::new()))),
        (None, Some(_)) => Ok(None),
    }
}

/// Defaults, then the `--config` file, then explicit flags.
fn load_config(cli: &Cli) -> Result<MotionConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => MotionConfig::from_json_file(path)?,
        None => MotionConfig::default(),
    };
    if let Some(block_size) = cli.block_size {
        config.block_size = block_size;
    }
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    config.validate()?;
    Ok(config)
}

fn parse_mismatch_policy(s: &str) -> Result<MismatchPolicy, Box<dyn std::error::Error>> {
    match s {
        "abort" => Ok(MismatchPolicy::Abort),
        "reset" => Ok(MismatchPolicy::Reset),
        other => Err(format!("--on-mismatch must be 'abort' or 'reset', got '{other}'").into()),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.is_dir() {
        return Err(format!("Input directory not found: {}", cli.input.display()).into());
    }
    if cli.drop_frames && !cli.threaded {
        return Err("--drop-frames requires --threaded".into());
    }
    if cli.line_width == 0 {
        return Err("Line width must be at least 1".into());
    }
    parse_mismatch_policy(&cli.on_mismatch)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("motionwatch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["frames"]);
        assert_eq!(cli.on_mismatch, "abort");
        assert_eq!(cli.line_width, DEFAULT_OUTLINE_WIDTH);
        assert_eq!(cli.progress_every, 25);
        assert!(!cli.threaded);
    }

    #[test]
    fn test_validate_accepts_existing_directory() {
        let dir = TempDir::new().unwrap();
        let cli = parse(&[dir.path().to_str().unwrap()]);
        assert!(validate(&cli).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_input() {
        let cli = parse(&["/nonexistent/frames"]);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_validate_rejects_drop_frames_without_threaded() {
        let dir = TempDir::new().unwrap();
        let cli = parse(&[dir.path().to_str().unwrap(), "--drop-frames"]);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("--threaded"));
    }

    #[test]
    fn test_validate_rejects_zero_line_width() {
        let dir = TempDir::new().unwrap();
        let cli = parse(&[dir.path().to_str().unwrap(), "--line-width", "0"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_mismatch_policy() {
        let dir = TempDir::new().unwrap();
        let cli = parse(&[dir.path().to_str().unwrap(), "--on-mismatch", "skip"]);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("skip"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("motion.json");
        std::fs::write(&path, r#"{"block_size": 8, "threshold": 12.5}"#).unwrap();

        let cli = parse(&["in", "--config", path.to_str().unwrap(), "--threshold", "40"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.block_size, 8);
        assert_eq!(config.threshold, 40.0);
    }

    #[test]
    fn test_config_defaults_without_file() {
        let config = load_config(&parse(&["in"])).unwrap();
        assert_eq!(config, MotionConfig::default());
    }

    #[test]
    fn test_invalid_merged_config_is_rejected() {
        let cli = parse(&["in", "--block-size", "0"]);
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_report_sink_selection() {
        assert!(build_report_writer(&parse(&["in"])).unwrap().is_some());
        assert!(build_report_writer(&parse(&["in", "--output", "out"]))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_end_to_end_writes_report() {
        let dir = TempDir::new().unwrap();
        let frames = dir.path().join("frames");
        std::fs::create_dir(&frames).unwrap();
        let still = image::RgbaImage::from_pixel(20, 20, image::Rgba([0, 0, 0, 255]));
        let mut moved = still.clone();
        for y in 10..20 {
            for x in 10..20 {
                moved.put_pixel(x, y, image::Rgba([200, 200, 200, 255]));
            }
        }
        still.save(frames.join("a.png")).unwrap();
        moved.save(frames.join("b.png")).unwrap();

        let report = dir.path().join("report.jsonl");
        let cli = parse(&[
            frames.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
        ]);
        let config = load_config(&cli).unwrap();
        let summary = run_detection(&cli, config).unwrap();

        assert_eq!(summary.frames_processed, 2);
        let text = std::fs::read_to_string(&report).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"{"frame_index":0,"regions":[]}"#);
        assert_eq!(
            lines[1],
            r#"{"frame_index":1,"regions":[{"x":10,"y":10,"width":10,"height":10}]}"#
        );
    }
}
