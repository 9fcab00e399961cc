use crate::report::domain::report_writer::{FrameReport, ReportWriter};
use crate::shared::region::Region;

/// Emits each frame's regions through the `log` facade.
///
/// Frames without motion are logged at debug level only.
#[derive(Default)]
pub struct LogReportWriter {
    frames_with_motion: usize,
}

impl LogReportWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

fn describe(regions: &[Region]) -> String {
    regions
        .iter()
        .map(|r| format!("[{},{} {}x{}]", r.x, r.y, r.width, r.height))
        .collect::<Vec<_>>()
        .join(" ")
}

impl ReportWriter for LogReportWriter {
    fn write(&mut self, report: &FrameReport) -> Result<(), Box<dyn std::error::Error>> {
        if report.regions.is_empty() {
            log::debug!("Frame {}: no motion", report.frame_index);
        } else {
            self.frames_with_motion += 1;
            log::info!(
                "Frame {}: {} region(s) {}",
                report.frame_index,
                report.regions.len(),
                describe(&report.regions)
            );
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("Motion seen in {} frame(s)", self.frames_with_motion);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_frames_with_motion() {
        let mut writer = LogReportWriter::new();
        writer
            .write(&FrameReport {
                frame_index: 0,
                regions: vec![],
            })
            .unwrap();
        writer
            .write(&FrameReport {
                frame_index: 1,
                regions: vec![Region::new(0, 0, 10, 10)],
            })
            .unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.frames_with_motion, 1);
    }

    #[test]
    fn test_describe_lists_regions() {
        let text = describe(&[Region::new(0, 0, 10, 10), Region::new(30, 20, 20, 10)]);
        assert_eq!(text, "[0,0 10x10] [30,20 20x10]");
    }
}
