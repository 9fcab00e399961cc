use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::report::domain::report_writer::{FrameReport, ReportWriter};

/// Writes each frame report as one JSON object per line.
pub struct JsonLinesReportWriter {
    out: BufWriter<Box<dyn Write + Send>>,
}

impl JsonLinesReportWriter {
    /// Creates (or truncates) the report file, creating parent directories.
    pub fn create(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .map_err(|e| format!("failed to create report {}: {e}", path.display()))?;
        Ok(Self::from_writer(Box::new(file)))
    }

    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            out: BufWriter::new(writer),
        }
    }
}

impl ReportWriter for JsonLinesReportWriter {
    fn write(&mut self, report: &FrameReport) -> Result<(), Box<dyn std::error::Error>> {
        serde_json::to_writer(&mut self.out, report)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.out.flush()?;
        Ok(())
    }
}
