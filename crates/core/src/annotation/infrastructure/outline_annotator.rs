use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::constants::{DEFAULT_OUTLINE_COLOR, DEFAULT_OUTLINE_WIDTH};
use crate::shared::frame::{Frame, CHANNELS};
use crate::shared::region::Region;

/// Strokes the border of each region with a solid colour.
///
/// The stroke is drawn inside the rectangle and clipped to the frame, so
/// regions touching the frame edge stay fully visible.
pub struct OutlineAnnotator {
    color: [u8; 4],
    line_width: u32,
}

impl OutlineAnnotator {
    pub fn new(color: [u8; 4], line_width: u32) -> Result<Self, &'static str> {
        if line_width < 1 {
            return Err("line_width must be >= 1");
        }
        Ok(Self { color, line_width })
    }
}

impl Default for OutlineAnnotator {
    fn default() -> Self {
        Self {
            color: DEFAULT_OUTLINE_COLOR,
            line_width: DEFAULT_OUTLINE_WIDTH,
        }
    }
}

impl FrameAnnotator for OutlineAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        regions: &[Region],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !frame.has_valid_len() {
            return Err(format!(
                "cannot annotate frame {}: expected {}, got {}",
                frame.index(),
                frame.declared_geometry(),
                frame.geometry()
            )
            .into());
        }

        let fw = frame.width();
        let fh = frame.height();
        for r in regions {
            let x0 = r.x.min(fw);
            let y0 = r.y.min(fh);
            let x1 = r.right().min(fw);
            let y1 = r.bottom().min(fh);
            if x0 >= x1 || y0 >= y1 {
                continue;
            }
            let lw = self.line_width;

            // top, bottom, left, right bands
            self.fill(frame, x0, y0, x1, (y0 + lw).min(y1));
            self.fill(frame, x0, y1.saturating_sub(lw).max(y0), x1, y1);
            self.fill(frame, x0, y0, (x0 + lw).min(x1), y1);
            self.fill(frame, x1.saturating_sub(lw).max(x0), y0, x1, y1);
        }
        Ok(())
    }
}

impl OutlineAnnotator {
    /// Paints the half-open pixel rectangle `[x0, x1) x [y0, y1)`.
    fn fill(&self, frame: &mut Frame, x0: u32, y0: u32, x1: u32, y1: u32) {
        let stride = frame.width() as usize * CHANNELS;
        let data = frame.data_mut();
        for y in y0 as usize..y1 as usize {
            let row = &mut data[y * stride..(y + 1) * stride];
            for px in row[x0 as usize * CHANNELS..x1 as usize * CHANNELS].chunks_exact_mut(CHANNELS)
            {
                px.copy_from_slice(&self.color);
            }
        }
    }
}
