use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;

/// Delivers frames one at a time, in capture order.
///
/// Implementations handle decoding and I/O; the motion core only ever sees
/// the resulting RGBA [`Frame`]s.
pub trait FrameSource: Send {
    /// Opens the source and returns what is known about the stream.
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in capture order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
