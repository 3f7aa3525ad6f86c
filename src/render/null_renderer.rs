use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates each frame so tests catch invalid geometry produced by
/// a repaint.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_segment_count: usize,
    pub last_marker_count: usize,
    pub last_legend_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_segment_count = frame.segments.len();
        self.last_marker_count = frame.markers.len();
        self.last_legend_count = frame.legend.len();
        Ok(())
    }
}
