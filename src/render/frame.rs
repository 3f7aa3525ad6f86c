use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{LegendLabel, MarkerPrimitive, SegmentPrimitive};

/// Backend-agnostic scene for one repaint of the curve list.
///
/// Curves are drawn in insertion order: their path segments, then their
/// markers. Legend labels are listed top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub segments: Vec<SegmentPrimitive>,
    pub markers: Vec<MarkerPrimitive>,
    pub legend: Vec<LegendLabel>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            segments: Vec::new(),
            markers: Vec::new(),
            legend: Vec::new(),
        }
    }

    pub fn push_segment(&mut self, segment: SegmentPrimitive) {
        self.segments.push(segment);
    }

    pub fn push_marker(&mut self, marker: MarkerPrimitive) {
        self.markers.push(marker);
    }

    pub fn push_legend_label(&mut self, label: LegendLabel) {
        self.legend.push(label);
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        self.segments.iter().try_for_each(|segment| segment.validate())?;
        self.markers.iter().try_for_each(|marker| marker.validate())?;
        self.legend.iter().try_for_each(LegendLabel::validate)
    }
}
