//! Boundary with the host chart widget.
//!
//! The synchronizer only talks to a chart through [`ChartWidget`]. Pane
//! layout, axis math and drawing stay behind this trait.

mod memory_chart;

pub use memory_chart::{CurveEntry, MemoryChart, MemoryChartConfig};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChartResult;
use crate::model::{CurveTag, FillMode, GradientFill, MarkerType};
use crate::render::Color;

/// Opaque handle to one rendered curve entry.
///
/// Handles are never reused by a widget, so a rebuilt entry always gets a
/// different handle than the one it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryHandle(u64);

impl EntryHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Curve-list container exposed by a chart widget.
///
/// Entry setters fail with `ChartError::UnknownEntry` for handles that no
/// longer resolve, and with `ChartError::InvalidData` for values the widget
/// cannot draw.
pub trait ChartWidget {
    /// Creates and renders a new curve entry.
    fn add_curve(
        &mut self,
        name: &str,
        xs: &[f64],
        ys: &[f64],
        color: Color,
        marker: MarkerType,
    ) -> ChartResult<EntryHandle>;

    /// Removes one entry. Returns `false` when the handle did not resolve.
    fn remove_curve(&mut self, handle: EntryHandle) -> bool;

    fn clear_curves(&mut self);

    fn curve_count(&self) -> usize;

    fn set_tag(&mut self, handle: EntryHandle, tag: &CurveTag) -> ChartResult<()>;

    fn find_curve_by_tag(&self, tag: &CurveTag) -> Option<EntryHandle>;

    fn set_stroke_color(&mut self, handle: EntryHandle, color: Color) -> ChartResult<()>;

    fn set_visible(&mut self, handle: EntryHandle, visible: bool) -> ChartResult<()>;

    fn set_line_width(&mut self, handle: EntryHandle, width: f64) -> ChartResult<()>;

    fn set_line_visible(&mut self, handle: EntryHandle, visible: bool) -> ChartResult<()>;

    /// Sets or clears the multi-stop fill along the line.
    fn set_line_fill(&mut self, handle: EntryHandle, fill: Option<GradientFill>) -> ChartResult<()>;

    fn set_symbol_size(&mut self, handle: EntryHandle, size: f64) -> ChartResult<()>;

    fn set_symbol_fill(
        &mut self,
        handle: EntryHandle,
        color: Color,
        mode: FillMode,
    ) -> ChartResult<()>;

    /// Recomputes axis ranges from the current entries.
    fn rescale_axes(&mut self);

    fn repaint(&mut self);
}
