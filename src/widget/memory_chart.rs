use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::{AxisRange, DataPoint, LinearScale, Viewport, fit_extents};
use crate::error::{ChartError, ChartResult};
use crate::model::{CurveTag, FillMode, GradientFill, MarkerType};
use crate::render::{Color, LegendLabel, MarkerPrimitive, RenderFrame, Renderer, SegmentPrimitive};

use super::{ChartWidget, EntryHandle};

/// Setup of the headless chart.
///
/// Serializable so host applications can persist/load it next to their own
/// settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryChartConfig {
    pub viewport: Viewport,
    #[serde(default = "default_axis_margin_ratio")]
    pub axis_margin_ratio: f64,
    #[serde(default = "default_legend_font_size_px")]
    pub legend_font_size_px: f64,
}

fn default_axis_margin_ratio() -> f64 {
    0.05
}

fn default_legend_font_size_px() -> f64 {
    12.0
}

impl Default for MemoryChartConfig {
    fn default() -> Self {
        Self::new(Viewport::new(800, 600))
    }
}

impl MemoryChartConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            axis_margin_ratio: default_axis_margin_ratio(),
            legend_font_size_px: default_legend_font_size_px(),
        }
    }

    #[must_use]
    pub fn with_axis_margin_ratio(mut self, ratio: f64) -> Self {
        self.axis_margin_ratio = ratio;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.axis_margin_ratio.is_finite() || !(0.0..0.5).contains(&self.axis_margin_ratio) {
            return Err(ChartError::InvalidData(
                "axis margin ratio must be finite and in [0, 0.5)".to_owned(),
            ));
        }
        if !self.legend_font_size_px.is_finite() || self.legend_font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "legend font size must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self =
            serde_json::from_str(input).map_err(|err| ChartError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self).map_err(|err| ChartError::InvalidConfig(err.to_string()))
    }
}

/// One rendered curve as the headless chart stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveEntry {
    pub handle: EntryHandle,
    pub tag: Option<CurveTag>,
    pub name: String,
    pub points: Vec<DataPoint>,
    pub color: Color,
    pub marker: MarkerType,
    pub visible: bool,
    pub line_width: f64,
    pub line_visible: bool,
    pub line_fill: Option<GradientFill>,
    pub symbol_size: f64,
    pub symbol_fill_color: Color,
    pub symbol_fill_mode: FillMode,
}

/// In-memory [`ChartWidget`] that draws into a [`Renderer`].
///
/// Entries keep insertion order, which is also draw order. Handles come from
/// a monotonically increasing counter and are never reused.
#[derive(Debug)]
pub struct MemoryChart<R: Renderer> {
    renderer: R,
    config: MemoryChartConfig,
    entries: IndexMap<EntryHandle, CurveEntry>,
    next_handle: u64,
    x_range: AxisRange,
    y_range: AxisRange,
    rescale_count: usize,
    repaint_count: usize,
    last_frame: Option<RenderFrame>,
}

impl<R: Renderer> MemoryChart<R> {
    pub fn new(renderer: R, config: MemoryChartConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer,
            config,
            entries: IndexMap::new(),
            next_handle: 1,
            x_range: AxisRange::UNIT,
            y_range: AxisRange::UNIT,
            rescale_count: 0,
            repaint_count: 0,
            last_frame: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> MemoryChartConfig {
        self.config
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn entries(&self) -> impl Iterator<Item = &CurveEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn entry(&self, handle: EntryHandle) -> Option<&CurveEntry> {
        self.entries.get(&handle)
    }

    #[must_use]
    pub fn entry_by_tag(&self, tag: &CurveTag) -> Option<&CurveEntry> {
        self.entries
            .values()
            .find(|entry| entry.tag.as_ref() == Some(tag))
    }

    /// Tags of all entries in draw order; untagged entries are skipped.
    #[must_use]
    pub fn tags(&self) -> Vec<CurveTag> {
        self.entries
            .values()
            .filter_map(|entry| entry.tag.clone())
            .collect()
    }

    #[must_use]
    pub fn x_range(&self) -> AxisRange {
        self.x_range
    }

    #[must_use]
    pub fn y_range(&self) -> AxisRange {
        self.y_range
    }

    #[must_use]
    pub fn rescale_count(&self) -> usize {
        self.rescale_count
    }

    #[must_use]
    pub fn repaint_count(&self) -> usize {
        self.repaint_count
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    fn entry_mut(&mut self, handle: EntryHandle) -> ChartResult<&mut CurveEntry> {
        self.entries
            .get_mut(&handle)
            .ok_or(ChartError::UnknownEntry {
                handle: handle.raw(),
            })
    }

    fn build_frame(&self) -> ChartResult<RenderFrame> {
        let viewport = self.config.viewport;
        let x_scale = LinearScale::from_range(self.x_range)?;
        let y_scale = LinearScale::from_range(self.y_range)?;
        let project = |point: DataPoint| -> ChartResult<(f64, f64)> {
            let x = x_scale.domain_to_pixel(point.x, viewport.width)?;
            let y = y_scale.domain_to_pixel(point.y, viewport.height)?;
            Ok((x, f64::from(viewport.height) - y))
        };

        let mut frame = RenderFrame::new(viewport);
        let font_size = self.config.legend_font_size_px;
        for (row, entry) in self.entries.values().filter(|entry| entry.visible).enumerate() {
            let mapped = entry
                .points
                .iter()
                .map(|point| project(*point))
                .collect::<ChartResult<Vec<_>>>()?;

            if entry.line_visible {
                for pair in mapped.windows(2) {
                    frame.push_segment(SegmentPrimitive::new(
                        pair[0],
                        pair[1],
                        entry.line_width,
                        entry.color,
                    ));
                }
            }

            if entry.marker.is_visible() {
                let fill = match entry.symbol_fill_mode {
                    FillMode::Solid => entry.symbol_fill_color,
                    FillMode::None => entry.color,
                };
                for (x, y) in &mapped {
                    frame.push_marker(MarkerPrimitive::centered(*x, *y, entry.symbol_size, fill));
                }
            }

            if !entry.name.is_empty() {
                frame.push_legend_label(LegendLabel {
                    text: entry.name.clone(),
                    x: 8.0,
                    baseline_y: font_size * 1.5 * (row as f64 + 1.0),
                    font_size_px: font_size,
                    color: entry.color,
                });
            }
        }
        Ok(frame)
    }
}

impl<R: Renderer> ChartWidget for MemoryChart<R> {
    fn add_curve(
        &mut self,
        name: &str,
        xs: &[f64],
        ys: &[f64],
        color: Color,
        marker: MarkerType,
    ) -> ChartResult<EntryHandle> {
        if xs.len() != ys.len() {
            return Err(ChartError::InvalidData(format!(
                "x and y lengths differ: {} != {}",
                xs.len(),
                ys.len()
            )));
        }
        let points = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| DataPoint::new(x, y))
            .collect::<Vec<_>>();
        if !points.iter().all(|point| point.is_finite()) {
            return Err(ChartError::InvalidData(
                "curve coordinates must be finite".to_owned(),
            ));
        }
        color.validate()?;

        let handle = EntryHandle::new(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        self.entries.insert(
            handle,
            CurveEntry {
                handle,
                tag: None,
                name: name.to_owned(),
                points,
                color,
                marker,
                visible: true,
                line_width: 1.0,
                line_visible: true,
                line_fill: None,
                symbol_size: 7.0,
                symbol_fill_color: Color::WHITE,
                symbol_fill_mode: FillMode::None,
            },
        );
        trace!(%handle, name, "chart entry added");
        Ok(handle)
    }

    fn remove_curve(&mut self, handle: EntryHandle) -> bool {
        self.entries.shift_remove(&handle).is_some()
    }

    fn clear_curves(&mut self) {
        self.entries.clear();
    }

    fn curve_count(&self) -> usize {
        self.entries.len()
    }

    fn set_tag(&mut self, handle: EntryHandle, tag: &CurveTag) -> ChartResult<()> {
        self.entry_mut(handle)?.tag = Some(tag.clone());
        Ok(())
    }

    fn find_curve_by_tag(&self, tag: &CurveTag) -> Option<EntryHandle> {
        self.entry_by_tag(tag).map(|entry| entry.handle)
    }

    fn set_stroke_color(&mut self, handle: EntryHandle, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.entry_mut(handle)?.color = color;
        Ok(())
    }

    fn set_visible(&mut self, handle: EntryHandle, visible: bool) -> ChartResult<()> {
        self.entry_mut(handle)?.visible = visible;
        Ok(())
    }

    fn set_line_width(&mut self, handle: EntryHandle, width: f64) -> ChartResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line width must be finite and > 0".to_owned(),
            ));
        }
        self.entry_mut(handle)?.line_width = width;
        Ok(())
    }

    fn set_line_visible(&mut self, handle: EntryHandle, visible: bool) -> ChartResult<()> {
        self.entry_mut(handle)?.line_visible = visible;
        Ok(())
    }

    fn set_line_fill(&mut self, handle: EntryHandle, fill: Option<GradientFill>) -> ChartResult<()> {
        if let Some(fill) = &fill {
            fill.validate()?;
        }
        self.entry_mut(handle)?.line_fill = fill;
        Ok(())
    }

    fn set_symbol_size(&mut self, handle: EntryHandle, size: f64) -> ChartResult<()> {
        if !size.is_finite() || size <= 0.0 {
            return Err(ChartError::InvalidData(
                "symbol size must be finite and > 0".to_owned(),
            ));
        }
        self.entry_mut(handle)?.symbol_size = size;
        Ok(())
    }

    fn set_symbol_fill(
        &mut self,
        handle: EntryHandle,
        color: Color,
        mode: FillMode,
    ) -> ChartResult<()> {
        color.validate()?;
        let entry = self.entry_mut(handle)?;
        entry.symbol_fill_color = color;
        entry.symbol_fill_mode = mode;
        Ok(())
    }

    fn rescale_axes(&mut self) {
        self.rescale_count += 1;
        let visible_points = self
            .entries
            .values()
            .filter(|entry| entry.visible)
            .flat_map(|entry| entry.points.iter());
        let (x_range, y_range) =
            fit_extents(visible_points).unwrap_or((AxisRange::UNIT, AxisRange::UNIT));
        self.x_range = x_range.padded(self.config.axis_margin_ratio);
        self.y_range = y_range.padded(self.config.axis_margin_ratio);
    }

    fn repaint(&mut self) {
        self.repaint_count += 1;
        let result = self
            .build_frame()
            .and_then(|frame| self.renderer.render(&frame).map(|()| frame));
        match result {
            Ok(frame) => self.last_frame = Some(frame),
            Err(err) => warn!(error = %err, "chart repaint failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryChart, MemoryChartConfig};
    use crate::core::Viewport;
    use crate::model::{CurveTag, MarkerType};
    use crate::render::{Color, NullRenderer};
    use crate::widget::ChartWidget;

    fn chart() -> MemoryChart<NullRenderer> {
        MemoryChart::new(NullRenderer::default(), MemoryChartConfig::default()).expect("chart")
    }

    #[test]
    fn invalid_viewport_is_rejected() {
        let config = MemoryChartConfig::new(Viewport::new(0, 10));
        assert!(MemoryChart::new(NullRenderer::default(), config).is_err());
    }

    #[test]
    fn handles_are_never_reused() {
        let mut chart = chart();
        let first = chart
            .add_curve("a", &[0.0], &[0.0], Color::BLACK, MarkerType::None)
            .expect("add");
        assert!(chart.remove_curve(first));
        let second = chart
            .add_curve("a", &[0.0], &[0.0], Color::BLACK, MarkerType::None)
            .expect("add");
        assert_ne!(first, second);
        assert!(!chart.remove_curve(first));
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let mut chart = chart();
        let result = chart.add_curve("a", &[0.0, 1.0], &[0.0, f64::NAN], Color::BLACK, MarkerType::None);
        assert!(result.is_err());
        assert_eq!(chart.curve_count(), 0);
    }

    #[test]
    fn tag_lookup_resolves_entry() {
        let mut chart = chart();
        let tag = CurveTag::generate();
        let handle = chart
            .add_curve("a", &[0.0], &[1.0], Color::BLACK, MarkerType::None)
            .expect("add");
        chart.set_tag(handle, &tag).expect("tag");
        assert_eq!(chart.find_curve_by_tag(&tag), Some(handle));
        assert_eq!(chart.find_curve_by_tag(&CurveTag::generate()), None);
    }

    #[test]
    fn setters_on_removed_entry_fail() {
        let mut chart = chart();
        let handle = chart
            .add_curve("a", &[0.0], &[1.0], Color::BLACK, MarkerType::None)
            .expect("add");
        chart.remove_curve(handle);
        assert!(chart.set_visible(handle, false).is_err());
        assert!(chart.set_line_width(handle, 2.0).is_err());
    }

    #[test]
    fn rescale_fits_visible_entries_only() {
        let mut chart = MemoryChart::new(
            NullRenderer::default(),
            MemoryChartConfig::default().with_axis_margin_ratio(0.0),
        )
        .expect("chart");
        chart
            .add_curve("a", &[0.0, 10.0], &[0.0, 5.0], Color::BLACK, MarkerType::None)
            .expect("add");
        let hidden = chart
            .add_curve("b", &[100.0], &[100.0], Color::BLACK, MarkerType::None)
            .expect("add");
        chart.set_visible(hidden, false).expect("hide");

        chart.rescale_axes();

        assert_eq!(chart.x_range().max, 10.0);
        assert_eq!(chart.y_range().max, 5.0);
    }

    #[test]
    fn repaint_draws_lines_markers_and_legend() {
        let mut chart = chart();
        chart
            .add_curve("a", &[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], Color::RED, MarkerType::Circle)
            .expect("add");

        chart.rescale_axes();
        chart.repaint();

        let frame = chart.last_frame().expect("frame");
        assert_eq!(frame.segments.len(), 2);
        assert_eq!(frame.markers.len(), 3);
        assert_eq!(frame.legend.len(), 1);
        assert_eq!(chart.renderer().frames_rendered, 1);
    }

    #[test]
    fn config_json_is_validated() {
        let config = MemoryChartConfig::from_json_str(r#"{ "viewport": { "width": 640, "height": 480 } }"#)
            .expect("parse config");
        assert_eq!(config.viewport, Viewport::new(640, 480));
        assert_eq!(config.axis_margin_ratio, 0.05);

        let err = MemoryChartConfig::from_json_str(r#"{ "viewport": { "width": 0, "height": 480 } }"#)
            .expect_err("zero width");
        assert!(matches!(err, crate::error::ChartError::InvalidViewport { .. }));
    }
}
