use tracing::{trace, warn};

use crate::model::{Curve, CurveState, CurveTag, FillMode, GradientFill, MarkerType};
use crate::render::Color;
use crate::widget::{ChartWidget, EntryHandle};

use super::InsertSeeding;
use super::sync_core::SyncCore;

impl<W: ChartWidget + 'static> SyncCore<W> {
    /// Creates the chart entry for a curve that just joined the collection.
    pub(super) fn seed_entry(&mut self, curve: &Curve) -> Option<EntryHandle> {
        match self.config.insert_seeding {
            InsertSeeding::Minimal => {
                let state = curve.snapshot();
                self.add_tagged_entry(curve.tag(), &state, MarkerType::None)
            }
            InsertSeeding::FullStyle => self.build_styled_entry(curve),
        }
    }

    /// Deletes the entry behind `handle` and recreates it from the curve's
    /// current state under the same tag.
    ///
    /// Runs to completion before returning, so no other notification can
    /// observe the curve without an entry.
    pub(super) fn rebuild_entry(&mut self, handle: EntryHandle, curve: &Curve) -> Option<EntryHandle> {
        self.widget.remove_curve(handle);
        let rebuilt = self.build_styled_entry(curve);
        self.stats.rebuilds += 1;
        trace!(tag = %curve.tag(), old = %handle, new = ?rebuilt, "chart entry rebuilt");
        rebuilt
    }

    fn build_styled_entry(&mut self, curve: &Curve) -> Option<EntryHandle> {
        let state = curve.snapshot();
        let tag = curve.tag();
        let handle = self.add_tagged_entry(tag, &state, state.marker_type)?;

        let result = self.widget.set_visible(handle, state.visible);
        self.report(result, tag, "visible");
        let result = self.widget.set_line_width(handle, state.line_width);
        self.report(result, tag, "line_width");
        let result = self.widget.set_line_visible(handle, state.line_visible);
        self.report(result, tag, "line_visible");
        let fill = GradientFill::from_stops(&state.gradient_stops);
        let result = self.widget.set_line_fill(handle, fill);
        self.report(result, tag, "line_fill");
        let result = self.widget.set_symbol_size(handle, state.symbol_size);
        self.report(result, tag, "symbol_size");
        let result = self
            .widget
            .set_symbol_fill(handle, state.symbol_color, FillMode::Solid);
        self.report(result, tag, "symbol_fill");

        Some(handle)
    }

    fn add_tagged_entry(
        &mut self,
        tag: &CurveTag,
        state: &CurveState,
        marker: MarkerType,
    ) -> Option<EntryHandle> {
        let xs = state.xs();
        let ys = state.ys();
        let handle = match self
            .widget
            .add_curve(&state.name, &xs, &ys, state.color, marker)
        {
            Ok(handle) => handle,
            Err(err) => {
                self.stats.degraded_entries += 1;
                warn!(tag = %tag, error = %err, "curve rejected by chart, rendering it empty");
                self.add_empty_entry(tag, state, marker)?
            }
        };

        if let Err(err) = self.widget.set_tag(handle, tag) {
            self.stats.widget_errors += 1;
            warn!(tag = %tag, error = %err, "chart refused entry tag");
            self.widget.remove_curve(handle);
            return None;
        }
        Some(handle)
    }

    fn add_empty_entry(
        &mut self,
        tag: &CurveTag,
        state: &CurveState,
        marker: MarkerType,
    ) -> Option<EntryHandle> {
        for color in [state.color, Color::BLACK] {
            match self.widget.add_curve(&state.name, &[], &[], color, marker) {
                Ok(handle) => return Some(handle),
                Err(err) => warn!(tag = %tag, error = %err, "empty fallback entry rejected"),
            }
        }
        self.stats.widget_errors += 1;
        None
    }
}
