use std::rc::Weak;

use tracing::trace;

use crate::model::{Curve, CurveChange};
use crate::widget::ChartWidget;

use super::sync_core::{CoreRef, SyncCore, with_core};

/// Entry point of every per-curve listener registered by the synchronizer.
pub(super) fn dispatch_change<W: ChartWidget + 'static>(
    core: &CoreRef<W>,
    curve: &Weak<Curve>,
    change: CurveChange,
) {
    let Some(curve) = curve.upgrade() else {
        return;
    };
    with_core(core, |state| state.apply_change(&curve, change));
}

impl<W: ChartWidget + 'static> SyncCore<W> {
    /// Brings the entry of `curve` up to date with one change.
    ///
    /// Color and visibility are patched in place and keep the entry handle;
    /// everything structural rebuilds the entry. Passive fields leave the
    /// entry alone but still settle. A curve without an entry is recorded as
    /// a desync and the update is skipped.
    pub(super) fn apply_change(&mut self, curve: &Curve, change: CurveChange) {
        if let CurveChange::Passive(field) = change {
            trace!(tag = %curve.tag(), field = field.as_str(), "passive field, entry untouched");
            self.settle();
            return;
        }
        let Some(handle) = self.locate_or_record(curve, "update") else {
            return;
        };
        trace!(tag = %curve.tag(), %handle, ?change, "applying curve change");

        match change {
            CurveChange::ColorChanged => {
                let result = self.widget.set_stroke_color(handle, curve.color());
                self.report(result, curve.tag(), "stroke_color");
                self.stats.in_place_updates += 1;
            }
            CurveChange::VisibilityChanged => {
                let result = self.widget.set_visible(handle, curve.is_visible());
                self.report(result, curve.tag(), "visible");
                self.stats.in_place_updates += 1;
            }
            CurveChange::StructuralChanged(_)
            | CurveChange::PointsAppended { .. }
            | CurveChange::FullRefresh => {
                self.rebuild_entry(handle, curve);
            }
            CurveChange::Passive(_) => return,
        }

        self.settle();
    }
}
