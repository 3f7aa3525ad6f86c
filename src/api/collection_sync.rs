use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::model::{CollectionChange, CurveChange, SharedCollection, SharedCurve};
use crate::widget::ChartWidget;

use super::curve_change_sync::dispatch_change;
use super::sync_core::{BoundCollection, CurveBinding, SyncCore, with_core};

impl<W: ChartWidget + 'static> SyncCore<W> {
    /// Drops every listener of the current binding and empties the chart.
    pub(super) fn release_binding(&mut self) {
        if self.bound.take().is_some() {
            debug!(curves = self.bindings.len(), "releasing bound collection");
        }
        self.bindings.clear();
        self.widget.clear_curves();
    }

    pub(super) fn bind_collection(&mut self, collection: &SharedCollection) {
        self.release_binding();

        let core = self.self_ref.clone();
        let subscription = collection.on_changed(move |change| {
            with_core(&core, |state| state.on_collection_changed(change));
        });
        self.bound = Some(BoundCollection {
            collection: Rc::clone(collection),
            _subscription: subscription,
        });

        let members = collection.snapshot();
        debug!(curves = members.len(), "binding collection");
        for curve in &members {
            self.attach_curve(curve);
        }
        self.settle();
    }

    pub(super) fn on_collection_changed(&mut self, change: &CollectionChange) {
        if let CollectionChange::Reset = change {
            self.reset_entries();
        }
        // Replacements release the outgoing curve before the incoming one
        // takes a tag.
        for curve in change.old_items() {
            self.detach_curve(curve);
        }
        for curve in change.new_items() {
            self.attach_curve(curve);
        }
        self.settle();
    }

    /// Clears the chart and every per-curve listener, then re-attaches any
    /// members the collection still holds.
    fn reset_entries(&mut self) {
        self.stats.resets += 1;
        debug!(entries = self.widget.curve_count(), "collection reset");
        self.bindings.clear();
        self.widget.clear_curves();

        let remaining = self
            .bound
            .as_ref()
            .map(|bound| bound.collection.snapshot())
            .unwrap_or_default();
        for curve in &remaining {
            self.attach_curve(curve);
        }
    }

    fn attach_curve(&mut self, curve: &SharedCurve) {
        let tag = curve.tag().clone();
        if self.bindings.contains_key(&tag) {
            warn!(tag = %tag, "curve already attached, skipping");
            return;
        }

        let binding = CurveBinding {
            _field_changed: {
                let core = self.self_ref.clone();
                let weak = Rc::downgrade(curve);
                curve.on_field_changed(move |field| {
                    dispatch_change(&core, &weak, CurveChange::from(*field));
                })
            },
            _points_appended: {
                let core = self.self_ref.clone();
                let weak = Rc::downgrade(curve);
                curve.on_points_appended(move |event| {
                    dispatch_change(&core, &weak, CurveChange::from(*event));
                })
            },
            _refresh_requested: {
                let core = self.self_ref.clone();
                let weak = Rc::downgrade(curve);
                curve.on_refresh_requested(move |event| {
                    dispatch_change(&core, &weak, CurveChange::from(*event));
                })
            },
        };
        self.bindings.insert(tag.clone(), binding);

        let handle = self.seed_entry(curve);
        self.stats.inserted += 1;
        trace!(tag = %tag, handle = ?handle, "curve attached");
    }

    fn detach_curve(&mut self, curve: &SharedCurve) {
        if self.bindings.shift_remove(curve.tag()).is_none() {
            warn!(tag = %curve.tag(), "removed curve had no listeners attached");
        }
        let Some(handle) = self.locate_or_record(curve, "remove") else {
            return;
        };
        self.widget.remove_curve(handle);
        self.stats.removed += 1;
        trace!(tag = %curve.tag(), %handle, "curve detached");
    }
}
