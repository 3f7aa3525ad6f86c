use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::warn;

use crate::error::{ChartError, ChartResult};
use crate::model::{Curve, CurveTag, SharedCollection};
use crate::observe::Subscription;
use crate::widget::{ChartWidget, EntryHandle};

use super::{SyncStats, SynchronizerConfig};

/// Weak back-reference handed to notification closures.
pub(super) type CoreRef<W> = Weak<RefCell<SyncCore<W>>>;

/// Collection currently observed, with its collection-level listener.
pub(super) struct BoundCollection {
    pub(super) collection: SharedCollection,
    pub(super) _subscription: Subscription,
}

/// Listeners registered on one bound curve. Dropping it releases all three.
pub(super) struct CurveBinding {
    pub(super) _field_changed: Subscription,
    pub(super) _points_appended: Subscription,
    pub(super) _refresh_requested: Subscription,
}

/// Mutable synchronizer state shared between the public facade and the
/// notification closures.
pub(super) struct SyncCore<W: ChartWidget> {
    pub(super) self_ref: CoreRef<W>,
    pub(super) widget: W,
    pub(super) config: SynchronizerConfig,
    pub(super) bound: Option<BoundCollection>,
    pub(super) bindings: IndexMap<CurveTag, CurveBinding>,
    pub(super) stats: SyncStats,
}

impl<W: ChartWidget + 'static> SyncCore<W> {
    pub(super) fn new_shared(widget: W, config: SynchronizerConfig) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|self_ref| {
            RefCell::new(Self {
                self_ref: self_ref.clone(),
                widget,
                config,
                bound: None,
                bindings: IndexMap::new(),
                stats: SyncStats::default(),
            })
        })
    }

    /// Resolves the chart entry tagged with `tag`.
    pub(super) fn locate(&self, tag: &CurveTag) -> ChartResult<EntryHandle> {
        self.widget
            .find_curve_by_tag(tag)
            .ok_or_else(|| ChartError::NotFound {
                tag: tag.to_string(),
            })
    }

    /// Like [`Self::locate`], but records a miss as a desync.
    pub(super) fn locate_or_record(&mut self, curve: &Curve, operation: &str) -> Option<EntryHandle> {
        match self.locate(curve.tag()) {
            Ok(handle) => Some(handle),
            Err(err) => {
                self.stats.desyncs += 1;
                warn!(tag = %curve.tag(), operation, error = %err, "chart entry missing for bound curve");
                None
            }
        }
    }

    pub(super) fn report(&mut self, result: ChartResult<()>, tag: &CurveTag, setter: &str) {
        if let Err(err) = result {
            self.stats.widget_errors += 1;
            warn!(tag = %tag, setter, error = %err, "chart entry update rejected");
        }
    }

    /// Ends every mutation path: axes are refit and the chart repainted.
    pub(super) fn settle(&mut self) {
        self.widget.rescale_axes();
        self.widget.repaint();
        self.stats.settles += 1;
    }
}

/// Runs `apply` against the core behind `core`, if it is still alive.
///
/// A core that is already borrowed means the notification was raised from
/// inside another synchronizer call. It is dropped with a warning instead of
/// panicking inside the emitter.
pub(super) fn with_core<W, F>(core: &CoreRef<W>, apply: F)
where
    W: ChartWidget + 'static,
    F: FnOnce(&mut SyncCore<W>),
{
    let Some(shared) = core.upgrade() else {
        return;
    };
    match shared.try_borrow_mut() {
        Ok(mut guard) => apply(&mut *guard),
        Err(_) => warn!("re-entrant curve notification dropped"),
    };
}
