//! Binding between an observable curve collection and a chart widget.

mod collection_sync;
mod curve_change_sync;
mod entry_builder;
mod sync_config;
mod sync_core;
mod sync_stats;

pub use sync_config::{InsertSeeding, SynchronizerConfig};
pub use sync_stats::SyncStats;

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::SharedCollection;
use crate::widget::ChartWidget;

use sync_core::SyncCore;

/// Keeps a chart widget's curve list in step with a bound [`CurveCollection`].
///
/// Every collection insert/remove/reset and every change on a bound curve is
/// applied to the widget synchronously, before the mutating call returns.
/// Each rendered entry carries its curve's [`CurveTag`], and after every
/// settled change the set of entry tags equals the set of curve tags in the
/// collection.
///
/// Notification handlers never propagate errors to the emitter: desyncs and
/// widget rejections are logged through `tracing` and counted in
/// [`SyncStats`].
///
/// Dropping the synchronizer releases every listener it registered.
///
/// [`CurveCollection`]: crate::model::CurveCollection
/// [`CurveTag`]: crate::model::CurveTag
pub struct CurveListSynchronizer<W: ChartWidget + 'static> {
    core: Rc<RefCell<SyncCore<W>>>,
}

impl<W: ChartWidget + 'static> CurveListSynchronizer<W> {
    #[must_use]
    pub fn new(widget: W) -> Self {
        Self::with_config(widget, SynchronizerConfig::default())
    }

    #[must_use]
    pub fn with_config(widget: W, config: SynchronizerConfig) -> Self {
        Self {
            core: SyncCore::new_shared(widget, config),
        }
    }

    /// Binds `collection`, replacing any previous binding.
    ///
    /// All listeners on the previous collection and its members are released
    /// and the widget is cleared before the new members are attached.
    pub fn bind(&self, collection: &SharedCollection) {
        self.core.borrow_mut().bind_collection(collection);
    }

    /// Releases the current binding and clears the widget.
    pub fn unbind(&self) {
        let mut core = self.core.borrow_mut();
        core.release_binding();
        core.settle();
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.core.borrow().bound.is_some()
    }

    #[must_use]
    pub fn bound_collection(&self) -> Option<SharedCollection> {
        self.core
            .borrow()
            .bound
            .as_ref()
            .map(|bound| Rc::clone(&bound.collection))
    }

    /// Number of curves in the bound collection, zero when unbound.
    #[must_use]
    pub fn curves_count(&self) -> usize {
        self.core
            .borrow()
            .bound
            .as_ref()
            .map_or(0, |bound| bound.collection.len())
    }

    /// Number of curves that currently have listeners attached.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.core.borrow().bindings.len()
    }

    #[must_use]
    pub fn config(&self) -> SynchronizerConfig {
        self.core.borrow().config
    }

    #[must_use]
    pub fn stats(&self) -> SyncStats {
        self.core.borrow().stats
    }

    /// Reads the widget.
    pub fn with_widget<T>(&self, read: impl FnOnce(&W) -> T) -> T {
        read(&self.core.borrow().widget)
    }

    /// Mutates the widget directly.
    ///
    /// Bypasses synchronization: entries removed here surface later as
    /// desyncs. Curve notifications raised from inside `mutate` are dropped.
    pub fn with_widget_mut<T>(&self, mutate: impl FnOnce(&mut W) -> T) -> T {
        mutate(&mut self.core.borrow_mut().widget)
    }
}
