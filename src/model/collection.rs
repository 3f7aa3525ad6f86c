use std::cell::RefCell;
use std::rc::Rc;

use smallvec::{SmallVec, smallvec};
use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::model::{CurveTag, SharedCurve};
use crate::observe::{EventHub, Subscription};

/// Curves carried by one collection notification, in collection order.
pub type CurveBatch = SmallVec<[SharedCurve; 1]>;

/// Shared handle to a collection; the application mutates it, a
/// synchronizer observes it.
pub type SharedCollection = Rc<CurveCollection>;

/// Structural change of a [`CurveCollection`], delivered after the change is
/// applied.
#[derive(Debug, Clone)]
pub enum CollectionChange {
    Added {
        index: usize,
        items: CurveBatch,
    },
    Removed {
        index: usize,
        items: CurveBatch,
    },
    Replaced {
        index: usize,
        old_items: CurveBatch,
        new_items: CurveBatch,
    },
    Moved {
        from: usize,
        to: usize,
        item: SharedCurve,
    },
    /// The collection content changed wholesale; observers must resync.
    Reset,
}

impl CollectionChange {
    /// Curves that entered the collection with this change.
    #[must_use]
    pub fn new_items(&self) -> &[SharedCurve] {
        match self {
            Self::Added { items, .. } => items.as_slice(),
            Self::Replaced { new_items, .. } => new_items.as_slice(),
            Self::Removed { .. } | Self::Moved { .. } | Self::Reset => &[],
        }
    }

    /// Curves that left the collection with this change.
    #[must_use]
    pub fn old_items(&self) -> &[SharedCurve] {
        match self {
            Self::Removed { items, .. } => items.as_slice(),
            Self::Replaced { old_items, .. } => old_items.as_slice(),
            Self::Added { .. } | Self::Moved { .. } | Self::Reset => &[],
        }
    }
}

/// Observable ordered collection of curves.
///
/// A curve tag appears at most once, so every member maps to exactly one
/// rendered entry.
#[derive(Debug, Default)]
pub struct CurveCollection {
    items: RefCell<Vec<SharedCurve>>,
    changed: EventHub<CollectionChange>,
}

impl CurveCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> SharedCollection {
        Rc::new(Self::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<SharedCurve> {
        self.items.borrow().get(index).cloned()
    }

    #[must_use]
    pub fn find_by_tag(&self, tag: &CurveTag) -> Option<SharedCurve> {
        self.items
            .borrow()
            .iter()
            .find(|curve| curve.tag() == tag)
            .cloned()
    }

    #[must_use]
    pub fn contains_tag(&self, tag: &CurveTag) -> bool {
        self.items.borrow().iter().any(|curve| curve.tag() == tag)
    }

    /// Copies the current member list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SharedCurve> {
        self.items.borrow().clone()
    }

    #[must_use]
    pub fn tags(&self) -> Vec<CurveTag> {
        self.items
            .borrow()
            .iter()
            .map(|curve| curve.tag().clone())
            .collect()
    }

    pub fn push(&self, curve: impl Into<SharedCurve>) -> ChartResult<SharedCurve> {
        let index = self.len();
        self.insert(index, curve)
    }

    pub fn insert(&self, index: usize, curve: impl Into<SharedCurve>) -> ChartResult<SharedCurve> {
        let curve = curve.into();
        {
            let mut items = self.items.borrow_mut();
            if index > items.len() {
                return Err(index_out_of_range(index, items.len()));
            }
            ensure_unique_tag(&items, &curve)?;
            items.insert(index, Rc::clone(&curve));
        }
        trace!(tag = %curve.tag(), index, "curve inserted into collection");
        self.changed.emit(&CollectionChange::Added {
            index,
            items: smallvec![Rc::clone(&curve)],
        });
        Ok(curve)
    }

    /// Appends every curve and reports them in one insert notification.
    ///
    /// Nothing is inserted when any curve's tag is already present.
    pub fn extend<I, C>(&self, curves: I) -> ChartResult<()>
    where
        I: IntoIterator<Item = C>,
        C: Into<SharedCurve>,
    {
        let batch: CurveBatch = curves.into_iter().map(Into::into).collect();
        if batch.is_empty() {
            return Ok(());
        }
        let index = {
            let mut items = self.items.borrow_mut();
            for (position, curve) in batch.iter().enumerate() {
                ensure_unique_tag(&items, curve)?;
                if batch[..position]
                    .iter()
                    .any(|earlier| earlier.tag() == curve.tag())
                {
                    return Err(duplicate_tag(curve.tag()));
                }
            }
            let index = items.len();
            items.extend(batch.iter().cloned());
            index
        };
        trace!(count = batch.len(), index, "curves appended to collection");
        self.changed.emit(&CollectionChange::Added {
            index,
            items: batch,
        });
        Ok(())
    }

    pub fn remove(&self, index: usize) -> Option<SharedCurve> {
        let removed = {
            let mut items = self.items.borrow_mut();
            (index < items.len()).then(|| items.remove(index))
        }?;
        trace!(tag = %removed.tag(), index, "curve removed from collection");
        self.changed.emit(&CollectionChange::Removed {
            index,
            items: smallvec![Rc::clone(&removed)],
        });
        Some(removed)
    }

    pub fn remove_by_tag(&self, tag: &CurveTag) -> Option<SharedCurve> {
        let index = self
            .items
            .borrow()
            .iter()
            .position(|curve| curve.tag() == tag)?;
        self.remove(index)
    }

    /// Swaps the curve at `index` for `curve`, returning the previous member.
    pub fn replace(&self, index: usize, curve: impl Into<SharedCurve>) -> ChartResult<SharedCurve> {
        let curve = curve.into();
        let old = {
            let mut items = self.items.borrow_mut();
            if index >= items.len() {
                return Err(index_out_of_range(index, items.len()));
            }
            if items[index].tag() != curve.tag() {
                ensure_unique_tag(&items, &curve)?;
            }
            std::mem::replace(&mut items[index], Rc::clone(&curve))
        };
        trace!(old = %old.tag(), new = %curve.tag(), index, "curve replaced in collection");
        self.changed.emit(&CollectionChange::Replaced {
            index,
            old_items: smallvec![Rc::clone(&old)],
            new_items: smallvec![curve],
        });
        Ok(old)
    }

    pub fn move_item(&self, from: usize, to: usize) -> ChartResult<()> {
        let item = {
            let mut items = self.items.borrow_mut();
            let len = items.len();
            if from >= len {
                return Err(index_out_of_range(from, len));
            }
            if to >= len {
                return Err(index_out_of_range(to, len));
            }
            let item = items.remove(from);
            items.insert(to, Rc::clone(&item));
            item
        };
        self.changed.emit(&CollectionChange::Moved { from, to, item });
        Ok(())
    }

    /// Empties the collection and emits a reset notification.
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.items.borrow_mut());
        trace!(count = removed.len(), "collection cleared");
        self.changed.emit(&CollectionChange::Reset);
    }

    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn on_changed(&self, listener: impl Fn(&CollectionChange) + 'static) -> Subscription {
        self.changed.subscribe(listener)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.changed.listener_count()
    }
}

fn ensure_unique_tag(items: &[SharedCurve], curve: &SharedCurve) -> ChartResult<()> {
    if items.iter().any(|existing| existing.tag() == curve.tag()) {
        return Err(duplicate_tag(curve.tag()));
    }
    Ok(())
}

fn duplicate_tag(tag: &CurveTag) -> ChartError {
    ChartError::InvalidInput(format!("curve `{tag}` is already in the collection"))
}

fn index_out_of_range(index: usize, len: usize) -> ChartError {
    ChartError::InvalidInput(format!("index {index} out of range (len {len})"))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{CollectionChange, CurveCollection};
    use crate::model::Curve;

    fn kind(change: &CollectionChange) -> &'static str {
        match change {
            CollectionChange::Added { .. } => "added",
            CollectionChange::Removed { .. } => "removed",
            CollectionChange::Replaced { .. } => "replaced",
            CollectionChange::Moved { .. } => "moved",
            CollectionChange::Reset => "reset",
        }
    }

    #[test]
    fn notifications_follow_mutations() {
        let collection = CurveCollection::new();
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let kinds = Rc::clone(&kinds);
            collection.on_changed(move |change| kinds.borrow_mut().push(kind(change)))
        };

        let first = collection.push(Curve::from_y(&[1.0])).expect("push");
        collection.push(Curve::from_y(&[2.0])).expect("push");
        collection.move_item(0, 1).expect("move");
        collection
            .replace(0, Curve::from_y(&[3.0]))
            .expect("replace");
        collection.remove_by_tag(first.tag()).expect("remove");
        collection.clear();

        assert_eq!(
            *kinds.borrow(),
            vec!["added", "added", "moved", "replaced", "removed", "reset"]
        );
        assert!(collection.is_empty());
    }

    #[test]
    fn same_curve_cannot_be_inserted_twice() {
        let collection = CurveCollection::new();
        let curve = collection.push(Curve::from_y(&[1.0])).expect("push");
        assert!(collection.push(Rc::clone(&curve)).is_err());
        assert!(collection.extend([Rc::clone(&curve)]).is_err());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn extend_reports_one_batch_in_order() {
        let collection = CurveCollection::new();
        let batches = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let batches = Rc::clone(&batches);
            collection.on_changed(move |change| {
                let tags: Vec<_> = change
                    .new_items()
                    .iter()
                    .map(|curve| curve.tag().clone())
                    .collect();
                batches.borrow_mut().push(tags);
            })
        };

        let curves = vec![
            Curve::from_y(&[1.0]).shared(),
            Curve::from_y(&[2.0]).shared(),
        ];
        let expected: Vec<_> = curves.iter().map(|curve| curve.tag().clone()).collect();
        collection.extend(curves).expect("extend");

        assert_eq!(*batches.borrow(), vec![expected]);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let collection = CurveCollection::new();
        assert!(collection.insert(1, Curve::from_y(&[])).is_err());
        assert!(collection.remove(0).is_none());
        assert!(collection.move_item(0, 0).is_err());
    }
}
