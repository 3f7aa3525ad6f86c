use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::DataPoint;
use crate::error::{ChartError, ChartResult};
use crate::model::{
    CurveDefaults, CurveField, CurveTag, MarkerType, PointsAppended, RefreshRequested,
};
use crate::observe::{EventHub, Subscription};
use crate::render::Color;

/// Shared handle to a curve; the collection and the application both hold one.
pub type SharedCurve = Rc<Curve>;

/// Plain copy of a curve's mutable state at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveState {
    pub name: String,
    pub points: Vec<DataPoint>,
    pub color: Color,
    pub symbol_color: Color,
    pub symbol_size: f64,
    pub visible: bool,
    pub line_visible: bool,
    pub line_width: f64,
    pub marker_type: MarkerType,
    pub gradient_stops: Vec<Color>,
}

impl CurveState {
    fn seeded(defaults: &CurveDefaults, points: Vec<DataPoint>) -> Self {
        Self {
            name: defaults.name.clone(),
            points,
            color: defaults.color,
            symbol_color: defaults.symbol_color,
            symbol_size: defaults.symbol_size,
            visible: defaults.visible,
            line_visible: defaults.line_visible,
            line_width: defaults.line_width,
            marker_type: defaults.marker_type,
            gradient_stops: Vec::new(),
        }
    }

    #[must_use]
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.x).collect()
    }

    #[must_use]
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.y).collect()
    }
}

/// Observable curve view-model.
///
/// Every mutator updates the state and then notifies synchronously on the
/// calling thread before returning. Listeners may read the curve back while
/// being notified; the state is never borrowed across a notification.
#[derive(Debug)]
pub struct Curve {
    tag: CurveTag,
    state: RefCell<CurveState>,
    field_changed: EventHub<CurveField>,
    points_appended: EventHub<PointsAppended>,
    refresh_requested: EventHub<RefreshRequested>,
}

impl Curve {
    /// Builds a curve from parallel x/y sequences.
    pub fn from_xy(xs: &[f64], ys: &[f64]) -> ChartResult<Self> {
        Self::from_xy_with_defaults(xs, ys, &CurveDefaults::default())
    }

    pub fn from_xy_with_defaults(
        xs: &[f64],
        ys: &[f64],
        defaults: &CurveDefaults,
    ) -> ChartResult<Self> {
        if xs.len() != ys.len() {
            return Err(ChartError::InvalidInput(format!(
                "x and y lengths differ: {} != {}",
                xs.len(),
                ys.len()
            )));
        }
        let points = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| DataPoint::new(x, y))
            .collect();
        Ok(Self::with_state(CurveState::seeded(defaults, points)))
    }

    /// Builds a curve from `(x, y)` pairs, keeping their order.
    #[must_use]
    pub fn from_points<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<DataPoint>,
    {
        Self::from_points_with_defaults(points, &CurveDefaults::default())
    }

    #[must_use]
    pub fn from_points_with_defaults<I, P>(points: I, defaults: &CurveDefaults) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<DataPoint>,
    {
        let points = points.into_iter().map(Into::into).collect();
        Self::with_state(CurveState::seeded(defaults, points))
    }

    /// Builds a curve from y values; x is the sample index.
    #[must_use]
    pub fn from_y(ys: &[f64]) -> Self {
        Self::from_y_with_defaults(ys, &CurveDefaults::default())
    }

    #[must_use]
    pub fn from_y_with_defaults(ys: &[f64], defaults: &CurveDefaults) -> Self {
        let points = ys
            .iter()
            .enumerate()
            .map(|(index, &y)| DataPoint::new(index as f64, y))
            .collect();
        Self::with_state(CurveState::seeded(defaults, points))
    }

    fn with_state(state: CurveState) -> Self {
        Self {
            tag: CurveTag::generate(),
            state: RefCell::new(state),
            field_changed: EventHub::new(),
            points_appended: EventHub::new(),
            refresh_requested: EventHub::new(),
        }
    }

    /// Wraps the curve for insertion into a [`crate::model::CurveCollection`].
    #[must_use]
    pub fn shared(self) -> SharedCurve {
        Rc::new(self)
    }

    #[must_use]
    pub fn tag(&self) -> &CurveTag {
        &self.tag
    }

    #[must_use]
    pub fn snapshot(&self) -> CurveState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    #[must_use]
    pub fn points(&self) -> Vec<DataPoint> {
        self.state.borrow().points.clone()
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.state.borrow().points.len()
    }

    #[must_use]
    pub fn xs(&self) -> Vec<f64> {
        self.state.borrow().xs()
    }

    #[must_use]
    pub fn ys(&self) -> Vec<f64> {
        self.state.borrow().ys()
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.state.borrow().color
    }

    #[must_use]
    pub fn symbol_color(&self) -> Color {
        self.state.borrow().symbol_color
    }

    #[must_use]
    pub fn symbol_size(&self) -> f64 {
        self.state.borrow().symbol_size
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    #[must_use]
    pub fn line_visible(&self) -> bool {
        self.state.borrow().line_visible
    }

    #[must_use]
    pub fn line_width(&self) -> f64 {
        self.state.borrow().line_width
    }

    #[must_use]
    pub fn marker_type(&self) -> MarkerType {
        self.state.borrow().marker_type
    }

    #[must_use]
    pub fn gradient_stops(&self) -> Vec<Color> {
        self.state.borrow().gradient_stops.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.update_field(CurveField::Name, |state| state.name = name);
    }

    pub fn set_color(&self, color: Color) {
        self.update_field(CurveField::Color, |state| state.color = color);
    }

    pub fn set_symbol_color(&self, color: Color) {
        self.update_field(CurveField::SymbolColor, |state| state.symbol_color = color);
    }

    pub fn set_symbol_size(&self, size: f64) {
        self.update_field(CurveField::SymbolSize, |state| state.symbol_size = size);
    }

    pub fn set_visible(&self, visible: bool) {
        self.update_field(CurveField::Visible, |state| state.visible = visible);
    }

    pub fn set_line_visible(&self, visible: bool) {
        self.update_field(CurveField::LineVisible, |state| state.line_visible = visible);
    }

    pub fn set_line_width(&self, width: f64) {
        self.update_field(CurveField::LineWidth, |state| state.line_width = width);
    }

    pub fn set_marker_type(&self, marker_type: MarkerType) {
        self.update_field(CurveField::MarkerType, |state| state.marker_type = marker_type);
    }

    /// Replaces the whole point list.
    pub fn set_points<I, P>(&self, points: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<DataPoint>,
    {
        let points: Vec<DataPoint> = points.into_iter().map(Into::into).collect();
        self.update_field(CurveField::Points, |state| state.points = points);
        self.field_changed.emit(&CurveField::PointCount);
    }

    /// Replaces every gradient stop at once.
    pub fn set_gradient_stops(&self, stops: Vec<Color>) {
        self.update_field(CurveField::GradientStops, |state| state.gradient_stops = stops);
    }

    /// Appends points in order, then emits a points-appended notification
    /// distinct from the generic field change.
    pub fn add_points<I, P>(&self, points: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<DataPoint>,
    {
        let points: Vec<DataPoint> = points.into_iter().map(Into::into).collect();
        let appended = points.len();
        let total = {
            let mut state = self.state.borrow_mut();
            state.points.extend(points);
            state.points.len()
        };
        trace!(tag = %self.tag, appended, total, "curve points appended");
        if appended > 0 {
            self.field_changed.emit(&CurveField::PointCount);
        }
        self.points_appended.emit(&PointsAppended { appended, total });
    }

    /// Asks listeners to re-render the curve without changing any data.
    pub fn refresh(&self) {
        trace!(tag = %self.tag, "curve refresh requested");
        self.refresh_requested.emit(&RefreshRequested);
    }

    pub fn push_gradient_stop(&self, color: Color) {
        self.state.borrow_mut().gradient_stops.push(color);
        self.refresh();
    }

    pub fn insert_gradient_stop(&self, index: usize, color: Color) -> ChartResult<()> {
        {
            let mut state = self.state.borrow_mut();
            if index > state.gradient_stops.len() {
                return Err(ChartError::InvalidInput(format!(
                    "gradient stop index {index} out of range (len {})",
                    state.gradient_stops.len()
                )));
            }
            state.gradient_stops.insert(index, color);
        }
        self.refresh();
        Ok(())
    }

    /// Removes the stop at `index`; out-of-range indices change nothing and
    /// emit nothing.
    pub fn remove_gradient_stop(&self, index: usize) -> Option<Color> {
        let removed = {
            let mut state = self.state.borrow_mut();
            (index < state.gradient_stops.len()).then(|| state.gradient_stops.remove(index))
        };
        if removed.is_some() {
            self.refresh();
        }
        removed
    }

    pub fn clear_gradient_stops(&self) {
        let had_stops = {
            let mut state = self.state.borrow_mut();
            let had_stops = !state.gradient_stops.is_empty();
            state.gradient_stops.clear();
            had_stops
        };
        if had_stops {
            self.refresh();
        }
    }

    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn on_field_changed(&self, listener: impl Fn(&CurveField) + 'static) -> Subscription {
        self.field_changed.subscribe(listener)
    }

    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn on_points_appended(
        &self,
        listener: impl Fn(&PointsAppended) + 'static,
    ) -> Subscription {
        self.points_appended.subscribe(listener)
    }

    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn on_refresh_requested(
        &self,
        listener: impl Fn(&RefreshRequested) + 'static,
    ) -> Subscription {
        self.refresh_requested.subscribe(listener)
    }

    /// Total listeners across the three notification kinds.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.field_changed.listener_count()
            + self.points_appended.listener_count()
            + self.refresh_requested.listener_count()
    }

    fn update_field(&self, field: CurveField, apply: impl FnOnce(&mut CurveState)) {
        apply(&mut *self.state.borrow_mut());
        trace!(tag = %self.tag, field = field.as_str(), "curve field changed");
        self.field_changed.emit(&field);
    }
}
