//! Observable view-models: curves and the ordered collection holding them.

pub mod collection;
pub mod curve;
pub mod curve_change;
pub mod curve_style;
pub mod curve_tag;
pub mod defaults;

pub use collection::{CollectionChange, CurveBatch, CurveCollection, SharedCollection};
pub use curve::{Curve, CurveState, SharedCurve};
pub use curve_change::{CurveChange, CurveField, PointsAppended, RefreshRequested};
pub use curve_style::{FillMode, GradientFill, MarkerType};
pub use curve_tag::CurveTag;
pub use defaults::CurveDefaults;
