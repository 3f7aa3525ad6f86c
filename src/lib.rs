//! chart-curve-sync: keeps observable curve view-models and a chart widget's
//! curve list in step.
//!
//! Applications mutate [`model::Curve`]s and a [`model::CurveCollection`];
//! a [`CurveListSynchronizer`] bound to that collection mirrors every change
//! onto a [`widget::ChartWidget`], patching color and visibility in place and
//! rebuilding entries for anything structural.

pub mod api;
pub mod core;
pub mod error;
pub mod model;
pub mod observe;
pub mod render;
pub mod telemetry;
pub mod widget;

pub use api::{CurveListSynchronizer, SyncStats, SynchronizerConfig};
pub use error::{ChartError, ChartResult};
