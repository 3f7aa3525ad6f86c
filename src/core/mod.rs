pub mod scale;
pub mod types;

pub use scale::{AxisRange, LinearScale, fit_extents};
pub use types::{DataPoint, Viewport};
