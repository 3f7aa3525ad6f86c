use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Marker drawn at each curve point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MarkerType {
    #[default]
    None,
    Square,
    Diamond,
    Triangle,
    TriangleDown,
    Circle,
    XCross,
    Plus,
    Star,
    HDash,
    VDash,
}

impl MarkerType {
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// How a marker is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FillMode {
    #[default]
    None,
    Solid,
}

/// Multi-stop fill along a curve line. Always carries at least two stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientFill {
    stops: Vec<Color>,
}

impl GradientFill {
    pub const MIN_STOPS: usize = 2;

    /// Builds a gradient from `stops`, or `None` when fewer than two are given.
    #[must_use]
    pub fn from_stops(stops: &[Color]) -> Option<Self> {
        (stops.len() >= Self::MIN_STOPS).then(|| Self {
            stops: stops.to_vec(),
        })
    }

    #[must_use]
    pub fn stops(&self) -> &[Color] {
        &self.stops
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.stops.len() < Self::MIN_STOPS {
            return Err(ChartError::InvalidData(
                "gradient fill needs at least two stops".to_owned(),
            ));
        }
        self.stops.iter().try_for_each(|stop| stop.validate())
    }
}
