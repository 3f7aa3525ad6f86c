use serde::{Deserialize, Serialize};

use crate::core::types::DataPoint;
use crate::error::{ChartError, ChartResult};

/// Inclusive value range covered by one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Range used when there is nothing to fit.
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// Widens the range by `ratio` of its span on both sides.
    ///
    /// Degenerate ranges (a single distinct value) are widened by one unit so
    /// that a scale can still be built from them.
    #[must_use]
    pub fn padded(self, ratio: f64) -> Self {
        let span = self.span();
        if span <= 0.0 {
            return Self::new(self.min - 0.5, self.max + 0.5);
        }
        let pad = span * ratio.max(0.0);
        Self::new(self.min - pad, self.max + pad)
    }
}

/// Computes the x and y extents of `points`, ignoring non-finite samples.
///
/// Returns `None` when no finite sample exists.
#[must_use]
pub fn fit_extents<'a, I>(points: I) -> Option<(AxisRange, AxisRange)>
where
    I: IntoIterator<Item = &'a DataPoint>,
{
    let mut extents: Option<(AxisRange, AxisRange)> = None;
    for point in points.into_iter().filter(|point| point.is_finite()) {
        extents = Some(match extents {
            None => (
                AxisRange::new(point.x, point.x),
                AxisRange::new(point.y, point.y),
            ),
            Some((x, y)) => (
                AxisRange::new(x.min.min(point.x), x.max.max(point.x)),
                AxisRange::new(y.min.min(point.y), y.max.max(point.y)),
            ),
        });
    }
    extents
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    pub fn from_range(range: AxisRange) -> ChartResult<Self> {
        Self::new(range.min, range.max)
    }

    /// Maps `value` onto `[0, extent_px]`.
    pub fn domain_to_pixel(self, value: f64, extent_px: u32) -> ChartResult<f64> {
        if extent_px == 0 {
            return Err(ChartError::InvalidData(
                "pixel extent must be > 0".to_owned(),
            ));
        }

        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(normalized * f64::from(extent_px))
    }
}
