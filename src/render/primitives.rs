use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
///
/// Treated as an opaque value by the synchronizer; only renderers and the
/// headless widget look at the channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 0.5, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds a color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn ensure_finite(values: &[f64], what: &str) -> ChartResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!("{what} must be finite")))
    }
}

fn ensure_positive(value: f64, what: &str) -> ChartResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!("{what} must be finite and > 0")))
    }
}

/// One stroked segment of a curve path, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPrimitive {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub stroke_width: f64,
    pub color: Color,
}

impl SegmentPrimitive {
    #[must_use]
    pub const fn new(from: (f64, f64), to: (f64, f64), stroke_width: f64, color: Color) -> Self {
        Self {
            from,
            to,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.from.0, self.from.1, self.to.0, self.to.1], "segment endpoints")?;
        ensure_positive(self.stroke_width, "segment stroke width")?;
        self.color.validate()
    }
}

/// Filled square drawn at one curve point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPrimitive {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub fill_color: Color,
}

impl MarkerPrimitive {
    /// Marker of side `size` centered on `(center_x, center_y)`.
    #[must_use]
    pub const fn centered(center_x: f64, center_y: f64, size: f64, fill_color: Color) -> Self {
        Self {
            x: center_x - size / 2.0,
            y: center_y - size / 2.0,
            size,
            fill_color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.x, self.y], "marker origin")?;
        ensure_positive(self.size, "marker size")?;
        self.fill_color.validate()
    }
}

/// Left-anchored legend label naming one curve.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLabel {
    pub text: String,
    pub x: f64,
    pub baseline_y: f64,
    pub font_size_px: f64,
    pub color: Color,
}

impl LegendLabel {
    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "legend label must not be empty".to_owned(),
            ));
        }
        ensure_finite(&[self.x, self.baseline_y], "legend label position")?;
        ensure_positive(self.font_size_px, "legend font size")?;
        self.color.validate()
    }
}
