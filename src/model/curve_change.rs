use serde::{Deserialize, Serialize};

/// Curve field named by a field-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveField {
    Name,
    Points,
    PointCount,
    Color,
    SymbolColor,
    SymbolSize,
    Visible,
    LineVisible,
    LineWidth,
    MarkerType,
    GradientStops,
}

impl CurveField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Points => "points",
            Self::PointCount => "point_count",
            Self::Color => "color",
            Self::SymbolColor => "symbol_color",
            Self::SymbolSize => "symbol_size",
            Self::Visible => "visible",
            Self::LineVisible => "line_visible",
            Self::LineWidth => "line_width",
            Self::MarkerType => "marker_type",
            Self::GradientStops => "gradient_stops",
        }
    }

    /// Classifies how a rendered entry must react to this field changing.
    #[must_use]
    pub const fn change(self) -> CurveChange {
        match self {
            Self::Color => CurveChange::ColorChanged,
            Self::Visible => CurveChange::VisibilityChanged,
            Self::Name
            | Self::Points
            | Self::SymbolColor
            | Self::SymbolSize
            | Self::LineVisible
            | Self::LineWidth
            | Self::MarkerType
            | Self::GradientStops => CurveChange::StructuralChanged(self),
            Self::PointCount => CurveChange::Passive(self),
        }
    }
}

/// Payload of a points-appended notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsAppended {
    pub appended: usize,
    pub total: usize,
}

/// Payload of a full-refresh notification. Carries no data change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshRequested;

/// Every curve notification, reduced to what a rendered entry has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveChange {
    /// Stroke color only; patched in place.
    ColorChanged,
    /// Whole-curve visibility only; patched in place.
    VisibilityChanged,
    /// Geometry, marker, fill or label change; the entry is rebuilt.
    StructuralChanged(CurveField),
    PointsAppended { appended: usize },
    FullRefresh,
    /// Derived field with no rendered counterpart.
    Passive(CurveField),
}

impl CurveChange {
    #[must_use]
    pub const fn requires_rebuild(self) -> bool {
        matches!(
            self,
            Self::StructuralChanged(_) | Self::PointsAppended { .. } | Self::FullRefresh
        )
    }
}

impl From<CurveField> for CurveChange {
    fn from(field: CurveField) -> Self {
        field.change()
    }
}

impl From<PointsAppended> for CurveChange {
    fn from(event: PointsAppended) -> Self {
        Self::PointsAppended {
            appended: event.appended,
        }
    }
}

impl From<RefreshRequested> for CurveChange {
    fn from(_: RefreshRequested) -> Self {
        Self::FullRefresh
    }
}
