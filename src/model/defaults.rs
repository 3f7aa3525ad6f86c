use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::model::MarkerType;
use crate::render::Color;

/// Initial styling applied to newly constructed curves.
///
/// Serializable so host applications can keep their curve look in a config
/// file; missing fields fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveDefaults {
    pub name: String,
    pub color: Color,
    pub symbol_color: Color,
    pub symbol_size: f64,
    pub visible: bool,
    pub line_visible: bool,
    pub line_width: f64,
    pub marker_type: MarkerType,
}

impl Default for CurveDefaults {
    fn default() -> Self {
        Self {
            name: "New curve".to_owned(),
            color: Color::BLACK,
            symbol_color: Color::BLUE,
            symbol_size: 5.0,
            visible: true,
            line_visible: true,
            line_width: 1.0,
            marker_type: MarkerType::None,
        }
    }
}

impl CurveDefaults {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input).map_err(|err| ChartError::InvalidConfig(err.to_string()))
    }

    pub fn to_json_string(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| ChartError::InvalidConfig(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::CurveDefaults;
    use crate::model::MarkerType;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let defaults = CurveDefaults::from_json_str(r#"{ "name": "Voltage", "line_width": 2.5 }"#)
            .expect("parse defaults");
        assert_eq!(defaults.name, "Voltage");
        assert_eq!(defaults.line_width, 2.5);
        assert_eq!(defaults.symbol_size, 5.0);
        assert_eq!(defaults.marker_type, MarkerType::None);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = CurveDefaults::from_json_str("{ name: ").expect_err("must fail");
        assert!(matches!(err, crate::error::ChartError::InvalidConfig(_)));
    }

    #[test]
    fn json_round_trip_preserves_defaults() {
        let defaults = CurveDefaults::default();
        let json = defaults.to_json_string().expect("serialize");
        assert_eq!(CurveDefaults::from_json_str(&json).expect("parse"), defaults);
    }
}
