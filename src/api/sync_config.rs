use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// How a freshly inserted curve is turned into a chart entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InsertSeeding {
    /// Name, points and stroke color with no marker. Remaining styling is
    /// applied by the first rebuild.
    #[default]
    Minimal,
    /// Build the entry exactly like a full rebuild does.
    FullStyle,
}

/// Synchronizer bootstrap configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SynchronizerConfig {
    #[serde(default)]
    pub insert_seeding: InsertSeeding,
}

impl SynchronizerConfig {
    #[must_use]
    pub fn with_insert_seeding(mut self, insert_seeding: InsertSeeding) -> Self {
        self.insert_seeding = insert_seeding;
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input).map_err(|err| ChartError::InvalidConfig(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{InsertSeeding, SynchronizerConfig};

    #[test]
    fn empty_json_uses_minimal_seeding() {
        let config = SynchronizerConfig::from_json_str("{}").expect("parse");
        assert_eq!(config.insert_seeding, InsertSeeding::Minimal);
    }

    #[test]
    fn seeding_mode_parses_by_variant_name() {
        let config = SynchronizerConfig::from_json_str(r#"{ "insert_seeding": "FullStyle" }"#)
            .expect("parse");
        assert_eq!(config.insert_seeding, InsertSeeding::FullStyle);
    }
}
