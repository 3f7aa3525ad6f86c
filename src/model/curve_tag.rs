use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const TAG_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Stable identity correlating a curve with its rendered chart entry.
///
/// Generated once per curve and never reassigned. Display names are mutable
/// and may repeat, so every lookup goes through the tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurveTag(String);

impl CurveTag {
    pub const LEN: usize = 10;

    /// Draws a fresh random tag of [`CurveTag::LEN`] uppercase letters.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let token = (0..Self::LEN)
            .map(|_| char::from(TAG_ALPHABET[rng.random_range(0..TAG_ALPHABET.len())]))
            .collect();
        Self(token)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CurveTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
