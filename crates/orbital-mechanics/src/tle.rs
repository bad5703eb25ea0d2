//! Two-line element sets
//!
//! Element pairs are opaque to this crate beyond what SGP4 needs to
//! initialize; a malformed pair is rejected by [`crate::Sgp4Propagator`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoLineElements {
    pub line1: String,
    pub line2: String,
}

impl TwoLineElements {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    /// Catalog number field of line 1, when readable
    pub fn norad_id(&self) -> Option<u32> {
        self.line1.get(2..7).and_then(|s| s.trim().parse().ok())
    }
}

impl From<(String, String)> for TwoLineElements {
    fn from((line1, line2): (String, String)) -> Self {
        Self { line1, line2 }
    }
}

/// Parse TLE/3LE text into element pairs.
///
/// Keeps only lines starting with "1 " or "2 " and pairs them in order.
/// Name lines are skipped and a trailing unpaired line is dropped.
pub fn parse_tle_text(text: &str) -> Vec<TwoLineElements> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("1 ") || l.starts_with("2 "))
        .collect();

    lines
        .chunks_exact(2)
        .map(|pair| TwoLineElements::new(pair[0], pair[1]))
        .collect()
}
