//! Fixed-length position sequences

use serde::{Deserialize, Serialize};

use crate::time::Horizon;
use crate::EcefPosition;

/// One Earth-fixed position per horizon sample.
///
/// Built through [`Trajectory::from_samples`], which substitutes
/// [`EcefPosition::ZERO`] for unresolved samples so the length always
/// equals the horizon's sample count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    positions: Vec<EcefPosition>,
}

impl Trajectory {
    pub fn from_samples<F>(horizon: &Horizon, mut sample: F) -> Self
    where
        F: FnMut(usize) -> Option<EcefPosition>,
    {
        let positions = (0..horizon.samples)
            .map(|i| sample(i).unwrap_or(EcefPosition::ZERO))
            .collect();

        Self { positions }
    }

    pub fn positions(&self) -> &[EcefPosition] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position at sample `index`, or the sentinel past the end
    pub fn at(&self, index: usize) -> EcefPosition {
        self.positions.get(index).copied().unwrap_or(EcefPosition::ZERO)
    }

    /// Number of samples filled with the zero sentinel
    pub fn gap_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_sentinel()).count()
    }
}
