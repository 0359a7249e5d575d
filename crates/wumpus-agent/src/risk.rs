//! Combining hazard probabilities into a single lethal risk.

use wumpus_logic::{Assessment, NO_INFORMATION};

/// Probability carried by an assessment, or `None` when the engine had no information.
///
/// An enumerated result of exactly `0.5` is still a real probability.
pub fn known_probability(assessment: &Assessment) -> Option<f64> {
    assessment
        .is_informative()
        .then(|| assessment.probability())
}

/// Probability that entering a cell is fatal given wumpus and pit probabilities.
///
/// Both known: `1 - (1 - pw)(1 - pp)`. One known: that one. Neither: the sentinel.
pub fn lethal_probability(wumpus: Option<f64>, pit: Option<f64>) -> f64 {
    match (wumpus, pit) {
        (Some(w), Some(p)) => 1.0 - (1.0 - w) * (1.0 - p),
        (Some(w), None) => w,
        (None, Some(p)) => p,
        (None, None) => NO_INFORMATION,
    }
}

/// A cell is proven safe only when both hazards are known to be absent.
pub fn is_proven_safe(wumpus: Option<f64>, pit: Option<f64>) -> bool {
    wumpus == Some(0.0) && pit == Some(0.0)
}
