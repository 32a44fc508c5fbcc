use thiserror::Error;

/// unrecoverable conditions that abort a run before or during integration.
/// soft conditions (budget exhausted, non-positive running result) are
/// reported through `Status` on `IntegrationOutcome` instead, since the
/// caller still receives a usable (result, error) pair for those.
#[derive(Debug, Error)]
pub enum CubatureError {
    #[error("rule key {0} is not one of 0 (auto), 1, 2, 3, 4")]
    InvalidKey(i32),

    #[error("dimension {dim} out of range [2, {max}]")]
    DimensionOutOfRange { dim: usize, max: usize },

    #[error("rule {key:?} requires dimension {required}, got {dim}")]
    RuleDimensionMismatch {
        key: crate::rule::RuleKey,
        required: usize,
        dim: usize,
    },

    #[error("box has non-positive extent on axis {axis}: lower={lower}, upper={upper}")]
    InvalidBox { axis: usize, lower: f64, upper: f64 },

    #[error("max_calls {max_calls} too small for {n_points} points per region (need >= 3x)")]
    BudgetTooSmall { max_calls: usize, n_points: usize },

    #[error("integrand returned NaN at region depth {depth}")]
    IntegrandReturnedNaN { depth: usize },

    #[error("pedigree {pedigree} has zero likelihood at theta=0.5: data is inconsistent with the null")]
    NullLikelihoodIsZero { pedigree: usize },
}
