use crate::rule::RuleKey;
use crate::Verbosity;

/// one trait-locus position to evaluate, expressed as a recombination
/// fraction theta against a fixed marker; the driver runs one cubature
/// integration per slice and reports a PPL for each. `d_prime` is the
/// linkage-disequilibrium coefficient for this slice: `None` (or `Some(0.0)`)
/// means the slice is evaluated under linkage equilibrium (LE); any other
/// value means it contributes to the LD accumulators.
#[derive(Debug, Clone, Copy)]
pub struct Slice {
    pub theta: f64,
    pub d_prime: Option<f64>,
}

/// configuration for a [`crate::bayes::BayesDriver`] run: which positions
/// to scan, the prior probability of linkage, and the cubature settings
/// shared across every slice.
#[derive(Debug, Clone)]
pub struct BayesDriverConfig {
    pub slices: Vec<Slice>,
    pub prior: f64,
    /// prior probability of linkage disequilibrium, used by the LD-PPL
    /// and PPLD derivations (`ld_prior` in the reference driver).
    pub ld_prior: f64,
    /// recombination fraction below which a slice counts as "small-theta"
    /// rather than "big-theta" in the six-cell accumulation of §4.5 step 5.
    pub theta_cutoff: f64,
    pub penetrance_dims: usize,
    pub rule: RuleKey,
    pub max_calls: usize,
    pub epsabs: f64,
    pub epsrel: f64,
    pub verbosity: Verbosity,
}

impl Default for BayesDriverConfig {
    fn default() -> Self {
        Self {
            slices: (0..=50).map(|i| Slice { theta: i as f64 * 0.01, d_prime: None }).collect(),
            prior: 0.05,
            ld_prior: 0.05,
            theta_cutoff: 0.05,
            penetrance_dims: 3,
            rule: RuleKey::Auto,
            max_calls: 50_000,
            epsabs: 1e-6,
            epsrel: 1e-4,
            verbosity: Verbosity::Basic,
        }
    }
}
