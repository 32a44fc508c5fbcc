pub mod accumulate;
pub mod config;
pub mod jacobian;
pub mod mixture;
pub mod output;
pub mod pedigree;

use crate::convergence::ToleranceBand;
use crate::error::CubatureError;
use crate::integrand::Integrand;
use crate::integrator::{Integrator, IntegratorOpts};
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
pub use accumulate::LdCells;
pub use config::{BayesDriverConfig, Slice};
pub use pedigree::PedigreeModel;

/// sentinel meaning "no pedigree has reported a fatal zero null-likelihood
/// yet", stored in the `AtomicUsize` the integrand closure reports through
/// (plain `Cell` isn't `Sync`, which the boxed `Integrand` closure requires).
const NO_FATAL_PEDIGREE: usize = usize::MAX;

/// the posterior-probability-of-linkage result for one scanned position.
#[derive(Debug, Clone, Copy)]
pub struct SliceResult {
    pub theta: f64,
    pub d_prime: Option<f64>,
    pub log10_bayes_ratio: f64,
    pub bayes_ratio: f64,
    pub ppl: f64,
    pub error: f64,
}

/// the posterior probabilities derived once every slice has been scanned
/// and accumulated (§4.5 step 6): linkage, linkage allowing for LD, and LD
/// given (or allowing) linkage.
#[derive(Debug, Clone, Copy)]
pub struct BayesSummary {
    pub ppl: f64,
    pub ld_ppl: f64,
    pub ppld_given_linkage: f64,
    pub ppld_allowing_linkage: f64,
    pub cells: LdCells,
}

/// orchestrates a full PPL scan: one adaptive cubature integration per
/// position, each integrating a family-combined, heterogeneity-mixed
/// Bayes ratio over the unit cube of (ordered) penetrance parameters.
/// Grounded in the reference driver's top-level `main`/`kelvin` loop over
/// positions, generalized from its hand-rolled trapezoid-rule nuisance
/// integration to the shared adaptive integrator.
pub struct BayesDriver {
    config: BayesDriverConfig,
    pedigrees: Vec<Box<dyn PedigreeModel>>,
}

impl BayesDriver {
    pub fn new(config: BayesDriverConfig, pedigrees: Vec<Box<dyn PedigreeModel>>) -> Self {
        Self { config, pedigrees }
    }

    pub fn run(&self) -> Result<Vec<SliceResult>, CubatureError> {
        let dim = self.config.penetrance_dims;
        let lower = vec![0.0; dim];
        let upper = vec![1.0; dim];
        let predicate = ToleranceBand::new(self.config.epsabs, self.config.epsrel);
        let opts = IntegratorOpts {
            rule: self.config.rule,
            max_calls: self.config.max_calls,
            eps_abs: self.config.epsabs,
            eps_rel: self.config.epsrel,
            ..Default::default()
        };

        let mut results = Vec::with_capacity(self.config.slices.len());
        for slice in &self.config.slices {
            let theta = slice.theta;
            let d_prime = slice.d_prime;
            let fatal_pedigree = AtomicUsize::new(NO_FATAL_PEDIGREE);
            let integrand = Integrand::plain(|x, _scale| self.slice_integrand(x, theta, &fatal_pedigree));

            let mut integrator = Integrator::new(opts.rule, &lower, &upper)?;
            let outcome = match integrator.run(&integrand, &predicate, &opts) {
                Ok(outcome) => outcome,
                Err(CubatureError::IntegrandReturnedNaN { .. }) if fatal_pedigree.load(Ordering::Relaxed) != NO_FATAL_PEDIGREE => {
                    return Err(CubatureError::NullLikelihoodIsZero {
                        pedigree: fatal_pedigree.load(Ordering::Relaxed),
                    });
                }
                Err(e) => return Err(e),
            };

            let bayes_ratio = outcome.result.max(0.0);
            let log10_bayes_ratio = if bayes_ratio > 0.0 { bayes_ratio.log10() } else { f64::NEG_INFINITY };
            let ppl = accumulate::ppl_from_bayes_ratio(bayes_ratio, self.config.prior);

            debug!("theta={theta:.4} br={bayes_ratio:.6e} ppl={ppl:.6} regions={}", outcome.regions_used);

            results.push(SliceResult {
                theta,
                d_prime,
                log10_bayes_ratio,
                bayes_ratio,
                ppl,
                error: outcome.error,
            });
        }
        Ok(results)
    }

    /// folds every slice result into the six-cell LD/LE accumulators and
    /// derives PPL/LD-PPL/PPLD, per §4.5 step 5-6. Kept as a separate pass
    /// over already-computed slices rather than folded into `run`, since
    /// it needs the complete set of slices before any ratio can be formed.
    pub fn summarize(&self, results: &[SliceResult]) -> BayesSummary {
        let mut cells = LdCells::new();
        for r in results {
            cells.accumulate(r.theta, r.d_prime, r.bayes_ratio, self.config.theta_cutoff);
        }
        BayesSummary {
            ppl: cells.ppl(self.config.prior),
            ld_ppl: cells.ld_ppl(self.config.ld_prior),
            ppld_given_linkage: cells.ppld_given_linkage(self.config.ld_prior),
            ppld_allowing_linkage: cells.ppld_allowing_linkage(self.config.ld_prior),
            cells,
        }
    }

    /// value of the integrand at one unconstrained point `x` in the unit
    /// cube, for a fixed position `theta`:
    /// 1. map `x` onto the ordered penetrance simplex and read off the
    ///    Jacobian of that change of variables;
    /// 2. for each pedigree, compute its homogeneous-linkage likelihood
    ///    ratio at this penetrance vector and `theta`;
    /// 3. mix each family's ratio over the heterogeneity parameter α via
    ///    5-point Gauss-Legendre quadrature;
    /// 4. combine all families' mixed ratios multiplicatively (summed in
    ///    log10 space to guard against under/overflow);
    /// 5. undo the log10 combination back to a linear Bayes ratio;
    /// 6. scale by the Jacobian so the cubature integral over the
    ///    unconstrained cube equals the integral over the ordered simplex.
    ///
    /// A pedigree whose θ=0.5 likelihood is exactly zero marks the data as
    /// inconsistent with the null; rather than masking that with a tiny
    /// floor, this records the offending pedigree's index in `fatal` and
    /// returns NaN, which the evaluator already rejects as an error — the
    /// caller recovers the pedigree index from `fatal` to report the
    /// precise failure.
    fn slice_integrand(&self, x: &[f64], theta: f64, fatal: &AtomicUsize) -> f64 {
        let (penetrance, jacobian) = jacobian::ordered_simplex(x);

        let mut accumulator = accumulate::BrAccumulator::new();
        for (index, pedigree) in self.pedigrees.iter().enumerate() {
            let free = pedigree.likelihood(&penetrance, 0.5);
            if free == 0.0 {
                fatal.store(index, Ordering::Relaxed);
                return f64::NAN;
            }
            let linked = pedigree.likelihood(&penetrance, theta);
            let homo_lr = linked / free;
            let mixed = mixture::alpha_integral(|_alpha| homo_lr);
            accumulator.accumulate(mixed);
        }

        accumulator.bayes_ratio() * jacobian
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedigree::DeterministicPedigree;

    struct ZeroAtNullPedigree;

    impl PedigreeModel for ZeroAtNullPedigree {
        fn likelihood(&self, _penetrance: &[f64], theta: f64) -> f64 {
            if theta == 0.5 {
                0.0
            } else {
                1.0
            }
        }
    }

    #[test]
    fn scan_produces_one_result_per_slice() {
        let config = BayesDriverConfig {
            slices: vec![
                Slice { theta: 0.0, d_prime: None },
                Slice { theta: 0.25, d_prime: None },
                Slice { theta: 0.5, d_prime: None },
            ],
            penetrance_dims: 2,
            max_calls: 5_000,
            ..Default::default()
        };
        let pedigrees: Vec<Box<dyn PedigreeModel>> = vec![Box::new(DeterministicPedigree {
            affected_count: 3,
            unaffected_count: 2,
        })];
        let driver = BayesDriver::new(config, pedigrees);
        let results = driver.run().unwrap();
        assert_eq!(results.len(), 3);
        for r in &results {
            assert!(r.ppl.is_finite() && r.ppl >= 0.0 && r.ppl <= 1.0);
        }
    }

    #[test]
    fn theta_zero_is_at_least_as_supportive_of_linkage_as_theta_half() {
        let config = BayesDriverConfig {
            slices: vec![Slice { theta: 0.0, d_prime: None }, Slice { theta: 0.5, d_prime: None }],
            penetrance_dims: 2,
            max_calls: 5_000,
            ..Default::default()
        };
        let pedigrees: Vec<Box<dyn PedigreeModel>> = vec![Box::new(DeterministicPedigree {
            affected_count: 4,
            unaffected_count: 1,
        })];
        let driver = BayesDriver::new(config, pedigrees);
        let results = driver.run().unwrap();
        assert!(results[0].bayes_ratio >= results[1].bayes_ratio * 0.99);
    }

    #[test]
    fn zero_null_likelihood_is_a_fatal_error_not_a_silent_floor() {
        let config = BayesDriverConfig {
            slices: vec![Slice { theta: 0.1, d_prime: None }],
            penetrance_dims: 2,
            max_calls: 5_000,
            ..Default::default()
        };
        let pedigrees: Vec<Box<dyn PedigreeModel>> = vec![Box::new(ZeroAtNullPedigree)];
        let driver = BayesDriver::new(config, pedigrees);
        assert!(matches!(driver.run(), Err(CubatureError::NullLikelihoodIsZero { pedigree: 0 })));
    }

    #[test]
    fn summarize_derives_ppl_ld_ppl_and_ppld_from_scanned_slices() {
        let config = BayesDriverConfig {
            slices: vec![Slice { theta: 0.0, d_prime: None }, Slice { theta: 0.5, d_prime: None }],
            prior: 0.02,
            ld_prior: 0.02,
            penetrance_dims: 2,
            max_calls: 5_000,
            ..Default::default()
        };
        let pedigrees: Vec<Box<dyn PedigreeModel>> = vec![Box::new(DeterministicPedigree {
            affected_count: 3,
            unaffected_count: 1,
        })];
        let driver = BayesDriver::new(config, pedigrees);
        let results = driver.run().unwrap();
        let summary = driver.summarize(&results);
        assert!(summary.ppl.is_finite() && (0.0..=1.0).contains(&summary.ppl));
        assert!(summary.ld_ppl.is_finite());
        assert!(summary.ppld_given_linkage.is_finite());
        assert!(summary.ppld_allowing_linkage.is_finite());
        // no LD slices were scanned, so LD-evidence-only PPLD should be near zero
        assert!(summary.ppld_given_linkage < 0.5);
    }
}
