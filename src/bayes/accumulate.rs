/// `log10`-domain saturation bounds matching `DBL_MAX_10_EXP`/
/// `DBL_MIN_10_EXP` for `f64`, the guard rails the reference driver checks
/// before every `pow(10, x)` so a single pathological family can't push the
/// combined likelihood ratio to `inf`/`0` and poison every other family's
/// contribution.
const LOG10_MAX: f64 = 308.0;
const LOG10_MIN: f64 = -307.0;

/// running combination of per-family Bayes ratios, kept in `log10` space
/// because independent families combine by multiplying likelihood ratios,
/// which underflows/overflows far sooner in linear space than in log space.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrAccumulator {
    log10_sum: f64,
}

impl BrAccumulator {
    pub fn new() -> Self {
        Self { log10_sum: 0.0 }
    }

    /// folds in one family's likelihood ratio, clamping its log10 first so
    /// a single extreme family can't single-handedly saturate the running
    /// sum before the clamp at `combined()` gets a chance to act.
    pub fn accumulate(&mut self, family_lr: f64) {
        let log10_lr = family_lr.max(f64::MIN_POSITIVE).log10().clamp(LOG10_MIN, LOG10_MAX);
        self.log10_sum = (self.log10_sum + log10_lr).clamp(LOG10_MIN, LOG10_MAX);
    }

    pub fn log10_bayes_ratio(&self) -> f64 {
        self.log10_sum
    }

    pub fn bayes_ratio(&self) -> f64 {
        10f64.powf(self.log10_sum)
    }
}

/// posterior probability of linkage given a combined Bayes ratio and a
/// prior probability of linkage, per the reference formula
/// `ppl = br / (br + (1 - prior) / prior)` — the posterior-odds form of
/// Bayes' rule divided through by `prior` so it's stable as `prior -> 0`.
pub fn ppl_from_bayes_ratio(bayes_ratio: f64, prior: f64) -> f64 {
    debug_assert!(prior > 0.0 && prior < 1.0, "prior must be a proper probability");
    bayes_ratio / (bayes_ratio + (1.0 - prior) / prior)
}

/// fixed θ-cutoff weights transcribed verbatim from `calc_updated_ppl.c`'s
/// `calc_upd_ppl_allowing_ld`/`calc_upd_ppld_*` family: the prior mass
/// assigned to the small-theta and big-theta regions under linkage (LD)
/// and under the null (LE). Each pair sums to 1.
const WEIGHT_SMALL_THETA_LD: f64 = 0.021;
const WEIGHT_BIG_THETA_LD: f64 = 0.0011;
const WEIGHT_SMALL_THETA_LE: f64 = 0.979;
const WEIGHT_BIG_THETA_LE: f64 = 0.9989;

/// the six Bayes-ratio mass accumulators the driver partitions slice
/// results into (§4.5 step 5): (small-θ vs big-θ vs unlinked) crossed with
/// (evaluated under LD vs under LE). Each cell sums the Bayes ratios of
/// every slice landing in it, in linear space — mirroring the reference
/// driver's `st_ldvals` accumulators, which are plain `double` sums, not
/// log10 sums like [`BrAccumulator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LdCells {
    pub ld_small_theta: f64,
    pub ld_big_theta: f64,
    pub ld_unlinked: f64,
    pub le_small_theta: f64,
    pub le_big_theta: f64,
    pub le_unlinked: f64,
}

impl LdCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// folds one slice's Bayes ratio into the appropriate cell, given its
    /// theta, whether it was evaluated under LD (`d_prime` non-zero), and
    /// the small/big-theta cutoff.
    pub fn accumulate(&mut self, theta: f64, d_prime: Option<f64>, bayes_ratio: f64, theta_cutoff: f64) {
        let is_ld = d_prime.map(|d| d != 0.0).unwrap_or(false);
        let unlinked = theta >= 0.5;
        let small = theta < theta_cutoff;
        match (is_ld, unlinked, small) {
            (true, true, _) => self.ld_unlinked += bayes_ratio,
            (true, false, true) => self.ld_small_theta += bayes_ratio,
            (true, false, false) => self.ld_big_theta += bayes_ratio,
            (false, true, _) => self.le_unlinked += bayes_ratio,
            (false, false, true) => self.le_small_theta += bayes_ratio,
            (false, false, false) => self.le_big_theta += bayes_ratio,
        }
    }

    /// PPL: posterior probability of linkage, from the LE cells alone
    /// (`calc_upd_ppl`).
    pub fn ppl(&self, prior: f64) -> f64 {
        let numerator = (self.le_small_theta + self.le_big_theta) * prior;
        let denom_right = 1.0 - prior;
        numerator / (numerator + denom_right)
    }

    /// LD-PPL: posterior probability of linkage allowing for LD
    /// (`calc_upd_ppl_allowing_ld`).
    pub fn ld_ppl(&self, ld_prior: f64) -> f64 {
        let numerator = self.ld_small_theta * ld_prior * WEIGHT_SMALL_THETA_LD
            + self.ld_big_theta * ld_prior * WEIGHT_BIG_THETA_LD
            + self.le_small_theta * ld_prior * WEIGHT_SMALL_THETA_LE
            + self.le_big_theta * ld_prior * WEIGHT_BIG_THETA_LE;
        let denom_right = self.le_unlinked * (1.0 - ld_prior);
        numerator / (numerator + denom_right)
    }

    /// PPLD|L: posterior probability of LD given linkage
    /// (`calc_upd_ppld_given_linkage`).
    pub fn ppld_given_linkage(&self, ld_prior: f64) -> f64 {
        let numerator = self.ld_small_theta * ld_prior * WEIGHT_SMALL_THETA_LD + self.ld_big_theta * ld_prior * WEIGHT_BIG_THETA_LD;
        let denom_right = self.le_small_theta * ld_prior * WEIGHT_SMALL_THETA_LE + self.le_big_theta * ld_prior * WEIGHT_BIG_THETA_LE;
        numerator / (numerator + denom_right)
    }

    /// PPLD(L): posterior probability of LD allowing for linkage
    /// (`calc_upd_ppld_allowing_l`).
    pub fn ppld_allowing_linkage(&self, ld_prior: f64) -> f64 {
        let numerator = self.ld_small_theta * ld_prior * WEIGHT_SMALL_THETA_LD + self.ld_big_theta * ld_prior * WEIGHT_BIG_THETA_LD;
        let denom_right = self.le_small_theta * ld_prior * WEIGHT_SMALL_THETA_LE
            + self.le_big_theta * ld_prior * WEIGHT_BIG_THETA_LE
            + self.le_unlinked * (1.0 - ld_prior);
        numerator / (numerator + denom_right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn independent_families_multiply_in_linear_space() {
        let mut acc = BrAccumulator::new();
        acc.accumulate(2.0);
        acc.accumulate(3.0);
        assert!((acc.bayes_ratio() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_family_lr_does_not_panic_or_produce_nan() {
        let mut acc = BrAccumulator::new();
        acc.accumulate(1e300);
        acc.accumulate(1e300);
        assert!(acc.bayes_ratio().is_finite());
    }

    #[test]
    fn ppl_of_neutral_lr_equals_the_prior() {
        let ppl = ppl_from_bayes_ratio(1.0, 0.1);
        assert!((ppl - 0.1).abs() < 1e-12, "ppl {ppl}");
    }

    #[test]
    fn strong_bayes_ratio_pushes_ppl_toward_one() {
        let ppl = ppl_from_bayes_ratio(1e6, 0.001);
        assert!(ppl > 0.99, "ppl {ppl}");
    }

    #[test]
    fn ld_cells_classify_by_theta_cutoff_and_d_prime() {
        let mut cells = LdCells::new();
        cells.accumulate(0.01, None, 10.0, 0.05);
        cells.accumulate(0.2, None, 2.0, 0.05);
        cells.accumulate(0.5, None, 1.0, 0.05);
        cells.accumulate(0.01, Some(0.8), 20.0, 0.05);
        cells.accumulate(0.2, Some(0.8), 3.0, 0.05);
        cells.accumulate(0.5, Some(0.8), 1.0, 0.05);
        assert_eq!(cells.le_small_theta, 10.0);
        assert_eq!(cells.le_big_theta, 2.0);
        assert_eq!(cells.le_unlinked, 1.0);
        assert_eq!(cells.ld_small_theta, 20.0);
        assert_eq!(cells.ld_big_theta, 3.0);
        assert_eq!(cells.ld_unlinked, 1.0);
    }

    #[test]
    fn ld_ppl_collapses_to_ppl_when_ld_cells_are_empty() {
        let mut cells = LdCells::new();
        cells.accumulate(0.0, None, 10.0, 0.05);
        cells.accumulate(0.5, None, 1.0, 0.05);
        let ppl = cells.ppl(0.02);
        // scenario C's literal expectation: PPL = 0.02*10/(0.02*10+0.98)
        assert!((ppl - 0.02 * 10.0 / (0.02 * 10.0 + 0.98)).abs() < 1e-9, "ppl {ppl}");
    }

    #[test]
    fn ppld_given_linkage_is_near_zero_without_ld_evidence() {
        let mut cells = LdCells::new();
        cells.accumulate(0.0, None, 10.0, 0.05);
        cells.accumulate(0.5, None, 1.0, 0.05);
        let ppld = cells.ppld_given_linkage(0.02);
        assert!(ppld < 1e-6, "ppld {ppld}");
    }
}
