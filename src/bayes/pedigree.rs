/// the per-family likelihood computation (Elston-Stewart peeling over a
/// pedigree's genotypes/phenotypes at a fixed recombination fraction and
/// penetrance vector) is explicitly out of scope; callers supply their own
/// implementation of this trait and the driver treats it as a black box,
/// the same way the reference program treats `cl_likelihood` as an
/// external routine plugged in by the rest of the analysis package.
pub trait PedigreeModel: Send + Sync {
    /// likelihood of this pedigree's observed data given an ordered
    /// penetrance vector and a recombination fraction theta in `[0, 0.5]`.
    fn likelihood(&self, penetrance: &[f64], theta: f64) -> f64;
}

/// a simple closed-form stand-in used by tests and examples: treats each
/// penetrance as an independent Bernoulli parameter and theta as a direct
/// multiplicative linkage signal. Not a substitute for a real peeling
/// engine, just enough to exercise the driver end to end.
pub struct DeterministicPedigree {
    pub affected_count: usize,
    pub unaffected_count: usize,
}

impl PedigreeModel for DeterministicPedigree {
    fn likelihood(&self, penetrance: &[f64], theta: f64) -> f64 {
        let f = penetrance.last().copied().unwrap_or(0.5).clamp(1e-9, 1.0 - 1e-9);
        let linkage_signal = 1.0 - 2.0 * theta;
        let affected_term = f.powi(self.affected_count as i32);
        let unaffected_term = (1.0 - f).powi(self.unaffected_count as i32);
        (affected_term * unaffected_term * (0.5 + 0.5 * linkage_signal)).max(1e-300)
    }
}
