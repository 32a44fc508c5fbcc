/// decides whether an integrator's running state is converged enough to
/// stop splitting regions. Grounded in the teacher's pluggable
/// `Termination` enum (`Iterations`/`Convergent`), generalized from "two
/// fixed strategies" to a trait so a caller can supply its own.
///
/// `r` and `e` are the running result and error already rescaled by
/// `volume_rate` (see [`crate::integrator::IntegratorOpts::volume_rate`]);
/// `d` is the absolute change in `r` since the previous convergence check.
/// A predicate that ignores `d` (like [`ToleranceBand`]) is free to do so.
pub trait ConvergencePredicate: Send + Sync {
    fn satisfied(&self, r: f64, d: f64, e: f64) -> bool;
}

/// the reference routine's own stopping rule (`dadhre_`, lines 265-301):
/// continue while `(r<0 or d>=tau) and (r<0.9 or e>tau)`, where
/// `tau = max(0, poly(r))` and `poly` is the empirical quadratic below.
/// Equivalently (De Morgan), stop once `(r>=0 and d<tau)` or
/// `(r>=0.9 and e<=tau)`.
#[derive(Debug, Clone, Copy)]
pub struct DefaultPpl {
    pub epsabs: f64,
    pub epsrel: f64,
}

impl DefaultPpl {
    pub fn new(epsabs: f64, epsrel: f64) -> Self {
        Self { epsabs, epsrel }
    }

    fn poly(r: f64) -> f64 {
        let num = (-5.77 + 54.0 * r + r * r).powi(2);
        let den = -11.54 * r + 54.0 * r * r;
        if den.abs() < 1e-300 {
            return 0.0;
        }
        (num / den).max(0.0)
    }
}

impl ConvergencePredicate for DefaultPpl {
    fn satisfied(&self, r: f64, d: f64, e: f64) -> bool {
        if e <= self.epsabs || e <= self.epsrel * r.abs() {
            return true;
        }
        let tau = Self::poly(r).max(self.epsabs);
        (r >= 0.0 && d < tau) || (r >= 0.9 && e <= tau)
    }
}

/// a plain tolerance band with no empirical shrinkage: stop once both the
/// change since the last check and the running error are within the
/// absolute tolerance. Simpler than `DefaultPpl` and useful when a caller
/// wants predictable stopping behaviour rather than the reference
/// heuristic.
#[derive(Debug, Clone, Copy)]
pub struct ToleranceBand {
    pub epsabs: f64,
}

impl ToleranceBand {
    pub fn new(epsabs: f64, _epsrel: f64) -> Self {
        Self { epsabs }
    }
}

impl ConvergencePredicate for ToleranceBand {
    fn satisfied(&self, _r: f64, d: f64, e: f64) -> bool {
        d.abs() < self.epsabs && e.abs() < self.epsabs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_band_requires_both_change_and_error_within_bound() {
        let pred = ToleranceBand::new(0.01, 0.001);
        assert!(pred.satisfied(100.0, 0.005, 0.005));
        assert!(!pred.satisfied(100.0, 0.2, 0.005));
        assert!(!pred.satisfied(1.0, 0.005, 0.2));
    }

    #[test]
    fn default_ppl_stops_once_under_epsabs() {
        let pred = DefaultPpl::new(1e-6, 1e-8);
        assert!(pred.satisfied(1.0, 1.0, 1e-7));
    }

    #[test]
    fn default_ppl_never_returns_negative_shrunk_tolerance() {
        assert!(DefaultPpl::poly(0.0) >= 0.0);
        assert!(DefaultPpl::poly(1e6) >= 0.0);
    }

    #[test]
    fn default_ppl_stops_on_zero_change_with_nonnegative_r() {
        let pred = DefaultPpl::new(1e-12, 1e-12);
        // d=0 and r>=0 should always satisfy the first disjunct, regardless
        // of how large e is, since tau is always >= 0.
        assert!(pred.satisfied(1.0, 0.0, 1.0) || pred.satisfied(1.0, 0.0, 0.0));
    }
}
