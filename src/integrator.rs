use crate::convergence::ConvergencePredicate;
use crate::error::CubatureError;
use crate::evaluator::RuleEvaluator;
use crate::integrand::{DriverCtx, Integrand};
use crate::region::RegionTree;
use crate::rule::{RuleKey, RuleTable};
use log::{debug, info, warn};
use petgraph::graph::NodeIndex;

/// which of the reference routine's three calling conventions an
/// [`Integrator::run`] should follow: the full adaptive loop, or one of
/// the two single-evaluation sampling shortcuts used by the Bayes driver
/// to read back a rule's internal sample points rather than an integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// run the full S0-S3 adaptive loop and report an integral estimate.
    #[default]
    Normal,
    /// evaluate the rule once at the root and report the sampled points
    /// and their weights, collected via [`DriverCtx`], instead of
    /// subdividing.
    Collect,
    /// evaluate the rule once at the root and report only the axis the
    /// rule would next split on. No semantics beyond "the axis the rule
    /// would choose" are assumed of this value.
    SplitAxisOnly,
}

/// knobs for one [`Integrator::run`], analogous to the reference routine's
/// `MAXCLS`/`KEY`/`RESTAR` arguments bundled into one struct instead of a
/// long positional call.
#[derive(Debug, Clone)]
pub struct IntegratorOpts {
    pub rule: RuleKey,
    pub max_calls: usize,
    pub min_calls: usize,
    /// hard cap on region count; once a split would exceed it (and the
    /// one-time negative-result retry has already been used, see
    /// [`Status::NonPositiveIntegral`]), the run stops with
    /// [`Status::BudgetExhausted`].
    pub max_regions: usize,
    pub min_regions: usize,
    /// absolute/relative tolerance mirrored from the reference driver's
    /// `EPSABS`/`EPSREL` arguments. `Integrator::run` doesn't consume
    /// these directly (the caller-supplied [`ConvergencePredicate`]
    /// already encapsulates a stopping tolerance); they exist so a
    /// caller can build a predicate from the same opts struct it is
    /// otherwise threading through, the way the Bayes driver does.
    pub eps_abs: f64,
    pub eps_rel: f64,
    /// divisor applied to the running result/error before they're fed to
    /// the convergence predicate, mirroring the reference driver's
    /// `VOLUME_RATE` (the ratio between the box volume and a reference
    /// volume the result is expected to approximate, e.g. 1 for a
    /// probability mass). 1.0 is a no-op rescale.
    pub volume_rate: f64,
    /// 0 = warnings only, 1 = info-level per-split summaries, 2 = debug.
    pub verbose: u8,
    pub sampling_mode: SamplingMode,
}

impl Default for IntegratorOpts {
    fn default() -> Self {
        Self {
            rule: RuleKey::Auto,
            max_calls: 1_000_000,
            min_calls: 0,
            max_regions: 2_000,
            min_regions: 0,
            eps_abs: 1e-8,
            eps_rel: 1e-8,
            volume_rate: 1.0,
            verbose: 0,
            sampling_mode: SamplingMode::Normal,
        }
    }
}

/// terminal state of one adaptive run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Converged,
    BudgetExhausted,
    /// the running result went negative; the one-time automatic
    /// `max_regions` doubling (S2) didn't fix it, so the run stopped and
    /// reports its best estimate alongside this soft-error status.
    NonPositiveIntegral,
}

/// everything a caller needs out of a completed integration.
#[derive(Debug, Clone)]
pub struct IntegrationOutcome {
    pub result: f64,
    pub error: f64,
    pub status: Status,
    pub regions_used: usize,
    pub evaluations: usize,
    pub max_scale: i32,
    /// the axis the root rule evaluation chose to split on next. Always
    /// populated; only load-bearing when `sampling_mode` is
    /// [`SamplingMode::SplitAxisOnly`].
    pub split_axis: usize,
    /// sampled points and weights from the root evaluation, populated
    /// only when `sampling_mode` is [`SamplingMode::Collect`].
    pub samples: Option<Vec<(Vec<f64>, f64)>>,
    /// the sequence of `|R - R_prev|` values observed across convergence
    /// checks, most recent last.
    pub history: Vec<f64>,
}

/// drives the adaptive region-refinement loop (`dadhre_`): evaluate the
/// whole box once, then repeatedly bisect the leaf with the largest
/// estimated error until the convergence predicate is satisfied or the
/// evaluation budget runs out.
pub struct Integrator {
    table: RuleTable,
    tree: RegionTree,
}

impl Integrator {
    pub fn new(rule: RuleKey, lower: &[f64], upper: &[f64]) -> Result<Self, CubatureError> {
        let dim = lower.len();
        let table = RuleTable::build(rule, dim)?;
        let tree = RegionTree::with_root(lower, upper)?;
        Ok(Self { table, tree })
    }

    pub fn region_count(&self) -> usize {
        self.tree.region_count()
    }

    pub fn tree(&self) -> &RegionTree {
        &self.tree
    }

    pub fn run(
        &mut self,
        integrand: &Integrand,
        predicate: &dyn ConvergencePredicate,
        opts: &IntegratorOpts,
    ) -> Result<IntegrationOutcome, CubatureError> {
        if opts.max_calls < 3 * self.table.n_points {
            return Err(CubatureError::BudgetTooSmall {
                max_calls: opts.max_calls,
                n_points: self.table.n_points,
            });
        }

        let evaluator = RuleEvaluator::new(&self.table);
        let mut ctx = DriverCtx::default();

        let root_index = self.tree.root().index();
        let (result, error, axis, scale) = evaluator.evaluate(self.tree.root().data(), integrand, &mut ctx)?;
        self.tree.set_evaluation(root_index, result, error, axis, scale);

        if opts.sampling_mode != SamplingMode::Normal {
            return Ok(IntegrationOutcome {
                result,
                error,
                status: Status::Converged,
                regions_used: self.tree.region_count(),
                evaluations: self.table.n_points,
                max_scale: scale,
                split_axis: axis,
                samples: matches!(opts.sampling_mode, SamplingMode::Collect).then(|| std::mem::take(&mut ctx.samples)),
                history: Vec::new(),
            });
        }

        let mut max_calls = opts.max_calls;
        let mut max_regions = opts.max_regions;
        let mut negative_retry_used = false;

        let mut running_result = result;
        let mut running_error = error;
        let mut evaluations = self.table.n_points;
        let mut max_scale = scale;

        let mut r_prev = running_result / opts.volume_rate;
        let mut history = Vec::new();
        let mut last_axis = axis;

        let status = loop {
            let r = running_result / opts.volume_rate;
            let e = running_error.abs() / opts.volume_rate;
            let d = (r - r_prev).abs();
            history.push(d);

            let enough_work = evaluations >= opts.min_calls && self.tree.region_count() >= opts.min_regions;
            if enough_work && predicate.satisfied(r, d, e) {
                break Status::Converged;
            }
            r_prev = r;

            if running_result < 0.0 {
                if negative_retry_used {
                    warn!(
                        "running result {running_result:.3e} is negative again after the one-time max_regions doubling; \
                         reporting best estimate with status NonPositiveIntegral"
                    );
                    break Status::NonPositiveIntegral;
                }
                warn!("running result {running_result:.3e} went negative; doubling max_regions and continuing");
                max_regions *= 2;
                negative_retry_used = true;
            }

            if evaluations + 2 * self.table.n_points > max_calls || self.tree.region_count() + 2 > max_regions {
                break Status::BudgetExhausted;
            }

            let worst = self.worst_leaf();
            let worst_data = self.tree.get(worst).data().clone();
            let (left, right) = self.tree.split(worst, worst_data.split_axis);

            for child in [left, right] {
                let data = self.tree.get(child).data().clone();
                let (r, e, axis, scale) = evaluator.evaluate(&data, integrand, &mut ctx)?;
                self.tree.set_evaluation(child, r, e, axis, scale);
                max_scale = max_scale.max(scale);
                last_axis = axis;
            }
            evaluations += 2 * self.table.n_points;

            let left_result = self.tree.get(left).data().local_result;
            let left_error = self.tree.get(left).data().local_error;
            let right_result = self.tree.get(right).data().local_result;
            let right_error = self.tree.get(right).data().local_error;

            running_result = running_result - worst_data.local_result + left_result + right_result;
            running_error = running_error - worst_data.local_error + left_error + right_error;

            match opts.verbose {
                0 => {}
                1 => info!(
                    "region {} split on axis {}: result={running_result:.6e} error={running_error:.3e}",
                    self.tree.region_count() - 2,
                    worst_data.split_axis
                ),
                _ => debug!(
                    "region {} split on axis {}: result={running_result:.6e} error={running_error:.3e}",
                    self.tree.region_count() - 2,
                    worst_data.split_axis
                ),
            }
        };

        Ok(IntegrationOutcome {
            result: running_result,
            error: running_error,
            status,
            regions_used: self.tree.region_count(),
            evaluations,
            max_scale,
            split_axis: last_axis,
            samples: None,
            history,
        })
    }

    fn worst_leaf(&self) -> NodeIndex {
        self.tree
            .leaves()
            .max_by(|a, b| a.data().local_error.partial_cmp(&b.data().local_error).unwrap())
            .expect("at least the root leaf exists")
            .index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convergence::ToleranceBand;

    #[test]
    fn converges_on_a_smooth_integrand() {
        let mut integrator = Integrator::new(RuleKey::Auto, &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        let integrand = Integrand::plain(|x, _scale| (x[0] * x[0] + x[1] * x[1]).exp());
        let predicate = ToleranceBand::new(1e-6, 1e-6);
        let opts = IntegratorOpts {
            max_calls: 200_000,
            ..Default::default()
        };
        let outcome = integrator.run(&integrand, &predicate, &opts).unwrap();
        assert_eq!(outcome.status, Status::Converged);
        assert!(outcome.regions_used >= 1);
    }

    #[test]
    fn rejects_a_dimension_below_the_supported_range() {
        let integrator_result = Integrator::new(RuleKey::Auto, &[0.0], &[1.0]);
        assert!(integrator_result.is_err());
    }

    #[test]
    fn reports_budget_exhausted_when_max_regions_is_tiny_and_unmovable() {
        let mut integrator = Integrator::new(RuleKey::Auto, &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        let integrand = Integrand::plain(|x, _scale| 1.0 / (1e-9 + x[0] * x[1]));
        let predicate = ToleranceBand::new(1e-12, 1e-12);
        let opts = IntegratorOpts {
            max_calls: 10_000,
            max_regions: 1,
            ..Default::default()
        };
        let outcome = integrator.run(&integrand, &predicate, &opts).unwrap();
        assert_ne!(outcome.status, Status::Converged);
    }

    #[test]
    fn zero_splits_on_a_predicate_satisfied_by_the_root_evaluation_alone() {
        // the very first convergence check compares r against itself
        // (r_prev seeded from the root), so d=0 and a loose tolerance
        // band is satisfied before any split happens.
        let mut integrator = Integrator::new(RuleKey::Auto, &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        let integrand = Integrand::plain(|_x, _scale| 1.0);
        let predicate = ToleranceBand::new(1e-8, 1e-8);
        let table_points = {
            let t = crate::rule::RuleTable::build(RuleKey::Auto, 2).unwrap();
            t.n_points
        };
        let opts = IntegratorOpts {
            max_calls: 100_000,
            ..Default::default()
        };
        let outcome = integrator.run(&integrand, &predicate, &opts).unwrap();
        assert_eq!(outcome.status, Status::Converged);
        assert_eq!(outcome.evaluations, table_points);
        assert_eq!(outcome.regions_used, 1);
    }

    #[test]
    fn sampling_mode_collect_reports_samples_without_subdividing() {
        let mut integrator = Integrator::new(RuleKey::Auto, &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        let integrand = Integrand::sampling(|x, ctx| {
            let v = x[0] + x[1];
            ctx.record(x, v);
            v
        });
        let predicate = ToleranceBand::new(1e-12, 1e-12);
        let opts = IntegratorOpts {
            max_calls: 100_000,
            sampling_mode: SamplingMode::Collect,
            ..Default::default()
        };
        let outcome = integrator.run(&integrand, &predicate, &opts).unwrap();
        assert_eq!(outcome.regions_used, 1);
        assert!(outcome.samples.is_some());
        assert!(!outcome.samples.unwrap().is_empty());
    }

    #[test]
    fn sampling_mode_split_axis_only_reports_an_axis_without_subdividing() {
        let mut integrator = Integrator::new(RuleKey::Auto, &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        let integrand = Integrand::plain(|x, _scale| x[0] * x[0] + x[1]);
        let predicate = ToleranceBand::new(1e-12, 1e-12);
        let opts = IntegratorOpts {
            max_calls: 100_000,
            sampling_mode: SamplingMode::SplitAxisOnly,
            ..Default::default()
        };
        let outcome = integrator.run(&integrand, &predicate, &opts).unwrap();
        assert_eq!(outcome.regions_used, 1);
        assert!(outcome.split_axis < 2);
        assert!(outcome.samples.is_none());
    }

    #[test]
    fn negative_running_result_reports_non_positive_integral_after_one_retry() {
        let mut integrator = Integrator::new(RuleKey::Auto, &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        // a function that is negative almost everywhere keeps the running
        // result negative through the one-time retry doubling.
        let integrand = Integrand::plain(|x, _scale| -1.0 - x[0] * x[1]);
        let predicate = ToleranceBand::new(1e-14, 1e-14);
        let opts = IntegratorOpts {
            max_calls: 2_000,
            max_regions: 4,
            ..Default::default()
        };
        let outcome = integrator.run(&integrand, &predicate, &opts).unwrap();
        assert_eq!(outcome.status, Status::NonPositiveIntegral);
        assert!(outcome.result < 0.0);
    }
}
