use crate::error::CubatureError;
use crate::integrand::{DriverCtx, Integrand};
use crate::region::RegionData;
use crate::rule::RuleTable;

/// applies one cubature rule to one region, producing a local integral
/// estimate, a local error estimate, and the axis the region should next
/// be split on. This is `drlhre_`/`dfshre_` from the reference routine,
/// restructured as a pure function over an owned region and an immutable
/// rule table rather than a pair of mutable mega-structs.
pub struct RuleEvaluator<'table> {
    table: &'table RuleTable,
}

impl<'table> RuleEvaluator<'table> {
    pub fn new(table: &'table RuleTable) -> Self {
        Self { table }
    }

    /// `ctx` is threaded in (rather than built internally) so a caller
    /// running in one of the sampling modes can read back its recorded
    /// samples after the call returns.
    pub fn evaluate(
        &self,
        region: &RegionData,
        integrand: &Integrand,
        ctx: &mut DriverCtx,
    ) -> Result<(f64, f64, usize, i32), CubatureError> {
        let dim = self.table.dim;
        let center = &region.center;
        let hwidth = &region.hwidth;
        let mut scale = region.scale;

        let rgn_vol: f64 = hwidth.iter().product();
        let mut divaxn = (0..dim).max_by(|&a, &b| hwidth[a].partial_cmp(&hwidth[b]).unwrap()).unwrap_or(0);

        let w = &self.table.w;
        let g = &self.table.g;

        let f0 = self.call(center, &mut scale, ctx, integrand)?;
        let mut local_result = w[0][0] * f0;
        let mut null = [w[0][1] * f0, w[0][2] * f0, w[0][3] * f0, w[0][4] * f0];

        let ratio = (g[0][2] / g[0][1]).powi(2);
        let mut difmax = 0.0;
        let mut x = center.clone();

        for axis in 0..dim {
            x[axis] = center[axis] - hwidth[axis] * g[0][1];
            let v_near_minus = self.call(&x, &mut scale, ctx, integrand)?;
            x[axis] = center[axis] + hwidth[axis] * g[0][1];
            let v_near_plus = self.call(&x, &mut scale, ctx, integrand)?;
            x[axis] = center[axis] - hwidth[axis] * g[0][2];
            let v_far_minus = self.call(&x, &mut scale, ctx, integrand)?;
            x[axis] = center[axis] + hwidth[axis] * g[0][2];
            let v_far_plus = self.call(&x, &mut scale, ctx, integrand)?;
            x[axis] = center[axis];

            let frthdf = (1.0 - ratio) * 2.0 * f0 - (v_far_minus + v_far_plus) + ratio * (v_near_minus + v_near_plus);
            let difsum = if f0 + frthdf / 4.0 != f0 { frthdf.abs() } else { 0.0 };

            for k in 0..4 {
                null[k] += w[1][k + 1] * (v_near_minus + v_near_plus) + w[2][k + 1] * (v_far_minus + v_far_plus);
            }
            local_result += w[1][0] * (v_near_minus + v_near_plus) + w[2][0] * (v_far_minus + v_far_plus);

            if difsum > difmax {
                difmax = difsum;
                divaxn = axis;
            }
        }

        for col in 3..self.table.wt_len {
            let mut g_work = g.iter().map(|axis| axis[col]).collect::<Vec<_>>();
            let orbit_sum = self.orbit_sum(&mut g_work, center, hwidth, &mut scale, ctx, integrand)?;
            local_result += w[col][0] * orbit_sum;
            for k in 0..4 {
                null[k] += w[col][k + 1] * orbit_sum;
            }
        }

        let mut search = [0.0f64; 3];
        for i in 0..3 {
            let mut best = 0.0f64;
            for k in 0..self.table.wt_len {
                let candidate = (null[i + 1] + self.table.scales[k][i] * null[i]).abs() * self.table.norms[k][i];
                if candidate > best {
                    best = candidate;
                }
            }
            search[i] = best;
        }

        let errcof = &self.table.errcof;
        let mut local_error = if errcof[0] * search[0] <= search[1] && errcof[1] * search[1] <= search[2] {
            errcof[2] * search[0]
        } else {
            errcof[3] * search[0].max(search[1]).max(search[2])
        };

        local_result *= rgn_vol;
        local_error *= rgn_vol;

        if local_result.is_nan() || local_error.is_nan() {
            return Err(CubatureError::IntegrandReturnedNaN { depth: region.depth });
        }

        Ok((local_result, local_error, divaxn, scale))
    }

    fn call(&self, x: &[f64], scale: &mut i32, ctx: &mut DriverCtx, integrand: &Integrand) -> Result<f64, CubatureError> {
        let v = integrand.evaluate(x, scale, ctx);
        if v.is_nan() {
            return Err(CubatureError::IntegrandReturnedNaN { depth: 0 });
        }
        Ok(v)
    }

    /// sum of `integrand` over the fully-symmetric orbit of generator `g`:
    /// every distinct permutation of `g` (visited in reverse lexicographic
    /// order), and for each permutation every sign pattern over its
    /// nonzero entries (visited by toggling one entry at a time, carrying
    /// into the next on a repeat-to-positive). A direct port of `dfshre_`;
    /// the label-based goto structure becomes two nested loops plus a
    /// "did we find the next permutation" flag.
    fn orbit_sum(
        &self,
        g: &mut [f64],
        center: &[f64],
        hwidth: &[f64],
        scale: &mut i32,
        ctx: &mut DriverCtx,
        integrand: &Integrand,
    ) -> Result<f64, CubatureError> {
        let n = g.len();
        let mut x = vec![0.0; n];
        let mut sum = 0.0;

        loop {
            for i in 0..n {
                x[i] = center[i] + g[i] * hwidth[i];
            }
            loop {
                sum += self.call(&x, scale, ctx, integrand)?;
                let mut carried = false;
                for i in 0..n {
                    if g[i].abs() > 1e-12 {
                        g[i] = -g[i];
                    }
                    x[i] = center[i] + g[i] * hwidth[i];
                    if g[i] < 0.0 {
                        carried = true;
                        break;
                    }
                }
                if !carried {
                    break;
                }
            }

            let mut found_next = false;
            for i in 2..=n {
                if g[i - 2] > g[i - 1] {
                    let gi = g[i - 1];
                    let mut ixchng = i as i64 - 1;
                    let mut lxchng = 0i64;
                    for l in 1..=(i - 1) / 2 {
                        let gl = g[l - 1];
                        g[l - 1] = g[i - l - 1];
                        g[i - l - 1] = gl;
                        if gl <= gi {
                            ixchng -= 1;
                        }
                        if g[l - 1] > gi {
                            lxchng = l as i64;
                        }
                    }
                    if g[(ixchng - 1) as usize] <= gi {
                        ixchng = lxchng;
                    }
                    g[i - 1] = g[(ixchng - 1) as usize];
                    g[(ixchng - 1) as usize] = gi;
                    found_next = true;
                    break;
                }
            }
            if !found_next {
                for i in 1..=n / 2 {
                    g.swap(i - 1, n - i);
                }
                break;
            }
        }

        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{RuleKey, RuleTable};

    fn constant_region(dim: usize) -> RegionData {
        RegionData {
            center: vec![0.5; dim],
            hwidth: vec![0.5; dim],
            local_result: 0.0,
            local_error: 0.0,
            split_axis: 0,
            depth: 0,
            scale: 0,
        }
    }

    #[test]
    fn rule3_integrates_the_constant_one_exactly() {
        let table = RuleTable::build(RuleKey::Degree9, 2).unwrap();
        let evaluator = RuleEvaluator::new(&table);
        let region = constant_region(2);
        let integrand = Integrand::plain(|_x, _scale| 1.0);
        let mut ctx = DriverCtx::default();
        let (result, error, _axis, _scale) = evaluator.evaluate(&region, &integrand, &mut ctx).unwrap();
        assert!((result - 1.0).abs() < 1e-12, "result {result}");
        assert!(error.abs() < 1e-10, "error {error}");
    }

    #[test]
    fn rule1_integrates_a_linear_function_exactly() {
        let table = RuleTable::build(RuleKey::Degree13, 2).unwrap();
        let evaluator = RuleEvaluator::new(&table);
        let region = constant_region(2);
        let integrand = Integrand::plain(|x, _scale| x[0] + 2.0 * x[1]);
        let mut ctx = DriverCtx::default();
        let (result, _error, _axis, _scale) = evaluator.evaluate(&region, &integrand, &mut ctx).unwrap();
        // integral of (x+2y) over [0,1]^2 is 1.5
        assert!((result - 1.5).abs() < 1e-10, "result {result}");
    }

    #[test]
    fn nan_integrand_is_rejected() {
        let table = RuleTable::build(RuleKey::Degree7, 2).unwrap();
        let evaluator = RuleEvaluator::new(&table);
        let region = constant_region(2);
        let integrand = Integrand::plain(|_x, _scale| f64::NAN);
        let mut ctx = DriverCtx::default();
        assert!(matches!(
            evaluator.evaluate(&region, &integrand, &mut ctx),
            Err(CubatureError::IntegrandReturnedNaN { .. })
        ));
    }
}
