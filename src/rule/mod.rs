mod degree7;
mod degree9;
mod degree11;
mod degree13;

use crate::error::CubatureError;
use serde::{Deserialize, Serialize};

/// selects which fully-symmetric cubature rule a [`RuleTable`] is built
/// from. `Auto` defers to dimension-based selection the way the original
/// routine's key==0 branch does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKey {
    Auto,
    Degree13,
    Degree11,
    Degree9,
    Degree7,
}

impl RuleKey {
    fn resolve(self, dim: usize) -> Result<RuleKey, CubatureError> {
        match self {
            RuleKey::Auto => Ok(match dim {
                2 => RuleKey::Degree13,
                3 => RuleKey::Degree11,
                _ => RuleKey::Degree9,
            }),
            RuleKey::Degree13 if dim != 2 => Err(CubatureError::RuleDimensionMismatch {
                key: self,
                required: 2,
                dim,
            }),
            RuleKey::Degree11 if dim != 3 => Err(CubatureError::RuleDimensionMismatch {
                key: self,
                required: 3,
                dim,
            }),
            other => Ok(other),
        }
    }
}

/// static cubature data for one (rule, dimension) pair: generators, basic
/// and null-rule weights, derived error-estimation scales/norms, and the
/// heuristic error coefficients. Immutable once built, so it's cheap to
/// share across an entire `Integrator` run behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RuleTable {
    pub dim: usize,
    pub wt_len: usize,
    /// g[axis][column], values in [0, 1)
    pub g: Vec<Vec<f64>>,
    /// w[row][column]; row 0 is the basic rule, rows 1..=4 are null rules
    pub w: Vec<[f64; 5]>,
    pub orbit_size: Vec<f64>,
    /// scales[k][column] for k in 0..3
    pub scales: Vec<[f64; 3]>,
    /// norms[k][column] for k in 0..3
    pub norms: Vec<[f64; 3]>,
    pub errcof: [f64; 6],
    pub n_points: usize,
}

impl RuleTable {
    pub fn build(key: RuleKey, dim: usize) -> Result<RuleTable, CubatureError> {
        if !(2..=crate::MAX_DIM).contains(&dim) {
            return Err(CubatureError::DimensionOutOfRange {
                dim,
                max: crate::MAX_DIM,
            });
        }
        let key = key.resolve(dim)?;
        let raw = match key {
            RuleKey::Degree13 => degree13::build(),
            RuleKey::Degree11 => degree11::build(),
            RuleKey::Degree9 => degree9::build(dim),
            RuleKey::Degree7 => degree7::build(dim),
            RuleKey::Auto => unreachable!("resolved above"),
        };
        Ok(finish(dim, raw))
    }
}

/// raw rule data before the scales/norms post-processing step, the part
/// every degree-specific generator shares (`dinhre_` in the source).
pub(crate) struct RawRule {
    pub wt_len: usize,
    pub g: Vec<Vec<f64>>,
    pub w: Vec<[f64; 5]>,
    pub orbit_size: Vec<f64>,
    pub errcof: [f64; 6],
}

fn finish(dim: usize, raw: RawRule) -> RuleTable {
    let wt_len = raw.wt_len;
    let mut scales = vec![[0.0; 3]; wt_len];
    let mut norms = vec![[0.0; 3]; wt_len];
    let twondm = 2f64.powi(dim as i32);
    for k in 0..3 {
        for i in 0..wt_len {
            scales[i][k] = if raw.w[i][k + 1] != 0.0 {
                -raw.w[i][k + 2] / raw.w[i][k + 1]
            } else {
                100.0
            };
            let mut norm = 0.0;
            for j in 0..wt_len {
                let we = raw.w[j][k + 2] + scales[i][k] * raw.w[j][k + 1];
                norm += raw.orbit_size[j] * we.abs();
            }
            norms[i][k] = twondm / norm;
        }
    }
    let n_points = raw.orbit_size.iter().sum::<f64>().round() as usize;
    RuleTable {
        dim,
        wt_len,
        g: raw.g,
        w: raw.w,
        orbit_size: raw.orbit_size,
        scales,
        norms,
        errcof: raw.errcof,
        n_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monomial_exact_integral(exponents: &[i32]) -> f64 {
        // integral over [-1,1]^n of prod x_i^e_i; zero if any e_i is odd
        exponents
            .iter()
            .map(|&e| if e % 2 == 1 { 0.0 } else { 2.0 / (e as f64 + 1.0) })
            .product()
    }

    fn evaluate_rule_on_monomial(table: &RuleTable, exponents: &[i32]) -> f64 {
        let mut total = 0.0;
        for j in 0..table.wt_len {
            let g: Vec<f64> = (0..table.dim).map(|i| table.g[i][j]).collect();
            total += table.orbit_size[j] * table.w[j][0] * monomial_sign_orbit_value(&g, exponents);
        }
        total
    }

    // for a symmetric rule, the fully-symmetric sum of a monomial over the
    // orbit of a generator equals 2^(#nonzero coords) * prod(g_i^e_i) when
    // every exponent touched by a nonzero coordinate is even (else zero by
    // symmetry); this lets the exactness test avoid reimplementing dfshre_.
    fn monomial_sign_orbit_value(g: &[f64], exponents: &[i32]) -> f64 {
        if exponents.iter().any(|&e| e % 2 == 1) {
            return 0.0;
        }
        g.iter()
            .zip(exponents)
            .map(|(&gi, &e)| gi.powi(e))
            .product()
    }

    #[test]
    fn rule1_integrates_constants_exactly() {
        let table = RuleTable::build(RuleKey::Degree13, 2).unwrap();
        let got = evaluate_rule_on_monomial(&table, &[0, 0]);
        assert!((got - 4.0).abs() < 1e-10, "got {got}");
    }

    #[test]
    fn rule3_null_rules_sum_to_zero() {
        for dim in [2usize, 3, 4, 7] {
            let table = RuleTable::build(RuleKey::Degree9, dim).unwrap();
            for row in 1..5 {
                let sum: f64 = (0..table.wt_len)
                    .map(|j| table.orbit_size[j] * table.w[j][row])
                    .sum();
                assert!(sum.abs() < 1e-9, "dim {dim} row {row}: sum {sum}");
            }
        }
    }

    #[test]
    fn rule4_basic_weights_sum_to_volume() {
        for dim in [2usize, 5, 10] {
            let table = RuleTable::build(RuleKey::Degree7, dim).unwrap();
            let sum: f64 = (0..table.wt_len)
                .map(|j| table.orbit_size[j] * table.w[j][0])
                .sum();
            let expected = 2f64.powi(dim as i32);
            assert!((sum - expected).abs() < 1e-8, "dim {dim}: sum {sum} vs {expected}");
        }
    }

    #[test]
    fn invalid_key_for_dimension_rejected() {
        assert!(matches!(
            RuleTable::build(RuleKey::Degree13, 3),
            Err(CubatureError::RuleDimensionMismatch { .. })
        ));
    }

    #[test]
    fn dimension_out_of_range_rejected() {
        assert!(matches!(
            RuleTable::build(RuleKey::Auto, 1),
            Err(CubatureError::DimensionOutOfRange { .. })
        ));
        assert!(matches!(
            RuleTable::build(RuleKey::Auto, 31),
            Err(CubatureError::DimensionOutOfRange { .. })
        ));
    }
}
