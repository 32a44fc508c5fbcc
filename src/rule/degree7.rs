use super::RawRule;

/// degree 7 rule for any dim >= 2, W=6 (`d07hre_`). Cheapest of the four
/// rules; used as the general-dimension fallback when the caller doesn't
/// need degree 9's extra precision.
pub(super) fn build(ndim: usize) -> RawRule {
    const WT_LEN: usize = 6;
    let n = ndim as f64;
    let twondm = 2f64.powi(ndim as i32);

    let mut rulpts = [2.0 * n; WT_LEN];
    rulpts[WT_LEN - 1] = twondm;
    rulpts[WT_LEN - 2] = 2.0 * n * (n - 1.0);
    rulpts[0] = 1.0;

    let lam0 = 0.4707_f64;
    let lamp = 0.5625_f64;
    let lam1 = 4.0 / (15.0 - 5.0 / lam0);
    let ratio = (1.0 - lam1 / lam0) / 27.0;
    let lam2 = (5.0 - lam1 * 7.0 - ratio * 35.0) / (7.0 - lam1 * 35.0 / 3.0 - ratio * 35.0 / lam0);

    let mut w = [[0.0f64; WT_LEN]; 5];

    w[0][5] = 1.0 / (3.0 * lam0) / (3.0 * lam0) / (3.0 * lam0) / twondm;
    w[0][4] = (1.0 - lam0 * 5.0 / 3.0) / ((lam1 - lam0) * 60.0 * lam1 * lam1);
    w[0][2] = (1.0 - lam2 * 5.0 / 3.0 - twondm * 5.0 * w[0][5] * lam0 * (lam0 - lam2))
        / (lam1 * 10.0 * (lam1 - lam2))
        - 2.0 * (n - 1.0) * w[0][4];
    w[0][1] = (1.0 - lam1 * 5.0 / 3.0 - twondm * 5.0 * w[0][5] * lam0 * (lam0 - lam1)) / (lam2 * 10.0 * (lam2 - lam1));

    w[1][5] = 1.0 / (lam0 * lam0 * lam0 * 36.0) / twondm;
    w[1][4] = (1.0 - twondm * 9.0 * w[1][5] * lam0 * lam0) / (lam1 * lam1 * 36.0);
    w[1][2] = (1.0 - lam2 * 5.0 / 3.0 - twondm * 5.0 * w[1][5] * lam0 * (lam0 - lam2))
        / (lam1 * 10.0 * (lam1 - lam2))
        - 2.0 * (n - 1.0) * w[1][4];
    w[1][1] = (1.0 - lam1 * 5.0 / 3.0 - twondm * 5.0 * w[1][5] * lam0 * (lam0 - lam1)) / (lam2 * 10.0 * (lam2 - lam1));

    w[2][5] = 5.0 / (lam0 * lam0 * lam0 * 108.0) / twondm;
    w[2][4] = (1.0 - twondm * 9.0 * w[2][5] * lam0 * lam0) / (lam1 * lam1 * 36.0);
    w[2][2] = (1.0 - lamp * 5.0 / 3.0 - twondm * 5.0 * w[2][5] * lam0 * (lam0 - lamp))
        / (lam1 * 10.0 * (lam1 - lamp))
        - 2.0 * (n - 1.0) * w[2][4];
    w[2][3] = (1.0 - lam1 * 5.0 / 3.0 - twondm * 5.0 * w[2][5] * lam0 * (lam0 - lam1)) / (lamp * 10.0 * (lamp - lam1));

    w[3][5] = 1.0 / (lam0 * lam0 * lam0 * 54.0) / twondm;
    w[3][4] = (1.0 - twondm * 18.0 * w[3][5] * lam0 * lam0) / (lam1 * lam1 * 72.0);
    w[3][2] = (1.0 - lam2 * 10.0 / 3.0 - twondm * 10.0 * w[3][5] * lam0 * (lam0 - lam2))
        / (lam1 * 20.0 * (lam1 - lam2))
        - 2.0 * (n - 1.0) * w[3][4];
    w[3][1] = (1.0 - lam1 * 10.0 / 3.0 - twondm * 10.0 * w[3][5] * lam0 * (lam0 - lam1))
        / (lam2 * 20.0 * (lam2 - lam1));

    let (lam0s, lam1s, lam2s, lamps) = (lam0.sqrt(), lam1.sqrt(), lam2.sqrt(), lamp.sqrt());

    let mut g = vec![vec![0.0; WT_LEN]; ndim];
    for axis in g.iter_mut() {
        axis[WT_LEN - 1] = lam0s;
    }
    g[0][WT_LEN - 2] = lam1s;
    g[1][WT_LEN - 2] = lam1s;
    g[0][WT_LEN - 5] = lam2s;
    g[0][WT_LEN - 4] = lam1s;
    g[0][WT_LEN - 3] = lamps;

    finalize(&mut w, &rulpts, twondm);

    let mut w_cols = vec![[0.0; 5]; WT_LEN];
    for col in 0..WT_LEN {
        for row in 0..5 {
            w_cols[col][row] = w[row][col];
        }
    }

    RawRule {
        wt_len: WT_LEN,
        g,
        w: w_cols,
        orbit_size: rulpts.to_vec(),
        errcof: [5.0, 5.0, 1.0, 5.0, 0.5, 0.25],
    }
}

fn finalize(w: &mut [[f64; 6]; 5], rulpts: &[f64; 6], twondm: f64) {
    w[0][0] = twondm;
    for j in 1..5 {
        for i in 1..6 {
            w[j][i] -= w[0][i];
            w[j][0] -= rulpts[i] * w[j][i];
        }
    }
    for i in 1..6 {
        w[0][i] = twondm * w[0][i];
        w[0][0] -= rulpts[i] * w[0][i];
    }
}
