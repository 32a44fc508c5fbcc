/// transforms an unconstrained point in the unit cube into an ordered
/// point (`y[0] <= y[1] <= ... <= y[k-1]`, all in `[0, 1]`) via the inverse
/// CDF of order statistics, returning the transformed point and the
/// determinant of its Jacobian. This is how penetrance triples
/// (f0 <= f1 <= f2, for recessive/additive/dominant constraints) get
/// sampled as an unconstrained cubature domain: integrate over the unit
/// cube and multiply each integrand value by the Jacobian below rather
/// than rejecting samples that violate the order.
///
/// Construction: `y[i] = 1 - prod_{j=0}^{i} (1 - x[j])^(1 / (k - j))`. Each
/// factor is a Beta(1, k-j) draw conditioned on the point lying above
/// `y[i-1]`, so the resulting vector is distributed as the order statistics
/// of `k` independent uniforms, and the map is a bijection on `[0,1)^k`.
pub fn ordered_simplex(x: &[f64]) -> (Vec<f64>, f64) {
    let k = x.len();
    let mut y = vec![0.0; k];
    let mut jacobian = 1.0;
    let mut floor = 0.0f64;
    for (i, &xi) in x.iter().enumerate() {
        let remaining = (k - i) as f64;
        let one_minus_floor = 1.0 - floor;
        let power = (1.0 - xi).powf(1.0 / remaining);
        let yi = 1.0 - one_minus_floor * power;
        // d(yi)/d(xi), holding floor fixed: yi = 1 - (1-floor)*(1-xi)^(1/remaining)
        let dyi_dxi = one_minus_floor / remaining * (1.0 - xi).powf(1.0 / remaining - 1.0);
        jacobian *= dyi_dxi;
        y[i] = yi;
        floor = yi;
    }
    (y, jacobian)
}
