/// 5-point Gauss-Legendre quadrature nodes and weights on `[0, 1]`, used to
/// integrate out the heterogeneity parameter α (the admixture fraction of
/// linked families) rather than fixing it at a single value. Literal
/// constants from the reference driver's `alpha[5][2]` table.
pub const ALPHA_NODES_WEIGHTS: [[f64; 2]; 5] = [
    [0.0469100770306680, 0.1184634425280945],
    [0.2307653449471585, 0.2393143352496832],
    [0.5000000000000000, 0.2844444444444444],
    [0.7692346550528415, 0.2393143352496832],
    [0.9530899229693320, 0.1184634425280945],
];

/// combines a homogeneous-linkage likelihood ratio with a per-family
/// heterogeneity likelihood ratio function by integrating
/// `(1 - α) + α · hetLR(α)` over α ∈ [0, 1] via the 5-point rule above.
/// Grounded in the reference driver's `alpha_integral`/admixture handling:
/// under heterogeneity, only a fraction α of families are truly linked, so
/// the mixture likelihood at each α is a convex combination of "unlinked"
/// (contributes 1) and "linked" (contributes `het_lr(alpha)`).
pub fn alpha_integral(het_lr: impl Fn(f64) -> f64) -> f64 {
    ALPHA_NODES_WEIGHTS
        .iter()
        .map(|[alpha, weight]| weight * (1.0 - alpha + alpha * het_lr(*alpha)))
        .sum()
}
