use super::RawRule;

/// degree 13 rule for dim=2, 65 points, W=14. Generators and weights are
/// literal constants from the reference degree-13 two-dimensional rule
/// (`d132re_`); there is no general-dimension formula for this rule.
pub(super) fn build() -> RawRule {
    const DIM2G: [f64; 16] = [
        0.2517129343453109,
        0.7013933644534266,
        0.9590960631619962,
        0.9956010478552127,
        0.5,
        0.1594544658297559,
        0.3808991135940188,
        0.6582769255267192,
        0.8761473165029315,
        0.998243184053198,
        0.9790222658168462,
        0.6492284325645389,
        0.8727421201131239,
        0.3582614645881228,
        0.5666666666666666,
        0.2077777777777778,
    ];
    #[rustfmt::skip]
    const DIM2W: [f64; 70] = [
        0.0337969236013446, 0.09508589607597761, 0.1176006468056962, 0.0265777458632695, 0.0170144177020064,
        0.0, 0.0162659309863741, 0.1344892658526199, 0.1328032165460149, 0.0563747476999187,
        0.0039082790813105, 0.0301279877743215, 0.1030873234689166, 0.0625, 0.3213775489050763,
        -0.1767341636743844, 0.07347600537466072, -0.03638022004364754, 0.02125297922098712, 0.1460984204026913,
        0.01747613286152099, 0.1444954045641582, 1.307687976001325e-4, 5.380992313941161e-4, 1.042259576889814e-4,
        -0.001401152865045733, 0.008041788181514763, -0.1420416552759383, 0.3372900883288987, -0.1644903060344491,
        0.07707849911634622, -0.0380447835850631, 0.02223559940380806, 0.1480693879765931, 4.467143702185814e-6,
        0.150894476707413, 3.647200107516215e-5, 5.77719899901388e-4, 1.041757313688177e-4, -0.001452822267047819,
        0.008338339968783705, -0.147279632923196, -0.8264123822525677, 0.306583861409436, 0.002389292538329435,
        -0.1343024157997222, 0.088333668405339, 0.0, 9.786283074168292e-4, -0.1319227889147519,
        0.00799001220015063, 0.003391747079760626, 0.002294915718283264, -0.01358584986119197, 0.04025866859057809,
        0.003760268580063992, 0.6539094339575232, -0.2041614154424632, -0.174698151579499, 0.03937939671417803,
        0.006974520545933992, 0.0, 0.006667702171778258, 0.05512960621544304, 0.05443846381278607, 0.02310903863953934,
        0.01506937747477189, -0.0605702164890189, 0.04225737654686337, 0.02561989142123099,
    ];

    let mut g = vec![vec![0.0; 14]; 2];
    g[0][1] = DIM2G[0];
    g[0][2] = DIM2G[1];
    g[0][3] = DIM2G[2];
    g[0][4] = DIM2G[3];
    g[0][5] = DIM2G[4];
    g[0][6] = DIM2G[5];
    g[1][6] = g[0][6];
    g[0][7] = DIM2G[6];
    g[1][7] = g[0][7];
    g[0][8] = DIM2G[7];
    g[1][8] = g[0][8];
    g[0][9] = DIM2G[8];
    g[1][9] = g[0][9];
    g[0][10] = DIM2G[9];
    g[1][10] = g[0][10];
    g[0][11] = DIM2G[10];
    g[1][11] = DIM2G[11];
    g[0][12] = DIM2G[12];
    g[1][12] = DIM2G[13];
    g[0][13] = DIM2G[14];
    g[1][13] = DIM2G[15];

    let mut w = vec![[0.0; 5]; 14];
    for row in 0..5 {
        for col in 0..14 {
            w[col][row] = DIM2W[row * 14 + col];
        }
    }

    let mut orbit_size = vec![4.0; 14];
    orbit_size[0] = 1.0;
    orbit_size[11] = 8.0;
    orbit_size[12] = 8.0;
    orbit_size[13] = 8.0;

    RawRule {
        wt_len: 14,
        g,
        w,
        orbit_size,
        errcof: [10.0, 10.0, 1.0, 5.0, 0.5, 0.25],
    }
}
