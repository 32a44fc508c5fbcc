//! Scans a recombination-fraction range and reports the posterior
//! probability of linkage at each position, using a deterministic
//! placeholder pedigree model (see [`dcuhre::bayes::pedigree`]) until a
//! real peeling engine is plugged in.
use clap::Parser;
use dcuhre::bayes::output::{self, SliceRow, SummaryRow};
use dcuhre::bayes::pedigree::DeterministicPedigree;
use dcuhre::bayes::{BayesDriver, BayesDriverConfig, PedigreeModel, Slice};
use dcuhre::rule::RuleKey;
use dcuhre::Verbosity;

#[derive(Parser, Debug)]
#[command(name = "bayes", about = "Posterior-probability-of-linkage scan over a grid of recombination fractions")]
struct Args {
    /// number of theta steps between 0.0 and 0.5, inclusive
    #[arg(long, default_value_t = 50)]
    steps: usize,

    /// prior probability of linkage
    #[arg(long, default_value_t = 0.05)]
    prior: f64,

    /// prior probability of linkage disequilibrium
    #[arg(long, default_value_t = 0.05)]
    ld_prior: f64,

    /// number of penetrance parameters to integrate over
    #[arg(long, default_value_t = 3)]
    penetrance_dims: usize,

    /// per-slice evaluation budget
    #[arg(long, default_value_t = 50_000)]
    max_calls: usize,

    #[arg(long, value_enum, default_value_t = Verbose::Basic)]
    verbosity: Verbose,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Verbose {
    Quiet,
    Basic,
    Full,
}

impl From<Verbose> for Verbosity {
    fn from(v: Verbose) -> Self {
        match v {
            Verbose::Quiet => Verbosity::Quiet,
            Verbose::Basic => Verbosity::Basic,
            Verbose::Full => Verbosity::Full,
        }
    }
}

fn main() {
    dcuhre::init();
    let args = Args::parse();
    log::set_max_level(Verbosity::from(args.verbosity).log_level());

    let slices = (0..=args.steps)
        .map(|i| Slice {
            theta: 0.5 * i as f64 / args.steps as f64,
            d_prime: None,
        })
        .collect();

    let config = BayesDriverConfig {
        slices,
        prior: args.prior,
        ld_prior: args.ld_prior,
        penetrance_dims: args.penetrance_dims,
        rule: RuleKey::Auto,
        max_calls: args.max_calls,
        epsabs: 1e-6,
        epsrel: 1e-4,
        verbosity: args.verbosity.into(),
        ..Default::default()
    };

    let pedigrees: Vec<Box<dyn PedigreeModel>> = vec![Box::new(DeterministicPedigree {
        affected_count: 3,
        unaffected_count: 2,
    })];

    let driver = BayesDriver::new(config, pedigrees);
    let results = match driver.run() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("bayes scan failed: {e}");
            std::process::exit(1);
        }
    };

    let rows: Vec<SliceRow> = results
        .iter()
        .map(|r| SliceRow {
            chr: "1",
            trait_name: "DISEASE",
            marker: "M1",
            theta: r.theta,
            count: 1,
            bayes_ratio: r.bayes_ratio,
            err_est: r.error,
            max_hlod: r.log10_bayes_ratio.max(0.0),
            alpha: 0.0,
            dgf: 0.0,
            penetrance: [0.0; 3],
            penetrance_sd: None,
            threshold: None,
        })
        .collect();

    let stdout = std::io::stdout();
    output::write_slice_table(rows.iter(), stdout.lock()).expect("write per-slice table");

    let summary = driver.summarize(&results);
    let summary_row = SummaryRow {
        chr: "1",
        marker: "M1",
        cm: 0.0,
        ppl: summary.ppl,
        ld_ppl: Some(summary.ld_ppl),
        ppld: Some(summary.ppld_allowing_linkage),
        mod_score: 0.0,
        alpha: 0.0,
        dgf: 0.0,
        penetrance: vec![],
    };
    output::write_summary_table([&summary_row], std::io::stdout().lock()).expect("write summary table");
    output::write_six_region_diagnostic([("M1", &summary.cells)], std::io::stdout().lock()).expect("write six-region diagnostic");
}
