//! Runs one adaptive integration over a box described on the command line
//! and writes the resulting region tree to a binary dump, readable back
//! with `dcuhre::dump::read_regions`. Deliberately avoids the `cli`
//! feature's dependencies (clap, indicatif, ...) so it builds with the
//! library's bare default feature set.
use dcuhre::convergence::ToleranceBand;
use dcuhre::dump;
use dcuhre::integrand::Integrand;
use dcuhre::integrator::{Integrator, IntegratorOpts};
use dcuhre::rule::RuleKey;
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

fn usage() -> String {
    "usage: dump_regions <dim> <output-path> [max-calls]".to_string()
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("{}", usage());
        return ExitCode::FAILURE;
    }
    let dim: usize = match args[1].parse() {
        Ok(d) => d,
        Err(_) => {
            eprintln!("invalid dimension: {}", args[1]);
            return ExitCode::FAILURE;
        }
    };
    let output_path = &args[2];
    let max_calls: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100_000);

    let lower = vec![0.0; dim];
    let upper = vec![1.0; dim];

    let mut integrator = match Integrator::new(RuleKey::Auto, &lower, &upper) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("failed to build integrator: {e}");
            return ExitCode::FAILURE;
        }
    };

    let integrand = Integrand::plain(|x, _scale| x.iter().map(|v| v * v).sum::<f64>().exp());
    let predicate = ToleranceBand::new(1e-8, 1e-6);
    let opts = IntegratorOpts {
        rule: RuleKey::Auto,
        max_calls,
        ..Default::default()
    };

    let outcome = match integrator.run(&integrand, &predicate, &opts) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("integration failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    eprintln!(
        "result={:.8} error={:.3e} status={:?} regions={}",
        outcome.result, outcome.error, outcome.status, outcome.regions_used
    );

    let file = match File::create(output_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("failed to create {output_path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = dump::write_regions(integrator.tree(), BufWriter::new(file)) {
        eprintln!("failed to write region dump: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
