pub mod bayes;
pub mod convergence;
pub mod dump;
pub mod error;
pub mod evaluator;
pub mod integrand;
pub mod integrator;
pub mod region;
pub mod rule;

pub use error::CubatureError;
pub use integrand::Integrand;
pub use integrator::{IntegrationOutcome, Integrator, IntegratorOpts, SamplingMode, Status};
pub use region::{Region, RegionTree};
pub use rule::{RuleKey, RuleTable};

/// maximum supported problem dimension, mirroring the original `maxdim`
pub const MAX_DIM: usize = 30;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// progress bar, shown during long adaptive runs and α-mixture sweeps
#[cfg(feature = "cli")]
pub fn progress(n: usize) -> indicatif::ProgressBar {
    let tick = std::time::Duration::from_secs(60);
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan}";
    let style = indicatif::ProgressStyle::with_template(style).unwrap();
    let progress = indicatif::ProgressBar::new(n as u64);
    progress.set_style(style);
    progress.enable_steady_tick(tick);
    progress
}

/// initialize logging
#[cfg(feature = "native")]
pub fn init() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// verbosity knob shared by `IntegratorOpts` and the bayes driver, mapped
/// onto `log` levels the way the original program's `verbose` field mapped
/// onto its own three-tier printf gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Basic = 1,
    Full = 2,
}

impl Verbosity {
    pub fn log_level(self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Warn,
            Verbosity::Basic => log::LevelFilter::Info,
            Verbosity::Full => log::LevelFilter::Debug,
        }
    }
}
