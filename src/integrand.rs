/// context threaded through a sampling-mode integrand, letting it record
/// per-sample weights as the rule evaluator visits points. Grounded in the
/// original routine's `sample_pts`/`cur_weight`/`cur_sample` bookkeeping,
/// which the `funsub` callback wrote into directly through the shared
/// state record; here it's an explicit, owned accumulator instead.
#[derive(Debug, Default)]
pub struct DriverCtx {
    pub samples: Vec<(Vec<f64>, f64)>,
    pub cur_weight: f64,
}

impl DriverCtx {
    pub fn record(&mut self, point: &[f64], value: f64) {
        self.samples.push((point.to_vec(), value * self.cur_weight));
    }
}

/// the integrand callback has no static signature in the original program
/// (a raw function pointer cast at each call site); here it's a concrete
/// two-variant sum type fixed once at integrator construction.
///
/// `Plain` is an ordinary real-valued function of the evaluation point,
/// plus a scale exponent the callee may raise to avoid underflow. The
/// integrator tracks the maximum scale observed across all evaluations.
///
/// `Sampling` lets the integrand act as a sample-collector instead of a
/// pure function, reading per-sample weights off a `DriverCtx`; this
/// backs the driver's sampling modes 1 and 2.
pub enum Integrand<'f> {
    Plain(Box<dyn Fn(&[f64], &mut i32) -> f64 + Send + Sync + 'f>),
    Sampling(Box<dyn Fn(&[f64], &mut DriverCtx) -> f64 + Send + Sync + 'f>),
}

impl<'f> Integrand<'f> {
    pub fn plain(f: impl Fn(&[f64], &mut i32) -> f64 + Send + Sync + 'f) -> Self {
        Integrand::Plain(Box::new(f))
    }

    pub fn sampling(f: impl Fn(&[f64], &mut DriverCtx) -> f64 + Send + Sync + 'f) -> Self {
        Integrand::Sampling(Box::new(f))
    }

    pub(crate) fn evaluate(&self, x: &[f64], scale: &mut i32, ctx: &mut DriverCtx) -> f64 {
        match self {
            Integrand::Plain(f) => f(x, scale),
            Integrand::Sampling(f) => f(x, ctx),
        }
    }
}
