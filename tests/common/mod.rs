// openqmc
//
// Shared support for the statistical sampler tests: running moments,
// null hypothesis tests with Bonferroni correction, and the reference
// 2D integrands the estimates are checked against.

use openqmc::core::float::uint_to_float;
use openqmc::core::pcg;

pub const DEFAULT_RESOLUTION: usize = 31; // 11th prime
pub const DEFAULT_NUM_SAMPLES_LOW: usize = 61; // 18th prime
pub const DEFAULT_NUM_SAMPLES_HIGH: usize = 48_611; // 5000th prime
pub const DEFAULT_NUM_SEEDS: i32 = 2;
pub const DEFAULT_NUM_HEAVISIDES: usize = 4;
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

// Bonferroni divisor covering every per-seed hypothesis test run
// across the statistical suites in this crate.
pub const TOTAL_NUM_TESTS: usize = 512;

/// A functor under statistical test: reseedable, and drawing a 2D
/// integer sample per index.
pub trait TestSampler {
    fn initialise(&mut self, seed: i32);
    fn sample(&mut self, index: i32) -> [u32; 2];
}

/// Welford style running mean and variance.
#[derive(Default)]
pub struct RunningStats {
    n: u64,
    m1: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        RunningStats::default()
    }

    pub fn push(&mut self, x: f64) {
        let n1 = self.n;
        self.n += 1;

        let delta = x - self.m1;
        let delta_over_n = delta / self.n as f64;

        self.m1 += delta_over_n;
        self.m2 += delta * delta_over_n * n1 as f64;
    }

    pub fn mean(&self) -> f64 {
        self.m1
    }

    pub fn variance(&self) -> f64 {
        self.m2 / (self.n - 1) as f64
    }
}

// Special functions, ported in the usual series / continued fraction
// forms. Accuracy well beyond what the acceptance thresholds need.

fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 6] = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.1208650973866179e-2,
        -0.5395239384953e-5,
    ];

    let mut y = x;
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();

    let mut ser = 1.000000000190015;
    for coeff in COEFFS {
        y += 1.0;
        ser += coeff / y;
    }

    -tmp + (2.5066282746310005 * ser / x).ln()
}

const ITMAX: usize = 500;
const EPS: f64 = 3.0e-12;
const FPMIN: f64 = 1.0e-300;

// Regularised lower incomplete gamma, series form. Valid for x < a + 1.
fn gamma_p_series(a: f64, x: f64) -> f64 {
    let gln = ln_gamma(a);

    let mut ap = a;
    let mut sum = 1.0 / a;
    let mut del = sum;
    for _ in 0..ITMAX {
        ap += 1.0;
        del *= x / ap;
        sum += del;
        if del.abs() < sum.abs() * EPS {
            break;
        }
    }

    sum * (-x + a * x.ln() - gln).exp()
}

// Regularised upper incomplete gamma, continued fraction form. Valid
// for x > a + 1.
fn gamma_q_fraction(a: f64, x: f64) -> f64 {
    let gln = ln_gamma(a);

    let mut b = x + 1.0 - a;
    let mut c = 1.0 / FPMIN;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=ITMAX {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = b + an / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < EPS {
            break;
        }
    }

    (-x + a * x.ln() - gln).exp() * h
}

/// Regularised lower incomplete gamma function P(a, x).
pub fn gamma_p(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x < a + 1.0 {
        gamma_p_series(a, x)
    } else {
        1.0 - gamma_q_fraction(a, x)
    }
}

/// Regularised upper incomplete gamma function Q(a, x).
pub fn gamma_q(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < a + 1.0 {
        1.0 - gamma_p_series(a, x)
    } else {
        gamma_q_fraction(a, x)
    }
}

/// Error function.
pub fn erf(x: f64) -> f64 {
    if x < 0.0 {
        -gamma_p(0.5, x * x)
    } else {
        gamma_p(0.5, x * x)
    }
}

fn beta_fraction(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FPMIN {
        d = FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=ITMAX {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }

    h
}

/// Regularised incomplete beta function I_x(a, b).
pub fn inc_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let bt = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln()).exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        bt * beta_fraction(a, b, x) / a
    } else {
        1.0 - bt * beta_fraction(b, a, 1.0 - x) / b
    }
}

/// Two sided Student's t test of a sample mean against a reference.
/// Returns whether the null hypothesis is accepted at the Bonferroni
/// corrected significance level.
pub fn students_t_test(
    mean: f64,
    variance: f64,
    reference: f64,
    n: usize,
    significance: f64,
    num_tests: usize,
) -> bool {
    if variance <= 0.0 {
        return (mean - reference).abs() < 1.0e-6;
    }

    let t = (mean - reference) / (variance / n as f64).sqrt();
    let df = (n - 1) as f64;

    // Past a thousand degrees of freedom the t distribution is the
    // normal distribution for any threshold this test uses.
    let p = if df > 1000.0 {
        gamma_q(0.5, t * t / 2.0)
    } else {
        inc_beta(df / 2.0, 0.5, df / (df + t * t))
    };

    p > significance / num_tests as f64
}

/// One sided chi-square test of observed against expected cell counts,
/// pooling cells whose expectation falls below a minimum frequency.
/// Returns whether the null hypothesis is accepted at the Bonferroni
/// corrected significance level.
pub fn chi2_test(
    observations: &[f64],
    expectations: &[f64],
    min_exp_frequency: f64,
    significance: f64,
    num_tests: usize,
) -> bool {
    assert_eq!(observations.len(), expectations.len());

    let mut statistic = 0.0;
    let mut cells: usize = 0;

    let mut pooled_obs = 0.0;
    let mut pooled_exp = 0.0;

    for (observed, expected) in observations.iter().zip(expectations.iter()) {
        if *expected < min_exp_frequency {
            pooled_obs += observed;
            pooled_exp += expected;
        } else {
            statistic += (observed - expected) * (observed - expected) / expected;
            cells += 1;
        }
    }

    if pooled_exp > 0.0 {
        statistic += (pooled_obs - pooled_exp) * (pooled_obs - pooled_exp) / pooled_exp;
        cells += 1;
    }

    let dof = (cells - 1) as f64;
    let p = gamma_q(dof / 2.0, statistic / 2.0);

    p > significance / num_tests as f64
}

// Reference 2D integrands, inspired by Per Christensen's funcsamp2D
// set. Known integrals make the error of an estimate measurable.

pub trait Shape {
    fn evaluate(&self, x: f32, y: f32) -> f32;
    fn integral(&self) -> f32;
}

pub struct QuarterDisk;

impl Shape for QuarterDisk {
    fn evaluate(&self, x: f32, y: f32) -> f32 {
        if x * x + y * y < 2.0 / std::f32::consts::PI {
            1.0
        } else {
            0.0
        }
    }

    fn integral(&self) -> f32 {
        0.5
    }
}

pub struct FullDisk;

impl Shape for FullDisk {
    fn evaluate(&self, x: f32, y: f32) -> f32 {
        let x = x - 0.5;
        let y = y - 0.5;

        if x * x + y * y < 1.0 / (2.0 * std::f32::consts::PI) {
            1.0
        } else {
            0.0
        }
    }

    fn integral(&self) -> f32 {
        0.5
    }
}

pub struct QuarterGaussian;

impl Shape for QuarterGaussian {
    fn evaluate(&self, x: f32, y: f32) -> f32 {
        (-(x * x + y * y)).exp()
    }

    fn integral(&self) -> f32 {
        (std::f64::consts::FRAC_PI_4 * erf(1.0) * erf(1.0)) as f32
    }
}

pub struct FullGaussian;

impl Shape for FullGaussian {
    fn evaluate(&self, x: f32, y: f32) -> f32 {
        let x = x - 0.5;
        let y = y - 0.5;

        (-(x * x + y * y)).exp()
    }

    fn integral(&self) -> f32 {
        (std::f64::consts::PI * erf(0.5) * erf(0.5)) as f32
    }
}

pub struct Bilinear;

impl Shape for Bilinear {
    fn evaluate(&self, x: f32, y: f32) -> f32 {
        x * y
    }

    fn integral(&self) -> f32 {
        0.25
    }
}

pub struct LinearX;

impl Shape for LinearX {
    fn evaluate(&self, x: f32, _y: f32) -> f32 {
        x
    }

    fn integral(&self) -> f32 {
        0.5
    }
}

pub struct LinearY;

impl Shape for LinearY {
    fn evaluate(&self, _x: f32, y: f32) -> f32 {
        y
    }

    fn integral(&self) -> f32 {
        0.5
    }
}

/// A half plane indicator with a random position and orientation.
#[derive(Copy, Clone)]
pub struct OrientedHeaviside {
    pos: (f32, f32),
    normal: (f32, f32),
}

impl OrientedHeaviside {
    fn new(orientation: f32, x: f32, y: f32) -> Self {
        let theta = 2.0 * std::f32::consts::PI * orientation;

        OrientedHeaviside {
            pos: (x, y),
            normal: (theta.cos(), theta.sin()),
        }
    }

    /// Build a deterministic family of heavisides.
    pub fn build(size: usize) -> Vec<OrientedHeaviside> {
        let mut state = pcg::init_with_seed(12345);

        (0..size)
            .map(|_| {
                let orientation = uint_to_float(pcg::rng(&mut state));
                let x = uint_to_float(pcg::rng(&mut state));
                let y = uint_to_float(pcg::rng(&mut state));

                OrientedHeaviside::new(orientation, x, y)
            })
            .collect()
    }
}

impl Shape for OrientedHeaviside {
    fn evaluate(&self, x: f32, y: f32) -> f32 {
        let x = x - self.pos.0;
        let y = y - self.pos.1;

        if x * self.normal.0 + y * self.normal.1 < 0.0 {
            1.0
        } else {
            0.0
        }
    }

    // Area of the negative half plane clipped to the unit square, by
    // case analysis on where the dividing line crosses the edges.
    fn integral(&self) -> f32 {
        let orthogonal = (-self.normal.1, self.normal.0);
        let a = orthogonal.1 / orthogonal.0;
        let b = a * -self.pos.0 + self.pos.1;

        let line_fwd = |x: f32| a * x + b;
        let line_inv = |y: f32| (y - b) / a;

        let in_segment = |t: f32| (0.0..1.0).contains(&t);
        let right_triangle = |a: f32, b: f32| a * b / 2.0;
        let right_trapezoid = |a: f32, h1: f32, h2: f32| a * (h1 + h2) / 2.0;

        let x0 = line_inv(0.0);
        let x1 = line_inv(1.0);
        let y0 = line_fwd(0.0);
        let y1 = line_fwd(1.0);

        if in_segment(x0) && in_segment(x1) {
            let mut area = right_trapezoid(1.0, x0, x1);
            if self.normal.0 < 0.0 {
                area = 1.0 - area;
            }
            return area;
        }

        if in_segment(y0) && in_segment(y1) {
            let mut area = right_trapezoid(1.0, y0, y1);
            if self.normal.1 < 0.0 {
                area = 1.0 - area;
            }
            return area;
        }

        if in_segment(x0) && in_segment(y0) {
            let mut area = right_triangle(x0, y0);
            if self.normal.0 < 0.0 || self.normal.1 < 0.0 {
                area = 1.0 - area;
            }
            return area;
        }

        if in_segment(x1) && in_segment(y1) {
            let mut area = right_triangle(1.0 - x1, 1.0 - y1);
            if self.normal.0 > 0.0 || self.normal.1 > 0.0 {
                area = 1.0 - area;
            }
            return area;
        }

        if in_segment(x0) && in_segment(y1) {
            let mut area = right_triangle(1.0 - x0, y1);
            if self.normal.0 > 0.0 || self.normal.1 < 0.0 {
                area = 1.0 - area;
            }
            return area;
        }

        if in_segment(x1) && in_segment(y0) {
            let mut area = right_triangle(x1, 1.0 - y0);
            if self.normal.0 < 0.0 || self.normal.1 > 0.0 {
                area = 1.0 - area;
            }
            return area;
        }

        0.0
    }
}

fn shape_set() -> Vec<Box<dyn Shape>> {
    let mut shapes: Vec<Box<dyn Shape>> = vec![
        Box::new(QuarterDisk),
        Box::new(FullDisk),
        Box::new(QuarterGaussian),
        Box::new(FullGaussian),
        Box::new(Bilinear),
        Box::new(LinearX),
        Box::new(LinearY),
    ];

    for heaviside in OrientedHeaviside::build(DEFAULT_NUM_HEAVISIDES) {
        shapes.push(Box::new(heaviside));
    }

    shapes
}

fn t_test_one<S: TestSampler>(shape: &dyn Shape, num_samples: usize, sampler: &mut S) {
    let mut stats = RunningStats::new();
    for index in 0..num_samples {
        let out = sampler.sample(index as i32);

        let x = uint_to_float(out[0]);
        let y = uint_to_float(out[1]);

        stats.push(shape.evaluate(x, y) as f64);
    }

    let accepted = students_t_test(
        stats.mean(),
        stats.variance(),
        shape.integral() as f64,
        num_samples,
        DEFAULT_SIGNIFICANCE_LEVEL,
        TOTAL_NUM_TESTS,
    );

    assert!(
        accepted,
        "mean estimate rejected: got {}, expected {}",
        stats.mean(),
        shape.integral()
    );
}

fn chi2_one<S: TestSampler>(resolution: usize, num_samples: usize, sampler: &mut S) {
    let num_strata = resolution * resolution;
    let total_samples = num_samples * num_strata;

    let mut observations = vec![0.0_f64; num_strata];
    let expectations = vec![num_samples as f64; num_strata];

    for index in 0..total_samples {
        let out = sampler.sample(index as i32);

        let x = (uint_to_float(out[0]) * resolution as f32) as usize;
        let y = (uint_to_float(out[1]) * resolution as f32) as usize;

        let coordinate = x.min(resolution - 1) + y.min(resolution - 1) * resolution;
        observations[coordinate] += 1.0;
    }

    let accepted = chi2_test(
        &observations,
        &expectations,
        5.0,
        DEFAULT_SIGNIFICANCE_LEVEL,
        TOTAL_NUM_TESTS,
    );

    assert!(accepted, "stratification rejected by chi-square test");
}

/// Run the Student's t suite over every reference shape, for each seed.
pub fn null_hypothesis_t_test<S: TestSampler>(sampler: &mut S) {
    for seed in 0..DEFAULT_NUM_SEEDS {
        for shape in shape_set() {
            sampler.initialise(seed);
            t_test_one(shape.as_ref(), DEFAULT_NUM_SAMPLES_HIGH, sampler);
        }
    }
}

/// Run the chi-square stratification suite, for each seed.
pub fn null_hypothesis_chi_square<S: TestSampler>(sampler: &mut S) {
    for seed in 0..DEFAULT_NUM_SEEDS {
        sampler.initialise(seed);
        chi2_one(DEFAULT_RESOLUTION, DEFAULT_NUM_SAMPLES_LOW, sampler);
    }
}

/// Both suites back to back.
pub fn all_hypothesis_tests<S: TestSampler>(sampler: &mut S) {
    null_hypothesis_t_test(sampler);
    null_hypothesis_chi_square(sampler);
}
