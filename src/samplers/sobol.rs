// openqmc

//! Sobol sampler implementation.

use crate::core::pcg;
use crate::core::sampler::Sampler;
use crate::core::sobol::shuffled_scrambled_sobol;
use crate::core::state::State64Bit;

/// Low discrepancy Owen scrambled Sobol sampler.
///
/// Uses Burley's construction from "Practical Hash-based Owen
/// Scrambling", with the index limited to 16 bits, pre-inverted input
/// and output matrices, and vectorised matrix products where the target
/// supports them.
///
/// The sampler has no cache and generates all samples on the fly
/// without touching memory. The cost per draw call is computationally
/// higher than the table based samplers, but the quality of Owen
/// scrambled sequences often outweighs this due to their random error
/// cancellation and high rate of integration for smooth functions.
#[derive(Debug, Default, Copy, Clone)]
pub struct SobolSampler {
    state: State64Bit,
}

impl SobolSampler {
    /// No cache allocation is needed for this sampler.
    pub const CACHE_SIZE: usize = 0;

    /// Create a sampler from the pixel, frame and sample indices. The
    /// state is decorrelated between pixels on construction. The index
    /// must not be negative.
    pub fn new(x: i32, y: i32, frame: i32, index: i32) -> Self {
        let state = State64Bit::new(x, y, frame, index);

        SobolSampler {
            state: state.pixel_decorrelate(),
        }
    }
}

impl Sampler for SobolSampler {
    fn new_domain(&self, key: i32) -> Self {
        SobolSampler {
            state: self.state.new_domain(key),
        }
    }

    fn new_domain_split(&self, key: i32, size: i32, index: i32) -> Self {
        SobolSampler {
            state: self.state.new_domain_split(key, size, index),
        }
    }

    fn new_domain_distrib(&self, key: i32, index: i32) -> Self {
        SobolSampler {
            state: self.state.new_domain_distrib(key, index),
        }
    }

    fn draw_sample<const SIZE: usize>(&self) -> [u32; SIZE] {
        shuffled_scrambled_sobol::<SIZE>(
            self.state.sample_id as u32,
            pcg::output(self.state.pattern_id),
        )
    }

    fn draw_rnd<const SIZE: usize>(&self) -> [u32; SIZE] {
        self.state.draw_rnd::<SIZE>()
    }
}
