// openqmc

//! Pmj sampler implementation.

use crate::core::lookup::shuffled_scrambled_lookup;
use crate::core::pcg;
use crate::core::sampler::Sampler;
use crate::core::state::State64Bit;
use crate::core::stochastic::stochastic_pmj_init;

/// Base progressive multi-jittered (0,2) sample table shared by the pmj
/// samplers. Built once per process; read-only after construction, so
/// it can be shared by reference across threads.
#[derive(Debug, Clone)]
pub struct PmjCache {
    samples: Vec<[u32; 4]>,
}

impl PmjCache {
    /// Table footprint in bytes.
    pub const SIZE: usize = State64Bit::MAX_INDEX_SIZE * 4 * std::mem::size_of::<u32>();

    /// Allocate and fill the sample table. The stochastic construction
    /// uses a scratch buffer internally, dropped before this returns.
    pub fn new() -> Self {
        let mut samples = vec![[0_u32; 4]; State64Bit::MAX_INDEX_SIZE];
        stochastic_pmj_init(&mut samples);

        PmjCache { samples }
    }
}

impl Default for PmjCache {
    fn default() -> Self {
        PmjCache::new()
    }
}

/// Low discrepancy progressive multi-jittered (0,2) sampler.
///
/// The cache holds a base 4D pattern for all sample indices, computed
/// with the stochastic method of Helmer et al. in "Stochastic
/// Generation of (t, s) Sample Sequences". The first pair of dimensions
/// has the same integration properties as the Sobol implementation; as
/// the sequence does not extend past two dimensions, the second pair is
/// a randomisation of the first.
///
/// Draws look permuted index values up from memory before XOR
/// scrambling them, amortising the construction cost. The rate of
/// integration is very high, especially for the first pair. You may not
/// want this implementation if memory space or access is a concern.
#[derive(Debug, Copy, Clone)]
pub struct PmjSampler<'a> {
    state: State64Bit,
    cache: &'a PmjCache,
}

impl<'a> PmjSampler<'a> {
    /// Required cache footprint in bytes.
    pub const CACHE_SIZE: usize = PmjCache::SIZE;

    /// Create a sampler from the pixel, frame and sample indices over
    /// an initialised cache. The state is decorrelated between pixels
    /// on construction. The index must not be negative.
    pub fn new(x: i32, y: i32, frame: i32, index: i32, cache: &'a PmjCache) -> Self {
        let state = State64Bit::new(x, y, frame, index);

        PmjSampler {
            state: state.pixel_decorrelate(),
            cache,
        }
    }
}

impl<'a> Sampler for PmjSampler<'a> {
    fn new_domain(&self, key: i32) -> Self {
        PmjSampler {
            state: self.state.new_domain(key),
            cache: self.cache,
        }
    }

    fn new_domain_split(&self, key: i32, size: i32, index: i32) -> Self {
        PmjSampler {
            state: self.state.new_domain_split(key, size, index),
            cache: self.cache,
        }
    }

    fn new_domain_distrib(&self, key: i32, index: i32) -> Self {
        PmjSampler {
            state: self.state.new_domain_distrib(key, index),
            cache: self.cache,
        }
    }

    fn draw_sample<const SIZE: usize>(&self) -> [u32; SIZE] {
        shuffled_scrambled_lookup::<4, SIZE>(
            self.state.sample_id as u32,
            pcg::output(self.state.pattern_id),
            &self.cache.samples,
        )
    }

    fn draw_rnd<const SIZE: usize>(&self) -> [u32; SIZE] {
        self.state.draw_rnd::<SIZE>()
    }
}
