// openqmc

//! Lattice sampler implementation.

use crate::core::rank1::shuffled_rotated_lattice;
use crate::core::sampler::Sampler;
use crate::core::state::State64Bit;

/// Progressive rank-1 lattice sampler.
///
/// Uses the generator vector from Hickernell et al. in "Weighted
/// Compound Integration Rules with Higher Order Convergence for all N"
/// to construct a 4D lattice, made progressive with a radical inversion
/// of the sample index. Randomisation uses toroidal shifts.
///
/// The sampler has no cache and generates all samples on the fly with a
/// low computation cost per draw, though the rate of integration per
/// pixel can be lower than the other samplers. The state is not pixel
/// decorrelated on construction: the lattice correlates across pixels
/// by design, and callers that want decorrelation pad with an outer
/// domain keyed on their own pixel value.
#[derive(Debug, Default, Copy, Clone)]
pub struct LatticeSampler {
    state: State64Bit,
}

impl LatticeSampler {
    /// No cache allocation is needed for this sampler.
    pub const CACHE_SIZE: usize = 0;

    /// Create a sampler from the pixel, frame and sample indices. The
    /// index must not be negative.
    pub fn new(x: i32, y: i32, frame: i32, index: i32) -> Self {
        LatticeSampler {
            state: State64Bit::new(x, y, frame, index),
        }
    }
}

impl Sampler for LatticeSampler {
    fn new_domain(&self, key: i32) -> Self {
        LatticeSampler {
            state: self.state.new_domain(key),
        }
    }

    fn new_domain_split(&self, key: i32, size: i32, index: i32) -> Self {
        LatticeSampler {
            state: self.state.new_domain_split(key, size, index),
        }
    }

    fn new_domain_distrib(&self, key: i32, index: i32) -> Self {
        LatticeSampler {
            state: self.state.new_domain_distrib(key, index),
        }
    }

    fn draw_sample<const SIZE: usize>(&self) -> [u32; SIZE] {
        shuffled_rotated_lattice::<SIZE>(self.state.sample_id as u32, self.state.pattern_id)
    }

    fn draw_rnd<const SIZE: usize>(&self) -> [u32; SIZE] {
        self.state.draw_rnd::<SIZE>()
    }
}
