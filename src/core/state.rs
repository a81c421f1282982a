// openqmc

//! Sampler state implementation.

use crate::core::encode::{encode_bits_16, EncodeKey};
use crate::core::pcg;

/// Split a sample index into the key bits above the 16 bit limit. The
/// key selects a pattern stream so that indices past 2^16 keep drawing
/// fresh values.
pub const fn compute_index_key(index: i32) -> u32 {
    (index >> 16) as u32
}

/// Split a sample index into its low 16 identifier bits.
pub const fn compute_index_id(index: i32) -> u16 {
    (index & 0xffff) as u16
}

/// Generic sampler state type.
///
/// Represents the state of the higher level sampler implementations.
/// The size is kept to 8 bytes so that values are cheap to copy and
/// pass by value, an important requirement of the functional style of
/// the sampler API. The type also provides the domain algebra used to
/// derive child domains, and generic PRNG draws.
#[derive(Debug, Default, Copy, Clone)]
pub struct State64Bit {
    /// Identifier for the domain pattern.
    pub pattern_id: u32,
    /// Identifier for the sample index within the domain.
    pub sample_id: u16,
    /// Identifier for the pixel position. Never mutates.
    pub pixel_id: u16,
}

impl State64Bit {
    /// 2^16 index upper limit.
    pub const MAX_INDEX_SIZE: usize = 0x10000;
    /// 64 pixels in x.
    pub const SPATIAL_ENCODE_BIT_SIZE_X: u32 = 6;
    /// 64 pixels in y.
    pub const SPATIAL_ENCODE_BIT_SIZE_Y: u32 = 6;
    /// 16 pixels in time.
    pub const TEMPORAL_ENCODE_BIT_SIZE: u32 = 4;

    /// Create a state from the pixel, frame and sample indices. The
    /// index must not be negative; its low 16 bits become the sample
    /// id, and any higher bits seed the pattern.
    pub fn new(x: i32, y: i32, frame: i32, index: i32) -> Self {
        debug_assert!(index >= 0);

        const X_BITS: u32 = State64Bit::SPATIAL_ENCODE_BIT_SIZE_X;
        const Y_BITS: u32 = State64Bit::SPATIAL_ENCODE_BIT_SIZE_Y;
        const Z_BITS: u32 = State64Bit::TEMPORAL_ENCODE_BIT_SIZE;

        let pixel_id = encode_bits_16::<X_BITS, Y_BITS, Z_BITS>(EncodeKey { x, y, z: frame });

        State64Bit {
            pattern_id: pcg::init_with_seed(compute_index_key(index)),
            sample_id: compute_index_id(index),
            pixel_id,
        }
    }

    /// Randomise the state with the pixel id so that correlation
    /// between pixels is removed. Call this after construction when the
    /// sampler does not decorrelate pixels by other means.
    pub fn pixel_decorrelate(self) -> Self {
        self.new_domain(self.pixel_id as i32)
    }

    /// Derive the state for a child domain. The child produces an
    /// independent pattern; the sample index and pixel are untouched.
    pub fn new_domain(self, key: i32) -> Self {
        State64Bit {
            pattern_id: pcg::state_transition(self.pattern_id.wrapping_add(key as u32)),
            ..self
        }
    }

    /// Derive the state for a child domain when splitting with a known
    /// constant multiplier. The composite index stays a contiguous
    /// prefix of the parent index space, preserving the global
    /// distribution; index bits past the 16 bit limit carry into the
    /// pattern.
    pub fn new_domain_split(self, key: i32, size: i32, index: i32) -> Self {
        debug_assert!(size > 0);
        debug_assert!(index >= 0);

        let combined: i64 = self.sample_id as i64 * size as i64 + index as i64;
        debug_assert!(combined <= i32::MAX as i64);
        let combined = combined as i32;

        let mut ret = self
            .new_domain(key)
            .new_domain(compute_index_key(combined) as i32);
        ret.sample_id = compute_index_id(combined);

        ret
    }

    /// Derive the state for a child domain when splitting with an
    /// unknown multiplier. The extra step over the sample id
    /// decorrelates the local pattern from its siblings, trading global
    /// correlation for freedom in the multiplier.
    pub fn new_domain_distrib(self, key: i32, index: i32) -> Self {
        debug_assert!(index >= 0);

        let mut ret = self
            .new_domain(key)
            .new_domain(compute_index_key(index) as i32)
            .new_domain(self.sample_id as i32);
        ret.sample_id = compute_index_id(index);

        ret
    }

    /// Draw pseudo random values from a local stream seeded by the
    /// pattern and sample ids.
    pub fn draw_rnd<const SIZE: usize>(&self) -> [u32; SIZE] {
        const {
            assert!(SIZE >= 1, "draw size is greater or equal to one");
            assert!(SIZE <= 4, "draw size is less or equal to four");
        }

        let mut rng_state = self.pattern_id.wrapping_add(self.sample_id as u32);

        let mut rnds = [0_u32; SIZE];
        for rnd in rnds.iter_mut() {
            *rnd = pcg::rng(&mut rng_state);
        }

        rnds
    }
}

const _: () = assert!(std::mem::size_of::<State64Bit>() == 8);

const _: () = assert!(
    State64Bit::SPATIAL_ENCODE_BIT_SIZE_X == State64Bit::SPATIAL_ENCODE_BIT_SIZE_Y,
    "encoding must have equal resolution in x and y"
);
