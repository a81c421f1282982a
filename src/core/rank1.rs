// openqmc

//! An implementation of a rank-1 lattice as described in "Weighted
//! Compound Integration Rules with Higher Order Convergence for all N"
//! by Fred J. Hickernell, et al., made progressive with a radical
//! inversion of the sample index.

use crate::core::pcg;
use crate::core::permute::reverse_and_shuffle;

// Generator vector for the four lattice dimensions.
#[rustfmt::skip]
const LATTICE: [u32; 4] = [
    1,
    364_981,
    245_389,
    97_823,
];

/// Offset an integer a given distance, relying on wraparound. Applied
/// to the elements of a lattice this is a toroidal shift upon the range
/// of representable values, which randomises the values when the
/// distance is constant across elements.
pub const fn rotate(value: u32, distance: u32) -> u32 {
    value.wrapping_add(distance)
}

/// Compute a rank-1 lattice value at an index with reversed bits, to 32
/// bits of precision. Dimensions must be within the range `[0, 4)`.
pub const fn lattice_reversed_index(index: u32, dimension: usize) -> u32 {
    debug_assert!(dimension <= 3);

    LATTICE[dimension].wrapping_mul(index)
}

/// Compute a randomised rank-1 lattice value.
///
/// Given an index and a pattern id, compute a lattice value of up to
/// four dimensions. The index is shuffled in a manner that is
/// progressive friendly. For a given lattice the pattern id must be
/// constant.
pub fn shuffled_rotated_lattice<const DEPTH: usize>(index: u32, pattern_id: u32) -> [u32; DEPTH] {
    const {
        assert!(DEPTH >= 1, "pattern depth is greater or equal to one");
        assert!(DEPTH <= 4, "pattern depth is less or equal to four");
    }

    let mut pattern_id: u32 = pattern_id;
    let index = reverse_and_shuffle(index, pcg::output(pattern_id));

    let mut sample = [0_u32; DEPTH];
    for i in 0..DEPTH {
        sample[i] = rotate(lattice_reversed_index(index, i), pcg::rng(&mut pattern_id));
    }

    sample
}
