// openqmc

//! An efficient implementation of Owen scrambled Sobol sequences, used
//! to construct the higher level sampler types. The method is Brent
//! Burley's hash based construction from "Practical Hash-based Owen
//! Scrambling", with the index limited to 16 bits, pre-inverted input
//! and output matrices, and optional use of CPU vector intrinsics for
//! the matrix-vector product.

use crate::core::bits::{reverse_bits_16, reverse_bits_32, rotate_bytes};
use crate::core::permute::{laine_karras_permutation, reverse_and_shuffle, shuffle};

#[rustfmt::skip]
const MASKS: [u16; 16] = [
    0b0000_0000_0000_0001,
    0b0000_0000_0000_0010,
    0b0000_0000_0000_0100,
    0b0000_0000_0000_1000,
    0b0000_0000_0001_0000,
    0b0000_0000_0010_0000,
    0b0000_0000_0100_0000,
    0b0000_0000_1000_0000,
    0b0000_0001_0000_0000,
    0b0000_0010_0000_0000,
    0b0000_0100_0000_0000,
    0b0000_1000_0000_0000,
    0b0001_0000_0000_0000,
    0b0010_0000_0000_0000,
    0b0100_0000_0000_0000,
    0b1000_0000_0000_0000,
];

// Direction vectors for the first four dimensions, rows selected by the
// set bits of a reversed index. The first matrix is the bit reversal
// itself and is served by a cheaper dedicated path.
#[rustfmt::skip]
const DIRECTIONS: [[u16; 16]; 4] = [
    [
    0b1000_0000_0000_0000,
    0b0100_0000_0000_0000,
    0b0010_0000_0000_0000,
    0b0001_0000_0000_0000,
    0b0000_1000_0000_0000,
    0b0000_0100_0000_0000,
    0b0000_0010_0000_0000,
    0b0000_0001_0000_0000,
    0b0000_0000_1000_0000,
    0b0000_0000_0100_0000,
    0b0000_0000_0010_0000,
    0b0000_0000_0001_0000,
    0b0000_0000_0000_1000,
    0b0000_0000_0000_0100,
    0b0000_0000_0000_0010,
    0b0000_0000_0000_0001,
    ],

    [
    0b1111_1111_1111_1111,
    0b0101_0101_0101_0101,
    0b0011_0011_0011_0011,
    0b0001_0001_0001_0001,
    0b0000_1111_0000_1111,
    0b0000_0101_0000_0101,
    0b0000_0011_0000_0011,
    0b0000_0001_0000_0001,
    0b0000_0000_1111_1111,
    0b0000_0000_0101_0101,
    0b0000_0000_0011_0011,
    0b0000_0000_0001_0001,
    0b0000_0000_0000_1111,
    0b0000_0000_0000_0101,
    0b0000_0000_0000_0011,
    0b0000_0000_0000_0001,
    ],

    [
    0b1010_1010_0000_1001,
    0b0111_0111_0000_0110,
    0b0011_1001_0000_0011,
    0b0001_0110_0000_0001,
    0b0000_1001_1010_1010,
    0b0000_0110_0111_0111,
    0b0000_0011_0011_1001,
    0b0000_0001_0001_0110,
    0b0000_0000_1010_0011,
    0b0000_0000_0111_0001,
    0b0000_0000_0011_1010,
    0b0000_0000_0001_0111,
    0b0000_0000_0000_1001,
    0b0000_0000_0000_0110,
    0b0000_0000_0000_0011,
    0b0000_0000_0000_0001,
    ],

    [
    0b1010_0000_1100_0011,
    0b0100_0000_0100_0001,
    0b0011_0000_0010_1101,
    0b0001_0000_0001_1110,
    0b0000_1011_0110_0111,
    0b0000_0111_1001_1010,
    0b0000_0010_1010_0100,
    0b0000_0001_0001_1011,
    0b0000_0000_1100_1001,
    0b0000_0000_0100_0101,
    0b0000_0000_0010_1110,
    0b0000_0000_0001_1111,
    0b0000_0000_0000_1010,
    0b0000_0000_0000_0100,
    0b0000_0000_0000_0011,
    0b0000_0000_0000_0001,
    ],
];

/// Reference path for the matrix-vector product. The vector paths below
/// must stay bit-identical with this loop.
#[allow(dead_code)]
fn matrix_product_scalar(index: u16, matrix: &[u16; 16]) -> u16 {
    let mut sample: u16 = 0;
    for i in 0..16 {
        if index & MASKS[i] != 0 {
            sample ^= matrix[i];
        }
    }

    sample
}

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
mod avx2 {
    use std::arch::x86_64::*;

    #[inline]
    pub unsafe fn matrix_product(index: u16, masks: &[u16; 16], matrix: &[u16; 16]) -> u16 {
        let zero = _mm256_setzero_si256();
        let splat = _mm256_set1_epi16(index as i16);

        let mask = _mm256_loadu_si256(masks.as_ptr() as *const __m256i);
        let column = _mm256_loadu_si256(matrix.as_ptr() as *const __m256i);

        let masked = _mm256_and_si256(splat, mask);
        let cond = _mm256_cmpeq_epi16(masked, zero);

        let mut bits = _mm256_andnot_si256(cond, column);

        bits = _mm256_xor_si256(bits, _mm256_srli_si256::<2>(bits));
        bits = _mm256_xor_si256(bits, _mm256_srli_si256::<4>(bits));
        bits = _mm256_xor_si256(bits, _mm256_srli_si256::<8>(bits));

        // The byte shifts above fold within each 128 bit lane, so the
        // two lane sums are combined at the end.
        (_mm256_extract_epi16::<0>(bits) ^ _mm256_extract_epi16::<8>(bits)) as u16
    }
}

#[cfg(all(target_arch = "x86_64", not(target_feature = "avx2")))]
mod sse2 {
    use std::arch::x86_64::*;

    #[inline]
    pub unsafe fn matrix_product(index: u16, masks: &[u16; 16], matrix: &[u16; 16]) -> u16 {
        let zero = _mm_setzero_si128();
        let splat = _mm_set1_epi16(index as i16);

        let mut bits = zero;
        let mut i = 0;
        while i < 16 {
            let mask = _mm_loadu_si128(masks.as_ptr().add(i) as *const __m128i);
            let column = _mm_loadu_si128(matrix.as_ptr().add(i) as *const __m128i);

            let masked = _mm_and_si128(splat, mask);
            let cond = _mm_cmpeq_epi16(masked, zero);

            bits = _mm_xor_si128(bits, _mm_andnot_si128(cond, column));

            i += 8;
        }

        bits = _mm_xor_si128(bits, _mm_srli_si128::<2>(bits));
        bits = _mm_xor_si128(bits, _mm_srli_si128::<4>(bits));
        bits = _mm_xor_si128(bits, _mm_srli_si128::<8>(bits));

        _mm_extract_epi16::<0>(bits) as u16
    }
}

#[cfg(target_arch = "aarch64")]
mod neon {
    use std::arch::aarch64::*;

    #[inline]
    pub unsafe fn matrix_product(index: u16, masks: &[u16; 16], matrix: &[u16; 16]) -> u16 {
        let zero = vdupq_n_u16(0);
        let splat = vdupq_n_u16(index);

        let mut bits = zero;
        let mut i = 0;
        while i < 16 {
            let mask = vld1q_u16(masks.as_ptr().add(i));
            let column = vld1q_u16(matrix.as_ptr().add(i));

            let masked = vandq_u16(splat, mask);
            let cond = vceqq_u16(masked, zero);

            bits = veorq_u16(bits, vandq_u16(vmvnq_u16(cond), column));

            i += 8;
        }

        bits = veorq_u16(bits, vextq_u16::<1>(bits, zero));
        bits = veorq_u16(bits, vextq_u16::<2>(bits, zero));
        bits = veorq_u16(bits, vextq_u16::<4>(bits, zero));

        vgetq_lane_u16::<0>(bits)
    }
}

/// Compute a Sobol sequence value at an index with reversed bits.
///
/// Given a 16 bit index, where the order of bits in the index has been
/// reversed, compute a Sobol sequence value to 16 bits of precision for
/// a given dimension. Dimensions must be within the range `[0, 4)`.
pub fn sobol_reversed_index(index: u16, dimension: usize) -> u16 {
    debug_assert!(dimension <= 3);

    if dimension == 0 {
        return reverse_bits_16(index);
    }

    let matrix = &DIRECTIONS[dimension];

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    return unsafe { avx2::matrix_product(index, &MASKS, matrix) };

    #[cfg(all(target_arch = "x86_64", not(target_feature = "avx2")))]
    return unsafe { sse2::matrix_product(index, &MASKS, matrix) };

    #[cfg(target_arch = "aarch64")]
    return unsafe { neon::matrix_product(index, &MASKS, matrix) };

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    return matrix_product_scalar(index, matrix);
}

/// Permute an input integer and reverse the bits. Equivalent to an Owen
/// scramble when the input bits are already reversed. Randomised with a
/// seed value.
pub const fn scramble_and_reverse(value: u32, seed: u32) -> u32 {
    reverse_bits_32(laine_karras_permutation(value, seed))
}

/// Compute a randomised Sobol sequence value.
///
/// Given an index and a seed, compute an Owen scrambled Sobol sequence
/// value of up to four dimensions. The index is shuffled in a manner
/// that is progressive friendly. For a given sequence the seed must be
/// constant. Indices of 2^16 and beyond repeat values.
pub fn shuffled_scrambled_sobol<const DEPTH: usize>(index: u32, seed: u32) -> [u32; DEPTH] {
    const {
        assert!(DEPTH >= 1, "pattern depth is greater or equal to one");
        assert!(DEPTH <= 4, "pattern depth is less or equal to four");
    }

    let index = reverse_and_shuffle(index, seed);

    let mut sample = [0_u32; DEPTH];
    for i in 0..DEPTH {
        let value = sobol_reversed_index((index >> 16) as u16, i) as u32;
        sample[i] = scramble_and_reverse(value, rotate_bytes(seed, i as u32));
    }

    sample
}

/// Plain Sobol sequence value at a natural order index.
pub fn sobol(index: u32, dimension: usize) -> u32 {
    let reversed = reverse_bits_32(index);
    let value = sobol_reversed_index((reversed >> 16) as u16, dimension) as u32;

    reverse_bits_32(value)
}

// Fifth Sobol dimension, kept out of the sample dimensions and reserved
// for index partitioning below.
#[rustfmt::skip]
const MATRIX_5: [u16; 16] = [
    0b1000_0000_0000_0000,
    0b0100_0000_0000_0000,
    0b0010_0000_0000_0000,
    0b1011_0000_0000_0000,
    0b1111_1000_0000_0000,
    0b1101_1100_0000_0000,
    0b0111_1010_0000_0000,
    0b1001_1101_0000_0000,
    0b0101_1010_1000_0000,
    0b0010_1111_1100_0000,
    0b1010_0001_0110_0000,
    0b1111_0000_1011_0000,
    0b1101_1010_1000_1000,
    0b0110_1111_1100_0100,
    0b1000_0001_0110_0010,
    0b0100_0000_1011_1011,
];

/// Sobol sequence value for dimension five, to 16 bits of precision.
pub const fn sobol_dimension_5(index: u16) -> u16 {
    let mut sample: u16 = 0;
    let mut i = 0;
    while i < 16 {
        if index & MASKS[i] != 0 {
            sample ^= MATRIX_5[i];
        }
        i += 1;
    }

    sample
}

/// Invert a dimension five sequence value back to its index.
pub const fn sobol_dimension_5_inv(sample: u16) -> u16 {
    let mut sample: u16 = sample;
    let mut index: u16 = 0;
    let mut i: i32 = 16 - 1;
    while i >= 0 {
        // Inverted masks select from the most significant bit down.
        if sample & (0x8000 >> i) != 0 {
            index |= MASKS[i as usize];
            sample ^= MATRIX_5[i as usize];
        }
        i -= 1;
    }
    debug_assert!(sample == 0);

    index
}

/// Compute the sequence index of an element within a partition.
///
/// Method by Keller and Gruenschloss, described in "Parallel
/// Quasi-Monte Carlo Integration by Partitioning Low Discrepancy
/// Sequences". Elements of a partition enumerate the subset of the
/// sequence whose dimension five values fall into that partition's
/// slice of the unit interval.
pub const fn sobol_partition_index(index: u16, log2_npartitions: u32, partition: u32) -> u16 {
    debug_assert!(log2_npartitions <= 16);
    debug_assert!(partition < 1 << log2_npartitions);

    let n: u32 = 1 << log2_npartitions;

    let ln: u32 = index as u32 * n;
    let yl: u32 = sobol_dimension_5(ln as u16) as u32;

    let keep: u32 = !((1_u32 << (16 - log2_npartitions)) - 1);
    let sum: u32 = (partition << (16 - log2_npartitions)) ^ (yl & keep);

    let kjl: u32 = sobol_dimension_5_inv(sum as u16) as u32;

    (ln + kjl) as u16
}

/// Compute a randomised Sobol sequence value from a partition.
///
/// As `shuffled_scrambled_sobol`, but drawing the elements of one of
/// `2^log2_npartitions` partitions of the sequence. The partition label
/// itself is shuffled so that related labels stay uncorrelated.
pub fn partitioned_scrambled_sobol<const DEPTH: usize>(
    index: u32,
    seed: u32,
    partition: u32,
    log2_npartitions: u32,
) -> [u32; DEPTH] {
    const {
        assert!(DEPTH >= 1, "pattern depth is greater or equal to one");
        assert!(DEPTH <= 4, "pattern depth is less or equal to four");
    }

    let mask: u32 = (1 << log2_npartitions) - 1;
    let partition = shuffle(partition, seed) & mask;

    let index = shuffle(index, seed);
    let index = sobol_partition_index(index as u16, log2_npartitions, partition) as u32;

    let mut sample = [0_u32; DEPTH];
    for i in 0..DEPTH {
        sample[i] = shuffle(sobol(index, i), rotate_bytes(seed, i as u32));
    }

    sample
}
