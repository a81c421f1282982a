// openqmc

//! Hash based permutations, the building block for scrambling and
//! shuffling progressive sequences. The hash is the variant originally
//! published by Laine and Karras in "Stratified Sampling for Stochastic
//! Transparency", with the improved constants by Nathan Vegdahl.

use crate::core::bits::reverse_bits_32;

/// Permute the bits of an integer so that lower bits affect higher
/// bits, but never the other way around. Combined with a bit reversal
/// before and after, this forms an efficient hash based Owen scramble.
pub const fn laine_karras_permutation(value: u32, seed: u32) -> u32 {
    let mut value: u32 = value;
    value ^= value.wrapping_mul(0x3d20_adea);
    value = value.wrapping_add(seed);
    value = value.wrapping_mul((seed >> 16) | 1);
    value ^= value.wrapping_mul(0x0552_6c56);
    value ^= value.wrapping_mul(0x53a2_2864);

    value
}

/// Reverse the bit order of an integer, then permute. Randomised with a
/// seed value.
pub const fn reverse_and_shuffle(value: u32, seed: u32) -> u32 {
    laine_karras_permutation(reverse_bits_32(value), seed)
}

/// Compute a hash based Owen scramble of an integer. This can scramble
/// a sequence value, or shuffle the order of a sequence in a
/// progressive friendly manner.
pub const fn shuffle(value: u32, seed: u32) -> u32 {
    reverse_bits_32(reverse_and_shuffle(value, seed))
}
