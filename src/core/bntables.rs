// openqmc

//! Blue noise key and rank tables used to decorrelate between pixels
//! and extend the base sampler implementations with screen-space blue
//! noise properties, generalising "Lessons Learned and Improvements
//! when Building Screen-Space Samplers with Blue-Noise Error
//! Distribution" by Belcour and Heitz. Lookups apply constant random
//! shifts per domain, so a single table pair serves N domains.
//!
//! Table contents are filled deterministically from a hash stream, one
//! stream per sampler family. An offline optimisation pass over the
//! table values changes only the fill, never the lookup scheme.

use crate::core::encode::{decode_bits_16, encode_bits_16, EncodeKey};
use crate::core::pcg;

/// 64 pixels in x.
pub const X_BITS: u32 = 6;
/// 64 pixels in y.
pub const Y_BITS: u32 = 6;
/// 16 pixels in time.
pub const Z_BITS: u32 = 4;

/// 2^16 table entries.
pub const SIZE: usize = 1 << (X_BITS + Y_BITS + Z_BITS);

const _: () = assert!(X_BITS == Y_BITS, "tables must have equal resolution in x and y");

/// A key and rank value pair used to randomise a sequence.
#[derive(Debug, Copy, Clone)]
pub struct TableValue {
    /// Seeds the sequence draw.
    pub key: u32,
    /// Shuffles the sequence index.
    pub rank: u32,
}

/// Lookup a value pair from a table.
///
/// Given an encoded pixel coordinate and an encoded pixel shift, decode
/// both, add the shift to the coordinate and re-encode to compute an
/// index. Each axis wraps at its encoded resolution, so the addition is
/// a toroidal shift over the table tile.
pub fn table_value<const X: u32, const Y: u32, const Z: u32>(
    pixel: u16,
    shift: u16,
    key_table: &[u32],
    rank_table: &[u32],
) -> TableValue {
    let pixel_offset = decode_bits_16::<X, Y, Z>(pixel);
    let shift_offset = decode_bits_16::<X, Y, Z>(shift);

    let index = encode_bits_16::<X, Y, Z>(EncodeKey {
        x: pixel_offset.x + shift_offset.x,
        y: pixel_offset.y + shift_offset.y,
        z: pixel_offset.z + shift_offset.z,
    });

    TableValue {
        key: key_table[index as usize],
        rank: rank_table[index as usize],
    }
}

/// Fill a key and rank table pair from a deterministic hash stream.
/// Keys span the full 32 bit range; ranks are limited to 16 bits so a
/// rank XOR keeps a shuffled index within the table prefix.
pub fn fill_tables(seed: u32, key_table: &mut [u32], rank_table: &mut [u32]) {
    debug_assert!(key_table.len() == rank_table.len());

    let mut state = pcg::init_with_seed(seed);
    for i in 0..key_table.len() {
        key_table[i] = pcg::rng(&mut state);
        rank_table[i] = pcg::rng(&mut state) & 0xffff;
    }
}

/// Table family seed for the pmj samplers.
pub const PMJ_SEED: u32 = 0;
/// Table family seed for the sobol samplers.
pub const SOBOL_SEED: u32 = 1;
/// Table family seed for the lattice samplers.
pub const LATTICE_SEED: u32 = 2;
