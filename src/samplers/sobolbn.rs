// openqmc

//! Sobol blue noise sampler implementation.

use crate::core::bntables;
use crate::core::pcg;
use crate::core::sampler::Sampler;
use crate::core::sobol::shuffled_scrambled_sobol;
use crate::core::state::State64Bit;

const _: () = assert!(
    bntables::X_BITS == State64Bit::SPATIAL_ENCODE_BIT_SIZE_X
        && bntables::Y_BITS == State64Bit::SPATIAL_ENCODE_BIT_SIZE_Y
        && bntables::Z_BITS == State64Bit::TEMPORAL_ENCODE_BIT_SIZE,
    "pixel encoding must match table"
);

/// Key and rank tables backing the Sobol blue noise sampler. Built once
/// per process and shared by reference across sampler values; contents
/// never change after construction, so the cache can be read from many
/// threads without synchronisation.
#[derive(Debug, Clone)]
pub struct SobolBnCache {
    key_table: Vec<u32>,
    rank_table: Vec<u32>,
}

impl SobolBnCache {
    /// Table footprint in bytes.
    pub const SIZE: usize = 2 * bntables::SIZE * std::mem::size_of::<u32>();

    /// Allocate and fill the table pair.
    pub fn new() -> Self {
        let mut key_table = vec![0_u32; bntables::SIZE];
        let mut rank_table = vec![0_u32; bntables::SIZE];
        bntables::fill_tables(bntables::SOBOL_SEED, &mut key_table, &mut rank_table);

        SobolBnCache {
            key_table,
            rank_table,
        }
    }
}

impl Default for SobolBnCache {
    fn default() -> Self {
        SobolBnCache::new()
    }
}

/// Sobol sampler with screen-space blue noise dithering between pixels
/// and progressive ranking for progressive pixel sampling.
///
/// Two pixel tables drive the dithering: one holds keys to seed the
/// sequence, the other index ranks. Lookups are toroidally shifted per
/// domain with random offsets, so a single table pair provides keys and
/// ranks for many domains.
///
/// The blue noise layer does not reduce the error of an individual
/// pixel, but it moves the error between pixels into high frequencies,
/// which reads better perceptually and filters better under denoising
/// or temporal anti-aliasing.
#[derive(Debug, Copy, Clone)]
pub struct SobolBnSampler<'a> {
    state: State64Bit,
    cache: &'a SobolBnCache,
}

impl<'a> SobolBnSampler<'a> {
    /// Required cache footprint in bytes.
    pub const CACHE_SIZE: usize = SobolBnCache::SIZE;

    /// Create a sampler from the pixel, frame and sample indices over
    /// an initialised cache. The index must not be negative. Pixel
    /// decorrelation comes from the tables, not the state.
    pub fn new(x: i32, y: i32, frame: i32, index: i32, cache: &'a SobolBnCache) -> Self {
        SobolBnSampler {
            state: State64Bit::new(x, y, frame, index),
            cache,
        }
    }

    fn table_value(&self) -> bntables::TableValue {
        bntables::table_value::<{ bntables::X_BITS }, { bntables::Y_BITS }, { bntables::Z_BITS }>(
            self.state.pixel_id,
            pcg::output(self.state.pattern_id) as u16,
            &self.cache.key_table,
            &self.cache.rank_table,
        )
    }
}

impl<'a> Sampler for SobolBnSampler<'a> {
    fn new_domain(&self, key: i32) -> Self {
        SobolBnSampler {
            state: self.state.new_domain(key),
            cache: self.cache,
        }
    }

    fn new_domain_split(&self, key: i32, size: i32, index: i32) -> Self {
        SobolBnSampler {
            state: self.state.new_domain_split(key, size, index),
            cache: self.cache,
        }
    }

    fn new_domain_distrib(&self, key: i32, index: i32) -> Self {
        SobolBnSampler {
            state: self.state.new_domain_distrib(key, index),
            cache: self.cache,
        }
    }

    fn draw_sample<const SIZE: usize>(&self) -> [u32; SIZE] {
        let table = self.table_value();

        shuffled_scrambled_sobol::<SIZE>(self.state.sample_id as u32 ^ table.rank, table.key)
    }

    // Pseudo random draws stay pixel decorrelated even though the
    // sample draw goes through the tables.
    fn draw_rnd<const SIZE: usize>(&self) -> [u32; SIZE] {
        self.state
            .new_domain(self.state.pixel_id as i32)
            .draw_rnd::<SIZE>()
    }
}
