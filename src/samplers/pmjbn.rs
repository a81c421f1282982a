// openqmc

//! Pmjbn sampler implementation.

use crate::core::bntables;
use crate::core::lookup::shuffled_scrambled_lookup;
use crate::core::pcg;
use crate::core::sampler::Sampler;
use crate::core::state::State64Bit;
use crate::core::stochastic::stochastic_pmj_init;

const _: () = assert!(
    bntables::X_BITS == State64Bit::SPATIAL_ENCODE_BIT_SIZE_X
        && bntables::Y_BITS == State64Bit::SPATIAL_ENCODE_BIT_SIZE_Y
        && bntables::Z_BITS == State64Bit::TEMPORAL_ENCODE_BIT_SIZE,
    "pixel encoding must match table"
);

/// Sample table plus key and rank tables backing the pmj blue noise
/// sampler. Built once per process; read-only after construction.
#[derive(Debug, Clone)]
pub struct PmjBnCache {
    samples: Vec<[u32; 4]>,
    key_table: Vec<u32>,
    rank_table: Vec<u32>,
}

impl PmjBnCache {
    /// Table footprint in bytes.
    pub const SIZE: usize = State64Bit::MAX_INDEX_SIZE * 4 * std::mem::size_of::<u32>()
        + 2 * bntables::SIZE * std::mem::size_of::<u32>();

    /// Allocate and fill the sample and table pair allocations.
    pub fn new() -> Self {
        let mut samples = vec![[0_u32; 4]; State64Bit::MAX_INDEX_SIZE];
        stochastic_pmj_init(&mut samples);

        let mut key_table = vec![0_u32; bntables::SIZE];
        let mut rank_table = vec![0_u32; bntables::SIZE];
        bntables::fill_tables(bntables::PMJ_SEED, &mut key_table, &mut rank_table);

        PmjBnCache {
            samples,
            key_table,
            rank_table,
        }
    }
}

impl Default for PmjBnCache {
    fn default() -> Self {
        PmjBnCache::new()
    }
}

/// Progressive multi-jittered sampler with screen-space blue noise
/// dithering between pixels and progressive ranking for progressive
/// pixel sampling.
///
/// The tables work as for the other blue noise variants: keys seed the
/// per-pixel lookup scramble, ranks shuffle the per-pixel index, and
/// lookups are toroidally shifted per domain so one table pair serves
/// them all.
#[derive(Debug, Copy, Clone)]
pub struct PmjBnSampler<'a> {
    state: State64Bit,
    cache: &'a PmjBnCache,
}

impl<'a> PmjBnSampler<'a> {
    /// Required cache footprint in bytes.
    pub const CACHE_SIZE: usize = PmjBnCache::SIZE;

    /// Create a sampler from the pixel, frame and sample indices over
    /// an initialised cache. The index must not be negative.
    pub fn new(x: i32, y: i32, frame: i32, index: i32, cache: &'a PmjBnCache) -> Self {
        PmjBnSampler {
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

impl<'a> Sampler for PmjBnSampler<'a> {
    fn new_domain(&self, key: i32) -> Self {
        PmjBnSampler {
            state: self.state.new_domain(key),
            cache: self.cache,
        }
    }

    fn new_domain_split(&self, key: i32, size: i32, index: i32) -> Self {
        PmjBnSampler {
            state: self.state.new_domain_split(key, size, index),
            cache: self.cache,
        }
    }

    fn new_domain_distrib(&self, key: i32, index: i32) -> Self {
        PmjBnSampler {
            state: self.state.new_domain_distrib(key, index),
            cache: self.cache,
        }
    }

    fn draw_sample<const SIZE: usize>(&self) -> [u32; SIZE] {
        let table = self.table_value();

        shuffled_scrambled_lookup::<4, SIZE>(
            self.state.sample_id as u32 ^ table.rank,
            table.key,
            &self.cache.samples,
        )
    }

    // Pseudo random draws stay pixel decorrelated even though the
    // sample draw goes through the tables.
    fn draw_rnd<const SIZE: usize>(&self) -> [u32; SIZE] {
        self.state
            .new_domain(self.state.pixel_id as i32)
            .draw_rnd::<SIZE>()
    }
}
