// openqmc

//! The **Sampler** trait defines the generic API shared by the sampler
//! implementations, and provides the floating point and bounded draw
//! wrappers on top of the raw integer draws.

use crate::core::float::uint_to_float;
use crate::core::range::uint_to_range;

/// Generic sampler interface.
///
/// Different samplers implementing the trait are interchangeable,
/// allowing implementations to be tested and compared without changing
/// the calling code. Dispatch is static; draws monomorphise on the
/// requested dimension count and have no virtual call cost.
///
/// Once a sampler is constructed its state cannot change. New samplers
/// are derived from a parent with the `new_domain*` functions, forming
/// an implicit domain tree; each domain supplies an independent pattern
/// of up to four dimensions, retrieved with the `draw*` functions.
/// Calls to `new_domain*` are cheap in comparison to draws.
///
/// Sampler values are at most 16 bytes (the state plus an optional
/// cache reference) and are always passed by value. For sweeps over
/// sample indices, construct a fresh sampler per index rather than
/// mutating a cursor.
pub trait Sampler: Copy {
    /// Derive a sampler in a new domain.
    ///
    /// N child domains can be derived from a single parent with the use
    /// of the key argument. Keys must differ in at least one bit, but
    /// can be a simple incrementing sequence. Each child produces an
    /// independent 4 dimensional pattern; joining patterns from sibling
    /// domains into an N dimensional pattern is called padding.
    fn new_domain(&self, key: i32) -> Self;

    /// Derive a sampler in a new domain for splitting with a known,
    /// constant multiplier.
    ///
    /// Code taking `size` branching samples per parent index draws each
    /// branch from the child domain at `index` in `[0, size)`. Because
    /// the multiplier is constant, the composite sample indices remap
    /// onto a contiguous prefix of the parent index space, so the local
    /// pattern stays well distributed globally as well as locally. If
    /// the multiplier varies, use `new_domain_distrib` instead.
    fn new_domain_split(&self, key: i32, size: i32, index: i32) -> Self;

    /// Derive a sampler in a new domain for a local distribution with
    /// an unknown multiplier.
    ///
    /// The pattern is decorrelated from sibling sample indices, so any
    /// number of branch samples can be taken safely. The local pattern
    /// is well distributed, but correlation with the patterns of other
    /// parent samples is given up; prefer `new_domain_split` when the
    /// multiplier is known and constant.
    fn new_domain_distrib(&self, key: i32, index: i32) -> Self;

    /// Draw integer sample values from the domain.
    ///
    /// Computes up to 4 dimensions of the domain pattern. The operation
    /// does not change the sampler, and for a single domain and index
    /// the result is always the same. Output values are uniformly
    /// distributed over `[0, 2^32)`.
    ///
    /// These values are of high quality and should be handled with care
    /// to not introduce bias into an estimate. For low quality but fast
    /// and safe random numbers use `draw_rnd`.
    fn draw_sample<const SIZE: usize>(&self) -> [u32; SIZE];

    /// Draw integer pseudo random values from the domain.
    ///
    /// As `draw_sample`, but the values are pseudo random rather than
    /// low discrepancy: lower quality, cheaper to compute, and with
    /// little risk of biasing an estimate.
    fn draw_rnd<const SIZE: usize>(&self) -> [u32; SIZE];

    /// Derive a sampler two domains down, keyed then indexed. A
    /// globally distributed adaptive variant: the index walks domains
    /// rather than remapping the sample index.
    fn new_domain_chain(&self, key: i32, index: i32) -> Self {
        debug_assert!(index >= 0);

        self.new_domain(key).new_domain(index)
    }

    /// Draw floating point sample values from the domain, uniformly
    /// distributed over `[0, 1)`.
    fn draw_sample_float<const SIZE: usize>(&self) -> [f32; SIZE] {
        let samples = self.draw_sample::<SIZE>();

        let mut out = [0_f32; SIZE];
        for i in 0..SIZE {
            out[i] = uint_to_float(samples[i]);
        }

        out
    }

    /// Draw integer sample values from the domain, mapped into the
    /// half-open range `[0, range)`. The range must be greater than
    /// zero.
    fn draw_sample_bounded<const SIZE: usize>(&self, range: u32) -> [u32; SIZE] {
        debug_assert!(range > 0);

        let samples = self.draw_sample::<SIZE>();

        let mut out = [0_u32; SIZE];
        for i in 0..SIZE {
            out[i] = uint_to_range(samples[i], range);
        }

        out
    }

    /// Draw floating point pseudo random values from the domain,
    /// uniformly distributed over `[0, 1)`.
    fn draw_rnd_float<const SIZE: usize>(&self) -> [f32; SIZE] {
        let rnds = self.draw_rnd::<SIZE>();

        let mut out = [0_f32; SIZE];
        for i in 0..SIZE {
            out[i] = uint_to_float(rnds[i]);
        }

        out
    }

    /// Draw integer pseudo random values from the domain, mapped into
    /// the half-open range `[0, range)`. The range must be greater than
    /// zero.
    fn draw_rnd_bounded<const SIZE: usize>(&self, range: u32) -> [u32; SIZE] {
        debug_assert!(range > 0);

        let rnds = self.draw_rnd::<SIZE>();

        let mut out = [0_u32; SIZE];
        for i in 0..SIZE {
            out[i] = uint_to_range(rnds[i], range);
        }

        out
    }
}
