// openqmc

//! An implementation of the insecure PCG-RXS-M-XS-32 pseudo random number
//! generator by Melissa E. O'Neill, which is small and fast while meeting
//! the statistical needs of the samplers built on top of it. The same
//! primitives double as a hash function in the manner of Jarzynski and
//! Olano's "Hash Functions for GPU Rendering". Coefficients are the
//! reference ones from the pcg-c distribution.

/// Transition the generator state with an LCG step. Incrementing the
/// input state selects a new sequence stream.
pub const fn state_transition(state: u32) -> u32 {
    state.wrapping_mul(747_796_405).wrapping_add(2_891_336_453)
}

/// Permute the generator state into an output value with good
/// statistical properties. These are the RXS-M-XS operations.
pub const fn output(state: u32) -> u32 {
    let mut state: u32 = state;
    state ^= state >> (4 + (state >> 28));
    state = state.wrapping_mul(277_803_737);
    state ^ (state >> 22)
}

/// Default initialise the generator state. This must be done before the
/// state is passed to any other function in this module.
pub const fn init() -> u32 {
    state_transition(0)
}

/// Initialise the generator state from a seed value.
pub const fn init_with_seed(seed: u32) -> u32 {
    init().wrapping_add(seed)
}

/// Compute a hash value from an input key. Useful to seed a system, or
/// to compute an array of random values in parallel.
pub const fn hash(key: u32) -> u32 {
    output(state_transition(key))
}

/// Compute the next random number in the sequence, advancing the state.
pub fn rng(state: &mut u32) -> u32 {
    *state = state_transition(*state);
    output(*state)
}

/// Compute a random integer within the half-open range `[0, range)`
/// without the modulo bias of naive methods. The rejection loop from
/// Lemire's method runs an expected once. Low order bits pass through
/// to the output, which is fine for PCG as its low bits are strong; for
/// low-discrepancy values use `uint_to_range` instead, which preserves
/// the correlation structure of a sequence.
pub fn rng_bounded(range: u32, state: &mut u32) -> u32 {
    debug_assert!(range > 0);

    let mut x: u32 = rng(state);
    let mut r: u32 = x % range;
    while x.wrapping_sub(r) > range.wrapping_neg() {
        x = rng(state);
        r = x % range;
    }

    r
}

/// Compute a random integer within the half-open range `[begin, end)`.
pub fn rng_bounded_within(begin: u32, end: u32, state: &mut u32) -> u32 {
    debug_assert!(begin < end);

    rng_bounded(end - begin, state) + begin
}
