// openqmc

//! Shared machinery behind the samplers: bit manipulation, the PCG
//! generator, coordinate encoding, hash based permutations, the base
//! low discrepancy sequences, table lookups, the blue noise tables, the
//! sampler state algebra and the generic sampler interface.

pub mod bits;
pub mod bntables;
pub mod encode;
pub mod float;
pub mod lookup;
pub mod pcg;
pub mod permute;
pub mod range;
pub mod rank1;
pub mod sampler;
pub mod sobol;
pub mod state;
pub mod stochastic;
