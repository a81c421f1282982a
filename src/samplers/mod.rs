// openqmc

//! The concrete sampler implementations, each combining one base
//! sequence with an optional screen-space blue noise layer:
//!
//! - SobolSampler / SobolBnSampler
//! - LatticeSampler / LatticeBnSampler
//! - PmjSampler / PmjBnSampler
//!
//! All of them implement the generic `Sampler` trait from
//! `core::sampler` and are interchangeable at the call site. The blue
//! noise variants are usually the better choice: the extra table
//! lookups cost little next to the gains at low sample counts,
//! although on some architectures the memory traffic is worth
//! benchmarking.
//!
//! ## Sobol
//!
//! Owen scrambled Sobol sequences computed on the fly. No cache, the
//! highest quality per draw, and the highest cost per draw.
//!
//! ## Lattice
//!
//! A progressive rank-1 lattice. No cache and cheap draws, with a
//! lower rate of integration per pixel than the other samplers.
//!
//! ## Pmj
//!
//! A progressive multi-jittered (0,2) sequence served from a
//! pre-computed table. Cheap draws and a very high rate of integration
//! for the first pair of dimensions, at the price of table memory.

pub mod lattice;
pub mod latticebn;
pub mod pmj;
pub mod pmjbn;
pub mod sobol;
pub mod sobolbn;

pub use self::lattice::LatticeSampler;
pub use self::latticebn::{LatticeBnCache, LatticeBnSampler};
pub use self::pmj::{PmjCache, PmjSampler};
pub use self::pmjbn::{PmjBnCache, PmjBnSampler};
pub use self::sobol::SobolSampler;
pub use self::sobolbn::{SobolBnCache, SobolBnSampler};
