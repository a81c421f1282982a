//! # openqmc
//!
//! A library of quasi-Monte Carlo sample generators for Monte Carlo
//! estimators, principally light transport rendering. Given a pixel
//! coordinate, a time index and a sample index, the samplers return
//! deterministic low discrepancy multi-dimensional points in `[0, 1)`.
//!
//! Six samplers combine three base sequences (Owen scrambled Sobol, a
//! progressive rank-1 lattice, and a stochastic progressive
//! multi-jittered (0,2) sequence) with an optional screen-space blue
//! noise layer. All of them share the generic [`Sampler`] interface
//! and a 64 bit value-type state, so they are interchangeable at the
//! call site and cheap to copy into inner loops.
//!
//! ## Basic usage
//!
//! ```rust
//! use openqmc::core::sampler::Sampler;
//! use openqmc::samplers::SobolSampler;
//!
//! // Four low discrepancy dimensions per pixel sample.
//! for index in 0..64 {
//!     let sampler = SobolSampler::new(11, 7, 0, index);
//!     let [x, y, u, v] = sampler.draw_sample_float::<4>();
//!     assert!(x < 1.0 && y < 1.0 && u < 1.0 && v < 1.0);
//! }
//! ```
//!
//! ## Domains
//!
//! A sampler value names a node in an implicit domain tree. Child
//! domains supply independent patterns for other parts of an
//! estimator, and are derived by keyed mutation:
//!
//! ```rust
//! use openqmc::core::sampler::Sampler;
//! use openqmc::samplers::{PmjCache, PmjSampler};
//!
//! let cache = PmjCache::new();
//! let sampler = PmjSampler::new(11, 7, 0, 0, &cache);
//!
//! let light = sampler.new_domain(1);
//!
//! // Split a light sample into four strata.
//! for i in 0..4 {
//!     let [u, v] = light.new_domain_split(0, 4, i).draw_sample_float::<2>();
//!     assert!(u < 1.0 && v < 1.0);
//! }
//! ```
//!
//! Caches are built once per process, are read-only afterwards, and
//! may be shared across threads by reference without synchronisation.
//!
//! [`Sampler`]: core/sampler/trait.Sampler.html

pub mod core;
pub mod samplers;
