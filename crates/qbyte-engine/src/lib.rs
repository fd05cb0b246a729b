//! CCCE convergence engine and organism ecosystem
//!
//! The engine drives one organism forward per tick across the four regimes
//! (fractal, CRSM-6D, QPU, Hamiltonian) and mints QBYTE while coherence
//! holds. The loader owns the ecosystem: admission, Λ-symmetrization, and
//! the whole-ecosystem symmetry relaxation between ticks.

pub mod ccce;
pub mod loader;

pub use ccce::{CcceEngine, Regime, REGIMES};
pub use loader::OrganismLoader;
