//! # Engine Module
//!
//! The computational core of structure expansion: from an asymmetric unit to the
//! complete, chemically connected set of atoms it implies under crystal symmetry.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Heuristic distance thresholds and policies, built
//!   and validated through [`config::GrowConfigBuilder`]
//! - **Tasks** ([`tasks`]) - Shortest distance matrix, fragment labeling, symmetry
//!   completion, packing and bond derivation, each a standalone step
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - The aggregated [`error::EngineError`]
//!
//! The distance search is parallelized with rayon when the `parallel` feature is
//! enabled; every other step is sequential and all results are deterministic.

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
pub(crate) mod utils;
