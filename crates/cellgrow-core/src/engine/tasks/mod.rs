//! Computational steps of structure expansion.
//!
//! Each submodule is one stage of the pipeline driven by
//! [`workflows::grow`](crate::workflows::grow): the shortest distance matrix feeds
//! fragment labeling and symmetry completion, whose needed images drive packing;
//! bond derivation runs on the packed Cartesian atoms.

pub mod bonds;
pub mod completion;
pub mod fragments;
pub mod packing;
pub mod sdm;
