//! # Workflows Module
//!
//! High-level entry points that run the engine tasks end to end.
//!
//! - **Grow Workflow** ([`grow`]) - Expands an asymmetric unit into complete molecules,
//!   derives their bonds and renders molfiles; also provides the no-grow path and a
//!   structure summary.

pub mod grow;
