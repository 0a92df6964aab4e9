//! # Lamina Core
//!
//! The structural backbone of the Lamina framework. This crate models 1D
//! layered optical media and orchestrates parameter sweeps against external
//! electromagnetic solvers; it deliberately contains no solver mathematics.
//!
//! ## Architecture
//!
//! Solvers are reached through the [`engine::Engine`] trait, which consumes a
//! [`structure::Multilayer`] plus frequency/angle sweeps and returns
//! [`engine::RawRecord`]s of named solver variables. The
//! [`simulation::Simulation`] orchestrator binds a structure, an engine, and
//! default sweeps, resolving call-time overrides without persisting them.
//!
//! ## Modules
//!
//! - [`material`] — Refractive-index models and shared material handles.
//! - [`structure`] — Layers and multilayer stacks.
//! - [`engine`] — Solver capability trait and raw result records.
//! - [`simulation`] — Sweep orchestration with transient overrides.
//! - [`sweep`] — Frequency/angle sweep sequences with scalar promotion.
//! - [`spectrum`] — Frequency/wavelength conversion helpers.

pub mod engine;
pub mod material;
pub mod simulation;
pub mod spectrum;
pub mod structure;
pub mod sweep;
