//! pf-components: per-element friction losses for piping networks.
//!
//! Provides head-loss models for the elements a water network is built from:
//! - Pipes (Darcy-Weisbach with a Colebrook-White friction factor)
//! - Valves and fittings (catalog K-value times velocity head)
//! - Thermostatic mixing valves (catalog pressure-drop curve, one-way)
//! - Boundary elements such as sources and fixtures (lossless)
//!
//! Elements are plain data. Catalog tables, fluid properties and network
//! geometry are reached through the `LossContext` trait, so the same element
//! can be evaluated against any network that implements it.
//!
//! # Example
//!
//! ```
//! use pf_components::friction::colebrook_white;
//!
//! // Smooth 20 mm pipe at Re = 100 000.
//! let f = colebrook_white(0.0, 20.0, 1.0e5).unwrap();
//! assert!((f - 0.017_99).abs() < 1e-4);
//! ```

pub mod catalog;
pub mod common;
pub mod element;
pub mod error;
pub mod friction;
pub mod pipe;
pub mod traits;
pub mod valve;

// Re-exports
pub use catalog::{
    Catalog, KValuePoint, MixingValveTable, PipeMaterial, PipeSize, PipeSpec, PressureDropPoint,
    ValveKTable,
};
pub use element::{Element, ElementKind};
pub use error::{ComponentError, ComponentResult};
pub use pipe::Pipe;
pub use traits::LossContext;
pub use valve::{BACKFLOW_PENALTY, Fitting, MixingValve};
