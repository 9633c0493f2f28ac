//! Field simulation engine.
//!
//! This crate implements the bounded 2D field where farmers, weeds and bean
//! plants live, act once per step in shuffled order, and are added/removed
//! in a deferred commit phase.

pub mod actor;
pub mod field;
pub mod simulation;
pub mod view;

pub use actor::Actor;
pub use field::{Field, FieldSnapshot};
pub use simulation::{Simulation, StepSummary};
pub use view::{NullView, SimulatorView};
