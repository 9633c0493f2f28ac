//! Display sink contract for simulation state.

use crate::field::FieldSnapshot;
use croft_core::{ActorKind, Color};

/// A pure sink for rendering: the engine registers one color per actor kind
/// before a run and pushes a snapshot after every step. It never reads
/// anything back.
pub trait SimulatorView {
    fn set_color(&mut self, kind: ActorKind, color: Color);
    fn show_status(&mut self, step: u64, field: &FieldSnapshot);
}

/// View that discards everything. Used by headless runs and tests.
pub struct NullView;

impl SimulatorView for NullView {
    fn set_color(&mut self, _kind: ActorKind, _color: Color) {}
    fn show_status(&mut self, _step: u64, _field: &FieldSnapshot) {}
}
