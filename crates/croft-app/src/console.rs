//! ANSI terminal rendering of field snapshots.

use croft_core::{ActorKind, Color, Location};
use croft_world::{FieldSnapshot, SimulatorView};
use std::collections::HashMap;
use std::io::{self, Write};

const EMPTY_GLYPH: char = '.';

/// Renders each snapshot as a colored character grid with a population
/// summary line. A pure sink; rendering failures are ignored.
pub struct ConsoleView {
    colors: HashMap<ActorKind, Color>,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self {
            colors: HashMap::new(),
        }
    }

    fn glyph(kind: ActorKind) -> char {
        match kind {
            ActorKind::Farmer => 'F',
            ActorKind::Weed => 'w',
            ActorKind::BeanPlant => 'b',
        }
    }

    fn paint(&self, kind: ActorKind) -> String {
        let glyph = Self::glyph(kind);
        match self.colors.get(&kind) {
            Some(color) => format!(
                "\x1b[38;2;{};{};{}m{}\x1b[0m",
                color.r, color.g, color.b, glyph
            ),
            None => glyph.to_string(),
        }
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorView for ConsoleView {
    fn set_color(&mut self, kind: ActorKind, color: Color) {
        self.colors.insert(kind, color);
    }

    fn show_status(&mut self, step: u64, field: &FieldSnapshot) {
        let mut out = String::new();
        out.push_str(&format!(
            "step {:>5}  farmers {:>3}  weeds {:>4}  beans {:>4}\n",
            step,
            field.count(ActorKind::Farmer),
            field.count(ActorKind::Weed),
            field.count(ActorKind::BeanPlant),
        ));

        for row in 0..field.depth() {
            for col in 0..field.width() {
                match field.get(Location::new(row, col)) {
                    Some(kind) => out.push_str(&self.paint(kind)),
                    None => out.push(EMPTY_GLYPH),
                }
            }
            out.push('\n');
        }

        let mut stdout = io::stdout();
        let _ = stdout.write_all(out.as_bytes());
        let _ = stdout.flush();
    }
}
