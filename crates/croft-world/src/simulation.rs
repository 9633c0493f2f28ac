//! Simulation orchestrator: seeding, the act/commit step, and the run loop.

use crate::actor::{self, Actor, Spawn};
use crate::field::{Field, FieldSnapshot};
use crate::view::{NullView, SimulatorView};
use croft_core::{ActorId, ActorKind, SimConfig, DEFAULT_FIELD_DEPTH, DEFAULT_FIELD_WIDTH};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummary {
    pub step: u64,
    pub spawned: usize,
    pub removed: usize,
}

/// Drives the field and the actor registry through act/commit steps.
///
/// The registry is a `BTreeMap` so that the id collection fed into the
/// per-step shuffle is always in the same order; with a fixed seed the
/// whole run is then reproducible.
pub struct Simulation {
    field: Field,
    actors: BTreeMap<ActorId, Actor>,
    config: SimConfig,
    rng: ChaCha8Rng,
    view: Box<dyn SimulatorView>,
    step: u64,
    next_id: u64,
}

impl Simulation {
    /// Headless construction. Non-positive dimensions are silently replaced
    /// by the configured defaults; this substitution happens here, never in
    /// `Field`.
    pub fn new(depth: i32, width: i32, config: SimConfig) -> Self {
        Self::with_view(depth, width, config, Box::new(NullView))
    }

    /// Construction with an attached display sink. Per-kind colors are
    /// registered exactly once, before any stepping.
    pub fn with_view(
        depth: i32,
        width: i32,
        config: SimConfig,
        mut view: Box<dyn SimulatorView>,
    ) -> Self {
        let depth = normalize(depth, config.field.depth, DEFAULT_FIELD_DEPTH);
        let width = normalize(width, config.field.width, DEFAULT_FIELD_WIDTH);

        view.set_color(ActorKind::Farmer, config.display.farmer_color);
        view.set_color(ActorKind::Weed, config.display.weed_color);
        view.set_color(ActorKind::BeanPlant, config.display.bean_color);

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            field: Field::new(depth, width),
            actors: BTreeMap::new(),
            config,
            rng,
            view,
            step: 0,
            next_id: 0,
        }
    }

    /// Reset the random stream, for reproducible reruns.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Seed the field: one uniform draw per cell in row-major order, checked
    /// against the cumulative creation bands in fixed farmer/weed/bean
    /// order. Plants start with a randomized age in `[0, max_age)` so the
    /// initial field shows varied maturity.
    pub fn populate(&mut self) {
        self.field.clear();
        self.actors.clear();

        let creation = self.config.creation.clone();
        let plants = self.config.plants.clone();
        let locations: Vec<_> = self.field.locations().collect();
        for location in locations {
            let roll = self.rng.gen::<f64>();
            if roll < creation.farmer_prob {
                let id = self.allocate_id();
                self.insert(Actor::farmer(id, location));
            } else if roll < creation.farmer_prob + creation.weed_prob {
                let age = self.rng.gen_range(0..plants.weed_max_age);
                let id = self.allocate_id();
                self.insert(Actor::weed(id, location, age));
            } else if roll < creation.farmer_prob + creation.weed_prob + creation.bean_prob {
                let age = self.rng.gen_range(0..plants.bean_max_age);
                let id = self.allocate_id();
                self.insert(Actor::bean_plant(id, location, age));
            }
        }

        info!(actors = self.actors.len(), "field populated");
    }

    /// One tick: shuffle, act phase, commit phase, view notification.
    pub fn simulate_one_step(&mut self) -> StepSummary {
        // Shuffling the whole registry removes positional bias in who acts
        // first each step.
        let mut ids: Vec<ActorId> = self.actors.keys().copied().collect();
        ids.shuffle(&mut self.rng);

        // Act phase: every actor in the shuffled list takes exactly one
        // turn, including plants that die mid-phase (a dead plant's turn is
        // a no-op, it is never skipped). Registry membership stays frozen;
        // structural changes accumulate in the spawn buffer and dead flags.
        let mut spawns: Vec<Spawn> = Vec::new();
        for id in ids {
            actor::act(
                id,
                &mut self.field,
                &mut self.actors,
                &self.config.plants,
                &mut self.rng,
                &mut spawns,
            );
        }

        // Commit phase: adds before removals, so offspring of a plant that
        // spread and then died in this same step still enter the registry.
        let spawned = self.add_new_actors(spawns);
        let removed = self.remove_plants_if_dead();

        self.step += 1;
        let snapshot = self.snapshot();
        self.view.show_status(self.step, &snapshot);

        StepSummary {
            step: self.step,
            spawned,
            removed,
        }
    }

    /// Run `num_steps` ticks with the configured inter-step pacing delay.
    pub fn simulate(&mut self, num_steps: u64) {
        info!(
            steps = num_steps,
            depth = self.field.depth(),
            width = self.field.width(),
            "starting simulation run"
        );

        for i in 0..num_steps {
            self.simulate_one_step();
            if (i + 1) % 100 == 0 {
                info!(step = self.step, actors = self.actors.len(), "population checkpoint");
            }
            if self.config.step_delay_ms > 0 {
                std::thread::sleep(Duration::from_millis(self.config.step_delay_ms));
            }
        }

        info!(step = self.step, actors = self.actors.len(), "simulation run complete");
    }

    /// Insert buffered spawns into registry and field. A spawn whose target
    /// cell was claimed during the phase (an earlier spawn, or a farmer
    /// moving in) is dropped: double-placing would orphan a registry actor.
    fn add_new_actors(&mut self, spawns: Vec<Spawn>) -> usize {
        let mut added = 0;
        for spawn in spawns {
            if self.field.get(spawn.location).is_some() {
                debug!(at = %spawn.location, "dropping spawn into occupied cell");
                continue;
            }
            let id = self.allocate_id();
            let actor = match spawn.kind {
                ActorKind::Farmer => Actor::farmer(id, spawn.location),
                ActorKind::Weed => Actor::weed(id, spawn.location, 0),
                ActorKind::BeanPlant => Actor::bean_plant(id, spawn.location, 0),
            };
            self.insert(actor);
            added += 1;
        }
        added
    }

    /// Drop every dead plant from the registry. The dying plant's own cell
    /// is cleared only if it still holds that plant; a farmer may have
    /// harvested it and moved in during the act phase.
    fn remove_plants_if_dead(&mut self) -> usize {
        let dead: Vec<ActorId> = self
            .actors
            .values()
            .filter(|actor| actor.is_dead_plant())
            .map(|actor| actor.id)
            .collect();

        let mut removed = 0;
        for id in dead {
            if let Some(actor) = self.actors.remove(&id) {
                if self.field.get(actor.location) == Some(id) {
                    self.field.clear_location(actor.location);
                }
                debug!(actor = %id, at = %actor.location, "removed dead plant");
                removed += 1;
            }
        }
        removed
    }

    /// Per-kind view of the current field state.
    pub fn snapshot(&self) -> FieldSnapshot {
        let cells = self
            .field
            .locations()
            .map(|location| {
                self.field
                    .get(location)
                    .and_then(|id| self.actors.get(&id))
                    .map(Actor::kind)
            })
            .collect();
        FieldSnapshot::new(self.field.depth(), self.field.width(), cells)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values()
    }

    fn allocate_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, actor: Actor) {
        self.field.place(actor.id, actor.location);
        self.actors.insert(actor.id, actor);
    }
}

fn normalize(requested: i32, configured: i32, fallback: i32) -> i32 {
    if requested > 0 {
        requested
    } else if configured > 0 {
        configured
    } else {
        fallback
    }
}
