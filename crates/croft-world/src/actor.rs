//! Actor state and per-step behaviors.

use crate::field::Field;
use croft_core::{ActorId, ActorKind, Location, PlantConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::trace;

/// Age and liveness of a plant-kind actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantState {
    pub age: u32,
    pub alive: bool,
}

impl PlantState {
    pub fn new(age: u32) -> Self {
        Self { age, alive: true }
    }

    /// Advance age by one step, dying at `max_age`. Dead plants never age.
    pub fn grow(&mut self, max_age: u32) {
        if !self.alive {
            return;
        }
        self.age += 1;
        if self.age >= max_age {
            self.alive = false;
        }
    }
}

/// Two-level kind split: farmers are stateless, plant kinds carry age state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    Farmer,
    Weed(PlantState),
    BeanPlant(PlantState),
}

/// An actor placed on the field.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub location: Location,
    pub species: Species,
}

impl Actor {
    pub fn farmer(id: ActorId, location: Location) -> Self {
        Self {
            id,
            location,
            species: Species::Farmer,
        }
    }

    pub fn weed(id: ActorId, location: Location, age: u32) -> Self {
        Self {
            id,
            location,
            species: Species::Weed(PlantState::new(age)),
        }
    }

    pub fn bean_plant(id: ActorId, location: Location, age: u32) -> Self {
        Self {
            id,
            location,
            species: Species::BeanPlant(PlantState::new(age)),
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self.species {
            Species::Farmer => ActorKind::Farmer,
            Species::Weed(_) => ActorKind::Weed,
            Species::BeanPlant(_) => ActorKind::BeanPlant,
        }
    }

    pub fn plant(&self) -> Option<&PlantState> {
        match &self.species {
            Species::Farmer => None,
            Species::Weed(state) | Species::BeanPlant(state) => Some(state),
        }
    }

    fn plant_mut(&mut self) -> Option<&mut PlantState> {
        match &mut self.species {
            Species::Farmer => None,
            Species::Weed(state) | Species::BeanPlant(state) => Some(state),
        }
    }

    pub fn is_plant(&self) -> bool {
        self.kind().is_plant()
    }

    pub fn is_live_plant(&self) -> bool {
        self.plant().map_or(false, |p| p.alive)
    }

    pub fn is_dead_plant(&self) -> bool {
        self.plant().map_or(false, |p| !p.alive)
    }

    /// Mark a plant dead; no-op on a farmer.
    pub fn kill(&mut self) {
        if let Some(plant) = self.plant_mut() {
            plant.alive = false;
        }
    }
}

/// A reproduction request collected during the act phase.
///
/// Spawns are never placed directly; the commit phase allocates ids and
/// inserts survivors into registry and field together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub kind: ActorKind,
    pub location: Location,
}

/// Give one actor its turn for this step.
///
/// Behaviors mutate the field directly (moves, harvests) but never the
/// registry membership; structural changes go through the spawn buffer and
/// the dead flag, both applied in the commit phase.
pub(crate) fn act(
    id: ActorId,
    field: &mut Field,
    actors: &mut BTreeMap<ActorId, Actor>,
    config: &PlantConfig,
    rng: &mut ChaCha8Rng,
    spawns: &mut Vec<Spawn>,
) {
    let kind = match actors.get(&id) {
        Some(actor) => actor.kind(),
        None => return,
    };
    match kind {
        ActorKind::Farmer => act_farmer(id, field, actors, rng),
        ActorKind::Weed => act_weed(id, field, actors, config, rng, spawns),
        ActorKind::BeanPlant => act_bean_plant(id, actors, config),
    }
}

/// Harvest a live plant from a neighboring cell and step into it, or wander
/// to a random free neighbor. Farmers never die and never spread.
fn act_farmer(
    id: ActorId,
    field: &mut Field,
    actors: &mut BTreeMap<ActorId, Actor>,
    rng: &mut ChaCha8Rng,
) {
    let location = match actors.get(&id) {
        Some(actor) => actor.location,
        None => return,
    };

    let mut prey: Vec<(ActorId, Location)> = Vec::new();
    for neighbor in field.adjacent_locations(location) {
        if let Some(occupant) = field.get(neighbor) {
            if actors.get(&occupant).map_or(false, Actor::is_live_plant) {
                prey.push((occupant, neighbor));
            }
        }
    }

    if let Some(&(plant_id, plant_loc)) = prey.choose(rng) {
        // Immediate field-level removal; the dead flag makes the commit
        // sweep drop the plant from the registry this same step.
        if let Some(plant) = actors.get_mut(&plant_id) {
            plant.kill();
        }
        field.clear_location(plant_loc);
        move_actor(id, plant_loc, field, actors);
        trace!(farmer = %id, plant = %plant_id, at = %plant_loc, "harvested plant");
    } else if let Some(&dest) = field.free_adjacent_locations(location).choose(rng) {
        move_actor(id, dest, field, actors);
    }
}

/// Age the weed, then roll once for spreading into a random free neighbor.
fn act_weed(
    id: ActorId,
    field: &mut Field,
    actors: &mut BTreeMap<ActorId, Actor>,
    config: &PlantConfig,
    rng: &mut ChaCha8Rng,
    spawns: &mut Vec<Spawn>,
) {
    let (location, age) = {
        let actor = match actors.get_mut(&id) {
            Some(actor) => actor,
            None => return,
        };
        let location = actor.location;
        let plant = match actor.plant_mut() {
            Some(plant) => plant,
            None => return,
        };
        // A plant harvested earlier this step takes no action on its turn.
        if !plant.alive {
            return;
        }
        plant.grow(config.weed_max_age);
        if !plant.alive {
            return;
        }
        (location, plant.age)
    };

    if age >= config.weed_spreading_age && rng.gen::<f64>() < config.weed_spreading_prob {
        if let Some(&dest) = field.free_adjacent_locations(location).choose(rng) {
            spawns.push(Spawn {
                kind: ActorKind::Weed,
                location: dest,
            });
            trace!(weed = %id, at = %dest, "weed spreading");
        }
    }
}

/// Bean plants only age; no spreading in this rule set.
fn act_bean_plant(id: ActorId, actors: &mut BTreeMap<ActorId, Actor>, config: &PlantConfig) {
    if let Some(plant) = actors.get_mut(&id).and_then(Actor::plant_mut) {
        plant.grow(config.bean_max_age);
    }
}

/// Move an actor to `dest`, keeping field and recorded location in sync.
fn move_actor(id: ActorId, dest: Location, field: &mut Field, actors: &mut BTreeMap<ActorId, Actor>) {
    if let Some(actor) = actors.get_mut(&id) {
        field.clear_location(actor.location);
        field.place(id, dest);
        actor.location = dest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(1)
    }

    fn insert(field: &mut Field, actors: &mut BTreeMap<ActorId, Actor>, actor: Actor) {
        field.place(actor.id, actor.location);
        actors.insert(actor.id, actor);
    }

    #[test]
    fn test_plant_grows_and_dies() {
        let mut plant = PlantState::new(0);
        for expected in 1..=3 {
            plant.grow(3);
            assert_eq!(plant.age, expected.min(3));
        }
        assert!(!plant.alive);

        // dead plants never age
        plant.grow(3);
        assert_eq!(plant.age, 3);
    }

    #[test]
    fn test_kill_marks_plant_dead() {
        let mut weed = Actor::weed(ActorId(0), Location::new(0, 0), 5);
        assert!(weed.is_live_plant());
        weed.kill();
        assert!(weed.is_dead_plant());

        // killing a farmer is a no-op
        let mut farmer = Actor::farmer(ActorId(1), Location::new(0, 1));
        farmer.kill();
        assert!(!farmer.is_dead_plant());
    }

    #[test]
    fn test_farmer_harvests_adjacent_plant() {
        let mut field = Field::new(3, 3);
        let mut actors = BTreeMap::new();
        let farmer_id = ActorId(0);
        let bean_id = ActorId(1);
        let bean_loc = Location::new(0, 0);
        insert(&mut field, &mut actors, Actor::farmer(farmer_id, Location::new(1, 1)));
        insert(&mut field, &mut actors, Actor::bean_plant(bean_id, bean_loc, 10));

        let mut spawns = Vec::new();
        act(
            farmer_id,
            &mut field,
            &mut actors,
            &PlantConfig::default(),
            &mut rng(),
            &mut spawns,
        );

        // the only plant in reach is harvested and its cell taken over
        assert!(actors[&bean_id].is_dead_plant());
        assert_eq!(field.get(bean_loc), Some(farmer_id));
        assert_eq!(actors[&farmer_id].location, bean_loc);
        assert_eq!(field.get(Location::new(1, 1)), None);
        assert!(spawns.is_empty());
    }

    #[test]
    fn test_farmer_wanders_when_no_plant_in_reach() {
        let mut field = Field::new(3, 3);
        let mut actors = BTreeMap::new();
        let farmer_id = ActorId(0);
        let start = Location::new(1, 1);
        insert(&mut field, &mut actors, Actor::farmer(farmer_id, start));

        let mut spawns = Vec::new();
        act(
            farmer_id,
            &mut field,
            &mut actors,
            &PlantConfig::default(),
            &mut rng(),
            &mut spawns,
        );

        let dest = actors[&farmer_id].location;
        assert_ne!(dest, start);
        assert_eq!(field.get(dest), Some(farmer_id));
        assert_eq!(field.get(start), None);
    }

    #[test]
    fn test_boxed_in_farmer_stays_put() {
        let mut field = Field::new(1, 1);
        let mut actors = BTreeMap::new();
        let farmer_id = ActorId(0);
        let start = Location::new(0, 0);
        insert(&mut field, &mut actors, Actor::farmer(farmer_id, start));

        let mut spawns = Vec::new();
        act(
            farmer_id,
            &mut field,
            &mut actors,
            &PlantConfig::default(),
            &mut rng(),
            &mut spawns,
        );

        assert_eq!(actors[&farmer_id].location, start);
        assert_eq!(field.get(start), Some(farmer_id));
    }

    #[test]
    fn test_weed_spreads_into_free_neighbor() {
        let mut field = Field::new(3, 3);
        let mut actors = BTreeMap::new();
        let weed_id = ActorId(0);
        let center = Location::new(1, 1);
        insert(&mut field, &mut actors, Actor::weed(weed_id, center, 30));

        let config = PlantConfig {
            weed_spreading_prob: 1.0,
            ..PlantConfig::default()
        };
        let mut spawns = Vec::new();
        act(weed_id, &mut field, &mut actors, &config, &mut rng(), &mut spawns);

        assert_eq!(actors[&weed_id].plant().unwrap().age, 31);
        assert_eq!(spawns.len(), 1);
        let spawn = spawns[0];
        assert_eq!(spawn.kind, ActorKind::Weed);
        assert!(field.adjacent_locations(center).contains(&spawn.location));
        // the spawn is buffered, never placed directly
        assert_eq!(field.get(spawn.location), None);
    }

    #[test]
    fn test_young_weed_never_spreads() {
        let mut field = Field::new(3, 3);
        let mut actors = BTreeMap::new();
        let weed_id = ActorId(0);
        insert(&mut field, &mut actors, Actor::weed(weed_id, Location::new(1, 1), 0));

        let config = PlantConfig {
            weed_spreading_prob: 1.0,
            ..PlantConfig::default()
        };
        let mut spawns = Vec::new();
        act(weed_id, &mut field, &mut actors, &config, &mut rng(), &mut spawns);

        assert_eq!(actors[&weed_id].plant().unwrap().age, 1);
        assert!(spawns.is_empty());
    }

    #[test]
    fn test_weed_dies_at_max_age_without_spreading() {
        let mut field = Field::new(3, 3);
        let mut actors = BTreeMap::new();
        let weed_id = ActorId(0);
        insert(&mut field, &mut actors, Actor::weed(weed_id, Location::new(1, 1), 149));

        let config = PlantConfig {
            weed_spreading_prob: 1.0,
            ..PlantConfig::default()
        };
        let mut spawns = Vec::new();
        act(weed_id, &mut field, &mut actors, &config, &mut rng(), &mut spawns);

        // dying is the whole turn
        assert!(actors[&weed_id].is_dead_plant());
        assert!(spawns.is_empty());
    }

    #[test]
    fn test_dead_plant_turn_is_a_no_op() {
        let mut field = Field::new(3, 3);
        let mut actors = BTreeMap::new();
        let weed_id = ActorId(0);
        insert(&mut field, &mut actors, Actor::weed(weed_id, Location::new(1, 1), 40));
        actors.get_mut(&weed_id).unwrap().kill();

        let config = PlantConfig {
            weed_spreading_prob: 1.0,
            ..PlantConfig::default()
        };
        let mut spawns = Vec::new();
        act(weed_id, &mut field, &mut actors, &config, &mut rng(), &mut spawns);

        assert_eq!(actors[&weed_id].plant().unwrap().age, 40);
        assert!(spawns.is_empty());
    }

    #[test]
    fn test_bean_plant_only_ages() {
        let mut field = Field::new(3, 3);
        let mut actors = BTreeMap::new();
        let bean_id = ActorId(0);
        insert(&mut field, &mut actors, Actor::bean_plant(bean_id, Location::new(1, 1), 7));

        let mut spawns = Vec::new();
        act(
            bean_id,
            &mut field,
            &mut actors,
            &PlantConfig::default(),
            &mut rng(),
            &mut spawns,
        );

        assert_eq!(actors[&bean_id].plant().unwrap().age, 8);
        assert!(spawns.is_empty());
        assert_eq!(actors[&bean_id].location, Location::new(1, 1));
    }
}
