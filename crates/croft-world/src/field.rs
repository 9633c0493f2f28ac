//! Bounded 2D grid holding at most one actor per cell.

use croft_core::{ActorId, ActorKind, Location, ADJACENT_OFFSETS};
use serde::{Deserialize, Serialize};

/// The field is the authoritative placement registry: a cell holds zero or
/// one actor id, and a placed actor's recorded location always names the
/// cell that holds it.
///
/// Out-of-bounds access is a contract violation and panics; every location
/// the engine produces comes from the in-bounds neighbor enumeration or the
/// row-major seeding loop, so this is unreachable in normal operation.
#[derive(Debug, Clone)]
pub struct Field {
    depth: i32,
    width: i32,
    cells: Vec<Option<ActorId>>,
}

impl Field {
    /// Create a field of `depth` rows by `width` columns.
    ///
    /// Callers pass positive dimensions; the non-positive-to-default
    /// substitution happens in `Simulation::new`, never here.
    pub fn new(depth: i32, width: i32) -> Self {
        assert!(
            depth > 0 && width > 0,
            "field dimensions must be positive, got {}x{}",
            depth,
            width
        );
        Self {
            depth,
            width,
            cells: vec![None; (depth * width) as usize],
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn in_bounds(&self, location: Location) -> bool {
        location.row >= 0
            && location.row < self.depth
            && location.col >= 0
            && location.col < self.width
    }

    /// Empty every cell. Idempotent.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Record `id` at `location`, overwriting any current occupant.
    ///
    /// Last write wins; callers are responsible for not double-placing.
    pub fn place(&mut self, id: ActorId, location: Location) {
        let index = self.index(location);
        self.cells[index] = Some(id);
    }

    /// Empty the given cell; no-op when already empty.
    pub fn clear_location(&mut self, location: Location) {
        let index = self.index(location);
        self.cells[index] = None;
    }

    pub fn get(&self, location: Location) -> Option<ActorId> {
        self.cells[self.index(location)]
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// In-bounds 8-connected neighbors of `location`, in fixed order.
    pub fn adjacent_locations(&self, location: Location) -> Vec<Location> {
        ADJACENT_OFFSETS
            .iter()
            .map(|&(dr, dc)| location.offset(dr, dc))
            .filter(|loc| self.in_bounds(*loc))
            .collect()
    }

    /// The empty subset of `adjacent_locations`.
    pub fn free_adjacent_locations(&self, location: Location) -> Vec<Location> {
        self.adjacent_locations(location)
            .into_iter()
            .filter(|loc| self.get(*loc).is_none())
            .collect()
    }

    /// All cell locations in row-major order.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.depth)
            .flat_map(move |row| (0..self.width).map(move |col| Location::new(row, col)))
    }

    fn index(&self, location: Location) -> usize {
        assert!(
            self.in_bounds(location),
            "location {} outside {}x{} field",
            location,
            self.depth,
            self.width
        );
        (location.row * self.width + location.col) as usize
    }
}

/// Immutable per-kind view of the grid, handed to the view after each step.
///
/// Snapshots carry kinds rather than ids so a display sink needs no access
/// to the registry, and serialize byte-identically for equal runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    depth: i32,
    width: i32,
    cells: Vec<Option<ActorKind>>,
}

impl FieldSnapshot {
    pub(crate) fn new(depth: i32, width: i32, cells: Vec<Option<ActorKind>>) -> Self {
        debug_assert_eq!(cells.len(), (depth * width) as usize);
        Self { depth, width, cells }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn get(&self, location: Location) -> Option<ActorKind> {
        self.cells[(location.row * self.width + location.col) as usize]
    }

    /// Number of cells occupied by the given kind.
    pub fn count(&self, kind: ActorKind) -> usize {
        self.cells.iter().filter(|cell| **cell == Some(kind)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field = Field::new(10, 20);
        assert_eq!(field.depth(), 10);
        assert_eq!(field.width(), 20);
        assert_eq!(field.occupied_count(), 0);
        assert_eq!(field.locations().count(), 200);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_field_rejects_non_positive_dimensions() {
        Field::new(0, 10);
    }

    #[test]
    fn test_place_and_get() {
        let mut field = Field::new(5, 5);
        let loc = Location::new(2, 3);
        field.place(ActorId(1), loc);
        assert_eq!(field.get(loc), Some(ActorId(1)));

        // last write wins
        field.place(ActorId(2), loc);
        assert_eq!(field.get(loc), Some(ActorId(2)));
        assert_eq!(field.occupied_count(), 1);
    }

    #[test]
    fn test_clear_location() {
        let mut field = Field::new(5, 5);
        let loc = Location::new(0, 0);
        field.place(ActorId(1), loc);
        field.clear_location(loc);
        assert_eq!(field.get(loc), None);
        // clearing an empty cell is a no-op
        field.clear_location(loc);
        assert_eq!(field.get(loc), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut field = Field::new(3, 3);
        field.place(ActorId(1), Location::new(1, 1));
        field.clear();
        assert_eq!(field.occupied_count(), 0);
        field.clear();
        assert_eq!(field.occupied_count(), 0);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_access_panics() {
        let field = Field::new(3, 3);
        field.get(Location::new(3, 0));
    }

    #[test]
    fn test_adjacent_locations() {
        let field = Field::new(5, 5);
        // interior cell has 8 neighbors
        assert_eq!(field.adjacent_locations(Location::new(2, 2)).len(), 8);
        // corner cell has 3
        assert_eq!(field.adjacent_locations(Location::new(0, 0)).len(), 3);
        // edge cell has 5
        assert_eq!(field.adjacent_locations(Location::new(0, 2)).len(), 5);
    }

    #[test]
    fn test_free_adjacent_locations() {
        let mut field = Field::new(3, 3);
        let center = Location::new(1, 1);
        assert_eq!(field.free_adjacent_locations(center).len(), 8);

        field.place(ActorId(1), Location::new(0, 0));
        field.place(ActorId(2), Location::new(2, 2));
        let free = field.free_adjacent_locations(center);
        assert_eq!(free.len(), 6);
        assert!(!free.contains(&Location::new(0, 0)));
        assert!(!free.contains(&Location::new(2, 2)));
    }

    #[test]
    fn test_snapshot_counts() {
        let snapshot = FieldSnapshot::new(
            1,
            3,
            vec![Some(ActorKind::Weed), None, Some(ActorKind::Weed)],
        );
        assert_eq!(snapshot.count(ActorKind::Weed), 2);
        assert_eq!(snapshot.count(ActorKind::Farmer), 0);
        assert_eq!(snapshot.get(Location::new(0, 1)), None);
    }
}
