use dm_core::{Creature, CreatureId, Direction, Height, Position, Size, SubCell};
use rand::Rng;
use rand::rngs::StdRng;

use crate::error::{MapError, MapResult};

/// Where a creature stands within a cell. The variant matches the
/// creature's footprint: one sub-cell, one half of the cell, or all of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// A footprint-1 creature on one sub-cell.
    SubCell(SubCell),
    /// A footprint-2 creature on the half facing a direction.
    Side(Direction),
    /// A footprint-4 creature filling the cell.
    Whole,
}

impl Placement {
    /// The sub-cells covered.
    pub fn subcells(self) -> Vec<SubCell> {
        match self {
            Self::SubCell(s) => vec![s],
            Self::Side(d) => SubCell::visible_from(d).to_vec(),
            Self::Whole => SubCell::ALL.to_vec(),
        }
    }

    /// The footprint this placement is shaped for.
    pub fn size(self) -> Size {
        match self {
            Self::SubCell(_) => Size::One,
            Self::Side(_) => Size::Two,
            Self::Whole => Size::Four,
        }
    }
}

/// The creatures on one cell and the sub-cells they cover.
///
/// At most four room units are ever in use: four footprint-1 creatures, two
/// footprint-2 creatures on opposite halves, or one footprint-4 creature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatureManager {
    creatures: Vec<Creature>,
    slots: [Option<CreatureId>; 4],
}

impl CreatureManager {
    /// An empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Room units left: 4 minus the footprints of the creatures present.
    pub fn free_room(&self) -> u8 {
        let used: u8 = self.creatures.iter().map(|c| c.size().footprint()).sum();
        debug_assert!(used <= 4, "cell over capacity: {used} room units used");
        4u8.saturating_sub(used)
    }

    /// Whether no creature is present.
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Number of creatures present.
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    /// The creatures present.
    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    /// A creature by id.
    pub fn get(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id() == id)
    }

    /// The creature covering a sub-cell.
    pub fn creature_at(&self, subcell: SubCell) -> Option<&Creature> {
        self.slots[subcell.index()].and_then(|id| self.get(id))
    }

    /// Whether a sub-cell is free.
    pub fn is_free(&self, subcell: SubCell) -> bool {
        self.slots[subcell.index()].is_none()
    }

    /// The free sub-cells, in slot order.
    pub fn free_subcells(&self) -> Vec<SubCell> {
        SubCell::ALL
            .into_iter()
            .filter(|s| self.is_free(*s))
            .collect()
    }

    /// How a creature is placed.
    pub fn placement_of(&self, id: CreatureId) -> Option<Placement> {
        let covered: Vec<SubCell> = SubCell::ALL
            .into_iter()
            .filter(|s| self.slots[s.index()] == Some(id))
            .collect();
        match covered.as_slice() {
            [s] => Some(Placement::SubCell(*s)),
            [a, b] => SubCell::pair_direction(*a, *b).map(Placement::Side),
            [_, _, _, _] => Some(Placement::Whole),
            _ => None,
        }
    }

    /// Height of the tallest creature present.
    pub fn tallest_height(&self) -> Option<Height> {
        self.creatures.iter().map(Creature::height).max()
    }

    /// Directions whose half of the cell is free for a footprint-2 creature.
    ///
    /// With two free sub-cells, the matching half if they form one. With three,
    /// one of the two free halves picked at random. With four, either both
    /// west/east halves or both north/south halves, picked at random.
    pub fn free_directions(&self, rng: &mut StdRng) -> Vec<Direction> {
        let free = self.free_subcells();
        match free.as_slice() {
            [a, b] => SubCell::pair_direction(*a, *b).into_iter().collect(),
            [_, _, _] => {
                let halves: Vec<Direction> = Direction::ALL
                    .into_iter()
                    .filter(|d| self.is_half_free(*d))
                    .collect();
                if halves.is_empty() {
                    return halves;
                }
                vec![halves[rng.random_range(0..halves.len())]]
            }
            [_, _, _, _] => {
                if rng.random_bool(0.5) {
                    vec![Direction::East, Direction::West]
                } else {
                    vec![Direction::North, Direction::South]
                }
            }
            _ => Vec::new(),
        }
    }

    fn is_half_free(&self, direction: Direction) -> bool {
        SubCell::visible_from(direction)
            .into_iter()
            .all(|s| self.is_free(s))
    }

    /// Whether `creature` can stand exactly at `placement`.
    pub fn fits(&self, creature: &Creature, placement: Placement) -> bool {
        placement.size() == creature.size()
            && creature.size().footprint() <= self.free_room()
            && placement.subcells().into_iter().all(|s| self.is_free(s))
    }

    /// Whether `creature` fits anywhere on the cell.
    pub fn can_host(&self, creature: &Creature) -> bool {
        match creature.size() {
            Size::One => self.free_room() >= 1,
            Size::Two => Direction::ALL.into_iter().any(|d| self.is_half_free(d)),
            Size::Four => self.free_room() == 4,
        }
    }

    pub(crate) fn step_on(
        &mut self,
        at: Position,
        creature: Creature,
        placement: Placement,
    ) -> MapResult<()> {
        let size = creature.size();
        if placement.size() != size {
            return Err(MapError::WrongFootprint { size });
        }
        let free = self.free_room();
        if size.footprint() > free {
            return Err(MapError::NoRoom {
                at,
                needed: size.footprint(),
                free,
            });
        }
        let subcells = placement.subcells();
        if let Some(subcell) = subcells.iter().find(|s| !self.is_free(**s)) {
            return Err(MapError::SubCellOccupied {
                at,
                subcell: *subcell,
            });
        }
        for subcell in subcells {
            self.slots[subcell.index()] = Some(creature.id());
        }
        self.creatures.push(creature);
        Ok(())
    }

    pub(crate) fn step_off(
        &mut self,
        at: Position,
        id: CreatureId,
    ) -> MapResult<(Creature, Placement)> {
        let placement = self
            .placement_of(id)
            .ok_or(MapError::CreatureNotHere { at, creature: id })?;
        let index = self
            .creatures
            .iter()
            .position(|c| c.id() == id)
            .ok_or(MapError::CreatureNotHere { at, creature: id })?;
        for slot in &mut self.slots {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        Ok((self.creatures.remove(index), placement))
    }

    /// Choose a placement for `creature` anywhere it fits.
    pub(crate) fn choose_placement(
        &self,
        at: Position,
        creature: &Creature,
        rng: &mut StdRng,
    ) -> MapResult<Placement> {
        let size = creature.size();
        let no_room = MapError::NoRoom {
            at,
            needed: size.footprint(),
            free: self.free_room(),
        };
        match size {
            Size::One => {
                let free = self.free_subcells();
                if free.is_empty() {
                    return Err(no_room);
                }
                Ok(Placement::SubCell(free[rng.random_range(0..free.len())]))
            }
            Size::Two => {
                let directions = self.free_directions(rng);
                if directions.is_empty() {
                    return Err(no_room);
                }
                let pick = rng.random_range(0..directions.len());
                Ok(Placement::Side(directions[pick]))
            }
            Size::Four if self.free_room() == 4 => Ok(Placement::Whole),
            Size::Four => Err(no_room),
        }
    }

    pub(crate) fn creatures_mut(&mut self) -> impl Iterator<Item = &mut Creature> {
        self.creatures.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_core::{CreatureType, Materiality};
    use proptest::prelude::*;
    use rand::SeedableRng;

    const AT: Position = Position::new(1, 1, 1);

    fn creature_type(size: Size, height: Height) -> CreatureType {
        CreatureType {
            name: "test",
            size,
            height,
            materiality: Materiality::Material,
            levitates: false,
            can_take_stairs: false,
            base_health: 10,
        }
    }

    fn creature(id: u32, size: Size) -> Creature {
        Creature::new(CreatureId(id), creature_type(size, Height::Medium), 1)
    }

    #[test]
    fn size_two_placement_reaches_every_half() {
        let mut rng = StdRng::seed_from_u64(5);
        let m = CreatureManager::new();
        let worm = creature(1, Size::Two);
        let seen: std::collections::HashSet<Placement> = (0..200)
            .map(|_| m.choose_placement(AT, &worm, &mut rng).unwrap())
            .collect();
        for direction in Direction::ALL {
            assert!(seen.contains(&Placement::Side(direction)), "{direction:?}");
        }
    }

    #[test]
    fn empty_cell_has_full_room() {
        let m = CreatureManager::new();
        assert_eq!(m.free_room(), 4);
        assert!(m.is_empty());
        assert_eq!(m.tallest_height(), None);
    }

    #[test]
    fn size_one_by_subcell() {
        let mut m = CreatureManager::new();
        m.step_on(AT, creature(1, Size::One), Placement::SubCell(SubCell::NorthEast))
            .unwrap();
        assert_eq!(m.free_room(), 3);
        assert_eq!(
            m.placement_of(CreatureId(1)),
            Some(Placement::SubCell(SubCell::NorthEast))
        );
        assert_eq!(
            m.step_on(AT, creature(2, Size::One), Placement::SubCell(SubCell::NorthEast)),
            Err(MapError::SubCellOccupied {
                at: AT,
                subcell: SubCell::NorthEast
            })
        );
    }

    #[test]
    fn placement_must_match_footprint() {
        let mut m = CreatureManager::new();
        assert_eq!(
            m.step_on(AT, creature(1, Size::Two), Placement::SubCell(SubCell::NorthEast)),
            Err(MapError::WrongFootprint { size: Size::Two })
        );
        assert_eq!(
            m.step_on(AT, creature(1, Size::One), Placement::Whole),
            Err(MapError::WrongFootprint { size: Size::One })
        );
    }

    #[test]
    fn size_two_takes_a_half() {
        let mut m = CreatureManager::new();
        m.step_on(AT, creature(1, Size::Two), Placement::Side(Direction::West))
            .unwrap();
        assert!(!m.is_free(SubCell::NorthWest));
        assert!(!m.is_free(SubCell::SouthWest));
        assert_eq!(m.free_room(), 2);
        m.step_on(AT, creature(2, Size::Two), Placement::Side(Direction::East))
            .unwrap();
        assert_eq!(m.free_room(), 0);
        assert_eq!(
            m.step_on(AT, creature(3, Size::One), Placement::SubCell(SubCell::NorthEast)),
            Err(MapError::NoRoom {
                at: AT,
                needed: 1,
                free: 0
            })
        );
    }

    #[test]
    fn size_four_needs_empty_cell() {
        let mut m = CreatureManager::new();
        m.step_on(AT, creature(1, Size::One), Placement::SubCell(SubCell::SouthWest))
            .unwrap();
        assert!(!m.can_host(&creature(2, Size::Four)));
        m.step_off(AT, CreatureId(1)).unwrap();
        m.step_on(AT, creature(2, Size::Four), Placement::Whole).unwrap();
        assert_eq!(m.placement_of(CreatureId(2)), Some(Placement::Whole));
        assert_eq!(m.free_room(), 0);
    }

    #[test]
    fn step_off_returns_placement() {
        let mut m = CreatureManager::new();
        m.step_on(AT, creature(1, Size::Two), Placement::Side(Direction::South))
            .unwrap();
        let (c, placement) = m.step_off(AT, CreatureId(1)).unwrap();
        assert_eq!(c.id(), CreatureId(1));
        assert_eq!(placement, Placement::Side(Direction::South));
        assert!(m.is_empty());
        assert_eq!(
            m.step_off(AT, CreatureId(1)),
            Err(MapError::CreatureNotHere {
                at: AT,
                creature: CreatureId(1)
            })
        );
    }

    #[test]
    fn free_directions_with_two_free_subcells() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut m = CreatureManager::new();
        m.step_on(AT, creature(1, Size::Two), Placement::Side(Direction::North))
            .unwrap();
        assert_eq!(m.free_directions(&mut rng), vec![Direction::South]);

        // Diagonal free pair gives nothing.
        let mut m = CreatureManager::new();
        m.step_on(AT, creature(1, Size::One), Placement::SubCell(SubCell::NorthEast))
            .unwrap();
        m.step_on(AT, creature(2, Size::One), Placement::SubCell(SubCell::SouthWest))
            .unwrap();
        assert!(m.free_directions(&mut rng).is_empty());
        assert!(!m.can_host(&creature(3, Size::Two)));
    }

    #[test]
    fn free_directions_with_three_free_subcells() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut m = CreatureManager::new();
        m.step_on(AT, creature(1, Size::One), Placement::SubCell(SubCell::NorthEast))
            .unwrap();
        for _ in 0..20 {
            let dirs = m.free_directions(&mut rng);
            assert_eq!(dirs.len(), 1);
            assert!(matches!(dirs[0], Direction::South | Direction::West));
        }
    }

    #[test]
    fn free_directions_on_empty_cell_are_opposite_halves() {
        let mut rng = StdRng::seed_from_u64(3);
        let m = CreatureManager::new();
        for _ in 0..20 {
            let dirs = m.free_directions(&mut rng);
            assert_eq!(dirs.len(), 2);
            assert_eq!(dirs[0].opposite(), dirs[1]);
        }
    }

    #[test]
    fn tallest_height_tracks_occupants() {
        let mut m = CreatureManager::new();
        let giant = Creature::new(CreatureId(9), creature_type(Size::One, Height::Giant), 1);
        m.step_on(AT, creature(1, Size::One), Placement::SubCell(SubCell::NorthEast))
            .unwrap();
        m.step_on(AT, giant, Placement::SubCell(SubCell::NorthWest))
            .unwrap();
        assert_eq!(m.tallest_height(), Some(Height::Giant));
    }

    fn any_size() -> impl Strategy<Value = Size> {
        prop::sample::select(vec![Size::One, Size::Two, Size::Four])
    }

    proptest! {
        #[test]
        fn room_never_exceeded(sizes in prop::collection::vec(any_size(), 0..12), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut m = CreatureManager::new();
            for (i, size) in sizes.into_iter().enumerate() {
                let c = creature(i as u32, size);
                let hosted = m.can_host(&c);
                match m.choose_placement(AT, &c, &mut rng) {
                    Ok(placement) => {
                        prop_assert!(hosted);
                        m.step_on(AT, c, placement).unwrap();
                    }
                    Err(_) => prop_assert!(!hosted),
                }
                let used: u8 = m.creatures().iter().map(|c| c.size().footprint()).sum();
                prop_assert!(used <= 4);
                prop_assert_eq!(m.free_room(), 4 - used);
                for c in m.creatures() {
                    if let Some(Placement::Side(d)) = m.placement_of(c.id()) {
                        let [a, b] = SubCell::visible_from(d);
                        prop_assert!(a.is_neighbour_of(b));
                    }
                    prop_assert_eq!(
                        m.placement_of(c.id()).map(Placement::size),
                        Some(c.size())
                    );
                }
            }
        }
    }
}
