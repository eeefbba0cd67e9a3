//! A rectangular grid of elements sharing one level number.

use dm_core::Position;
use tracing::debug;

use crate::element::Element;
use crate::error::{MapError, MapResult, ValidationError};

/// One floor of the dungeon.
///
/// Cells are addressed by `(x, y)` with `0 <= x < width` and `0 <= y < height`.
/// A fresh level is floor surrounded by a wall border.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    number: i32,
    width: u32,
    height: u32,
    elements: Vec<Element>,
    experience_multiplier: u32,
    ambient_light: u8,
}

impl Level {
    /// Create a level of floor inside a wall border. Both dimensions must
    /// leave room for at least one interior cell.
    pub fn new(number: i32, width: u32, height: u32) -> MapResult<Self> {
        if number <= 0 {
            return Err(MapError::InvalidLevelNumber(number));
        }
        if width < 3 || height < 3 {
            return Err(MapError::InvalidLevelSize { width, height });
        }
        let mut level = Self {
            number,
            width,
            height,
            elements: Vec::with_capacity((width * height) as usize),
            experience_multiplier: 1,
            ambient_light: 0,
        };
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let mut element = if level.is_border(x, y) {
                    Element::wall()
                } else {
                    Element::floor()
                };
                element.attach(Position::new(x, y, number));
                level.elements.push(element);
            }
        }
        debug!(number, width, height, "level created");
        Ok(level)
    }

    /// Level number, also the `z` of every position on it.
    pub fn number(&self) -> i32 {
        self.number
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Scales the health of creatures spawned here.
    pub fn experience_multiplier(&self) -> u32 {
        self.experience_multiplier
    }

    pub(crate) fn set_experience_multiplier(&mut self, multiplier: u32) -> MapResult<()> {
        if multiplier == 0 {
            return Err(MapError::InvalidMultiplier);
        }
        self.experience_multiplier = multiplier;
        Ok(())
    }

    /// Ambient light level.
    pub fn ambient_light(&self) -> u8 {
        self.ambient_light
    }

    /// Set the ambient light level.
    pub fn set_ambient_light(&mut self, light: u8) {
        self.ambient_light = light;
    }

    /// Whether `(x, y)` is on the grid.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn is_border(&self, x: i32, y: i32) -> bool {
        x == 0 || y == 0 || x as u32 == self.width - 1 || y as u32 == self.height - 1
    }

    fn index(&self, x: i32, y: i32) -> MapResult<usize> {
        if !self.contains(x, y) {
            return Err(MapError::OutOfBounds(Position::new(x, y, self.number)));
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// The element at `(x, y)`.
    pub fn element(&self, x: i32, y: i32) -> MapResult<&Element> {
        let index = self.index(x, y)?;
        Ok(&self.elements[index])
    }

    pub(crate) fn element_mut(&mut self, x: i32, y: i32) -> MapResult<&mut Element> {
        let index = self.index(x, y)?;
        Ok(&mut self.elements[index])
    }

    /// The element at a position on this level, if any.
    pub fn element_at(&self, position: Position) -> Option<&Element> {
        if position.z != self.number {
            return None;
        }
        self.element(position.x, position.y).ok()
    }

    /// Every element, row by row.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Replace the element at `(x, y)`, returning the detached previous one.
    pub fn set_element(&mut self, x: i32, y: i32, element: impl Into<Element>) -> MapResult<Element> {
        let number = self.number;
        let index = self.index(x, y)?;
        let mut element = element.into();
        element.attach(Position::new(x, y, number));
        let mut previous = std::mem::replace(&mut self.elements[index], element);
        previous.detach();
        Ok(previous)
    }

    /// Fill the interior with copies of `element`.
    pub fn fill(&mut self, element: impl Into<Element>) -> MapResult<()> {
        let element = element.into();
        for y in 1..self.height as i32 - 1 {
            for x in 1..self.width as i32 - 1 {
                self.set_element(x, y, element.clone())?;
            }
        }
        Ok(())
    }

    /// Replace the border with copies of `element`.
    pub fn surround(&mut self, element: impl Into<Element>) -> MapResult<()> {
        let element = element.into();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if self.is_border(x, y) {
                    self.set_element(x, y, element.clone())?;
                }
            }
        }
        Ok(())
    }

    /// Check the border and every element's local constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for element in &self.elements {
            let Some(at) = element.position() else {
                continue;
            };
            if self.is_border(at.x, at.y) && !element.is_concrete() {
                return Err(ValidationError::BorderNotConcrete(at));
            }
            element.validate(at, self)?;
        }
        Ok(())
    }

    /// Render the level as rows of two-character captions.
    pub fn draw(&self) -> String {
        let mut out = String::new();
        for row in self.elements.chunks(self.width as usize) {
            let line = row
                .iter()
                .map(|e| format!("{:<2}", e.caption()))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    /// Positions of elements that want clock ticks from the start.
    pub(crate) fn periodic_positions(&self) -> Vec<Position> {
        self.elements
            .iter()
            .filter(|e| e.is_periodic())
            .filter_map(Element::position)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::door::{Door, DoorStyle};
    use crate::element::ElementKind;
    use crate::pit::Pit;
    use dm_core::Orientation;

    #[test]
    fn new_level_is_walled_floor() {
        let level = Level::new(1, 4, 3).unwrap();
        assert!(level.element(0, 0).unwrap().is_concrete());
        assert_eq!(level.element(1, 1).unwrap().kind(), &ElementKind::Floor);
        assert_eq!(
            level.element(1, 1).unwrap().position(),
            Some(Position::new(1, 1, 1))
        );
        assert!(level.validate().is_ok());
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert_eq!(
            Level::new(1, 2, 5),
            Err(MapError::InvalidLevelSize {
                width: 2,
                height: 5
            })
        );
        assert_eq!(Level::new(0, 5, 5), Err(MapError::InvalidLevelNumber(0)));
    }

    #[test]
    fn out_of_bounds_access() {
        let level = Level::new(2, 3, 3).unwrap();
        assert_eq!(
            level.element(3, 0).map(|_| ()),
            Err(MapError::OutOfBounds(Position::new(3, 0, 2)))
        );
        assert!(level.element_at(Position::new(1, 1, 1)).is_none());
    }

    #[test]
    fn set_element_detaches_previous() {
        let mut level = Level::new(1, 3, 3).unwrap();
        let previous = level.set_element(1, 1, Pit::new()).unwrap();
        assert_eq!(previous.position(), None);
        assert_eq!(
            level.element(1, 1).unwrap().position(),
            Some(Position::new(1, 1, 1))
        );
    }

    #[test]
    fn open_border_fails_validation() {
        let mut level = Level::new(1, 3, 3).unwrap();
        level.set_element(0, 1, Element::floor()).unwrap();
        assert_eq!(
            level.validate(),
            Err(ValidationError::BorderNotConcrete(Position::new(0, 1, 1)))
        );
    }

    #[test]
    fn door_needs_walls_on_both_sides() {
        let mut level = Level::new(1, 5, 5).unwrap();
        level
            .set_element(2, 1, Door::new(DoorStyle::Wooden, Orientation::NorthSouth))
            .unwrap();
        // West and east of (2, 1) are floor.
        assert_eq!(
            level.validate(),
            Err(ValidationError::NotFlanked {
                at: Position::new(2, 1, 1),
                element: "door"
            })
        );
        level.set_element(1, 1, Element::wall()).unwrap();
        level.set_element(3, 1, Element::wall()).unwrap();
        assert!(level.validate().is_ok());
    }

    #[test]
    fn draws_captions() {
        let mut level = Level::new(1, 5, 4).unwrap();
        level.set_element(1, 1, Pit::new()).unwrap();
        level.set_element(3, 2, Element::wall()).unwrap();
        insta::assert_snapshot!(level.draw(), @r"
        W  W  W  W  W
        W  O  .. .. W
        W  .. .. W  W
        W  W  W  W  W
        ");
    }
}
