//! Static map geometry
//!
//! The arena is a wall bitmap anchored at the origin. Anything outside the
//! bitmap is solid, which is what keeps tanks and shells on the field.

use glam::{IVec2, Vec2};

use super::mask::{IRect, Mask};

/// Immutable wall surface for one match
#[derive(Debug, Clone)]
pub struct Arena {
    walls: Mask,
}

impl Arena {
    pub fn from_mask(walls: Mask) -> Self {
        Self { walls }
    }

    /// Field with no interior walls (only the implicit boundary)
    pub fn open(width: u32, height: u32) -> Self {
        Self::from_mask(Mask::new(width, height))
    }

    pub fn width(&self) -> u32 {
        self.walls.width()
    }

    pub fn height(&self) -> u32 {
        self.walls.height()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32) / 2.0
    }

    pub fn wall_mask(&self) -> &Mask {
        &self.walls
    }

    /// Bounding rectangle of the wall mask in arena space
    pub fn rect(&self) -> IRect {
        IRect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    /// Wall test for a single point; out of bounds counts as wall
    pub fn is_wall(&self, position: Vec2) -> bool {
        let x = position.x.floor() as i32;
        let y = position.y.floor() as i32;
        !self.walls.contains(x, y) || self.walls.get(x, y)
    }

    /// Overlap test for a sprite mask whose top-left corner is at `top_left`.
    ///
    /// Any set sprite pixel that lands outside the field is a hit.
    pub fn overlaps(&self, mask: &Mask, top_left: IVec2) -> bool {
        let offset = top_left - self.rect().top_left();
        if self.walls.overlaps(mask, offset) {
            return true;
        }

        let fully_inside = offset.x >= 0
            && offset.y >= 0
            && offset.x + mask.width() as i32 <= self.width() as i32
            && offset.y + mask.height() as i32 <= self.height() as i32;
        if fully_inside {
            return false;
        }

        (0..mask.height() as i32).any(|y| {
            (0..mask.width() as i32)
                .any(|x| mask.get(x, y) && !self.walls.contains(x + offset.x, y + offset.y))
        })
    }
}
