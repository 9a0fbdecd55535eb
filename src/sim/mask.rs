//! Pixel occupancy masks and integer bounding rectangles
//!
//! Masks are the exact collision shape of an entity: one bool per pixel.
//! Rectangles are the coarse shape used for cheap projectile tests and to
//! place a mask in arena space.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned integer rectangle in arena pixels (Y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size whose centre sits on `center`
    ///
    /// The corner is truncated toward negative infinity so that a rectangle
    /// never shifts by a pixel when the centre crosses zero.
    pub fn from_center(center: Vec2, w: u32, h: u32) -> Self {
        let x = (center.x - w as f32 / 2.0).floor() as i32;
        let y = (center.y - h as f32 / 2.0).floor() as i32;
        Self::new(x, y, w as i32, h as i32)
    }

    #[inline]
    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn bottom_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y + self.h)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Strict intersection: rectangles that only share an edge do not touch
    pub fn intersects(&self, other: &IRect) -> bool {
        self.w > 0
            && self.h > 0
            && other.w > 0
            && other.h > 0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Pixel count of a `width` x `height` grid, widened before multiplying
#[inline]
fn area(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Boolean per-pixel occupancy grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Empty mask of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; area(width, height)],
        }
    }

    /// Fully occupied mask (solid sprites such as projectiles)
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; area(width, height)],
        }
    }

    /// Build from a row-major alpha channel; a pixel is set when its alpha
    /// exceeds `threshold`. Returns `None` if `alpha` is not `width * height` long.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Option<Self> {
        if alpha.len() != area(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            bits: alpha.iter().map(|&a| a > threshold).collect(),
        })
    }

    /// Build by evaluating `is_set(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut is_set: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(area(width, height));
        for y in 0..height {
            for x in 0..width {
                bits.push(is_set(x, y));
            }
        }
        Self { width, height, bits }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Occupancy at `(x, y)`; anything outside the mask reads as empty
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.contains(x, y) && self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = value;
        }
    }

    /// Number of set pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn invert(&mut self) {
        for bit in &mut self.bits {
            *bit = !*bit;
        }
    }

    /// Nearest-neighbour resample to a new size
    pub fn scale(&self, width: u32, height: u32) -> Self {
        if self.width == 0 || self.height == 0 {
            return Self::new(width, height);
        }
        Self::from_fn(width, height, |x, y| {
            let sx = (x as u64 * self.width as u64 / width as u64) as i32;
            let sy = (y as u64 * self.height as u64 / height as u64) as i32;
            self.get(sx, sy)
        })
    }

    /// First pixel (in `self` coordinates) where both masks are set, with
    /// `other` placed at `offset` relative to `self`'s origin.
    pub fn overlap_at(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let x_start = offset.x.max(0);
        let y_start = offset.y.max(0);
        let x_end = (offset.x + other.width as i32).min(self.width as i32);
        let y_end = (offset.y + other.height as i32).min(self.height as i32);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }

    /// True iff any set pixel of `self` coincides with a set pixel of `other`
    /// shifted by `offset`.
    #[inline]
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        self.overlap_at(other, offset).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_center() {
        let r = IRect::from_center(Vec2::new(10.0, 10.0), 6, 6);
        assert_eq!(r, IRect::new(7, 7, 6, 6));
        assert_eq!(r.top_left(), IVec2::new(7, 7));
        assert_eq!(r.bottom_left(), IVec2::new(7, 13));
    }

    #[test]
    fn test_rect_intersection_is_strict() {
        let a = IRect::new(0, 0, 10, 10);
        assert!(a.intersects(&IRect::new(9, 9, 5, 5)));
        // Shared edge only
        assert!(!a.intersects(&IRect::new(10, 0, 5, 5)));
        assert!(!a.intersects(&IRect::new(0, 10, 5, 5)));
        // Degenerate rectangles never intersect
        assert!(!a.intersects(&IRect::new(2, 2, 0, 4)));
    }

    #[test]
    fn test_from_alpha_threshold() {
        let mask = Mask::from_alpha(2, 2, &[0, 127, 128, 255], 127).unwrap();
        assert!(!mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(0, 1));
        assert!(mask.get(1, 1));
        assert_eq!(mask.count(), 2);

        assert!(Mask::from_alpha(2, 2, &[0, 0, 0], 127).is_none());
        // Sides whose product does not fit in a u32
        assert!(Mask::from_alpha(65536, 65536, &[0], 127).is_none());
    }

    #[test]
    fn test_get_out_of_bounds_is_empty() {
        let mask = Mask::filled(3, 3);
        assert!(mask.get(2, 2));
        assert!(!mask.get(-1, 0));
        assert!(!mask.get(3, 0));
    }

    #[test]
    fn test_overlap_with_offset() {
        let a = Mask::filled(4, 4);
        let b = Mask::filled(2, 2);
        assert!(a.overlaps(&b, IVec2::new(3, 3)));
        assert_eq!(a.overlap_at(&b, IVec2::new(3, 3)), Some(IVec2::new(3, 3)));
        assert!(!a.overlaps(&b, IVec2::new(4, 0)));
        assert!(a.overlaps(&b, IVec2::new(-1, -1)));
        assert!(!a.overlaps(&b, IVec2::new(-2, 0)));
    }

    #[test]
    fn test_overlap_respects_holes() {
        // Ring with an empty centre
        let ring = Mask::from_fn(3, 3, |x, y| !(x == 1 && y == 1));
        let dot = Mask::filled(1, 1);
        assert!(!ring.overlaps(&dot, IVec2::new(1, 1)));
        assert!(ring.overlaps(&dot, IVec2::new(0, 1)));
    }

    #[test]
    fn test_scale_and_invert() {
        let mut mask = Mask::from_fn(2, 1, |x, _| x == 0);
        let big = mask.scale(4, 2);
        assert_eq!(big.count(), 4);
        assert!(big.get(1, 1));
        assert!(!big.get(2, 0));

        mask.invert();
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
    }
}
