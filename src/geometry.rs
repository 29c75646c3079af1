//! Pixel geometry shared by the window and frame layers, plus the edge
//! calculator that places the invisible resize overlays.
//!
//! All rectangles produced here are relative to the window's outer bounds,
//! which is also the coordinate space child overlays are positioned in.

use serde::{Deserialize, Serialize};

use crate::constants::EDGE_THICKNESS;
use crate::error::FrameHostError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// `true` when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// `true` when the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Shrinks the rectangle by `inset` on every side.
    pub fn inset(&self, inset: i32) -> Rect {
        Rect::new(
            self.x + inset,
            self.y + inset,
            (self.width - inset * 2).max(0),
            (self.height - inset * 2).max(0),
        )
    }
}

/// One side or corner of a window's resize border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum Edge {
    Top = 0,
    Bottom = 1,
    Left = 2,
    Right = 3,
    TopLeft = 4,
    TopRight = 5,
    BottomLeft = 6,
    BottomRight = 7,
}

impl Edge {
    /// Every edge, in the order overlays are created.
    pub const ALL: [Edge; 8] = [
        Edge::Top,
        Edge::Bottom,
        Edge::Left,
        Edge::Right,
        Edge::TopLeft,
        Edge::TopRight,
        Edge::BottomLeft,
        Edge::BottomRight,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Edge::TopLeft | Edge::TopRight | Edge::BottomLeft | Edge::BottomRight
        )
    }
}

impl TryFrom<i32> for Edge {
    type Error = FrameHostError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Edge::ALL.get(index).copied())
            .ok_or_else(|| FrameHostError::InvalidArgument(format!("edge id {value} is out of range")))
    }
}

/// Computes the overlay rectangle for `edge` on a window whose outer bounds
/// measure `bounds`.
///
/// Corners are fixed `EDGE_THICKNESS` squares pinned to their corner; sides
/// span what is left between the corners. Windows narrower or shorter than two
/// thicknesses collapse the sides to zero length.
pub fn edge_rect(bounds: Size, edge: Edge) -> Rect {
    let t = EDGE_THICKNESS;
    let far_x = (bounds.width - t).max(0);
    let far_y = (bounds.height - t).max(0);
    let span_x = (bounds.width - t * 2).max(0);
    let span_y = (bounds.height - t * 2).max(0);

    match edge {
        Edge::Top => Rect::new(t, 0, span_x, t),
        Edge::Bottom => Rect::new(t, far_y, span_x, t),
        Edge::Left => Rect::new(0, t, t, span_y),
        Edge::Right => Rect::new(far_x, t, t, span_y),
        Edge::TopLeft => Rect::new(0, 0, t, t),
        Edge::TopRight => Rect::new(far_x, 0, t, t),
        Edge::BottomLeft => Rect::new(0, far_y, t, t),
        Edge::BottomRight => Rect::new(far_x, far_y, t, t),
    }
}

/// [`edge_rect`] for an integer edge id as passed across the C ABI.
pub fn edge_rect_for_id(bounds: Size, id: i32) -> Result<Rect, FrameHostError> {
    Edge::try_from(id).map(|edge| edge_rect(bounds, edge))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_border_band(bounds: Size, r: &Rect) -> bool {
        let window = Rect::new(0, 0, bounds.width, bounds.height);
        let interior = window.inset(EDGE_THICKNESS);
        window.contains(r) && !r.intersects(&interior)
    }

    #[test]
    fn every_edge_stays_inside_the_border_band() {
        for &(w, h) in &[(16, 16), (17, 40), (800, 600), (1024, 768), (3840, 2160)] {
            let bounds = Size::new(w, h);
            for edge in Edge::ALL {
                let r = edge_rect(bounds, edge);
                assert!(in_border_band(bounds, &r), "{edge:?} {r:?} escapes band of {w}x{h}");
            }
        }
    }

    #[test]
    fn sides_never_overlap_corners() {
        let bounds = Size::new(640, 480);
        let sides = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];
        for side in sides {
            for corner in Edge::ALL.into_iter().filter(|e| e.is_corner()) {
                let a = edge_rect(bounds, side);
                let b = edge_rect(bounds, corner);
                assert!(!a.intersects(&b), "{side:?} overlaps {corner:?}");
            }
        }
    }

    #[test]
    fn corners_are_fixed_squares() {
        let bounds = Size::new(800, 600);
        assert_eq!(edge_rect(bounds, Edge::TopLeft), Rect::new(0, 0, 8, 8));
        assert_eq!(edge_rect(bounds, Edge::TopRight), Rect::new(792, 0, 8, 8));
        assert_eq!(edge_rect(bounds, Edge::BottomLeft), Rect::new(0, 592, 8, 8));
        assert_eq!(edge_rect(bounds, Edge::BottomRight), Rect::new(792, 592, 8, 8));
    }

    #[test]
    fn sides_span_between_corners() {
        let bounds = Size::new(800, 600);
        assert_eq!(edge_rect(bounds, Edge::Top), Rect::new(8, 0, 784, 8));
        assert_eq!(edge_rect(bounds, Edge::Bottom), Rect::new(8, 592, 784, 8));
        assert_eq!(edge_rect(bounds, Edge::Left), Rect::new(0, 8, 8, 584));
        assert_eq!(edge_rect(bounds, Edge::Right), Rect::new(792, 8, 8, 584));
    }

    #[test]
    fn tiny_windows_collapse_sides() {
        let r = edge_rect(Size::new(10, 10), Edge::Top);
        assert!(r.is_empty());
        assert_eq!(edge_rect(Size::new(0, 0), Edge::BottomRight), Rect::new(0, 0, 8, 8));
    }

    #[test]
    fn edge_ids_round_trip_and_reject_out_of_range() {
        for edge in Edge::ALL {
            assert_eq!(Edge::try_from(edge as i32).unwrap(), edge);
        }
        assert!(matches!(Edge::try_from(8), Err(FrameHostError::InvalidArgument(_))));
        assert!(matches!(Edge::try_from(-1), Err(FrameHostError::InvalidArgument(_))));
    }

    #[test]
    fn edge_rect_by_id_validates_the_id() {
        let bounds = Size::new(800, 600);
        assert_eq!(edge_rect_for_id(bounds, Edge::TopRight as i32).unwrap(), Rect::new(792, 0, 8, 8));
        assert!(matches!(edge_rect_for_id(bounds, 42), Err(FrameHostError::InvalidArgument(_))));
    }
}
