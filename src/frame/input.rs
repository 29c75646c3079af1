//! What an edge overlay does with the input it receives.

use crate::platform::{CursorHandle, HitTest, WindowHandle};

/// Input events an overlay cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInput {
    /// Primary mouse button went down on the overlay.
    PrimaryButtonDown,
    /// The OS asks which cursor to show over the overlay.
    CursorQuery,
    /// Anything else; left to the overlay's default handling.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeResponse {
    /// Hand the owning window to the OS resize loop for this border area.
    BeginResize { window: WindowHandle, hit: HitTest },
    /// Show this cursor; the query counts as handled.
    SetCursor(CursorHandle),
    PassThrough,
}

impl EdgeResponse {
    /// Whether the overlay consumed the input.
    pub fn handled(&self) -> bool {
        !matches!(self, EdgeResponse::PassThrough)
    }
}
