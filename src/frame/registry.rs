//! Resolves an overlay handle back to its edge, window and frame.
//!
//! Native input reaches an overlay addressed only by its handle, so every
//! frame registers its overlays here. The registry is owned by the app root
//! and shared with frames; it is only ever touched on the UI thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{FrameHostError, Result};
use crate::geometry::Edge;
use crate::platform::{OverlayHandle, WindowHandle};

/// Identity of one frame instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayInfo {
    pub edge: Edge,
    pub window: WindowHandle,
    pub frame: FrameId,
}

pub type SharedRegistry = Rc<RefCell<EdgeOverlayRegistry>>;

#[derive(Debug, Default)]
pub struct EdgeOverlayRegistry {
    entries: HashMap<OverlayHandle, OverlayInfo>,
    next_frame: u64,
}

impl EdgeOverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    pub(crate) fn allocate_frame_id(&mut self) -> FrameId {
        self.next_frame += 1;
        FrameId(self.next_frame)
    }

    /// Registers `overlay`. A window may hold at most one overlay per edge.
    pub fn insert(&mut self, overlay: OverlayHandle, info: OverlayInfo) -> Result<()> {
        if self.entries.contains_key(&overlay) {
            return Err(FrameHostError::InvalidArgument(format!(
                "overlay {overlay:?} is already registered"
            )));
        }
        let duplicate = self
            .entries
            .values()
            .any(|e| e.window == info.window && e.edge == info.edge);
        if duplicate {
            return Err(FrameHostError::InvalidArgument(format!(
                "window {:?} already has a {:?} overlay",
                info.window, info.edge
            )));
        }
        self.entries.insert(overlay, info);
        Ok(())
    }

    pub fn remove(&mut self, overlay: OverlayHandle) -> Option<OverlayInfo> {
        self.entries.remove(&overlay)
    }

    pub fn get(&self, overlay: OverlayHandle) -> Option<OverlayInfo> {
        self.entries.get(&overlay).copied()
    }

    /// All overlays owned by `window`, ordered by edge.
    pub fn for_window(&self, window: WindowHandle) -> Vec<(OverlayHandle, OverlayInfo)> {
        let mut found: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, info)| info.window == window)
            .map(|(h, info)| (*h, *info))
            .collect();
        found.sort_by_key(|(_, info)| info.edge);
        found
    }

    pub fn count_for_window(&self, window: WindowHandle) -> usize {
        self.entries.values().filter(|i| i.window == window).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
