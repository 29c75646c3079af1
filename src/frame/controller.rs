//! Per-window frame: the eight edge overlays, kept fitted to the window and
//! answering the input that lands on them.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, error, info, warn};

use crate::constants::EDGE_COUNT;
use crate::error::{FrameHostError, Result};
use crate::frame::input::{EdgeInput, EdgeResponse};
use crate::frame::registry::{FrameId, OverlayInfo, SharedRegistry};
use crate::geometry::{Edge, Rect, edge_rect};
use crate::platform::{CursorHandle, CursorShape, HitTest, OverlayHandle, OverlayHost, WindowHandle};

/// One live invisible hit-test strip or corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayRegion {
    pub handle: OverlayHandle,
    pub edge: Edge,
    /// Parent-relative.
    pub rect: Rect,
}

/// Restores resize affordances around a frameless window by keeping eight
/// edge overlays positioned over its border.
///
/// While attached it owns exactly one overlay per [`Edge`]; while detached it
/// owns none. Dropping the controller detaches it.
pub struct FrameController<B: OverlayHost> {
    id: FrameId,
    window: WindowHandle,
    backend: Rc<B>,
    registry: SharedRegistry,
    overlays: Vec<OverlayRegion>,
    attached: bool,
    cursors: HashMap<Edge, CursorHandle>,
}

impl<B: OverlayHost> FrameController<B> {
    pub fn new(window: WindowHandle, backend: Rc<B>, registry: SharedRegistry) -> Self {
        let id = registry.borrow_mut().allocate_frame_id();
        Self {
            id,
            window,
            backend,
            registry,
            overlays: Vec::with_capacity(EDGE_COUNT),
            attached: false,
            cursors: HashMap::new(),
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn window(&self) -> WindowHandle {
        self.window
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn overlays(&self) -> &[OverlayRegion] {
        &self.overlays
    }

    pub fn overlay(&self, edge: Edge) -> Option<&OverlayRegion> {
        self.overlays.iter().find(|o| o.edge == edge)
    }

    /// Creates and registers the eight edge overlays. No-op when attached.
    ///
    /// All or nothing: if any overlay cannot be created or registered, the
    /// ones already created are torn down again and the frame stays detached.
    pub fn attach(&mut self) -> Result<()> {
        if self.attached {
            return Ok(());
        }

        let size = self.backend.window_bounds(self.window)?.size();
        for edge in Edge::ALL {
            let rect = edge_rect(size, edge);
            if let Err(e) = self.create_edge(edge, rect) {
                error!(
                    "[FrameController:{:?}] creating {:?} overlay failed, rolling back: {}",
                    self.window, edge, e
                );
                self.release_overlays();
                return Err(FrameHostError::ResourceCreation {
                    resource: format!("{edge:?} edge overlay"),
                    reason: e.to_string(),
                });
            }
        }

        self.attached = true;
        info!(
            "[FrameController:{:?}] attached {} overlays ({}x{})",
            self.window,
            self.overlays.len(),
            size.width,
            size.height
        );
        Ok(())
    }

    fn create_edge(&mut self, edge: Edge, rect: Rect) -> Result<()> {
        let handle = self.backend.create_overlay(self.window, rect)?;
        let info = OverlayInfo { edge, window: self.window, frame: self.id };
        if let Err(e) = self.registry.borrow_mut().insert(handle, info) {
            self.backend.destroy_overlay(handle);
            return Err(e);
        }
        self.overlays.push(OverlayRegion { handle, edge, rect });
        Ok(())
    }

    /// Destroys and unregisters every overlay. No-op when detached.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.release_overlays();
        self.attached = false;
        info!("[FrameController:{:?}] detached", self.window);
    }

    fn release_overlays(&mut self) {
        for region in self.overlays.drain(..) {
            self.registry.borrow_mut().remove(region.handle);
            self.backend.destroy_overlay(region.handle);
        }
    }

    /// Re-fits every overlay to the window's current bounds. Call after the
    /// window moves or resizes. No-op when detached.
    pub fn update(&mut self) -> Result<()> {
        if !self.attached {
            return Ok(());
        }

        let size = self.backend.window_bounds(self.window)?.size();
        for region in &mut self.overlays {
            let rect = edge_rect(size, region.edge);
            if rect == region.rect {
                continue;
            }
            match self.backend.move_overlay(region.handle, rect) {
                Ok(()) => region.rect = rect,
                Err(e) => warn!(
                    "[FrameController:{:?}] could not move {:?} overlay: {}",
                    self.window, region.edge, e
                ),
            }
        }
        debug!(
            "[FrameController:{:?}] overlays fitted to {}x{}",
            self.window, size.width, size.height
        );
        Ok(())
    }

    /// Decides what `overlay` should do with `input`.
    ///
    /// Performs no native call beyond loading cursors, so the caller can run
    /// the (possibly modal) response without holding the frame borrowed.
    pub fn resolve_input(&mut self, overlay: OverlayHandle, input: EdgeInput) -> EdgeResponse {
        let Some(info) = self.registry.borrow().get(overlay) else {
            return EdgeResponse::PassThrough;
        };
        if info.frame != self.id {
            return EdgeResponse::PassThrough;
        }

        match input {
            EdgeInput::PrimaryButtonDown => EdgeResponse::BeginResize {
                window: info.window,
                hit: HitTest::from_edge(info.edge),
            },
            EdgeInput::CursorQuery => match self.cursor_for(info.edge) {
                Some(cursor) => EdgeResponse::SetCursor(cursor),
                None => EdgeResponse::PassThrough,
            },
            EdgeInput::Other => EdgeResponse::PassThrough,
        }
    }

    fn cursor_for(&mut self, edge: Edge) -> Option<CursorHandle> {
        if let Some(cursor) = self.cursors.get(&edge) {
            return Some(*cursor);
        }
        match self.backend.load_cursor(CursorShape::from_edge(edge)) {
            Ok(cursor) => {
                self.cursors.insert(edge, cursor);
                Some(cursor)
            }
            Err(e) => {
                warn!("[FrameController:{:?}] no cursor for {:?}: {}", self.window, edge, e);
                None
            }
        }
    }
}

impl<B: OverlayHost> Drop for FrameController<B> {
    fn drop(&mut self) {
        self.detach();
    }
}
