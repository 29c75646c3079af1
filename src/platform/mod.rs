//! Capability interface between the platform-neutral core and a native
//! windowing backend.
//!
//! Exactly one backend exists per target: [`win32::Win32Backend`] on Windows.
//! Tests run the core against the in-memory [`mock::MockBackend`].

use std::rc::Rc;

use crate::error::Result;
use crate::geometry::{Edge, Rect};
use crate::invoke::Waker;
use crate::options::{WindowOptions, WindowState};
use crate::window::WindowController;
use crate::window::style::FrameStyle;

#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub(crate) mod mock;

/// Opaque identifier of a native top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub isize);

/// Opaque identifier of one invisible edge overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(pub isize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorHandle(pub isize);

/// Where on a window border an interaction happened, in the terms the OS
/// uses to start its own resize loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTest {
    Left,
    Right,
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
}

impl HitTest {
    pub fn from_edge(edge: Edge) -> Self {
        match edge {
            Edge::Top => HitTest::Top,
            Edge::Bottom => HitTest::Bottom,
            Edge::Left => HitTest::Left,
            Edge::Right => HitTest::Right,
            Edge::TopLeft => HitTest::TopLeft,
            Edge::TopRight => HitTest::TopRight,
            Edge::BottomLeft => HitTest::BottomLeft,
            Edge::BottomRight => HitTest::BottomRight,
        }
    }

    /// The `HT*` value `WM_NCHITTEST` would report for this area.
    pub fn code(self) -> u32 {
        match self {
            HitTest::Left => 10,
            HitTest::Right => 11,
            HitTest::Top => 12,
            HitTest::TopLeft => 13,
            HitTest::TopRight => 14,
            HitTest::Bottom => 15,
            HitTest::BottomLeft => 16,
            HitTest::BottomRight => 17,
        }
    }
}

/// Directional resize cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorShape {
    SizeNS,
    SizeWE,
    SizeNWSE,
    SizeNESW,
}

impl CursorShape {
    pub fn from_edge(edge: Edge) -> Self {
        match edge {
            Edge::Top | Edge::Bottom => CursorShape::SizeNS,
            Edge::Left | Edge::Right => CursorShape::SizeWE,
            Edge::TopLeft | Edge::BottomRight => CursorShape::SizeNWSE,
            Edge::TopRight | Edge::BottomLeft => CursorShape::SizeNESW,
        }
    }
}

/// Creates and drives the invisible hit-test surfaces of a frame.
pub trait OverlayHost {
    /// Outer bounds of `window` in screen coordinates.
    fn window_bounds(&self, window: WindowHandle) -> Result<Rect>;

    /// Creates an input-transparent child surface of `parent` at `rect`
    /// (parent-relative) that still receives hit-testing input.
    fn create_overlay(&self, parent: WindowHandle, rect: Rect) -> Result<OverlayHandle>;

    /// Repositions an overlay without touching its z-order.
    fn move_overlay(&self, overlay: OverlayHandle, rect: Rect) -> Result<()>;

    fn destroy_overlay(&self, overlay: OverlayHandle);

    fn load_cursor(&self, shape: CursorShape) -> Result<CursorHandle>;

    fn set_cursor(&self, cursor: CursorHandle);

    /// Hands the pointer to the OS's interactive resize/move loop for `window`.
    fn begin_native_drag(&self, window: WindowHandle, hit: HitTest);
}

/// Window capabilities plus the style-application collaborator.
pub trait WindowHost: OverlayHost + Sized + 'static {
    fn create_window(&self, options: &WindowOptions) -> Result<WindowHandle>;

    /// Gives the backend a reference to the controller so native messages can
    /// be routed to it. Backends that deliver messages by other means ignore it.
    fn bind_window(&self, _window: WindowHandle, _controller: &Rc<WindowController<Self>>) {}

    fn destroy_window(&self, window: WindowHandle);

    fn show(&self, window: WindowHandle);

    fn hide(&self, window: WindowHandle);

    /// Queues a close request; the answer arrives later as a close message.
    fn post_close(&self, window: WindowHandle) -> Result<()>;

    fn set_bounds(&self, window: WindowHandle, bounds: Rect) -> Result<()>;

    fn title(&self, window: WindowHandle) -> Result<String>;

    fn set_title(&self, window: WindowHandle, title: &str) -> Result<()>;

    fn window_state(&self, window: WindowHandle) -> Result<WindowState>;

    fn set_window_state(&self, window: WindowHandle, state: WindowState) -> Result<()>;

    /// Current raw style bits of `window`.
    fn style_bits(&self, window: WindowHandle) -> u32;

    /// Writes the style bits, extends or removes the drop-shadow margins,
    /// forces a non-client refresh and re-shows the window if it was visible.
    fn apply_frame_style(&self, window: WindowHandle, style: &FrameStyle) -> Result<()>;

    /// Whether desktop composition (and with it DWM shadows) is active.
    fn composition_enabled(&self) -> bool;

    /// Inset the client area needs while `window` is maximized, if it is.
    fn maximized_client_inset(&self, window: WindowHandle) -> Option<i32>;

    /// Usable area of the primary screen.
    fn work_area(&self) -> Rect;

    /// Asks `window` to re-run its theme handling.
    fn notify_theme_changed(&self, window: WindowHandle);

    /// Builds the waker that nudges `window`'s thread to drain its invoke queue.
    fn invoke_waker(&self, window: WindowHandle) -> Waker;

    /// Pumps native messages until [`WindowHost::quit`] is requested.
    fn run_message_loop(&self) -> Result<()>;

    fn quit(&self);
}
