//! In-memory backend for exercising the core without a native window system.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{FrameHostError, Result};
use crate::geometry::{Point, Rect, Size};
use crate::invoke::Waker;
use crate::options::{WindowOptions, WindowState};
use crate::platform::{
    CursorHandle, CursorShape, HitTest, OverlayHandle, OverlayHost, WindowHandle, WindowHost,
};
use crate::window::style::{FRAME_STYLE_MASK, FrameStyle, Margins, WS_OVERLAPPEDWINDOW};

#[derive(Debug, Clone)]
pub(crate) struct MockWindow {
    pub bounds: Rect,
    pub style_bits: u32,
    pub title: String,
    pub state: WindowState,
    pub visible: bool,
    pub shadow: Option<Margins>,
}

#[derive(Debug, Default)]
struct MockState {
    next_handle: isize,
    windows: HashMap<WindowHandle, MockWindow>,
    overlays: HashMap<OverlayHandle, (WindowHandle, Rect)>,
    overlay_creates: usize,
    cursor_loads: usize,
    current_cursor: Option<CursorHandle>,
    drags: Vec<(WindowHandle, HitTest)>,
    style_applies: usize,
    closes_posted: Vec<WindowHandle>,
    theme_notifications: usize,
    quit_requested: bool,
}

#[derive(Debug)]
pub(crate) struct MockBackend {
    state: RefCell<MockState>,
    pub composition: Cell<bool>,
    pub maximized_inset: Cell<Option<i32>>,
    /// When set, the overlay creation with this zero-based index fails.
    pub fail_overlay_at: Cell<Option<usize>>,
    pub wakes: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            state: RefCell::new(MockState { next_handle: 100, ..MockState::default() }),
            composition: Cell::new(true),
            maximized_inset: Cell::new(None),
            fail_overlay_at: Cell::new(None),
            wakes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&self) -> isize {
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        state.next_handle
    }

    /// Adds a bare window, as if created by someone else.
    pub fn add_window(&self, bounds: Rect) -> WindowHandle {
        let handle = WindowHandle(self.next_handle());
        self.state.borrow_mut().windows.insert(
            handle,
            MockWindow {
                bounds,
                style_bits: WS_OVERLAPPEDWINDOW,
                title: String::new(),
                state: WindowState::Normal,
                visible: false,
                shadow: None,
            },
        );
        handle
    }

    pub fn window(&self, window: WindowHandle) -> Option<MockWindow> {
        self.state.borrow().windows.get(&window).cloned()
    }

    pub fn resize(&self, window: WindowHandle, size: Size) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&window) {
            w.bounds.width = size.width;
            w.bounds.height = size.height;
        }
    }

    pub fn move_to(&self, window: WindowHandle, origin: Point) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&window) {
            w.bounds.x = origin.x;
            w.bounds.y = origin.y;
        }
    }

    pub fn force_state(&self, window: WindowHandle, state: WindowState) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&window) {
            w.state = state;
        }
    }

    pub fn overlay_rect(&self, overlay: OverlayHandle) -> Option<Rect> {
        self.state.borrow().overlays.get(&overlay).map(|(_, r)| *r)
    }

    pub fn live_overlays(&self) -> usize {
        self.state.borrow().overlays.len()
    }

    pub fn overlay_creates(&self) -> usize {
        self.state.borrow().overlay_creates
    }

    pub fn cursor_loads(&self) -> usize {
        self.state.borrow().cursor_loads
    }

    pub fn current_cursor(&self) -> Option<CursorHandle> {
        self.state.borrow().current_cursor
    }

    pub fn drags(&self) -> Vec<(WindowHandle, HitTest)> {
        self.state.borrow().drags.clone()
    }

    pub fn style_applies(&self) -> usize {
        self.state.borrow().style_applies
    }

    pub fn closes_posted(&self) -> Vec<WindowHandle> {
        self.state.borrow().closes_posted.clone()
    }

    pub fn theme_notifications(&self) -> usize {
        self.state.borrow().theme_notifications
    }

    pub fn quit_requested(&self) -> bool {
        self.state.borrow().quit_requested
    }
}

impl OverlayHost for MockBackend {
    fn window_bounds(&self, window: WindowHandle) -> Result<Rect> {
        self.state
            .borrow()
            .windows
            .get(&window)
            .map(|w| w.bounds)
            .ok_or(FrameHostError::UnknownWindow(window))
    }

    fn create_overlay(&self, parent: WindowHandle, rect: Rect) -> Result<OverlayHandle> {
        let attempt = {
            let mut state = self.state.borrow_mut();
            if !state.windows.contains_key(&parent) {
                return Err(FrameHostError::UnknownWindow(parent));
            }
            state.overlay_creates += 1;
            state.overlay_creates - 1
        };
        if self.fail_overlay_at.get() == Some(attempt) {
            return Err(FrameHostError::Platform("CreateWindowExW: out of handles".into()));
        }
        let handle = OverlayHandle(self.next_handle());
        self.state.borrow_mut().overlays.insert(handle, (parent, rect));
        Ok(handle)
    }

    fn move_overlay(&self, overlay: OverlayHandle, rect: Rect) -> Result<()> {
        match self.state.borrow_mut().overlays.get_mut(&overlay) {
            Some(entry) => {
                entry.1 = rect;
                Ok(())
            }
            None => Err(FrameHostError::Platform(format!("no overlay {overlay:?}"))),
        }
    }

    fn destroy_overlay(&self, overlay: OverlayHandle) {
        self.state.borrow_mut().overlays.remove(&overlay);
    }

    fn load_cursor(&self, shape: CursorShape) -> Result<CursorHandle> {
        self.state.borrow_mut().cursor_loads += 1;
        Ok(CursorHandle(shape as isize + 1))
    }

    fn set_cursor(&self, cursor: CursorHandle) {
        self.state.borrow_mut().current_cursor = Some(cursor);
    }

    fn begin_native_drag(&self, window: WindowHandle, hit: HitTest) {
        self.state.borrow_mut().drags.push((window, hit));
    }
}

impl WindowHost for MockBackend {
    fn create_window(&self, options: &WindowOptions) -> Result<WindowHandle> {
        let handle = self.add_window(Rect::from_origin_size(options.location, options.size));
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&handle) {
            w.title = options.title.clone();
        }
        Ok(handle)
    }

    fn destroy_window(&self, window: WindowHandle) {
        let mut state = self.state.borrow_mut();
        state.windows.remove(&window);
        state.overlays.retain(|_, (parent, _)| *parent != window);
    }

    fn show(&self, window: WindowHandle) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&window) {
            w.visible = true;
        }
    }

    fn hide(&self, window: WindowHandle) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&window) {
            w.visible = false;
        }
    }

    fn post_close(&self, window: WindowHandle) -> Result<()> {
        self.state.borrow_mut().closes_posted.push(window);
        Ok(())
    }

    fn set_bounds(&self, window: WindowHandle, bounds: Rect) -> Result<()> {
        match self.state.borrow_mut().windows.get_mut(&window) {
            Some(w) => {
                w.bounds = bounds;
                Ok(())
            }
            None => Err(FrameHostError::UnknownWindow(window)),
        }
    }

    fn title(&self, window: WindowHandle) -> Result<String> {
        self.window(window)
            .map(|w| w.title)
            .ok_or(FrameHostError::UnknownWindow(window))
    }

    fn set_title(&self, window: WindowHandle, title: &str) -> Result<()> {
        match self.state.borrow_mut().windows.get_mut(&window) {
            Some(w) => {
                w.title = title.to_string();
                Ok(())
            }
            None => Err(FrameHostError::UnknownWindow(window)),
        }
    }

    fn window_state(&self, window: WindowHandle) -> Result<WindowState> {
        self.window(window)
            .map(|w| w.state)
            .ok_or(FrameHostError::UnknownWindow(window))
    }

    fn set_window_state(&self, window: WindowHandle, state: WindowState) -> Result<()> {
        self.force_state(window, state);
        Ok(())
    }

    fn style_bits(&self, window: WindowHandle) -> u32 {
        self.window(window).map(|w| w.style_bits).unwrap_or_default()
    }

    fn apply_frame_style(&self, window: WindowHandle, style: &FrameStyle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let w = state
            .windows
            .get_mut(&window)
            .ok_or(FrameHostError::UnknownWindow(window))?;
        w.style_bits = (w.style_bits & !FRAME_STYLE_MASK) | style.bits;
        w.shadow = style.shadow;
        state.style_applies += 1;
        Ok(())
    }

    fn composition_enabled(&self) -> bool {
        self.composition.get()
    }

    fn maximized_client_inset(&self, _window: WindowHandle) -> Option<i32> {
        self.maximized_inset.get()
    }

    fn work_area(&self) -> Rect {
        Rect::new(0, 0, 1920, 1040)
    }

    fn notify_theme_changed(&self, _window: WindowHandle) {
        self.state.borrow_mut().theme_notifications += 1;
    }

    fn invoke_waker(&self, _window: WindowHandle) -> Waker {
        let wakes = Arc::clone(&self.wakes);
        Arc::new(move || {
            wakes.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn run_message_loop(&self) -> Result<()> {
        Ok(())
    }

    fn quit(&self) {
        self.state.borrow_mut().quit_requested = true;
    }
}
