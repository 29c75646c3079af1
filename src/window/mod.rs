//! One native top-level window: its border-style state machine, message
//! handling and the frame that gives frameless styles their resize edges.
//!
//! Native message handlers re-enter the controller (applying a style
//! synchronously produces `NcCalcSize` and `Size`, starting a resize runs a
//! modal loop that keeps delivering `Size`), so every operation takes `&self`
//! and state lives in cells that are never borrowed across a backend call
//! that can call back in.

pub mod style;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, error, info, trace, warn};

use crate::error::Result;
use crate::events::WindowEvents;
use crate::frame::{EdgeInput, EdgeResponse, FrameController, OverlayRegion, SharedRegistry};
use crate::geometry::{Point, Rect, Size};
use crate::invoke::{Dispatcher, Invoker};
use crate::options::{StartupLocation, WindowOptions, WindowState};
use crate::platform::{OverlayHandle, WindowHandle, WindowHost};
use style::{BorderStyle, CaptionButtons, FRAME_STYLE_MASK, frame_style};

/// Native messages the controller reacts to, already decoded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMessage {
    Activate { active: bool },
    Size,
    Move,
    EnterSizeMove,
    ExitSizeMove,
    Close,
    Destroy,
    /// The OS asks for the client area given the proposed window rectangle.
    NcCalcSize { proposed: Rect },
    SettingChange { color_scheme: bool },
    ThemeChanged,
    /// Cross-thread work is waiting in the invoke queue.
    Invoke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageResult {
    /// Let the platform's default handling run.
    Default,
    Handled(isize),
    /// Use this rectangle as the client area.
    ClientArea(Rect),
}

pub struct WindowController<B: WindowHost> {
    handle: WindowHandle,
    backend: Rc<B>,
    registry: SharedRegistry,
    buttons: CaptionButtons,
    style: Cell<BorderStyle>,
    state: Cell<WindowState>,
    pending_state: Cell<Option<WindowState>>,
    frame: RefCell<Option<FrameController<B>>>,
    dispatcher: Dispatcher,
    events: WindowEvents,
    destroyed: Cell<bool>,
    on_destroyed: RefCell<Option<Box<dyn FnOnce(WindowHandle)>>>,
}

impl<B: WindowHost> std::fmt::Debug for WindowController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowController")
            .field("handle", &self.handle)
            .field("style", &self.style.get())
            .field("state", &self.state.get())
            .field("destroyed", &self.destroyed.get())
            .finish_non_exhaustive()
    }
}

impl<B: WindowHost> WindowController<B> {
    /// Creates the native window, binds it to the new controller and applies
    /// the requested border style. The window starts hidden.
    pub fn create(
        backend: Rc<B>,
        registry: SharedRegistry,
        options: &WindowOptions,
        events: WindowEvents,
    ) -> Result<Rc<Self>> {
        options.validate()?;

        let mut options = options.clone();
        if options.startup_location == StartupLocation::CenterScreen {
            options.location = centered(backend.work_area(), options.size);
        }

        let handle = backend.create_window(&options)?;
        let dispatcher = Dispatcher::new(backend.invoke_waker(handle));
        let controller = Rc::new(Self {
            handle,
            backend: Rc::clone(&backend),
            registry,
            buttons: options.caption_buttons(),
            style: Cell::new(BorderStyle::Normal),
            state: Cell::new(WindowState::Normal),
            pending_state: Cell::new(
                (options.window_state != WindowState::Normal).then_some(options.window_state),
            ),
            frame: RefCell::new(None),
            dispatcher,
            events,
            destroyed: Cell::new(false),
            on_destroyed: RefCell::new(None),
        });
        backend.bind_window(handle, &controller);
        info!("[WindowController:{:?}] created \"{}\"", handle, options.title);

        if options.border_style != BorderStyle::Normal {
            controller.set_border_style(options.border_style)?;
        }
        Ok(controller)
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn border_style(&self) -> BorderStyle {
        self.style.get()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Registers `hook` to run once the native window is gone, however it was
    /// destroyed. Replaces any earlier hook.
    pub fn on_destroyed(&self, hook: impl FnOnce(WindowHandle) + 'static) {
        *self.on_destroyed.borrow_mut() = Some(Box::new(hook));
    }

    /// Handle other threads use to run work on this window's thread.
    pub fn invoker(&self) -> Invoker {
        self.dispatcher.invoker()
    }

    /// Moves the window to `style`.
    ///
    /// Native style bits are only rewritten when they differ from the current
    /// ones. Entering an overlay style attaches a frame; leaving it drops the
    /// frame. A frame that cannot be attached leaves the window in the new
    /// style without resize edges.
    pub fn set_border_style(&self, style: BorderStyle) -> Result<()> {
        let previous = self.style.replace(style);
        let target = frame_style(style, self.backend.composition_enabled(), self.buttons);
        let current = self.backend.style_bits(self.handle) & FRAME_STYLE_MASK;

        if target.bits != current {
            if let Err(e) = self.backend.apply_frame_style(self.handle, &target) {
                self.style.set(previous);
                error!(
                    "[WindowController:{:?}] applying {:?} failed: {}",
                    self.handle, style, e
                );
                return Err(e);
            }
        }
        self.sync_frame(style);

        if previous != style {
            info!("[WindowController:{:?}] border style {:?} -> {:?}", self.handle, previous, style);
        }
        Ok(())
    }

    /// Rewrites the current style unconditionally, e.g. after the theme or
    /// composition state changed underneath it.
    fn reapply_style(&self) {
        let style = self.style.get();
        let target = frame_style(style, self.backend.composition_enabled(), self.buttons);
        if let Err(e) = self.backend.apply_frame_style(self.handle, &target) {
            warn!("[WindowController:{:?}] re-applying {:?} failed: {}", self.handle, style, e);
            return;
        }
        self.sync_frame(style);
    }

    fn sync_frame(&self, style: BorderStyle) {
        let Ok(mut slot) = self.frame.try_borrow_mut() else {
            warn!("[WindowController:{:?}] frame busy, not synced to {:?}", self.handle, style);
            return;
        };

        if !style.has_overlay_frame() {
            *slot = None;
            return;
        }

        let frame = slot.get_or_insert_with(|| {
            FrameController::new(self.handle, Rc::clone(&self.backend), Rc::clone(&self.registry))
        });
        if let Err(e) = frame.attach() {
            warn!(
                "[WindowController:{:?}] continuing without resize edges: {}",
                self.handle, e
            );
            *slot = None;
        }
    }

    fn update_frame(&self) {
        match self.frame.try_borrow_mut() {
            Ok(mut slot) => {
                if let Some(frame) = slot.as_mut() {
                    if let Err(e) = frame.update() {
                        warn!("[WindowController:{:?}] overlay update failed: {}", self.handle, e);
                    }
                }
            }
            Err(_) => trace!("[WindowController:{:?}] frame busy, update skipped", self.handle),
        }
    }

    fn release_frame(&self) {
        match self.frame.try_borrow_mut() {
            Ok(mut slot) => *slot = None,
            Err(_) => warn!("[WindowController:{:?}] frame busy, not released", self.handle),
        }
    }

    /// Current overlays, empty when the window has no frame.
    pub fn overlays(&self) -> Vec<OverlayRegion> {
        self.frame
            .try_borrow()
            .ok()
            .and_then(|slot| slot.as_ref().map(|f| f.overlays().to_vec()))
            .unwrap_or_default()
    }

    /// Routes input that arrived on one of this window's overlays and carries
    /// out the response. A resize started here runs the OS's modal loop, so
    /// the frame is released before the backend is called.
    pub fn handle_edge_input(&self, overlay: OverlayHandle, input: EdgeInput) -> EdgeResponse {
        let response = match self.frame.try_borrow_mut() {
            Ok(mut slot) => match slot.as_mut() {
                Some(frame) => frame.resolve_input(overlay, input),
                None => EdgeResponse::PassThrough,
            },
            Err(_) => EdgeResponse::PassThrough,
        };

        match response {
            EdgeResponse::BeginResize { window, hit } => {
                debug!("[WindowController:{:?}] resize from {:?}", self.handle, hit);
                self.backend.begin_native_drag(window, hit);
            }
            EdgeResponse::SetCursor(cursor) => self.backend.set_cursor(cursor),
            EdgeResponse::PassThrough => {}
        }
        response
    }

    pub fn handle_message(&self, message: WindowMessage) -> MessageResult {
        trace!("[WindowController:{:?}] {:?}", self.handle, message);
        match message {
            WindowMessage::Activate { active } => {
                if active {
                    self.events.focus_in();
                } else {
                    self.events.focus_out();
                }
                MessageResult::Default
            }
            WindowMessage::Size => {
                if let Ok(bounds) = self.backend.window_bounds(self.handle) {
                    self.events.size_changed(bounds.size());
                }
                self.update_frame();
                self.refresh_state();
                MessageResult::Handled(0)
            }
            WindowMessage::Move => {
                if let Ok(bounds) = self.backend.window_bounds(self.handle) {
                    self.events.location_changed(bounds.origin());
                }
                self.update_frame();
                MessageResult::Handled(0)
            }
            WindowMessage::EnterSizeMove => {
                self.events.resize_start(self.current_size());
                MessageResult::Default
            }
            WindowMessage::ExitSizeMove => {
                self.events.resize_end(self.current_size());
                MessageResult::Default
            }
            WindowMessage::Close => {
                if self.events.closing() {
                    debug!("[WindowController:{:?}] close cancelled by host", self.handle);
                } else {
                    self.destroy();
                }
                MessageResult::Handled(0)
            }
            WindowMessage::Destroy => {
                self.mark_destroyed();
                MessageResult::Handled(0)
            }
            WindowMessage::NcCalcSize { proposed } => {
                if !self.style.get().suppresses_non_client() {
                    return MessageResult::Default;
                }
                let area = match self.backend.maximized_client_inset(self.handle) {
                    Some(inset) => proposed.inset(inset),
                    None => proposed,
                };
                MessageResult::ClientArea(area)
            }
            WindowMessage::SettingChange { color_scheme } => {
                if color_scheme {
                    self.backend.notify_theme_changed(self.handle);
                }
                MessageResult::Default
            }
            WindowMessage::ThemeChanged => {
                if self.style.get() != BorderStyle::Normal {
                    self.reapply_style();
                }
                self.events.theme_changed();
                MessageResult::Default
            }
            WindowMessage::Invoke => {
                self.dispatcher.run_pending();
                MessageResult::Handled(0)
            }
        }
    }

    fn current_size(&self) -> Size {
        self.backend
            .window_bounds(self.handle)
            .map(|b| b.size())
            .unwrap_or_default()
    }

    fn refresh_state(&self) {
        let Ok(state) = self.backend.window_state(self.handle) else {
            return;
        };
        if self.state.replace(state) != state {
            debug!("[WindowController:{:?}] state -> {:?}", self.handle, state);
            self.events.state_changed(state);
        }
    }

    /// Shows the window, applying a deferred initial state. Frameless styles
    /// are re-applied afterwards so the shadow and frame refresh take effect on
    /// a visible window.
    pub fn show(&self) {
        self.backend.show(self.handle);
        if let Some(state) = self.pending_state.take() {
            if let Err(e) = self.set_window_state(state) {
                warn!("[WindowController:{:?}] initial state {:?}: {}", self.handle, state, e);
            }
        }
        if self.style.get() != BorderStyle::Normal {
            self.reapply_style();
        }
        self.events.shown();
    }

    pub fn hide(&self) {
        self.backend.hide(self.handle);
        self.events.hidden();
    }

    /// Requests a close; the host's `closing` callback may still cancel it.
    pub fn close(&self) -> Result<()> {
        self.backend.post_close(self.handle)
    }

    pub fn bounds(&self) -> Result<Rect> {
        self.backend.window_bounds(self.handle)
    }

    pub fn set_bounds(&self, bounds: Rect) -> Result<()> {
        self.backend.set_bounds(self.handle, bounds)?;
        self.update_frame();
        Ok(())
    }

    pub fn title(&self) -> Result<String> {
        self.backend.title(self.handle)
    }

    pub fn set_title(&self, title: &str) -> Result<()> {
        self.backend.set_title(self.handle, title)
    }

    pub fn window_state(&self) -> Result<WindowState> {
        self.backend.window_state(self.handle)
    }

    pub fn set_window_state(&self, state: WindowState) -> Result<()> {
        self.backend.set_window_state(self.handle, state)?;
        self.refresh_state();
        self.update_frame();
        Ok(())
    }

    /// Centers the window on the primary work area.
    pub fn center(&self) -> Result<()> {
        let bounds = self.bounds()?;
        let origin = centered(self.backend.work_area(), bounds.size());
        self.set_bounds(Rect::from_origin_size(origin, bounds.size()))
    }

    /// Destroys the native window now, without asking the host.
    pub fn destroy(&self) {
        if self.destroyed.get() {
            return;
        }
        self.release_frame();
        self.backend.destroy_window(self.handle);
        self.mark_destroyed();
    }

    fn mark_destroyed(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.release_frame();
        self.dispatcher.close();
        info!("[WindowController:{:?}] destroyed", self.handle);
        self.events.closed();
        let hook = self.on_destroyed.borrow_mut().take();
        if let Some(hook) = hook {
            hook(self.handle);
        }
    }
}

impl<B: WindowHost> Drop for WindowController<B> {
    fn drop(&mut self) {
        if !self.destroyed.replace(true) {
            self.release_frame();
            self.backend.destroy_window(self.handle);
        }
    }
}

fn centered(area: Rect, size: Size) -> Point {
    Point::new(
        area.x + (area.width - size.width) / 2,
        area.y + (area.height - size.height) / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::EdgeOverlayRegistry;
    use crate::geometry::Edge;
    use crate::platform::HitTest;
    use crate::platform::mock::MockBackend;
    use std::thread;
    use super::style::WS_OVERLAPPEDWINDOW;

    struct Fixture {
        backend: Rc<MockBackend>,
        registry: SharedRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self { backend: Rc::new(MockBackend::new()), registry: EdgeOverlayRegistry::shared() }
        }

        fn window(&self, options: WindowOptions, events: WindowEvents) -> Rc<WindowController<MockBackend>> {
            WindowController::create(self.backend.clone(), self.registry.clone(), &options, events).unwrap()
        }

        fn plain(&self) -> Rc<WindowController<MockBackend>> {
            self.window(WindowOptions::default(), WindowEvents::default())
        }
    }

    #[test]
    fn borderless_round_trip_restores_style_bits() {
        let fx = Fixture::new();
        let window = fx.plain();
        let original = fx.backend.window(window.handle()).unwrap().style_bits;

        window.set_border_style(BorderStyle::Borderless).unwrap();
        assert_ne!(fx.backend.window(window.handle()).unwrap().style_bits, original);
        assert_eq!(window.overlays().len(), 8);

        window.set_border_style(BorderStyle::Normal).unwrap();
        assert_eq!(fx.backend.window(window.handle()).unwrap().style_bits, original);
        assert_eq!(original & FRAME_STYLE_MASK, WS_OVERLAPPEDWINDOW);
        assert!(window.overlays().is_empty());
        assert_eq!(fx.registry.borrow().count_for_window(window.handle()), 0);
    }

    #[test]
    fn unchanged_bits_skip_the_refresh() {
        let fx = Fixture::new();
        let window = fx.plain();
        window.set_border_style(BorderStyle::Normal).unwrap();
        assert_eq!(fx.backend.style_applies(), 0);

        window.set_border_style(BorderStyle::Borderless).unwrap();
        window.set_border_style(BorderStyle::SizableNoCaption).unwrap();
        assert_eq!(fx.backend.style_applies(), 1);
        assert_eq!(window.border_style(), BorderStyle::SizableNoCaption);
        assert_eq!(window.overlays().len(), 8);
    }

    #[test]
    fn fixed_no_caption_suppresses_insets_without_overlays() {
        let fx = Fixture::new();
        let window = fx.plain();
        window.set_border_style(BorderStyle::FixedNoCaption).unwrap();
        assert!(window.overlays().is_empty());

        let proposed = Rect::new(10, 10, 400, 300);
        assert_eq!(
            window.handle_message(WindowMessage::NcCalcSize { proposed }),
            MessageResult::ClientArea(proposed)
        );
    }

    #[test]
    fn normal_windows_keep_default_non_client_area() {
        let fx = Fixture::new();
        let window = fx.plain();
        let proposed = Rect::new(0, 0, 400, 300);
        assert_eq!(
            window.handle_message(WindowMessage::NcCalcSize { proposed }),
            MessageResult::Default
        );
    }

    #[test]
    fn maximized_borderless_client_area_is_inset() {
        let fx = Fixture::new();
        let window = fx.plain();
        window.set_border_style(BorderStyle::Borderless).unwrap();
        fx.backend.maximized_inset.set(Some(8));

        let result = window.handle_message(WindowMessage::NcCalcSize {
            proposed: Rect::new(-8, -8, 1936, 1056),
        });
        assert_eq!(result, MessageResult::ClientArea(Rect::new(0, 0, 1920, 1040)));
    }

    #[test]
    fn overlay_failure_keeps_the_window_usable() {
        let fx = Fixture::new();
        fx.backend.fail_overlay_at.set(Some(3));
        let window = fx.plain();

        window.set_border_style(BorderStyle::Borderless).unwrap();
        assert_eq!(window.border_style(), BorderStyle::Borderless);
        assert!(window.overlays().is_empty());
        assert_eq!(fx.backend.live_overlays(), 0);
        assert!(fx.registry.borrow().is_empty());
    }

    #[test]
    fn initial_border_style_is_applied_on_create() {
        let fx = Fixture::new();
        let options = WindowOptions { border_style: BorderStyle::Borderless, ..Default::default() };
        let window = fx.window(options, WindowEvents::default());
        assert_eq!(window.overlays().len(), 8);
    }

    #[test]
    fn close_can_be_cancelled() {
        let fx = Fixture::new();
        let closed = Rc::new(Cell::new(0));
        let counter = closed.clone();
        let events = WindowEvents::default()
            .on_closing(|| true)
            .on_closed(move || counter.set(counter.get() + 1));
        let window = fx.window(WindowOptions::default(), events);

        assert_eq!(window.handle_message(WindowMessage::Close), MessageResult::Handled(0));
        assert!(!window.is_destroyed());
        assert!(fx.backend.window(window.handle()).is_some());
        assert_eq!(closed.get(), 0);
    }

    #[test]
    fn close_destroys_and_reports_once() {
        let fx = Fixture::new();
        let closed = Rc::new(Cell::new(0));
        let counter = closed.clone();
        let events = WindowEvents::default().on_closed(move || counter.set(counter.get() + 1));
        let options = WindowOptions { border_style: BorderStyle::Borderless, ..Default::default() };
        let window = fx.window(options, events);

        window.handle_message(WindowMessage::Close);
        window.handle_message(WindowMessage::Destroy);
        assert!(window.is_destroyed());
        assert!(fx.backend.window(window.handle()).is_none());
        assert!(fx.registry.borrow().is_empty());
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn edge_input_drives_the_backend() {
        let fx = Fixture::new();
        let window = fx.plain();
        window.set_border_style(BorderStyle::Borderless).unwrap();
        let right = window.overlays().into_iter().find(|o| o.edge == Edge::Right).unwrap();

        let response = window.handle_edge_input(right.handle, EdgeInput::PrimaryButtonDown);
        assert!(response.handled());
        assert_eq!(fx.backend.drags(), vec![(window.handle(), HitTest::Right)]);

        let response = window.handle_edge_input(right.handle, EdgeInput::CursorQuery);
        let EdgeResponse::SetCursor(cursor) = response else {
            panic!("expected a cursor, got {response:?}");
        };
        assert_eq!(fx.backend.current_cursor(), Some(cursor));
    }

    #[test]
    fn size_message_refits_overlays_and_reports() {
        let fx = Fixture::new();
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let states = Rc::new(RefCell::new(Vec::new()));
        let (s, st) = (sizes.clone(), states.clone());
        let events = WindowEvents::default()
            .on_size_changed(move |size| s.borrow_mut().push(size))
            .on_state_changed(move |state| st.borrow_mut().push(state));
        let window = fx.window(WindowOptions::default(), events);
        window.set_border_style(BorderStyle::Borderless).unwrap();

        fx.backend.resize(window.handle(), Size::new(640, 480));
        fx.backend.force_state(window.handle(), WindowState::Maximized);
        window.handle_message(WindowMessage::Size);

        assert_eq!(*sizes.borrow(), vec![Size::new(640, 480)]);
        assert_eq!(*states.borrow(), vec![WindowState::Maximized]);
        let bottom = window.overlays().into_iter().find(|o| o.edge == Edge::Bottom).unwrap();
        assert_eq!(bottom.rect, Rect::new(8, 472, 624, 8));
    }

    #[test]
    fn theme_change_reapplies_non_normal_styles() {
        let fx = Fixture::new();
        let themed = Rc::new(Cell::new(false));
        let flag = themed.clone();
        let events = WindowEvents::default().on_theme_changed(move || flag.set(true));
        let window = fx.window(WindowOptions::default(), events);
        window.set_border_style(BorderStyle::Borderless).unwrap();
        let applies = fx.backend.style_applies();

        window.handle_message(WindowMessage::SettingChange { color_scheme: true });
        assert_eq!(fx.backend.theme_notifications(), 1);
        window.handle_message(WindowMessage::SettingChange { color_scheme: false });
        assert_eq!(fx.backend.theme_notifications(), 1);

        window.handle_message(WindowMessage::ThemeChanged);
        assert_eq!(fx.backend.style_applies(), applies + 1);
        assert!(themed.get());
        assert_eq!(window.overlays().len(), 8);
    }

    #[test]
    fn show_applies_the_deferred_state() {
        let fx = Fixture::new();
        let options = WindowOptions { window_state: WindowState::Maximized, ..Default::default() };
        let window = fx.window(options, WindowEvents::default());
        assert_eq!(window.window_state().unwrap(), WindowState::Normal);

        window.show();
        let native = fx.backend.window(window.handle()).unwrap();
        assert!(native.visible);
        assert_eq!(native.state, WindowState::Maximized);
    }

    #[test]
    fn move_and_close_requests_reach_the_backend() {
        let fx = Fixture::new();
        let moved = Rc::new(Cell::new(Point::default()));
        let sink = moved.clone();
        let events = WindowEvents::default().on_location_changed(move |p| sink.set(p));
        let window = fx.window(WindowOptions::default(), events);

        fx.backend.move_to(window.handle(), Point::new(40, 60));
        window.handle_message(WindowMessage::Move);
        assert_eq!(moved.get(), Point::new(40, 60));

        window.close().unwrap();
        assert_eq!(fx.backend.closes_posted(), vec![window.handle()]);
        assert!(!window.is_destroyed());
    }

    #[test]
    fn destroyed_window_disconnects_its_invoker() {
        let fx = Fixture::new();
        let window = fx.plain();
        let invoker = window.invoker();
        let gone = Rc::new(Cell::new(None));
        let sink = gone.clone();
        window.on_destroyed(move |handle| sink.set(Some(handle)));

        window.handle_message(WindowMessage::Close);
        assert!(window.is_destroyed());
        assert_eq!(gone.get(), Some(window.handle()));

        let late = thread::spawn(move || invoker.invoke(|| {})).join().unwrap();
        assert!(matches!(late, Err(crate::error::FrameHostError::Disconnected)));
    }

    #[test]
    fn center_uses_the_work_area() {
        let fx = Fixture::new();
        let options = WindowOptions { size: Size::new(800, 600), ..Default::default() };
        let window = fx.window(options, WindowEvents::default());
        window.center().unwrap();
        assert_eq!(window.bounds().unwrap(), Rect::new(560, 220, 800, 600));
    }

    #[test]
    fn invoke_message_drains_cross_thread_work() {
        let fx = Fixture::new();
        let window = fx.plain();
        let invoker = window.invoker();

        let worker = thread::spawn(move || invoker.call(|| 6 * 7));
        while !worker.is_finished() {
            window.handle_message(WindowMessage::Invoke);
            thread::yield_now();
        }
        assert_eq!(worker.join().unwrap().unwrap(), 42);
        assert!(fx.backend.wakes.load(std::sync::atomic::Ordering::SeqCst) >= 1);
    }
}
