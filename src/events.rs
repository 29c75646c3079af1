//! Window lifecycle callbacks registered by the host at construction time.

use crate::geometry::{Point, Size};
use crate::options::WindowState;

type Notify = Box<dyn Fn()>;

/// Optional host callbacks. Unset callbacks are skipped; an unset `closing`
/// never cancels.
#[derive(Default)]
pub struct WindowEvents {
    pub on_shown: Option<Notify>,
    pub on_hidden: Option<Notify>,
    pub on_focus_in: Option<Notify>,
    pub on_focus_out: Option<Notify>,
    pub on_size_changed: Option<Box<dyn Fn(Size)>>,
    pub on_location_changed: Option<Box<dyn Fn(Point)>>,
    pub on_resize_start: Option<Box<dyn Fn(Size)>>,
    pub on_resize_end: Option<Box<dyn Fn(Size)>>,
    pub on_state_changed: Option<Box<dyn Fn(WindowState)>>,
    /// Returns `true` to cancel the close.
    pub on_closing: Option<Box<dyn Fn() -> bool>>,
    pub on_closed: Option<Notify>,
    pub on_theme_changed: Option<Notify>,
}

impl std::fmt::Debug for WindowEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowEvents")
            .field("shown", &self.on_shown.is_some())
            .field("hidden", &self.on_hidden.is_some())
            .field("focus_in", &self.on_focus_in.is_some())
            .field("focus_out", &self.on_focus_out.is_some())
            .field("size_changed", &self.on_size_changed.is_some())
            .field("location_changed", &self.on_location_changed.is_some())
            .field("closing", &self.on_closing.is_some())
            .field("closed", &self.on_closed.is_some())
            .finish_non_exhaustive()
    }
}

impl WindowEvents {
    pub fn on_shown(mut self, f: impl Fn() + 'static) -> Self {
        self.on_shown = Some(Box::new(f));
        self
    }

    pub fn on_hidden(mut self, f: impl Fn() + 'static) -> Self {
        self.on_hidden = Some(Box::new(f));
        self
    }

    pub fn on_focus_in(mut self, f: impl Fn() + 'static) -> Self {
        self.on_focus_in = Some(Box::new(f));
        self
    }

    pub fn on_focus_out(mut self, f: impl Fn() + 'static) -> Self {
        self.on_focus_out = Some(Box::new(f));
        self
    }

    pub fn on_size_changed(mut self, f: impl Fn(Size) + 'static) -> Self {
        self.on_size_changed = Some(Box::new(f));
        self
    }

    pub fn on_location_changed(mut self, f: impl Fn(Point) + 'static) -> Self {
        self.on_location_changed = Some(Box::new(f));
        self
    }

    pub fn on_resize_start(mut self, f: impl Fn(Size) + 'static) -> Self {
        self.on_resize_start = Some(Box::new(f));
        self
    }

    pub fn on_resize_end(mut self, f: impl Fn(Size) + 'static) -> Self {
        self.on_resize_end = Some(Box::new(f));
        self
    }

    pub fn on_closing(mut self, f: impl Fn() -> bool + 'static) -> Self {
        self.on_closing = Some(Box::new(f));
        self
    }

    pub fn on_closed(mut self, f: impl Fn() + 'static) -> Self {
        self.on_closed = Some(Box::new(f));
        self
    }

    pub fn on_theme_changed(mut self, f: impl Fn() + 'static) -> Self {
        self.on_theme_changed = Some(Box::new(f));
        self
    }

    pub fn on_state_changed(mut self, f: impl Fn(WindowState) + 'static) -> Self {
        self.on_state_changed = Some(Box::new(f));
        self
    }

    pub(crate) fn shown(&self) {
        fire(&self.on_shown);
    }

    pub(crate) fn hidden(&self) {
        fire(&self.on_hidden);
    }

    pub(crate) fn focus_in(&self) {
        fire(&self.on_focus_in);
    }

    pub(crate) fn focus_out(&self) {
        fire(&self.on_focus_out);
    }

    pub(crate) fn size_changed(&self, size: Size) {
        if let Some(f) = &self.on_size_changed {
            f(size);
        }
    }

    pub(crate) fn location_changed(&self, location: Point) {
        if let Some(f) = &self.on_location_changed {
            f(location);
        }
    }

    pub(crate) fn resize_start(&self, size: Size) {
        if let Some(f) = &self.on_resize_start {
            f(size);
        }
    }

    pub(crate) fn resize_end(&self, size: Size) {
        if let Some(f) = &self.on_resize_end {
            f(size);
        }
    }

    pub(crate) fn state_changed(&self, state: WindowState) {
        if let Some(f) = &self.on_state_changed {
            f(state);
        }
    }

    /// `true` when the host cancelled the close.
    pub(crate) fn closing(&self) -> bool {
        self.on_closing.as_ref().is_some_and(|f| f())
    }

    pub(crate) fn closed(&self) {
        fire(&self.on_closed);
    }

    pub(crate) fn theme_changed(&self) {
        fire(&self.on_theme_changed);
    }
}

fn fire(callback: &Option<Notify>) {
    if let Some(f) = callback {
        f();
    }
}
