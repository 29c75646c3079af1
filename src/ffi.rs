//! Flat C ABI for managed hosts.
//!
//! Apps are opaque pointers; windows are addressed by their native handle.
//! Every call except `Window_Invoke` must come from the thread that created
//! the app. Status-returning calls yield 0 on success or
//! [`FrameHostError::code`].

#![allow(non_snake_case)]

use std::ffi::{CStr, c_char, c_void};
use std::rc::Rc;

use log::{error, warn};

use crate::app::App;
use crate::error::{FrameHostError, Result};
use crate::events::WindowEvents;
use crate::geometry::{Point, Rect, Size, edge_rect_for_id};
use crate::invoke::Invoker;
use crate::options::{AppOptions, WindowOptions, WindowState};
use crate::platform::WindowHandle;
use crate::platform::win32::{Win32Backend, Win32Controller};
use crate::window::style::BorderStyle;

type NativeApp = App<Win32Backend>;

/// Host callbacks; any entry may be null.
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct WindowEventTable {
    pub on_shown: Option<extern "C" fn()>,
    pub on_hidden: Option<extern "C" fn()>,
    pub on_focus_in: Option<extern "C" fn()>,
    pub on_focus_out: Option<extern "C" fn()>,
    pub on_size_changed: Option<extern "C" fn(Size)>,
    pub on_location_changed: Option<extern "C" fn(Point)>,
    pub on_resize_start: Option<extern "C" fn(Size)>,
    pub on_resize_end: Option<extern "C" fn(Size)>,
    pub on_state_changed: Option<extern "C" fn(i32)>,
    /// Returns `true` to cancel the close.
    pub on_closing: Option<extern "C" fn() -> bool>,
    pub on_closed: Option<extern "C" fn()>,
    pub on_theme_changed: Option<extern "C" fn()>,
}

impl WindowEventTable {
    fn into_events(self) -> WindowEvents {
        let mut events = WindowEvents::default();
        if let Some(f) = self.on_shown {
            events = events.on_shown(f);
        }
        if let Some(f) = self.on_hidden {
            events = events.on_hidden(f);
        }
        if let Some(f) = self.on_focus_in {
            events = events.on_focus_in(f);
        }
        if let Some(f) = self.on_focus_out {
            events = events.on_focus_out(f);
        }
        if let Some(f) = self.on_size_changed {
            events = events.on_size_changed(f);
        }
        if let Some(f) = self.on_location_changed {
            events = events.on_location_changed(f);
        }
        if let Some(f) = self.on_resize_start {
            events = events.on_resize_start(f);
        }
        if let Some(f) = self.on_resize_end {
            events = events.on_resize_end(f);
        }
        if let Some(f) = self.on_state_changed {
            events = events.on_state_changed(move |state| f(state as i32));
        }
        if let Some(f) = self.on_closing {
            events = events.on_closing(f);
        }
        if let Some(f) = self.on_closed {
            events = events.on_closed(f);
        }
        if let Some(f) = self.on_theme_changed {
            events = events.on_theme_changed(f);
        }
        events
    }
}

fn status(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("[FFI] {}", e);
            e.code()
        }
    }
}

/// `None` for a null pointer.
unsafe fn utf8<'a>(text: *const c_char) -> Result<Option<&'a str>> {
    if text.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(text) }
        .to_str()
        .map(Some)
        .map_err(|e| FrameHostError::InvalidArgument(format!("string is not UTF-8: {e}")))
}

unsafe fn app_ref<'a>(app: *const NativeApp) -> Result<&'a NativeApp> {
    unsafe { app.as_ref() }.ok_or_else(|| FrameHostError::InvalidArgument("null app".into()))
}

unsafe fn window_of(app: *const NativeApp, window: isize) -> Result<Rc<Win32Controller>> {
    let handle = WindowHandle(window);
    unsafe { app_ref(app) }?
        .window(handle)
        .ok_or(FrameHostError::UnknownWindow(handle))
}

/// Creates an app from JSON options (null for defaults). Returns null on
/// failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn App_Create(options_json: *const c_char) -> *mut NativeApp {
    crate::init_logging();

    let created = (|| -> Result<NativeApp> {
        let options = match unsafe { utf8(options_json) }? {
            Some(json) => AppOptions::from_json(json)?,
            None => AppOptions::default(),
        };
        Ok(App::new(Rc::new(Win32Backend::new()?), options))
    })();

    match created {
        Ok(app) => Box::into_raw(Box::new(app)),
        Err(e) => {
            error!("[FFI] App_Create: {}", e);
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn App_Destroy(app: *mut NativeApp) {
    if !app.is_null() {
        drop(unsafe { Box::from_raw(app) });
    }
}

/// Blocks in the message loop until `App_Exit`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn App_Run(app: *const NativeApp) -> i32 {
    status(unsafe { app_ref(app) }.and_then(|app| app.run()))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn App_Exit(app: *const NativeApp) {
    match unsafe { app_ref(app) } {
        Ok(app) => app.exit(),
        Err(e) => warn!("[FFI] App_Exit: {}", e),
    }
}

/// Creates a hidden window. Returns its native handle, or 0 on failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn App_SpawnWindow(
    app: *const NativeApp,
    options_json: *const c_char,
    events: *const WindowEventTable,
) -> isize {
    let spawned = (|| -> Result<isize> {
        let app = unsafe { app_ref(app) }?;
        let options = match unsafe { utf8(options_json) }? {
            Some(json) => WindowOptions::from_json(json)?,
            None => WindowOptions::default(),
        };
        let events = unsafe { events.as_ref() }.copied().unwrap_or_default().into_events();
        Ok(app.spawn_window(options, events)?.handle().0)
    })();

    spawned.unwrap_or_else(|e| {
        error!("[FFI] App_SpawnWindow: {}", e);
        0
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn App_DespawnWindow(app: *const NativeApp, window: isize) -> i32 {
    status(unsafe { app_ref(app) }.and_then(|app| app.despawn_window(WindowHandle(window))))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_Show(app: *const NativeApp, window: isize) -> i32 {
    status(unsafe { window_of(app, window) }.map(|w| w.show()))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_Hide(app: *const NativeApp, window: isize) -> i32 {
    status(unsafe { window_of(app, window) }.map(|w| w.hide()))
}

/// Requests a close; the window's `on_closing` callback may cancel it.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_Close(app: *const NativeApp, window: isize) -> i32 {
    status(unsafe { window_of(app, window) }.and_then(|w| w.close()))
}

/// Returns a thread-safe invoker for `window`, or null. Release it with
/// `Invoker_Release`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_GetInvoker(app: *const NativeApp, window: isize) -> *mut Invoker {
    match unsafe { window_of(app, window) } {
        Ok(w) => Box::into_raw(Box::new(w.invoker())),
        Err(e) => {
            error!("[FFI] Window_GetInvoker: {}", e);
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Invoker_Release(invoker: *mut Invoker) {
    if !invoker.is_null() {
        drop(unsafe { Box::from_raw(invoker) });
    }
}

struct HostState(*mut c_void);

// The pointer is only handed back to the host's own callback.
unsafe impl Send for HostState {}

/// Runs `action(state)` on the window's thread and returns once it finished.
/// Callable from any thread except the window's own.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_Invoke(
    invoker: *const Invoker,
    action: Option<extern "C" fn(*mut c_void)>,
    state: *mut c_void,
) -> i32 {
    let Some(invoker) = (unsafe { invoker.as_ref() }) else {
        return FrameHostError::InvalidArgument("null invoker".into()).code();
    };
    let Some(action) = action else {
        return FrameHostError::InvalidArgument("null action".into()).code();
    };
    let state = HostState(state);
    status(invoker.invoke(move || {
        let state = state;
        action(state.0);
    }))
}

/// Returns the border style id, or -1 for an unknown window.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_GetBorderStyle(app: *const NativeApp, window: isize) -> i32 {
    unsafe { window_of(app, window) }.map_or(-1, |w| w.border_style() as i32)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_SetBorderStyle(app: *const NativeApp, window: isize, style: i32) -> i32 {
    status((|| {
        let style = BorderStyle::try_from(style)?;
        unsafe { window_of(app, window) }?.set_border_style(style)
    })())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_GetBounds(app: *const NativeApp, window: isize, out: *mut Rect) -> i32 {
    if out.is_null() {
        return FrameHostError::InvalidArgument("null output".into()).code();
    }
    status(unsafe { window_of(app, window) }.and_then(|w| w.bounds()).map(|bounds| unsafe {
        *out = bounds;
    }))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_SetTitle(app: *const NativeApp, window: isize, title: *const c_char) -> i32 {
    status((|| {
        let title = unsafe { utf8(title) }?.unwrap_or_default();
        unsafe { window_of(app, window) }?.set_title(title)
    })())
}

/// Returns the window state id, or -1 on failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_GetWindowState(app: *const NativeApp, window: isize) -> i32 {
    unsafe { window_of(app, window) }
        .and_then(|w| w.window_state())
        .map_or(-1, |state| state as i32)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Window_SetWindowState(app: *const NativeApp, window: isize, state: i32) -> i32 {
    status((|| {
        let state = WindowState::try_from(state)?;
        unsafe { window_of(app, window) }?.set_window_state(state)
    })())
}

/// Writes the overlay rectangle of edge id `edge` on a `width` x `height`
/// window to `out`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Frame_GetEdgeRect(width: i32, height: i32, edge: i32, out: *mut Rect) -> i32 {
    if out.is_null() {
        return FrameHostError::InvalidArgument("null output".into()).code();
    }
    status(edge_rect_for_id(Size::new(width, height), edge).map(|rect| unsafe {
        *out = rect;
    }))
}
