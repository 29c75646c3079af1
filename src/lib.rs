//! Native window shim for hosts that draw their own chrome.
//!
//! - Maps border styles onto native window styles and shadow margins
//! - Keeps eight invisible edge overlays around frameless windows so they can
//!   still be resized, handing pointer input to the OS resize loop
//! - Runs work from any thread on a window's own thread, synchronously
//! - Exposes the whole surface as a flat C ABI on Windows (`ffi`)

pub mod app;
pub mod constants;
pub mod error;
pub mod events;
pub mod frame;
pub mod geometry;
pub mod invoke;
pub mod options;
pub mod platform;
pub mod window;

#[cfg(windows)]
pub mod ffi;

use std::sync::Once;

use env_logger::{Builder, Env};

pub use app::App;
pub use error::{FrameHostError, Result};
pub use events::WindowEvents;
pub use frame::{EdgeInput, EdgeOverlayRegistry, EdgeResponse, FrameController};
pub use geometry::{Edge, Point, Rect, Size, edge_rect};
pub use invoke::{Dispatcher, Invoker};
pub use options::{AppOptions, StartupLocation, WindowOptions, WindowState};
pub use platform::{OverlayHandle, OverlayHost, WindowHandle, WindowHost};
pub use window::style::BorderStyle;
pub use window::{MessageResult, WindowController, WindowMessage};

#[cfg(windows)]
pub use platform::win32::Win32Backend;

// A host may create and destroy several apps from one process; the global
// logger can only be installed once.
static LOGGER_INIT: Once = Once::new();

/// Installs `env_logger`, honouring `RUST_LOG` and defaulting to
/// [`constants::DEFAULT_LOG_FILTER`]. Safe to call repeatedly.
pub fn init_logging() {
    LOGGER_INIT.call_once(|| {
        let _ = Builder::from_env(Env::default().default_filter_or(constants::DEFAULT_LOG_FILTER))
            .format_timestamp_millis()
            .try_init();
    });
}
