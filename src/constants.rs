/// Thickness, in pixels, of every invisible resize overlay around a frameless window.
pub const EDGE_THICKNESS: i32 = 8;

/// Number of overlays a frame owns while attached, one per [`crate::Edge`].
pub const EDGE_COUNT: usize = 8;

/// The Win32 window class name used when the host does not supply one.
pub const DEFAULT_CLASS_NAME: &str = "FRAMEHOST_WINDOW";

/// Default width (in pixels) for a newly spawned window.
pub const DEFAULT_WINDOW_WIDTH: i32 = 1280;

/// Default height (in pixels) for a newly spawned window.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 720;

/// Default screen position of a newly spawned window.
pub const DEFAULT_WINDOW_X: i32 = 100;
pub const DEFAULT_WINDOW_Y: i32 = 100;

/// Title text for windows created without one.
pub const DEFAULT_WINDOW_TITLE: &str = "framehost";

/// Offset from `WM_USER` of the message that tells a window thread to drain
/// its invocation queue.
pub const INVOKE_MESSAGE_OFFSET: u32 = 0x0002;

/// Default `env_logger` filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";
