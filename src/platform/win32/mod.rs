//! Win32 backend: native top-level windows, `STATIC` edge overlays and DWM
//! shadow handling.
//!
//! Messages reach the core through two window procedures (see [`procs`]):
//! the class procedure of every top-level window, which decodes messages
//! into [`crate::window::WindowMessage`], and a subclass procedure on each
//! overlay, which turns button and cursor messages into
//! [`crate::frame::EdgeInput`].

mod procs;

use std::collections::HashSet;
use std::ffi::{OsStr, c_void};
use std::os::windows::ffi::OsStrExt;
use std::rc::Rc;

use anyhow::Context;
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Dwm::{DwmExtendFrameIntoClientArea, DwmIsCompositionEnabled};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Controls::MARGINS;
use windows::Win32::UI::Input::KeyboardAndMouse::ReleaseCapture;
use windows::Win32::UI::WindowsAndMessaging::{
    CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, CreateWindowExW, DestroyWindow, DispatchMessageW,
    GWL_STYLE, GWLP_USERDATA, GWLP_WNDPROC, GetCursorPos, GetMessageW, GetSystemMetrics,
    GetWindowLongPtrW, GetWindowRect, GetWindowTextLengthW, GetWindowTextW, HCURSOR, HWND_TOP,
    IDC_ARROW, IDC_SIZENESW, IDC_SIZENS, IDC_SIZENWSE, IDC_SIZEWE, IsIconic, IsWindowVisible,
    IsZoomed, LoadCursorW, MSG, PostMessageW, PostQuitMessage, RegisterClassExW, SM_CXPADDEDBORDER,
    SM_CXSCREEN, SM_CXSIZEFRAME, SM_CYSCREEN, SPI_GETWORKAREA, SW_HIDE, SW_MAXIMIZE, SW_MINIMIZE,
    SW_RESTORE, SW_SHOW, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER,
    SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS, SendMessageW, SetCursor, SetWindowLongPtrW, SetWindowPos,
    SetWindowTextW, ShowWindow, SystemParametersInfoW, TranslateMessage, WINDOW_EX_STYLE,
    WINDOW_STYLE, WM_CLOSE, WM_NCLBUTTONDOWN, WM_THEMECHANGED, WM_USER, WNDCLASSEXW, WS_CHILD,
    WS_CLIPCHILDREN, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_VISIBLE,
};
use windows::core::PCWSTR;

use crate::constants::INVOKE_MESSAGE_OFFSET;
use crate::error::{FrameHostError, Result};
use crate::geometry::Rect;
use crate::invoke::Waker;
use crate::options::{StartupLocation, WindowOptions, WindowState};
use crate::platform::{
    CursorHandle, CursorShape, HitTest, OverlayHandle, OverlayHost, WindowHandle, WindowHost,
};
use crate::window::WindowController;
use crate::window::style::{BorderStyle, FRAME_STYLE_MASK, FrameStyle, frame_style};

/// `SS_NOTIFY`: static controls only report clicks when this is set.
const SS_NOTIFY: u32 = 0x0000_0100;

/// Message posted to a window to drain its invoke queue.
pub(crate) const WM_INVOKE: u32 = WM_USER + INVOKE_MESSAGE_OFFSET;

static REGISTERED_CLASSES: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

pub(crate) type Win32Controller = WindowController<Win32Backend>;

pub struct Win32Backend {
    instance: HINSTANCE,
}

impl Win32Backend {
    pub fn new() -> Result<Self> {
        let module = unsafe { GetModuleHandleW(None) }.context("GetModuleHandleW")?;
        Ok(Self { instance: module.into() })
    }

    fn ensure_class(&self, class_name: &str) -> anyhow::Result<()> {
        let mut registered = REGISTERED_CLASSES.lock();
        if registered.contains(class_name) {
            return Ok(());
        }

        let wide = to_wide(class_name);
        let class = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(procs::window_proc),
            hInstance: self.instance,
            hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
            lpszClassName: PCWSTR(wide.as_ptr()),
            ..Default::default()
        };
        if unsafe { RegisterClassExW(&class) } == 0 {
            return Err(windows::core::Error::from_win32())
                .with_context(|| format!("RegisterClassExW({class_name})"));
        }

        registered.insert(class_name.to_string());
        info!("[Win32] window class {} registered", class_name);
        Ok(())
    }
}

pub(crate) fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut c_void)
}

fn overlay_hwnd(overlay: OverlayHandle) -> HWND {
    HWND(overlay.0 as *mut c_void)
}

pub(crate) fn rect_from(r: &RECT) -> Rect {
    Rect::new(r.left, r.top, r.right - r.left, r.bottom - r.top)
}

pub(crate) fn rect_to(r: Rect) -> RECT {
    RECT { left: r.x, top: r.y, right: r.right(), bottom: r.bottom() }
}

/// Null-terminated UTF-16 for Win32 APIs.
pub(crate) fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(Some(0)).collect()
}

impl OverlayHost for Win32Backend {
    fn window_bounds(&self, window: WindowHandle) -> Result<Rect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd(window), &mut rect) }.context("GetWindowRect")?;
        Ok(rect_from(&rect))
    }

    fn create_overlay(&self, parent: WindowHandle, rect: Rect) -> Result<OverlayHandle> {
        let overlay = unsafe {
            CreateWindowExW(
                WS_EX_TRANSPARENT,
                windows::core::w!("STATIC"),
                PCWSTR::null(),
                WS_CHILD | WS_VISIBLE | WINDOW_STYLE(SS_NOTIFY),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                Some(hwnd(parent)),
                None,
                Some(self.instance),
                None,
            )
        }
        .map_err(|e| FrameHostError::ResourceCreation {
            resource: "edge overlay".into(),
            reason: e.to_string(),
        })?;

        unsafe {
            let original = SetWindowLongPtrW(overlay, GWLP_WNDPROC, procs::overlay_proc as usize as isize);
            SetWindowLongPtrW(overlay, GWLP_USERDATA, original);
            // Above any content child the host adds later.
            if let Err(e) = SetWindowPos(
                overlay,
                Some(HWND_TOP),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            ) {
                warn!("[Win32] could not raise overlay {:?}: {}", overlay, e);
            }
        }
        Ok(OverlayHandle(overlay.0 as isize))
    }

    fn move_overlay(&self, overlay: OverlayHandle, rect: Rect) -> Result<()> {
        unsafe {
            SetWindowPos(
                overlay_hwnd(overlay),
                None,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        }
        .context("SetWindowPos(overlay)")?;
        Ok(())
    }

    fn destroy_overlay(&self, overlay: OverlayHandle) {
        // Overlays die with their parent; by then this fails harmlessly.
        if let Err(e) = unsafe { DestroyWindow(overlay_hwnd(overlay)) } {
            debug!("[Win32] DestroyWindow(overlay {:?}): {}", overlay, e);
        }
    }

    fn load_cursor(&self, shape: CursorShape) -> Result<CursorHandle> {
        let id = match shape {
            CursorShape::SizeNS => IDC_SIZENS,
            CursorShape::SizeWE => IDC_SIZEWE,
            CursorShape::SizeNWSE => IDC_SIZENWSE,
            CursorShape::SizeNESW => IDC_SIZENESW,
        };
        let cursor = unsafe { LoadCursorW(None, id) }.context("LoadCursorW")?;
        Ok(CursorHandle(cursor.0 as isize))
    }

    fn set_cursor(&self, cursor: CursorHandle) {
        unsafe {
            SetCursor(Some(HCURSOR(cursor.0 as *mut c_void)));
        }
    }

    fn begin_native_drag(&self, window: WindowHandle, hit: HitTest) {
        let mut cursor = POINT::default();
        unsafe {
            if let Err(e) = GetCursorPos(&mut cursor) {
                warn!("[Win32] GetCursorPos: {}", e);
            }
            let _ = ReleaseCapture();
            let packed = ((cursor.x & 0xFFFF) | ((cursor.y & 0xFFFF) << 16)) as isize;
            // Runs the OS's modal resize loop until the button is released.
            SendMessageW(
                hwnd(window),
                WM_NCLBUTTONDOWN,
                Some(WPARAM(hit.code() as usize)),
                Some(LPARAM(packed)),
            );
        }
    }
}

impl WindowHost for Win32Backend {
    fn create_window(&self, options: &WindowOptions) -> Result<WindowHandle> {
        self.ensure_class(&options.class_name)?;

        let class = to_wide(&options.class_name);
        let title = to_wide(&options.title);
        let ex_style = if options.topmost { WS_EX_TOPMOST } else { WINDOW_EX_STYLE::default() };
        let bits = frame_style(BorderStyle::Normal, false, options.caption_buttons()).bits;
        let (x, y) = match options.startup_location {
            StartupLocation::Default => (CW_USEDEFAULT, CW_USEDEFAULT),
            StartupLocation::CenterScreen | StartupLocation::Manual => {
                (options.location.x, options.location.y)
            }
        };

        let window = unsafe {
            CreateWindowExW(
                ex_style,
                PCWSTR(class.as_ptr()),
                PCWSTR(title.as_ptr()),
                WINDOW_STYLE(bits) | WS_CLIPCHILDREN,
                x,
                y,
                options.size.width,
                options.size.height,
                None,
                None,
                Some(self.instance),
                None,
            )
        }
        .map_err(|e| {
            error!("[Win32] CreateWindowExW failed: {}", e);
            FrameHostError::ResourceCreation { resource: "window".into(), reason: e.to_string() }
        })?;

        info!("[Win32] window {:?} created ({})", window, options.class_name);
        Ok(WindowHandle(window.0 as isize))
    }

    fn bind_window(&self, window: WindowHandle, controller: &Rc<Win32Controller>) {
        procs::bind(hwnd(window), controller);
    }

    fn destroy_window(&self, window: WindowHandle) {
        if let Err(e) = unsafe { DestroyWindow(hwnd(window)) } {
            warn!("[Win32] DestroyWindow({:?}): {}", window, e);
        }
    }

    fn show(&self, window: WindowHandle) {
        unsafe {
            let _ = ShowWindow(hwnd(window), SW_SHOW);
        }
    }

    fn hide(&self, window: WindowHandle) {
        unsafe {
            let _ = ShowWindow(hwnd(window), SW_HIDE);
        }
    }

    fn post_close(&self, window: WindowHandle) -> Result<()> {
        unsafe { PostMessageW(Some(hwnd(window)), WM_CLOSE, WPARAM(0), LPARAM(0)) }
            .context("PostMessageW(WM_CLOSE)")?;
        Ok(())
    }

    fn set_bounds(&self, window: WindowHandle, bounds: Rect) -> Result<()> {
        unsafe {
            SetWindowPos(
                hwnd(window),
                None,
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        }
        .context("SetWindowPos")?;
        Ok(())
    }

    fn title(&self, window: WindowHandle) -> Result<String> {
        let hwnd = hwnd(window);
        let len = unsafe { GetWindowTextLengthW(hwnd) };
        if len <= 0 {
            return Ok(String::new());
        }
        let mut buf = vec![0u16; len as usize + 1];
        let copied = unsafe { GetWindowTextW(hwnd, &mut buf) };
        Ok(String::from_utf16_lossy(&buf[..copied.max(0) as usize]))
    }

    fn set_title(&self, window: WindowHandle, title: &str) -> Result<()> {
        let wide = to_wide(title);
        unsafe { SetWindowTextW(hwnd(window), PCWSTR(wide.as_ptr())) }.context("SetWindowTextW")?;
        Ok(())
    }

    fn window_state(&self, window: WindowHandle) -> Result<WindowState> {
        let hwnd = hwnd(window);
        Ok(unsafe {
            if IsIconic(hwnd).as_bool() {
                WindowState::Minimized
            } else if IsZoomed(hwnd).as_bool() {
                WindowState::Maximized
            } else {
                WindowState::Normal
            }
        })
    }

    fn set_window_state(&self, window: WindowHandle, state: WindowState) -> Result<()> {
        let command = match state {
            WindowState::Normal => SW_RESTORE,
            WindowState::Minimized => SW_MINIMIZE,
            WindowState::Maximized => SW_MAXIMIZE,
        };
        unsafe {
            let _ = ShowWindow(hwnd(window), command);
        }
        Ok(())
    }

    fn style_bits(&self, window: WindowHandle) -> u32 {
        unsafe { GetWindowLongPtrW(hwnd(window), GWL_STYLE) as u32 }
    }

    fn apply_frame_style(&self, window: WindowHandle, style: &FrameStyle) -> Result<()> {
        let hwnd = hwnd(window);
        let current = self.style_bits(window);
        let bits = (current & !FRAME_STYLE_MASK) | style.bits;
        debug!("[Win32] {:?} style {:#010x} -> {:#010x}", hwnd, current, bits);

        unsafe {
            SetWindowLongPtrW(hwnd, GWL_STYLE, bits as i32 as isize);

            if let Some(m) = style.shadow {
                let margins = MARGINS {
                    cxLeftWidth: m.left,
                    cxRightWidth: m.right,
                    cyTopHeight: m.top,
                    cyBottomHeight: m.bottom,
                };
                if let Err(e) = DwmExtendFrameIntoClientArea(hwnd, &margins) {
                    warn!("[Win32] DwmExtendFrameIntoClientArea: {}", e);
                }
            }

            SetWindowPos(
                hwnd,
                None,
                0,
                0,
                0,
                0,
                SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
            )
            .context("SetWindowPos(SWP_FRAMECHANGED)")?;

            if IsWindowVisible(hwnd).as_bool() {
                let _ = ShowWindow(hwnd, SW_SHOW);
            }
        }
        Ok(())
    }

    fn composition_enabled(&self) -> bool {
        unsafe { DwmIsCompositionEnabled() }.map(|b| b.as_bool()).unwrap_or(false)
    }

    fn maximized_client_inset(&self, window: WindowHandle) -> Option<i32> {
        if !unsafe { IsZoomed(hwnd(window)) }.as_bool() {
            return None;
        }
        Some(unsafe { GetSystemMetrics(SM_CXSIZEFRAME) + GetSystemMetrics(SM_CXPADDEDBORDER) })
    }

    fn work_area(&self) -> Rect {
        let mut area = RECT::default();
        let found = unsafe {
            SystemParametersInfoW(
                SPI_GETWORKAREA,
                0,
                Some(&mut area as *mut RECT as *mut c_void),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
        };
        match found {
            Ok(()) => rect_from(&area),
            Err(e) => {
                warn!("[Win32] SPI_GETWORKAREA: {}; using the screen size", e);
                unsafe {
                    Rect::new(0, 0, GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN))
                }
            }
        }
    }

    fn notify_theme_changed(&self, window: WindowHandle) {
        unsafe {
            SendMessageW(hwnd(window), WM_THEMECHANGED, Some(WPARAM(0)), Some(LPARAM(0)));
        }
    }

    fn invoke_waker(&self, window: WindowHandle) -> Waker {
        let raw = window.0;
        std::sync::Arc::new(move || {
            let target = HWND(raw as *mut c_void);
            if let Err(e) = unsafe { PostMessageW(Some(target), WM_INVOKE, WPARAM(0), LPARAM(0)) } {
                warn!("[Win32] could not wake window {:#x}: {}", raw, e);
            }
        })
    }

    fn run_message_loop(&self) -> Result<()> {
        info!("[Win32] entering message loop");
        let mut msg = MSG::default();
        loop {
            let got = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            match got.0 {
                0 => break,
                -1 => {
                    return Err(FrameHostError::Platform(format!(
                        "GetMessageW: {}",
                        windows::core::Error::from_win32()
                    )));
                }
                _ => unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                },
            }
        }
        info!("[Win32] exited message loop");
        Ok(())
    }

    fn quit(&self) {
        unsafe { PostQuitMessage(0) };
    }
}
