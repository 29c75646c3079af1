//! Window procedures and the controller binding stored in `GWLP_USERDATA`.
//!
//! A bound top-level window holds one strong reference to its controller,
//! released on `WM_NCDESTROY`. Each message works on its own temporary clone
//! so the controller stays alive even if the message destroys the window.

use std::rc::Rc;

use log::{debug, trace};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CallWindowProcW, DefWindowProcW, GWLP_USERDATA, GetParent, GetWindowLongPtrW,
    NCCALCSIZE_PARAMS, SetWindowLongPtrW, WA_INACTIVE, WM_ACTIVATE, WM_CLOSE, WM_DESTROY,
    WM_DWMCOMPOSITIONCHANGED, WM_ENTERSIZEMOVE, WM_EXITSIZEMOVE, WM_LBUTTONDOWN, WM_MOVE,
    WM_NCCALCSIZE, WM_NCDESTROY, WM_SETCURSOR, WM_SETTINGCHANGE, WM_SIZE, WM_THEMECHANGED, WNDPROC,
};
use windows::core::PCWSTR;

use super::{WM_INVOKE, Win32Controller, rect_from, rect_to};
use crate::frame::{EdgeInput, EdgeResponse};
use crate::platform::OverlayHandle;
use crate::window::{MessageResult, WindowMessage};

pub(super) fn bind(hwnd: HWND, controller: &Rc<Win32Controller>) {
    let raw = Rc::into_raw(Rc::clone(controller));
    let previous = unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, raw as isize) };
    if previous != 0 {
        // Rebinding; drop the reference the old binding held.
        unsafe { drop(Rc::from_raw(previous as *const Win32Controller)) };
    }
    debug!("[Win32] {:?} bound", hwnd);
}

fn release(hwnd: HWND) {
    let raw = unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) } as *const Win32Controller;
    if !raw.is_null() {
        unsafe { drop(Rc::from_raw(raw)) };
        debug!("[Win32] {:?} released", hwnd);
    }
}

/// Temporary strong reference to the controller bound to `hwnd`.
fn controller_of(hwnd: HWND) -> Option<Rc<Win32Controller>> {
    let raw = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *const Win32Controller;
    if raw.is_null() {
        return None;
    }
    unsafe {
        Rc::increment_strong_count(raw);
        Some(Rc::from_raw(raw))
    }
}

fn decode(msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<WindowMessage> {
    Some(match msg {
        WM_ACTIVATE => WindowMessage::Activate {
            active: (wparam.0 & 0xFFFF) as u32 != WA_INACTIVE,
        },
        WM_SIZE => WindowMessage::Size,
        WM_MOVE => WindowMessage::Move,
        WM_ENTERSIZEMOVE => WindowMessage::EnterSizeMove,
        WM_EXITSIZEMOVE => WindowMessage::ExitSizeMove,
        WM_CLOSE => WindowMessage::Close,
        WM_DESTROY => WindowMessage::Destroy,
        // With wparam == 0 lparam is a bare RECT and the default is fine.
        WM_NCCALCSIZE if wparam.0 != 0 => {
            let params = unsafe { (lparam.0 as *const NCCALCSIZE_PARAMS).as_ref() }?;
            WindowMessage::NcCalcSize { proposed: rect_from(&params.rgrc[0]) }
        }
        WM_SETTINGCHANGE => WindowMessage::SettingChange {
            color_scheme: is_color_scheme_change(lparam),
        },
        WM_THEMECHANGED | WM_DWMCOMPOSITIONCHANGED => WindowMessage::ThemeChanged,
        WM_INVOKE => WindowMessage::Invoke,
        _ => return None,
    })
}

fn is_color_scheme_change(lparam: LPARAM) -> bool {
    let text = lparam.0 as *const u16;
    !text.is_null() && unsafe { PCWSTR(text).to_string() }.is_ok_and(|s| s == "ImmersiveColorSet")
}

pub(super) unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_NCDESTROY {
        release(hwnd);
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }

    let (Some(controller), Some(message)) = (controller_of(hwnd), decode(msg, wparam, lparam)) else {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    };

    trace!("[Win32] {:?} {:?}", hwnd, message);
    match controller.handle_message(message) {
        MessageResult::Default => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
        MessageResult::Handled(value) => LRESULT(value),
        MessageResult::ClientArea(area) => {
            if let Some(params) = unsafe { (lparam.0 as *mut NCCALCSIZE_PARAMS).as_mut() } {
                params.rgrc[0] = rect_to(area);
            }
            LRESULT(0)
        }
    }
}

/// Subclass procedure of every edge overlay. The overlay's own `STATIC`
/// procedure is kept in its `GWLP_USERDATA`.
pub(super) unsafe extern "system" fn overlay_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let input = match msg {
        WM_LBUTTONDOWN => EdgeInput::PrimaryButtonDown,
        WM_SETCURSOR => EdgeInput::CursorQuery,
        _ => EdgeInput::Other,
    };

    if input != EdgeInput::Other {
        let owner = unsafe { GetParent(hwnd) }.ok().and_then(controller_of);
        if let Some(controller) = owner {
            match controller.handle_edge_input(OverlayHandle(hwnd.0 as isize), input) {
                EdgeResponse::BeginResize { .. } => return LRESULT(0),
                EdgeResponse::SetCursor(_) => return LRESULT(1),
                EdgeResponse::PassThrough => {}
            }
        }
    }

    let original = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) };
    if original == 0 {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }
    let original: WNDPROC = unsafe { std::mem::transmute::<isize, WNDPROC>(original) };
    unsafe { CallWindowProcW(original, hwnd, msg, wparam, lparam) }
}
