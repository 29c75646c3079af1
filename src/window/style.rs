//! Border styles and the native style bits each one maps to.

use serde::{Deserialize, Serialize};

use crate::error::FrameHostError;

pub const WS_OVERLAPPED: u32 = 0x0000_0000;
pub const WS_POPUP: u32 = 0x8000_0000;
pub const WS_CAPTION: u32 = 0x00C0_0000;
pub const WS_SYSMENU: u32 = 0x0008_0000;
pub const WS_THICKFRAME: u32 = 0x0004_0000;
pub const WS_MINIMIZEBOX: u32 = 0x0002_0000;
pub const WS_MAXIMIZEBOX: u32 = 0x0001_0000;
pub const WS_OVERLAPPEDWINDOW: u32 =
    WS_OVERLAPPED | WS_CAPTION | WS_SYSMENU | WS_THICKFRAME | WS_MINIMIZEBOX | WS_MAXIMIZEBOX;

/// The bits a border style owns; everything else on the window (visibility,
/// clipping) is left alone when a style is applied.
pub const FRAME_STYLE_MASK: u32 = WS_POPUP | WS_OVERLAPPEDWINDOW;

/// Borderless bits while DWM composition is on. `WS_CAPTION` keeps the
/// shadow and snap animations; the caption itself is removed in
/// `WM_NCCALCSIZE`.
const AERO_BORDERLESS: u32 =
    WS_POPUP | WS_THICKFRAME | WS_CAPTION | WS_SYSMENU | WS_MAXIMIZEBOX | WS_MINIMIZEBOX;

const BASIC_BORDERLESS: u32 = WS_POPUP | WS_THICKFRAME | WS_SYSMENU | WS_MAXIMIZEBOX | WS_MINIMIZEBOX;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum BorderStyle {
    #[default]
    Normal = 0,
    Borderless = 1,
    Fixed = 2,
    FixedNoCaption = 3,
    SizableNoCaption = 4,
    None = 5,
}

impl BorderStyle {
    /// Styles whose resize affordances come from edge overlays instead of the
    /// OS frame.
    pub fn has_overlay_frame(self) -> bool {
        matches!(self, BorderStyle::Borderless | BorderStyle::SizableNoCaption)
    }

    /// Styles whose client area must cover the OS caption and frame insets.
    pub fn suppresses_non_client(self) -> bool {
        matches!(
            self,
            BorderStyle::Borderless | BorderStyle::SizableNoCaption | BorderStyle::FixedNoCaption
        )
    }
}

impl TryFrom<i32> for BorderStyle {
    type Error = FrameHostError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => BorderStyle::Normal,
            1 => BorderStyle::Borderless,
            2 => BorderStyle::Fixed,
            3 => BorderStyle::FixedNoCaption,
            4 => BorderStyle::SizableNoCaption,
            5 => BorderStyle::None,
            other => {
                return Err(FrameHostError::InvalidArgument(format!(
                    "border style {other} is out of range"
                )));
            }
        })
    }
}

/// DWM frame margins, matching `MARGINS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Margins {
    pub const fn uniform(v: i32) -> Self {
        Self { left: v, right: v, top: v, bottom: v }
    }
}

/// Which caption buttons the host allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionButtons {
    pub minimize: bool,
    pub maximize: bool,
}

impl Default for CaptionButtons {
    fn default() -> Self {
        Self { minimize: true, maximize: true }
    }
}

/// Everything the style-application collaborator needs for one style change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStyle {
    pub bits: u32,
    /// `None` when composition is off and no shadow can be drawn.
    pub shadow: Option<Margins>,
}

pub fn frame_style(style: BorderStyle, composition: bool, buttons: CaptionButtons) -> FrameStyle {
    let borderless = if composition { AERO_BORDERLESS } else { BASIC_BORDERLESS };

    let mut bits = match style {
        BorderStyle::Normal => WS_OVERLAPPEDWINDOW,
        BorderStyle::Fixed => WS_OVERLAPPEDWINDOW & !(WS_THICKFRAME | WS_MAXIMIZEBOX),
        BorderStyle::Borderless | BorderStyle::SizableNoCaption => borderless,
        BorderStyle::FixedNoCaption => borderless & !(WS_THICKFRAME | WS_MAXIMIZEBOX),
        BorderStyle::None => WS_POPUP,
    };
    if !buttons.minimize {
        bits &= !WS_MINIMIZEBOX;
    }
    if !buttons.maximize {
        bits &= !WS_MAXIMIZEBOX;
    }

    let shadow = composition.then(|| {
        if style.suppresses_non_client() {
            Margins::uniform(1)
        } else {
            Margins::uniform(0)
        }
    });

    FrameStyle { bits, shadow }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_is_overlapped_window() {
        let s = frame_style(BorderStyle::Normal, true, CaptionButtons::default());
        assert_eq!(s.bits, WS_OVERLAPPEDWINDOW);
        assert_eq!(s.shadow, Some(Margins::uniform(0)));
    }

    #[test]
    fn borderless_depends_on_composition() {
        let aero = frame_style(BorderStyle::Borderless, true, CaptionButtons::default());
        let basic = frame_style(BorderStyle::Borderless, false, CaptionButtons::default());
        assert_ne!(aero.bits & WS_CAPTION, 0);
        assert_eq!(basic.bits & WS_CAPTION, 0);
        assert_ne!(basic.bits & WS_THICKFRAME, 0);
        assert_eq!(aero.shadow, Some(Margins::uniform(1)));
        assert_eq!(basic.shadow, None);
    }

    #[test]
    fn fixed_styles_cannot_resize() {
        for style in [BorderStyle::Fixed, BorderStyle::FixedNoCaption] {
            let s = frame_style(style, true, CaptionButtons::default());
            assert_eq!(s.bits & (WS_THICKFRAME | WS_MAXIMIZEBOX), 0, "{style:?}");
        }
    }

    #[test]
    fn disabled_buttons_are_stripped() {
        let buttons = CaptionButtons { minimize: false, maximize: false };
        let s = frame_style(BorderStyle::Normal, true, buttons);
        assert_eq!(s.bits & (WS_MINIMIZEBOX | WS_MAXIMIZEBOX), 0);
    }

    #[test]
    fn only_sizable_captionless_styles_get_overlays() {
        let with: Vec<_> = [
            BorderStyle::Normal,
            BorderStyle::Borderless,
            BorderStyle::Fixed,
            BorderStyle::FixedNoCaption,
            BorderStyle::SizableNoCaption,
            BorderStyle::None,
        ]
        .into_iter()
        .filter(|s| s.has_overlay_frame())
        .collect();
        assert_eq!(with, vec![BorderStyle::Borderless, BorderStyle::SizableNoCaption]);
    }

    #[test]
    fn style_ids_reject_out_of_range() {
        assert_eq!(BorderStyle::try_from(1).unwrap(), BorderStyle::Borderless);
        assert!(BorderStyle::try_from(6).is_err());
    }
}
