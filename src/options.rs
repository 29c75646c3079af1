//! Host-supplied configuration for the app and its windows.
//!
//! Hosts hand options over as JSON (camelCase keys); every field is optional
//! and falls back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CLASS_NAME, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_TITLE, DEFAULT_WINDOW_WIDTH,
    DEFAULT_WINDOW_X, DEFAULT_WINDOW_Y,
};
use crate::error::{FrameHostError, Result};
use crate::geometry::{Point, Size};
use crate::window::style::{BorderStyle, CaptionButtons};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum WindowState {
    #[default]
    Normal = 0,
    Minimized = 1,
    Maximized = 2,
}

impl TryFrom<i32> for WindowState {
    type Error = FrameHostError;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(WindowState::Normal),
            1 => Ok(WindowState::Minimized),
            2 => Ok(WindowState::Maximized),
            other => Err(FrameHostError::InvalidArgument(format!(
                "window state {other} is out of range"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartupLocation {
    /// Let the OS pick.
    #[default]
    Default,
    CenterScreen,
    /// Use [`WindowOptions::location`] verbatim.
    Manual,
}

/// Process-wide options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppOptions {
    /// Used to derive window class names, so two hosts in one process do not
    /// collide.
    pub app_id: String,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self { app_id: "framehost".to_string() }
    }
}

impl AppOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowOptions {
    /// Empty means "derive from the app id".
    pub class_name: String,
    pub title: String,
    pub size: Size,
    pub location: Point,
    pub startup_location: StartupLocation,
    pub border_style: BorderStyle,
    pub window_state: WindowState,
    pub minimize_enabled: bool,
    pub maximize_enabled: bool,
    pub topmost: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            class_name: String::new(),
            title: DEFAULT_WINDOW_TITLE.to_string(),
            size: Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            location: Point::new(DEFAULT_WINDOW_X, DEFAULT_WINDOW_Y),
            startup_location: StartupLocation::Default,
            border_style: BorderStyle::Normal,
            window_state: WindowState::Normal,
            minimize_enabled: true,
            maximize_enabled: true,
            topmost: false,
        }
    }
}

impl WindowOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: WindowOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.width <= 0 || self.size.height <= 0 {
            return Err(FrameHostError::InvalidArgument(format!(
                "window size {}x{} must be positive",
                self.size.width, self.size.height
            )));
        }
        Ok(())
    }

    pub fn caption_buttons(&self) -> CaptionButtons {
        CaptionButtons {
            minimize: self.minimize_enabled,
            maximize: self.maximize_enabled,
        }
    }

    /// Fills in the class name from `app` when the host left it empty.
    pub(crate) fn resolved_for(mut self, app: &AppOptions) -> Self {
        if self.class_name.is_empty() {
            self.class_name = if app.app_id.is_empty() {
                DEFAULT_CLASS_NAME.to_string()
            } else {
                format!("{}.{}", app.app_id, DEFAULT_CLASS_NAME)
            };
        }
        self
    }
}
