//! Custom resize frame for borderless windows.

pub mod controller;
pub mod input;
pub mod registry;

pub use controller::{FrameController, OverlayRegion};
pub use input::{EdgeInput, EdgeResponse};
pub use registry::{EdgeOverlayRegistry, FrameId, OverlayInfo, SharedRegistry};
