//! Error types for framehost operations.

use thiserror::Error;

use crate::platform::WindowHandle;

/// Every error the shim can report to its host.
#[derive(Error, Debug)]
pub enum FrameHostError {
    /// A native resource (window, overlay, cursor) could not be created.
    #[error("Failed to create {resource}: {reason}")]
    ResourceCreation { resource: String, reason: String },

    /// A caller passed a value outside the accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A blocking invoke was issued from the thread that must run it.
    #[error("Invoke called from the window's owning thread; this would deadlock")]
    ThreadingViolation,

    /// The owning thread's dispatcher has shut down.
    #[error("The window thread is no longer accepting invocations")]
    Disconnected,

    /// The invoked action panicked on the owning thread.
    #[error("Invoked action panicked: {0}")]
    ActionPanicked(String),

    #[error("Unknown window handle {0:?}")]
    UnknownWindow(WindowHandle),

    /// An OS call failed.
    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<anyhow::Error> for FrameHostError {
    fn from(e: anyhow::Error) -> Self {
        FrameHostError::Platform(format!("{e:#}"))
    }
}

impl FrameHostError {
    /// Stable status code reported across the C ABI. Zero means success.
    pub fn code(&self) -> i32 {
        match self {
            FrameHostError::InvalidArgument(_) => 1,
            FrameHostError::ResourceCreation { .. } => 2,
            FrameHostError::ThreadingViolation => 3,
            FrameHostError::Disconnected => 4,
            FrameHostError::ActionPanicked(_) => 5,
            FrameHostError::UnknownWindow(_) => 6,
            FrameHostError::Platform(_) => 7,
            FrameHostError::Config(_) => 8,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameHostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anyhow_context_is_preserved() {
        let err = anyhow::anyhow!("access denied").context("RegisterClassExW");
        let converted: FrameHostError = err.into();
        assert_eq!(
            converted.to_string(),
            "Platform error: RegisterClassExW: access denied"
        );
    }

    #[test]
    fn codes_are_distinct_and_non_zero() {
        let errors = [
            FrameHostError::InvalidArgument(String::new()),
            FrameHostError::ResourceCreation { resource: String::new(), reason: String::new() },
            FrameHostError::ThreadingViolation,
            FrameHostError::Disconnected,
            FrameHostError::ActionPanicked(String::new()),
            FrameHostError::UnknownWindow(WindowHandle(1)),
            FrameHostError::Platform(String::new()),
        ];
        let mut codes: Vec<_> = errors.iter().map(FrameHostError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|c| *c > 0));
    }

    #[test]
    fn config_errors_convert_from_serde() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(FrameHostError::from(err), FrameHostError::Config(_)));
    }
}
