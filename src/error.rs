//! Error types shared by the session and the platform backends.

use thiserror::Error;

/// A failed call into the windowing/input subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("failed to create the black brush: {0}")]
    BrushCreation(String),
    #[error("failed to register the overlay window class: {0}")]
    ClassRegistration(String),
    #[error("display enumeration failed: {0}")]
    DisplayEnumeration(String),
    #[error("failed to create overlay surface: {0}")]
    SurfaceCreation(String),
    #[error("failed to install keyboard hook: {0}")]
    HookInstall(String),
    #[error("pointer display counter stopped moving at {count}")]
    CursorStuck { count: i32 },
}

/// Reasons startup is abandoned. Every variant is reported after a full teardown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("no displays were found")]
    NoDisplays,

    #[error("none of the {displays} display(s) received an overlay")]
    NoSurfaces { displays: usize },

    /// Only raised under `CoveragePolicy::RequireAll`.
    #[error("only {created} of {displays} display(s) received an overlay")]
    PartialCoverage { created: usize, displays: usize },

    #[error("screen blanking is not available on {0}")]
    UnsupportedPlatform(&'static str),
}
