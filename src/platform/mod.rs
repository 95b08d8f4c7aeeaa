//! Windowing and input capabilities consumed by the session.
//!
//! The session never calls the OS directly; it drives a [`Platform`]. On
//! Windows this is [`win32::Win32Platform`]. [`mock::MockPlatform`] is always
//! compiled so tests on any host can script displays, failures and input.

use crate::display::Display;
use crate::dispatch::Dispatcher;
use crate::error::PlatformError;

pub mod mock;

#[cfg(windows)]
pub mod win32;

#[cfg(windows)]
pub use win32::Win32Platform as NativePlatform;

/// Opaque handle to the shared black paint resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrushHandle(pub isize);

/// Opaque handle to one overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub isize);

/// Opaque handle to the installed keyboard hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle(pub isize);

/// Everything the session needs from the windowing/input subsystem.
///
/// All methods are called from the one thread that later runs
/// [`Platform::run_event_loop`].
pub trait Platform {
    /// Adjusts the pointer display counter by one and returns the new value.
    /// The pointer is visible while the counter is `>= 0`.
    fn show_cursor(&mut self, show: bool) -> i32;

    fn create_black_brush(&mut self) -> Result<BrushHandle, PlatformError>;
    fn release_brush(&mut self, brush: BrushHandle);

    /// Registers the overlay surface class. Surfaces paint with `brush` and
    /// route their input through `dispatcher`.
    fn register_surface_class(
        &mut self,
        brush: BrushHandle,
        dispatcher: Dispatcher,
    ) -> Result<(), PlatformError>;
    fn unregister_surface_class(&mut self);

    /// Attached displays in platform order.
    fn enumerate_displays(&mut self) -> Result<Vec<Display>, PlatformError>;

    /// Creates a topmost, undecorated surface covering `display` and shows it.
    fn create_surface(&mut self, display: &Display) -> Result<SurfaceHandle, PlatformError>;
    fn destroy_surface(&mut self, surface: SurfaceHandle);

    /// Brings `surface` to the foreground and gives it keyboard focus.
    fn focus_surface(&mut self, surface: SurfaceHandle);

    /// Installs the system-wide keyboard hook routed through `dispatcher`.
    fn install_key_hook(&mut self, dispatcher: Dispatcher) -> Result<HookHandle, PlatformError>;
    fn remove_key_hook(&mut self, hook: HookHandle);

    /// Blocks dispatching events until a termination request is observed and
    /// returns the code it carried.
    fn run_event_loop(&mut self) -> i32;
}
