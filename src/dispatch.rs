//! Event handlers for overlay surfaces and the global keyboard hook.
//!
//! Backends translate raw OS messages into [`SurfaceEvent`] / [`KeyEvent`],
//! ask the [`Dispatcher`] what to do, and carry out the returned action. The
//! handlers themselves never touch the OS, so the whole input policy is
//! testable without a window.

use crate::keys::VirtualKey;

/// Win32 `SC_CLOSE`. The low four bits of a system command are reserved.
pub const SC_CLOSE: usize = 0xF060;
const SYSCOMMAND_MASK: usize = 0xFFF0;

/// A message delivered to one overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Paint,
    EraseBackground,
    SetCursor,
    KeyDown(VirtualKey),
    SysCommand(usize),
    Other,
}

/// What the backend must do in response to a [`SurfaceEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAction {
    /// Fill the invalid region with the shared black brush.
    FillBlack,
    /// Report the erase as done without drawing anything.
    SkipErase,
    /// Clear the cursor shape and report the query as handled.
    HideCursor,
    /// Request process termination and report the key as handled.
    Terminate,
    /// Report the message as handled and do nothing.
    Swallow,
    /// Hand the message to the platform's default handler.
    Default,
}

/// Key transition as seen by the low-level keyboard hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Down,
    /// Key-down while Alt is held (or F10), reported separately by Win32.
    SysDown,
    Up,
    SysUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: VirtualKey,
    pub transition: KeyTransition,
}

impl KeyEvent {
    pub fn is_down(&self) -> bool {
        matches!(self.transition, KeyTransition::Down | KeyTransition::SysDown)
    }
}

/// Verdict of the global key hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVerdict {
    /// Request termination and do not forward the event.
    ConsumeAndTerminate,
    /// Forward the event to the next hook untouched.
    PassThrough,
}

/// Input policy shared by every surface and the key hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatcher {
    pub exit_key: VirtualKey,
}

impl Dispatcher {
    pub fn new(exit_key: VirtualKey) -> Self {
        Self { exit_key }
    }

    pub fn on_surface_event(&self, event: SurfaceEvent) -> SurfaceAction {
        match event {
            SurfaceEvent::Paint => SurfaceAction::FillBlack,
            SurfaceEvent::EraseBackground => SurfaceAction::SkipErase,
            SurfaceEvent::SetCursor => SurfaceAction::HideCursor,
            SurfaceEvent::KeyDown(key) if key == self.exit_key => SurfaceAction::Terminate,
            SurfaceEvent::SysCommand(cmd) if cmd & SYSCOMMAND_MASK == SC_CLOSE => {
                SurfaceAction::Swallow
            }
            _ => SurfaceAction::Default,
        }
    }

    /// Runs inside the hook callback: must stay allocation-free and non-blocking.
    pub fn on_global_key(&self, event: KeyEvent) -> KeyVerdict {
        if event.is_down() && event.key == self.exit_key {
            KeyVerdict::ConsumeAndTerminate
        } else {
            KeyVerdict::PassThrough
        }
    }
}

/// Lifecycle of one overlay surface. No dispatcher action leaves
/// `VisibleBlocking`; only teardown destroys a surface. There is no
/// minimise/restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    #[default]
    VisibleBlocking,
    Destroyed,
}
