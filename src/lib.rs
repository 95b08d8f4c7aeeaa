//! Blanks every attached display with a black, topmost overlay and hides the
//! pointer until the exit key (Escape by default) is pressed.
//!
//! The program flow lives in [`session`]; everything OS-specific is behind the
//! [`platform::Platform`] trait.

pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod keys;
pub mod overlay;
pub mod platform;
pub mod session;
