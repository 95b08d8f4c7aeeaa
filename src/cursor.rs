// Pointer suppression.
//
// Win32 keeps a per-thread display counter: ShowCursor(FALSE) decrements,
// ShowCursor(TRUE) increments, and the pointer is drawn while it is >= 0. A
// single call is not enough when something else already bumped the counter,
// so both directions loop until the counter crosses zero.

use tracing::debug;

use crate::error::PlatformError;
use crate::platform::Platform;

/// Decrement until hidden. Returns the final counter value.
///
/// Fails only if a call leaves the counter where it was, which would
/// otherwise loop forever.
pub fn ensure_hidden<P: Platform + ?Sized>(platform: &mut P) -> Result<i32, PlatformError> {
    let mut count = platform.show_cursor(false);
    while count >= 0 {
        let next = platform.show_cursor(false);
        if next >= count {
            return Err(PlatformError::CursorStuck { count: next });
        }
        count = next;
    }
    debug!(count, "cursor hidden");
    Ok(count)
}

/// Increment until visible. Returns the final counter value.
pub fn ensure_shown<P: Platform + ?Sized>(platform: &mut P) -> Result<i32, PlatformError> {
    let mut count = platform.show_cursor(true);
    while count < 0 {
        let next = platform.show_cursor(true);
        if next <= count {
            return Err(PlatformError::CursorStuck { count: next });
        }
        count = next;
    }
    debug!(count, "cursor shown");
    Ok(count)
}
