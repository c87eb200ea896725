pub mod handle;
pub mod toolkit;

use std::fmt;
use vfxwindow_core::WindowError;
use x11rb::errors::ReplyError;
use x11rb::protocol::ErrorKind;

/// Map a request failure into the session error type.
pub fn x11_error<E: fmt::Display>(operation: &'static str) -> impl FnOnce(E) -> WindowError {
    move |e| WindowError::toolkit(operation, e)
}

/// Like [`x11_error`], but a BadWindow/BadDrawable reply means the window is
/// already gone.
pub fn window_reply_error(operation: &'static str) -> impl FnOnce(ReplyError) -> WindowError {
    move |e| {
        if let ReplyError::X11Error(err) = &e {
            if matches!(err.error_kind, ErrorKind::Window | ErrorKind::Drawable) {
                return WindowError::StaleInstanceTeardown;
            }
        }
        WindowError::toolkit(operation, e)
    }
}
