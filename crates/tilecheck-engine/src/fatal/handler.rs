use std::sync::Once;

use crate::image_loader::ImageLoadError;
use crate::tiled::TiledError;

use super::{HasStatus, Status};

/// Broad origin of a failure, used for diagnostics only.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FailureKind {
    /// Windowing / event loop / OS.
    Platform,
    /// Device, resource creation, tile mapping, presentation.
    Graphics,
    /// Image decoding.
    Image,
    /// Internal state violated.
    Assertion,
}

/// Internal consistency check that did not hold.
#[derive(Debug, thiserror::Error)]
#[error("assertion failed: {0}")]
pub struct Assertion(pub String);

impl HasStatus for Assertion {
    fn status(&self) -> Status {
        Status::ASSERTION_FAILURE
    }
}

/// OS or windowing failure.
#[derive(Debug, thiserror::Error)]
#[error("{what}: {message}")]
pub struct PlatformError {
    pub what: &'static str,
    pub message: String,
}

impl HasStatus for PlatformError {
    fn status(&self) -> Status {
        Status::E_FAIL
    }
}

/// Graphics failure outside the tiled-texture API (surface, presentation).
#[derive(Debug, thiserror::Error)]
#[error("{what}: {message}")]
pub struct GraphicsError {
    pub what: &'static str,
    pub message: String,
    pub status: Status,
}

impl HasStatus for GraphicsError {
    fn status(&self) -> Status {
        self.status
    }
}

/// Returns `Err(Assertion)` unless `cond` holds.
pub fn check(cond: bool, what: impl Into<String>) -> Result<(), Assertion> {
    if cond { Ok(()) } else { Err(Assertion(what.into())) }
}

/// Status and kind of the first error in the chain that knows its status.
///
/// Errors without one classify as `E_FAIL` graphics failures.
pub fn classify(err: &anyhow::Error) -> (FailureKind, Status) {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<TiledError>() {
            return (FailureKind::Graphics, e.status());
        }
        if let Some(e) = cause.downcast_ref::<GraphicsError>() {
            return (FailureKind::Graphics, e.status());
        }
        if let Some(e) = cause.downcast_ref::<ImageLoadError>() {
            return (FailureKind::Image, e.status());
        }
        if let Some(e) = cause.downcast_ref::<Assertion>() {
            return (FailureKind::Assertion, e.status());
        }
        if let Some(e) = cause.downcast_ref::<PlatformError>() {
            return (FailureKind::Platform, e.status());
        }
    }
    (FailureKind::Graphics, Status::E_FAIL)
}

pub fn status_of(err: &anyhow::Error) -> Status {
    classify(err).1
}

/// Terminates the process because of `err`.
///
/// Breaks into an attached debugger first. The exit code is the error's
/// status; a non-failure status is replaced by `E_UNEXPECTED`.
pub fn fail(err: anyhow::Error) -> ! {
    let (kind, status) = classify(&err);
    log::error!("fatal {kind:?} failure {status}: {err:#}");
    terminate(status)
}

/// Terminates the process with `status` without an error value.
pub fn terminate(status: Status) -> ! {
    let status = if status.is_failure() { status } else { Status::E_UNEXPECTED };
    break_into_debugger();
    log::logger().flush();
    std::process::exit(status.exit_code())
}

/// Routes panics (including wgpu's uncaptured device errors) into [`terminate`].
pub fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_hook(info);
            log::error!("fatal panic: {info}");
            terminate(Status::E_UNEXPECTED);
        }));
    });
}

#[cfg(unix)]
fn break_into_debugger() {
    if debugger_attached() {
        // SAFETY: raising a signal on the current thread has no memory-safety preconditions.
        unsafe {
            libc::raise(libc::SIGTRAP);
        }
    }
}

#[cfg(not(unix))]
fn break_into_debugger() {}

#[cfg(target_os = "linux")]
fn debugger_attached() -> bool {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| {
            status
                .lines()
                .find_map(|line| line.strip_prefix("TracerPid:"))
                .map(|pid| pid.trim() != "0")
        })
        .unwrap_or(false)
}

#[cfg(not(target_os = "linux"))]
fn debugger_attached() -> bool {
    false
}
