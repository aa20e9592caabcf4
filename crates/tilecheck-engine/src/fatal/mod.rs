//! Fail-fast error policy.
//!
//! Every failure converges here: it is classified into a status code, logged,
//! and the process exits with that status.

mod handler;
mod status;

pub use handler::{
    Assertion, FailureKind, GraphicsError, PlatformError, check, classify, fail,
    install_panic_hook, status_of, terminate,
};
pub use status::{HasStatus, Status};
