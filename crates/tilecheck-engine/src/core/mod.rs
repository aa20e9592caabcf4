//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the harness application: the callbacks the runtime drives and the context
//! handed to each of them.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::HarnessCtx;
