//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the harness window, and wires them to the
//! GPU layer and the [`App`](crate::core::App) callbacks.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
