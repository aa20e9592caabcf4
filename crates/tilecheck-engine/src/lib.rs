//! tilecheck engine crate.
//!
//! Platform, GPU and tiled-resource pieces of the tiled texture harness. The
//! `tilecheck` binary wires them to mouse input.

pub mod config;
pub mod core;
pub mod device;
pub mod fatal;
pub mod image_loader;
pub mod input;
pub mod logging;
pub mod paint;
pub mod pixels;
pub mod present;
pub mod render;
pub mod scene;
pub mod tiled;
pub mod window;
