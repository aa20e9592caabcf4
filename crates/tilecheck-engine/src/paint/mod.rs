//! Color representation shared by the presenter and renderers.

pub mod color;

pub use color::Color;
