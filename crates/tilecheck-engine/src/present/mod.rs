//! Frame presentation.
//!
//! Tracks whether the backbuffer binding is still valid for the current client
//! size and turns invalidated paints into one clear + quad draw + present.

mod presenter;
mod target;

pub use presenter::{FramePresenter, PaintOutcome};
pub use target::{TargetExtent, TargetState, paint_needed, resolve_resize};
