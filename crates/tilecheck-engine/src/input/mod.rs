//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates window system events into `InputEvent`s.

mod state;
mod translate;
mod types;

pub use state::InputState;
pub(crate) use translate::translate_window_event;
pub use types::{
    InputEvent,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};
