use std::fmt;

use winit::dpi::PhysicalSize;

use crate::fatal::{Assertion, check};

/// Size of a bound render target in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TargetExtent {
    pub width: u32,
    pub height: u32,
}

impl TargetExtent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for TargetExtent {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl From<PhysicalSize<u32>> for TargetExtent {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

impl fmt::Display for TargetExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Render target binding as seen by the presenter.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TargetState {
    /// No binding for the current client size; the next paint rebinds.
    #[default]
    Stale,
    /// Bound to a backbuffer of this extent.
    Valid(TargetExtent),
}

impl TargetState {
    pub fn is_stale(&self) -> bool {
        matches!(self, TargetState::Stale)
    }

    pub fn extent(&self) -> Option<TargetExtent> {
        match self {
            TargetState::Stale => None,
            TargetState::Valid(extent) => Some(*extent),
        }
    }

    /// Drops the binding. Called before the surface is reconfigured.
    pub fn release(&mut self) {
        *self = TargetState::Stale;
    }

    /// Binds an acquired backbuffer of extent `acquired`.
    ///
    /// A stale target becomes valid only when `acquired` matches the size the
    /// surface was configured with; a valid target keeps its extent.
    pub fn bind(
        &mut self,
        acquired: TargetExtent,
        configured: TargetExtent,
    ) -> Result<TargetExtent, Assertion> {
        if let TargetState::Valid(extent) = *self {
            return Ok(extent);
        }
        check(
            acquired == configured,
            format!("backbuffer is {acquired}, client area is {configured}"),
        )?;
        *self = TargetState::Valid(acquired);
        Ok(acquired)
    }
}

/// Size to configure the surface with after a resize to `requested`.
///
/// A zero-sized request means "use the window's current size". Returns `None`
/// while both are empty (minimised window); configuration is then deferred.
pub fn resolve_resize(
    requested: PhysicalSize<u32>,
    window: PhysicalSize<u32>,
) -> Option<PhysicalSize<u32>> {
    let empty = |s: PhysicalSize<u32>| s.width == 0 || s.height == 0;
    if !empty(requested) {
        Some(requested)
    } else if !empty(window) {
        Some(window)
    } else {
        None
    }
}

/// Whether a redraw has to produce a frame.
///
/// A redraw delivered by the window system means part of the window is
/// damaged. Redraws the harness requested itself are merged into one pending
/// invalidation.
pub fn paint_needed(app_invalidated: bool, os_redraw: bool) -> bool {
    app_invalidated || os_redraw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fatal::{HasStatus, Status};

    #[test]
    fn resize_then_paint_rebinds_at_new_size() {
        let mut state = TargetState::default();
        let initial = TargetExtent::new(600, 600);
        assert_eq!(state.bind(initial, initial).unwrap(), initial);
        assert_eq!(state, TargetState::Valid(initial));

        // resize: binding dropped before the surface is reconfigured
        state.release();
        assert!(state.is_stale());

        let resized = TargetExtent::new(800, 450);
        let bound = state.bind(resized, resized).unwrap();
        assert_eq!(bound, resized);
        assert_eq!(state.extent(), Some(resized));
    }

    #[test]
    fn valid_target_is_reused_until_released() {
        let mut state = TargetState::Valid(TargetExtent::new(600, 600));
        let bound = state
            .bind(TargetExtent::new(600, 600), TargetExtent::new(600, 600))
            .unwrap();
        assert_eq!(bound, TargetExtent::new(600, 600));
    }

    #[test]
    fn mismatched_backbuffer_is_an_assertion() {
        let mut state = TargetState::Stale;
        let err = state
            .bind(TargetExtent::new(640, 480), TargetExtent::new(800, 450))
            .unwrap_err();
        assert_eq!(err.status(), Status::ASSERTION_FAILURE);
        assert!(state.is_stale());
    }

    #[test]
    fn damaged_window_is_repainted_without_app_invalidation() {
        assert!(paint_needed(false, true));
        assert!(paint_needed(true, true));
        assert!(paint_needed(true, false));
        assert!(!paint_needed(false, false));
    }

    #[test]
    fn zero_resize_falls_back_to_window_size() {
        let zero = PhysicalSize::new(0, 0);
        let window = PhysicalSize::new(800, 450);
        assert_eq!(resolve_resize(zero, window), Some(window));
        assert_eq!(
            resolve_resize(PhysicalSize::new(320, 200), window),
            Some(PhysicalSize::new(320, 200))
        );
        assert_eq!(resolve_resize(zero, zero), None);
        assert_eq!(resolve_resize(PhysicalSize::new(0, 450), PhysicalSize::new(800, 0)), None);
    }
}
