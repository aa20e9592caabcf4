use std::collections::HashSet;

use super::types::{
    InputEvent,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state of the window.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in physical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies `ev` and returns the button event to dispatch, if any.
    ///
    /// Presses of a button that is already held (and releases of one that is
    /// not) are dropped.
    pub fn apply_event(&mut self, ev: InputEvent) -> Option<PointerButtonEvent> {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = m;
                None
            }

            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Avoids stuck buttons when focus changes mid-press.
                    self.buttons_down.clear();
                }
                None
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((x, y));
                None
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
                None
            }

            InputEvent::PointerButton(event) => {
                self.modifiers = event.modifiers;

                let changed = match event.state {
                    MouseButtonState::Pressed => self.buttons_down.insert(event.button),
                    MouseButtonState::Released => self.buttons_down.remove(&event.button),
                };
                changed.then_some(event)
            }
        }
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(button: MouseButton, state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state,
            x: 10.0,
            y: 20.0,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn press_and_release_are_dispatched_once() {
        let mut state = InputState::default();
        let pressed = state.apply_event(button(MouseButton::Left, MouseButtonState::Pressed));
        assert!(pressed.is_some_and(|e| e.is_press()));
        assert!(state.button_down(MouseButton::Left));

        assert!(state
            .apply_event(button(MouseButton::Left, MouseButtonState::Pressed))
            .is_none());

        let released = state.apply_event(button(MouseButton::Left, MouseButtonState::Released));
        assert!(released.is_some_and(|e| !e.is_press()));
        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn focus_loss_releases_held_buttons() {
        let mut state = InputState::default();
        state.apply_event(button(MouseButton::Right, MouseButtonState::Pressed));
        state.apply_event(InputEvent::Focused(false));
        assert!(!state.button_down(MouseButton::Right));

        // a fresh press after refocus is dispatched again
        state.apply_event(InputEvent::Focused(true));
        assert!(state
            .apply_event(button(MouseButton::Right, MouseButtonState::Pressed))
            .is_some());
    }
}
