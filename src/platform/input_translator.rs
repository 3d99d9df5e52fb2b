//=========================================================================
// Input Translator
//=========================================================================
//
// Turns Winit window events into engine `InputEvent`s.
//
// Architecture:
//   WindowEvent → InputTranslator::translate → InputBuffer
//
// Winit reports modifier changes as separate events, so the translator
// remembers the last state and stamps it on every key, button and wheel
// event that follows. One key press may yield several engine events: the
// physical `KeyDown` plus one `KeyTyped` per printable character.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use super::input_buffer::InputBuffer;
use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== Constants ===========================================================

/// Touchpad pixels that count as one wheel notch.
const PIXELS_PER_NOTCH: f64 = 40.0;

//=== InputTranslator =====================================================

pub(crate) struct InputTranslator {
    modifiers: Modifiers,
}

impl InputTranslator {
    pub(crate) fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
        }
    }

    #[cfg(test)]
    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Appends the engine events produced by `event` to `out`.
    ///
    /// Returns `false` for window events that are not input (resize,
    /// redraw, focus...), which the caller handles itself.
    pub(crate) fn translate(&mut self, event: &WindowEvent, out: &mut InputBuffer) -> bool {
        match event {
            WindowEvent::ModifiersChanged(state) => {
                self.modifiers = Modifiers::from(state.state());
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.key(event.physical_key, event.state, event.text.as_deref(), out);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                out.push(self.button(*button, *state));
            }
            WindowEvent::CursorMoved { position, .. } => {
                out.push(InputEvent::MouseMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::CursorEntered { .. } => out.push(InputEvent::MouseEntered),
            WindowEvent::CursorLeft { .. } => out.push(InputEvent::MouseLeft),
            WindowEvent::MouseWheel { delta, .. } => {
                out.push(InputEvent::MouseWheel {
                    rotation: wheel_rotation(*delta),
                    modifiers: self.modifiers,
                });
            }
            _ => return false,
        }
        true
    }

    //--- Keyboard ---------------------------------------------------------

    fn key(
        &self,
        key: PhysicalKey,
        state: ElementState,
        text: Option<&str>,
        out: &mut InputBuffer,
    ) {
        let modifiers = self.modifiers;

        if let PhysicalKey::Code(code) = key {
            let key = KeyCode::from(code);
            if key != KeyCode::Unidentified {
                out.push(match state {
                    ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
                    ElementState::Released => InputEvent::KeyUp { key, modifiers },
                });
            }
        }

        // Keys we don't map can still produce text
        if state == ElementState::Pressed {
            let printable = text.unwrap_or_default().chars().filter(|c| !c.is_control());
            for character in printable {
                out.push(InputEvent::KeyTyped {
                    character,
                    modifiers,
                });
            }
        }
    }

    //--- Mouse ------------------------------------------------------------

    fn button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let button = MouseButton::from(button);
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }
}

/// Wheel notches, positive towards the user.
fn wheel_rotation(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, lines) => -lines,
        MouseScrollDelta::PixelDelta(offset) => (-offset.y / PIXELS_PER_NOTCH) as f32,
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Engine and Winit share variant names for every key we map.
macro_rules! same_named_keys {
    ($($key:ident),* $(,)?) => {
        impl From<WinitKeyCode> for KeyCode {
            fn from(code: WinitKeyCode) -> Self {
                match code {
                    $(WinitKeyCode::$key => KeyCode::$key,)*
                    _ => KeyCode::Unidentified,
                }
            }
        }
    };
}

same_named_keys! {
    Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM,
    KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    ArrowDown, ArrowLeft, ArrowRight, ArrowUp,
    Space, Enter, Escape, Tab, Backspace, Delete,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => Self::Left,
            WinitMouseButton::Right => Self::Right,
            WinitMouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::keyboard::NativeKeyCode;

    fn translator_with(state: ModifiersState) -> InputTranslator {
        let mut translator = InputTranslator::new();
        let handled = translator.translate(
            &WindowEvent::ModifiersChanged(state.into()),
            &mut InputBuffer::new(),
        );
        assert!(handled);
        translator
    }

    fn key(
        translator: &InputTranslator,
        code: WinitKeyCode,
        state: ElementState,
        text: Option<&str>,
    ) -> Vec<InputEvent> {
        let mut out = InputBuffer::new();
        translator.key(PhysicalKey::Code(code), state, text, &mut out);
        out.drain().unwrap_or_default()
    }

    //=====================================================================
    // Modifiers
    //=====================================================================

    #[test]
    fn starts_without_modifiers() {
        assert!(InputTranslator::new().modifiers().is_empty());
    }

    #[test]
    fn modifier_state_is_sticky() {
        let translator = translator_with(ModifiersState::SHIFT | ModifiersState::ALT);

        let expected = Modifiers {
            shift: true,
            ctrl: false,
            alt: true,
        };
        assert_eq!(translator.modifiers(), expected);
        assert_eq!(
            translator.button(WinitMouseButton::Right, ElementState::Pressed),
            InputEvent::MouseButtonDown {
                button: MouseButton::Right,
                modifiers: expected,
            }
        );
    }

    //=====================================================================
    // Keyboard
    //=====================================================================

    #[test]
    fn press_yields_key_down_then_text() {
        let translator = translator_with(ModifiersState::SHIFT);

        let events = key(&translator, WinitKeyCode::KeyA, ElementState::Pressed, Some("A"));

        assert_eq!(
            events,
            vec![
                InputEvent::KeyDown { key: KeyCode::KeyA, modifiers: Modifiers::SHIFT },
                InputEvent::KeyTyped { character: 'A', modifiers: Modifiers::SHIFT },
            ]
        );
    }

    #[test]
    fn release_yields_no_text() {
        let translator = InputTranslator::new();

        let events = key(&translator, WinitKeyCode::KeyA, ElementState::Released, Some("a"));

        assert_eq!(
            events,
            vec![InputEvent::KeyUp { key: KeyCode::KeyA, modifiers: Modifiers::NONE }]
        );
    }

    #[test]
    fn control_characters_are_not_typed() {
        let translator = InputTranslator::new();

        let events = key(&translator, WinitKeyCode::Enter, ElementState::Pressed, Some("\r"));

        assert_eq!(
            events,
            vec![InputEvent::KeyDown { key: KeyCode::Enter, modifiers: Modifiers::NONE }]
        );
    }

    #[test]
    fn unmapped_key_still_types_text() {
        let translator = InputTranslator::new();
        let mut out = InputBuffer::new();

        translator.key(
            PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
            ElementState::Pressed,
            Some("é"),
            &mut out,
        );

        assert_eq!(
            out.drain(),
            Some(vec![InputEvent::KeyTyped { character: 'é', modifiers: Modifiers::NONE }])
        );
    }

    #[test]
    fn key_table_maps_known_and_rejects_others() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyW), KeyCode::KeyW);
        assert_eq!(KeyCode::from(WinitKeyCode::Digit7), KeyCode::Digit7);
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
    }

    //=====================================================================
    // Mouse
    //=====================================================================

    #[test]
    fn side_buttons_collapse_to_other() {
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::Middle);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
        assert_eq!(MouseButton::from(WinitMouseButton::Other(7)), MouseButton::Other);
    }

    #[test]
    fn wheel_lines_are_inverted() {
        assert_eq!(wheel_rotation(MouseScrollDelta::LineDelta(0.0, 1.0)), -1.0);
        assert_eq!(wheel_rotation(MouseScrollDelta::LineDelta(3.0, -2.0)), 2.0);
    }

    #[test]
    fn wheel_pixels_are_scaled_to_notches() {
        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -80.0));
        assert_eq!(wheel_rotation(delta), 2.0);
    }

    #[test]
    fn non_input_events_are_left_to_the_caller() {
        let mut translator = InputTranslator::new();
        let mut out = InputBuffer::new();

        assert!(!translator.translate(&WindowEvent::RedrawRequested, &mut out));
        assert!(!translator.translate(&WindowEvent::CloseRequested, &mut out));
        assert!(out.is_empty());
    }
}
