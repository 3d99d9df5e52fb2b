//=========================================================================
// Input Manager
//
// Routes normalized `InputEvent` data from the platform into typed event
// groups, and keeps the pressed/pointer state needed to derive events the
// OS does not report directly.
//
// Responsibilities:
// - Re-emit keys as Press / Release / Type
// - Re-emit pointer input as Move / Drag / ButtonDown / ButtonUp /
//   Click / Enter / Exit, and the wheel as Scroll
// - Synthesize Click (press + release without motion) and Drag (motion
//   while a button is held)
// - Answer state queries (`is_key_pressed`, `pointer_position`, ...)
//
// Dispatch happens on the game-loop thread at the start of each frame.
// State is updated under a lock which is released before subscribers
// run, so handlers may query the manager freely.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::Vec2;
use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};
use super::types::{
    KeyEvent, KeyInputType, MouseEvent, MouseInputType, MouseWheelInputType, WheelEvent,
};
use crate::core::event::EventGroup;

//=== DeviceState =========================================================
//
// Pressed keys/buttons and the pointer, as of the last dispatched event.
//
#[derive(Debug, Default)]
struct DeviceState {
    keys: HashSet<KeyCode>,
    buttons: Vec<MouseButton>,
    pointer: Vec2,
    inside: bool,
    moved_since_press: bool,
    modifiers: Modifiers,
}

impl DeviceState {
    fn mouse_event(&self, button: Option<MouseButton>) -> MouseEvent {
        MouseEvent {
            position: self.pointer,
            button,
            modifiers: self.modifiers,
        }
    }
}

//=== InputManager ========================================================

/// Typed input router.
///
/// # Examples
///
/// ```
/// use odyssey_engine::core::input::{
///     InputEvent, InputManager, KeyCode, KeyInputType, Modifiers,
/// };
///
/// let input = InputManager::new();
/// input.on_keyboard_event().subscribe(KeyInputType::Press, |event| {
///     println!("pressed {:?}", event.key);
/// });
///
/// input.dispatch(&InputEvent::KeyDown { key: KeyCode::Space, modifiers: Modifiers::NONE });
/// assert!(input.is_key_pressed(KeyCode::Space));
/// ```
pub struct InputManager {
    keyboard: EventGroup<KeyInputType, KeyEvent>,
    mouse: EventGroup<MouseInputType, MouseEvent>,
    wheel: EventGroup<MouseWheelInputType, WheelEvent>,
    state: Mutex<DeviceState>,
}

impl InputManager {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            keyboard: EventGroup::new(),
            mouse: EventGroup::new(),
            wheel: EventGroup::new(),
            state: Mutex::new(DeviceState::default()),
        }
    }

    //--- Event Groups -----------------------------------------------------

    pub fn on_keyboard_event(&self) -> &EventGroup<KeyInputType, KeyEvent> {
        &self.keyboard
    }

    pub fn on_mouse_event(&self) -> &EventGroup<MouseInputType, MouseEvent> {
        &self.mouse
    }

    pub fn on_mouse_wheel_event(&self) -> &EventGroup<MouseWheelInputType, WheelEvent> {
        &self.wheel
    }

    //--- Dispatch ---------------------------------------------------------

    pub fn dispatch_all(&self, events: &[InputEvent]) {
        for event in events {
            self.dispatch(event);
        }
    }

    /// Updates device state from `event` and emits the derived typed events.
    pub fn dispatch(&self, event: &InputEvent) {
        trace!("Dispatching {:?}", event);

        match *event {
            InputEvent::KeyDown { key, modifiers } => {
                {
                    let mut state = self.lock();
                    state.modifiers = modifiers;
                    state.keys.insert(key);
                }
                self.emit_key(KeyInputType::Press, key, None, modifiers);
            }

            InputEvent::KeyUp { key, modifiers } => {
                {
                    let mut state = self.lock();
                    state.modifiers = modifiers;
                    state.keys.remove(&key);
                }
                self.emit_key(KeyInputType::Release, key, None, modifiers);
            }

            InputEvent::KeyTyped { character, modifiers } => {
                self.lock().modifiers = modifiers;
                self.emit_key(
                    KeyInputType::Type,
                    KeyCode::Unidentified,
                    Some(character),
                    modifiers,
                );
            }

            InputEvent::MouseMoved { x, y } => {
                let (kind, payload) = {
                    let mut state = self.lock();
                    state.pointer = Vec2::new(x, y);
                    state.inside = true;
                    if state.buttons.is_empty() {
                        (MouseInputType::Move, state.mouse_event(None))
                    } else {
                        state.moved_since_press = true;
                        let held = state.buttons.last().copied();
                        (MouseInputType::Drag, state.mouse_event(held))
                    }
                };
                self.mouse.emit(kind, &payload);
            }

            InputEvent::MouseEntered => {
                let payload = {
                    let mut state = self.lock();
                    state.inside = true;
                    state.mouse_event(None)
                };
                self.mouse.emit(MouseInputType::Enter, &payload);
            }

            InputEvent::MouseLeft => {
                let payload = {
                    let mut state = self.lock();
                    state.inside = false;
                    state.mouse_event(None)
                };
                self.mouse.emit(MouseInputType::Exit, &payload);
            }

            InputEvent::MouseButtonDown { button, modifiers } => {
                let payload = {
                    let mut state = self.lock();
                    state.modifiers = modifiers;
                    state.moved_since_press = false;
                    if !state.buttons.contains(&button) {
                        state.buttons.push(button);
                    }
                    state.mouse_event(Some(button))
                };
                self.mouse.emit(MouseInputType::ButtonDown, &payload);
            }

            InputEvent::MouseButtonUp { button, modifiers } => {
                let (payload, clicked) = {
                    let mut state = self.lock();
                    state.modifiers = modifiers;
                    let was_pressed = state.buttons.contains(&button);
                    state.buttons.retain(|held| *held != button);
                    let clicked = was_pressed && !state.moved_since_press;
                    (state.mouse_event(Some(button)), clicked)
                };
                self.mouse.emit(MouseInputType::ButtonUp, &payload);
                if clicked {
                    self.mouse.emit(MouseInputType::Click, &payload);
                }
            }

            InputEvent::MouseWheel { rotation, modifiers } => {
                let position = {
                    let mut state = self.lock();
                    state.modifiers = modifiers;
                    state.pointer
                };
                let payload = WheelEvent {
                    rotation,
                    position,
                    modifiers,
                };
                self.wheel.emit(MouseWheelInputType::Scroll, &payload);
            }
        }
    }

    //--- Query Methods ----------------------------------------------------

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.lock().keys.contains(&key)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.lock().buttons.contains(&button)
    }

    /// Last known pointer position, host-window pixels.
    pub fn pointer_position(&self) -> Vec2 {
        self.lock().pointer
    }

    pub fn is_pointer_inside(&self) -> bool {
        self.lock().inside
    }

    pub fn modifiers(&self) -> Modifiers {
        self.lock().modifiers
    }

    //--- Internal Helpers -------------------------------------------------

    fn emit_key(
        &self,
        kind: KeyInputType,
        key: KeyCode,
        character: Option<char>,
        modifiers: Modifiers,
    ) {
        let payload = KeyEvent {
            key,
            character,
            modifiers,
        };
        self.keyboard.emit(kind, &payload);
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InputManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputManager")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
