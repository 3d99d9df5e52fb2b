//=========================================================================
// Input Event Kinds & Payloads
//=========================================================================
//
// Typed kinds that key the `InputManager` event groups, and the payloads
// subscribers receive.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::{KeyCode, Modifiers, MouseButton};

//=== Kinds ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInputType {
    Press,
    Release,
    /// Text input; see [`KeyEvent::character`].
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseInputType {
    /// Press and release of the same button without pointer motion in
    /// between. Emitted right after the matching `ButtonUp`.
    Click,
    /// Motion with no button held.
    Move,
    ButtonDown,
    ButtonUp,
    Enter,
    Exit,
    /// Motion while at least one button is held.
    Drag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseWheelInputType {
    Scroll,
}

//=== Payloads ============================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub key: KeyCode,
    /// Set for `Type` events only.
    pub character: Option<char>,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Host-window pixels.
    pub position: Vec2,
    /// Button pressed/released/clicked, or the most recently pressed
    /// button for `Drag`. `None` for plain motion and enter/exit.
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Notches; positive scrolls towards the user.
    pub rotation: f32,
    /// Pointer position when the wheel moved, host-window pixels.
    pub position: Vec2,
    pub modifiers: Modifiers,
}
