//=========================================================================
// Raw Input Events
//
// Platform-neutral representation of device input, produced by the
// platform layer and consumed by `InputManager` on the game-loop thread.
//
// Design:
// - `KeyCode`, `MouseButton` and `Modifiers` are `Copy` and hashable so
//   they can key event groups and pressed-state sets
// - `InputEvent` is `Copy` (no heap data) so batches move cheaply across
//   the platform channel
// - Positions are host-window pixels; `Canvas::point_in_canvas` maps
//   them to logical coordinates
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputManager::dispatch
//         ↓
//    keyboard / mouse / wheel event groups
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// `KeyW` is the same key on QWERTY and AZERTY layouts, which is what
/// WASD-style movement wants. Use `KeyInputType::Type` events for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Keys the input layer does not map, and the key of `Type` events
    /// (text input is not tied to one physical key).
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left and right variants are not distinguished. On macOS, Ctrl maps to
/// Command and Alt to Option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

//--- Modifier Constants --------------------------------------------------

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// Events that carry a modifier snapshot report the modifiers held when
/// the OS delivered them. Pointer motion carries none; consumers get the
/// last known state from `InputManager`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key pressed (repeats while held, as reported by the OS).
    KeyDown { key: KeyCode, modifiers: Modifiers },

    /// Key released.
    KeyUp { key: KeyCode, modifiers: Modifiers },

    /// Text produced by a key press, after layout and dead-key handling.
    KeyTyped { character: char, modifiers: Modifiers },

    /// Cursor moved, host-window pixels.
    MouseMoved { x: f32, y: f32 },

    /// Cursor entered the window.
    MouseEntered,

    /// Cursor left the window.
    MouseLeft,

    MouseButtonDown { button: MouseButton, modifiers: Modifiers },

    MouseButtonUp { button: MouseButton, modifiers: Modifiers },

    /// Wheel rotation in notches. Positive rotates towards the user
    /// (scroll down), matching the usual desktop convention.
    MouseWheel { rotation: f32, modifiers: Modifiers },
}

//--- Implementation ------------------------------------------------------

impl InputEvent {
    /// Modifier snapshot carried by the event, if any.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match *self {
            Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::KeyTyped { modifiers, .. }
            | Self::MouseButtonDown { modifiers, .. }
            | Self::MouseButtonUp { modifiers, .. }
            | Self::MouseWheel { modifiers, .. } => Some(modifiers),
            Self::MouseMoved { .. } | Self::MouseEntered | Self::MouseLeft => None,
        }
    }

    /// Pointer motion, which the platform may coalesce within a frame.
    pub fn is_motion(&self) -> bool {
        matches!(self, Self::MouseMoved { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
