//=========================================================================
// Input System
//
// Typed publish/subscribe routing of device input.
//
// Architecture:
// ```text
//   platform ──InputEvent──> InputManager::dispatch
//                               ├─ keyboard: EventGroup<KeyInputType, KeyEvent>
//                               ├─ mouse:    EventGroup<MouseInputType, MouseEvent>
//                               └─ wheel:    EventGroup<MouseWheelInputType, WheelEvent>
// ```
//
// Components:
// - `event`: raw, platform-neutral input events
// - `types`: event kinds and subscriber payloads
// - `input_manager`: routing plus click/drag synthesis
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
pub mod types;
mod input_manager;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use input_manager::InputManager;
pub use types::{
    KeyEvent, KeyInputType, MouseEvent, MouseInputType, MouseWheelInputType, WheelEvent,
};
