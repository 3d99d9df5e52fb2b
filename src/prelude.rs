//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use odyssey_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::engine::{Engine, EngineBuilder, EngineError};
pub use crate::core::{EngineServices, LoopControl};

// Events and timing
pub use crate::core::{Event, EventGroup, SubscriptionId, Timer};

// Screens
pub use crate::core::screen::{LoadingScreen, Screen, ScreenKey, ScreenSwitch};

// Input system
pub use crate::core::input::{
    InputEvent, InputManager, KeyCode, KeyEvent, KeyInputType, Modifiers, MouseButton, MouseEvent,
    MouseInputType, MouseWheelInputType, WheelEvent,
};

// Rendering
pub use crate::core::render::{
    Camera, Canvas, Color, Drawable, FilledRect, PixelBuffer, Renderer, SharedCanvas, Sprite,
    Updatable,
};

// Resources
pub use crate::core::resource::{
    AssetSource, DirectorySource, EarlyAssets, FormatLoader, MemorySource, Resource, ResourceLoader,
    ResourceStore,
};
