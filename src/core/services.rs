//=========================================================================
// Engine Services
//=========================================================================
//
// Shared engine handles passed to screen constructors.
//
// Every field is a cheap, cloneable, thread-safe handle, so a screen can
// keep whatever it needs for its whole lifetime.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::core::input::InputManager;
use crate::core::render::SharedCanvas;
use crate::core::resource::ResourceLoader;
use crate::core::screen::{Screen, ScreenKey, ScreenSwitch};

//=== EngineServices ======================================================

/// Handles available to screens at construction time.
///
/// # Examples
///
/// ```
/// use odyssey_engine::core::render::Renderer;
/// use odyssey_engine::core::screen::{Screen, ScreenSwitch};
/// use odyssey_engine::core::services::EngineServices;
///
/// struct Title {
///     screens: ScreenSwitch<&'static str>,
/// }
///
/// impl Screen for Title {
///     fn update(&mut self, _delta_time: f64) {}
///     fn draw(&mut self, _renderer: &mut Renderer) {}
/// }
///
/// fn title(services: &EngineServices<&'static str>) -> Title {
///     Title { screens: services.screens.clone() }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EngineServices<K: ScreenKey> {
    /// Typed keyboard, mouse and wheel events (game-loop thread).
    pub input: Arc<InputManager>,

    /// Background loader; its store is complete once `is_finished`.
    pub resources: ResourceLoader,

    /// Requests screen changes and game shutdown.
    pub screens: ScreenSwitch<K>,

    /// Logical resolution and window mapping.
    pub canvas: SharedCanvas,
}

/// Factory supplied at registration; the manager never builds screens
/// from raw keys.
pub type ScreenConstructor<K> = Box<dyn FnOnce(&EngineServices<K>) -> Box<dyn Screen>>;
