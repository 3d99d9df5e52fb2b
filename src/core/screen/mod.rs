//=========================================================================
// Screen System
//=========================================================================
//
// State machine over named screens with deferred transitions.
//
// Architecture:
// ```text
//   ScreenManager                      (game-loop thread, owns screens)
//     ├─ screens: HashMap<K, Box<dyn Screen>>
//     ├─ current: K
//     └─ switch: ScreenSwitch<K> ──┐
//                                  │ clones held by screens, callbacks
//   any thread: switch.change(k) ──┘ → pending: Option<K>
// ```
//
// Flow:
//   update(dt) → take pending → unload / load → current.update(dt)
//   draw(r)    → current.draw(r)      (never applies a pending change)
//
//=========================================================================

//=== Module Declarations =================================================

mod loading_screen;
mod screen_manager;
mod screen_switch;

//=== Public API ==========================================================

pub use loading_screen::LoadingScreen;
pub use screen_manager::ScreenManager;
pub use screen_switch::ScreenSwitch;

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use crate::core::render::Renderer;

//=== Screen Key Trait ====================================================

/// Marker trait for screen identifiers.
///
/// Implemented for `&'static str` and `String`; games with a fixed set of
/// screens typically implement it for an enum.
pub trait ScreenKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl ScreenKey for &'static str {}
impl ScreenKey for String {}

//=== Screen Trait ========================================================

/// A unit of the application with a load/unload lifecycle.
///
/// Screens are created once at registration and live for the process
/// lifetime; transitions only call `unload` on the old screen and `load`
/// on the new one.
///
/// # Minimal Implementation
///
/// ```rust
/// use odyssey_engine::core::render::{Color, Renderer};
/// use odyssey_engine::core::screen::Screen;
///
/// struct Blank;
///
/// impl Screen for Blank {
///     fn update(&mut self, _delta_time: f64) {}
///
///     fn draw(&mut self, renderer: &mut Renderer) {
///         renderer.fill_rect(0, 0, 10, 10, Color::WHITE);
///     }
/// }
/// ```
pub trait Screen: Send {
    /// Called when the screen becomes current.
    fn load(&mut self) {}

    /// Called when another screen replaces this one.
    fn unload(&mut self) {}

    /// Called once per frame while current. `delta_time` is in ms.
    fn update(&mut self, delta_time: f64);

    /// Called once per frame after `update`, in logical coordinates.
    fn draw(&mut self, renderer: &mut Renderer);
}
