//=========================================================================
// Core Systems
//=========================================================================
//
// Platform-independent engine systems, all running off the main thread.
//
// Architecture:
// ```text
//   game-loop thread                         resource-loader thread
//   ┌──────────────────────────────┐         ┌─────────────────────┐
//   │ GameLoop                     │         │ ResourceLoader      │
//   │  ├─ RenderSurface (bridge)   │         │  ├─ AssetSource     │
//   │  ├─ InputManager ─► events   │         │  ├─ FormatLoaders   │
//   │  ├─ ScreenManager            │  finish │  └─ ResourceStore   │
//   │  │    └─ Screen ◄───────────────────────── (OnceLock)        │
//   │  └─ Renderer ─► Canvas       │         └─────────────────────┘
//   └──────────────────────────────┘
// ```
//
// Components:
// - `event`: publish/subscribe channels and groups
// - `input`: typed device input routing
// - `render`: canvas math, camera, software drawing
// - `resource`: background asset loading
// - `screen`: screen state machine
// - `timer`: frame-driven countdowns
// - `game_loop`: the frame driver
// - `platform_bridge`: contract with the window thread
// - `services`: handles given to screen constructors
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
pub mod game_loop;
pub mod input;
pub mod platform_bridge;
pub mod render;
pub mod resource;
pub mod screen;
pub mod services;
pub mod timer;

//=== Public API ==========================================================

pub use event::{Event, EventGroup, SubscriptionId};
pub use game_loop::{FrameClock, GameLoop, LoopControl};
pub use services::{EngineServices, ScreenConstructor};
pub use timer::Timer;
