//=========================================================================
// Odyssey Engine - Library Root
//
// This crate defines the public API surface of the Odyssey Engine, a small
// real-time 2D runtime.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder` / `Engine`)
// - Expose the platform-independent systems under `core`
// - Keep OS integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use odyssey_engine::core::render::Renderer;
// use odyssey_engine::core::screen::Screen;
// use odyssey_engine::EngineBuilder;
//
// struct Title;
//
// impl Screen for Title {
//     fn update(&mut self, _delta_time: f64) {}
//     fn draw(&mut self, _renderer: &mut Renderer) {}
// }
//
// fn main() -> Result<(), odyssey_engine::EngineError> {
//     EngineBuilder::new()
//         .with_default_screen("title", |_| Title)
//         .build()?
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every engine system (events, input, screens, rendering,
// resources). Games mostly reach it through `prelude`.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the window, the pixel surface and the Winit event loop.
// `engine` wires the systems together and runs both threads.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};
pub use platform::PlatformError;
