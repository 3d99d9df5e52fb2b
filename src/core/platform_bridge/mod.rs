//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit window thread) with the game loop.
//
// This module defines the contract between the platform implementation
// and core logic. The game loop only sees `RenderSurface`, so it runs the
// same against the real window and against a scripted test surface.
//
// Components:
// - `interface`: messages, surface trait and errors (the contract)
// - `event_collector`: loop-side event collection and buffering
// - `channel_surface`: `RenderSurface` over the platform channels
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod channel_surface;
pub(crate) mod event_collector;
pub mod interface;

//=== Public API ==========================================================

pub use interface::{RenderSurface, SurfaceError, SurfaceEvent};

//=== Internal API ========================================================

pub(crate) use channel_surface::ChannelSurface;
pub(crate) use event_collector::EventCollector;
pub(crate) use interface::PlatformEvent;
