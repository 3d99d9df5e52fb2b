//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core contract: the messages the window thread sends, the
// events a render surface reports to the game loop, and surface errors.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;
use crate::core::render::PixelBuffer;

//=== PlatformEvent =======================================================

/// Messages sent from the platform thread to the game-loop thread.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// The window and its pixel surface exist (host size in pixels).
    Ready { width: u32, height: u32 },

    Resized { width: u32, height: u32 },

    /// Input gathered since the previous frame boundary, in order.
    Inputs(Vec<InputEvent>),

    /// Window close requested by the user or the OS.
    WindowClosed,
}

//=== SurfaceEvent ========================================================

/// Host events reported to the game loop once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Resized { width: u32, height: u32 },
    Input(Vec<InputEvent>),
    Closed,
}

//=== RenderSurface =======================================================

/// The host surface the game loop draws to.
///
/// Implemented over the platform channels for the real window; tests and
/// headless hosts provide their own.
pub trait RenderSurface: Send {
    /// Blocks until the host surface exists and returns its pixel size.
    /// `None` if the host went away first.
    fn wait_ready(&mut self) -> Option<(u32, u32)>;

    /// Events since the previous call, without blocking.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;

    /// Whether a frame handed over now would be shown. When `false` the
    /// loop skips composing this frame.
    fn can_present(&self) -> bool {
        true
    }

    /// Hands a host-sized frame over for display.
    fn present(&mut self, frame: PixelBuffer) -> Result<(), SurfaceError>;

    /// Called once when the loop stops.
    fn release(&mut self) {}
}

//=== SurfaceError ========================================================

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("host surface is no longer accepting frames")]
    Disconnected,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_event_is_debug() {
        let event = PlatformEvent::WindowClosed;
        assert!(format!("{:?}", event).contains("WindowClosed"));
    }

    #[test]
    fn surface_error_message() {
        assert_eq!(
            SurfaceError::Disconnected.to_string(),
            "host surface is no longer accepting frames"
        );
    }
}
