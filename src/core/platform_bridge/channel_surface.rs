//=========================================================================
// Channel Surface
//=========================================================================
//
// `RenderSurface` over the two platform channels.
//
// ```text
//   platform thread ──PlatformEvent──> EventCollector ─┐
//                                                      ├─ ChannelSurface
//   platform thread <──PixelBuffer─── frames (bounded) ┘   (loop thread)
// ```
//
// While the platform has not consumed the previous frame, `can_present`
// reports `false` so the loop does not compose a frame nobody will show.
// Frames are still offered with `try_send` and dropped if the slot filled
// up meanwhile. Releasing the surface drops the frame sender, which tells
// the platform to exit.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{EventCollector, PlatformEvent, RenderSurface, SurfaceError, SurfaceEvent};
use crate::core::render::PixelBuffer;

//=== ChannelSurface ======================================================

pub(crate) struct ChannelSurface {
    collector: EventCollector,
    frames: Option<Sender<PixelBuffer>>,
}

impl ChannelSurface {
    pub(crate) fn new(events: Receiver<PlatformEvent>, frames: Sender<PixelBuffer>) -> Self {
        Self {
            collector: EventCollector::new(events),
            frames: Some(frames),
        }
    }
}

impl RenderSurface for ChannelSurface {
    fn wait_ready(&mut self) -> Option<(u32, u32)> {
        self.collector.wait_ready()
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        self.collector.poll()
    }

    fn can_present(&self) -> bool {
        // Disconnected senders still say yes so `present` can report it
        self.frames.as_ref().map_or(true, |frames| !frames.is_full())
    }

    fn present(&mut self, frame: PixelBuffer) -> Result<(), SurfaceError> {
        let Some(frames) = &self.frames else {
            return Err(SurfaceError::Disconnected);
        };

        match frames.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                trace!("Platform busy, frame dropped");
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(SurfaceError::Disconnected),
        }
    }

    fn release(&mut self) {
        if self.frames.take().is_some() {
            debug!("Render surface released");
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
