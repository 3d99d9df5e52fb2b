//=========================================================================
// Event Collector
//=========================================================================
//
// Loop-side end of the platform event channel.
//
// Turns `PlatformEvent`s into the `SurfaceEvent`s the game loop consumes.
// Each frame drains at most `MAX_EVENTS_PER_FRAME` messages so a flood of
// input cannot starve `update`/`draw`; the rest waits for the next frame.
//
// Closing is sticky: once the window closed or the platform went away,
// every later poll reports `Closed` again.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{PlatformEvent, SurfaceEvent};

//=== Constants ===========================================================

const MAX_EVENTS_PER_FRAME: usize = 100;

//=== EventCollector ======================================================

pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    /// Events seen before `Ready`, handed out with the first frame.
    early: Vec<SurfaceEvent>,
    closed: bool,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            early: Vec::new(),
            closed: false,
        }
    }

    /// Blocks until the platform reports `Ready` and returns the host size.
    ///
    /// Returns `None` if the window closed (or the platform vanished)
    /// before a surface existed.
    pub(crate) fn wait_ready(&mut self) -> Option<(u32, u32)> {
        while !self.closed {
            let Ok(message) = self.receiver.recv() else {
                self.closed = true;
                break;
            };

            if let PlatformEvent::Ready { width, height } = message {
                return Some((width, height));
            }

            let mut early = std::mem::take(&mut self.early);
            self.translate(message, &mut early);
            self.early = early;
        }

        debug!("Platform closed before the surface was ready");
        None
    }

    /// Everything the platform sent since the last call, in arrival order.
    pub(crate) fn poll(&mut self) -> Vec<SurfaceEvent> {
        let mut events = std::mem::take(&mut self.early);

        let mut drained = 0;
        while !self.closed && drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(message) => {
                    self.translate(message, &mut events);
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.closed = true,
            }
        }

        if drained == MAX_EVENTS_PER_FRAME {
            warn!("Platform event backlog, {} events deferred to next frame", self.receiver.len());
        }
        if self.closed {
            events.push(SurfaceEvent::Closed);
        }
        events
    }

    fn translate(&mut self, message: PlatformEvent, out: &mut Vec<SurfaceEvent>) {
        match message {
            PlatformEvent::Inputs(batch) if batch.is_empty() => {}
            PlatformEvent::Inputs(batch) => out.push(SurfaceEvent::Input(batch)),
            // A second `Ready` (surface recreated on resume) is a resize
            PlatformEvent::Ready { width, height } | PlatformEvent::Resized { width, height } => {
                out.push(SurfaceEvent::Resized { width, height });
            }
            PlatformEvent::WindowClosed => {
                debug!("Platform reported window closed");
                self.closed = true;
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
