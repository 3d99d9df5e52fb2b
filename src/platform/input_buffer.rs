//=========================================================================
// Input Buffer
//=========================================================================
//
// Collects input events between two frame boundaries.
//
// Responsibilities:
// - Preserve arrival order (click and drag detection depend on it)
// - Coalesce runs of pointer motion into the latest position
// - Hand the frame's events over in one batch via `drain()`
//
// Notes:
// Only consecutive `MouseMoved` events are merged. A move separated from
// the previous one by a button event is kept, so "press, move, release"
// still reads as a drag rather than a click.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocates for a busy frame to avoid reallocations while typing or
    // dragging.
    //
    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 128;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    //--- Event Handling ---------------------------------------------------

    pub(crate) fn push(&mut self, event: InputEvent) {
        if event.is_motion() {
            if let Some(last) = self.events.last_mut() {
                if last.is_motion() {
                    *last = event;
                    return;
                }
            }
        }
        self.events.push(event);
    }

    //--- Drain ------------------------------------------------------------

    /// Returns this frame's events and clears the buffer, or `None` if
    /// nothing was collected.
    pub(crate) fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.events.is_empty() {
            return None;
        }
        Some(self.events.drain(..).collect())
    }

    //--- Utilities --------------------------------------------------------

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
