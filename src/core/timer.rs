//=========================================================================
// Timer
//=========================================================================
//
// Countdown driven by frame delta time.
//
// Lifecycle:
//   new() [paused] ──reset()──> running ──time_left hits 0──> timeout
//                                  ↑                             │
//                                  └──── auto_repeat ────────────┤
//                                                                ↓
//                                                       paused (one-shot)
//
// `pause`/`resume` never touch the remaining time.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::event::{Event, SubscriptionId};
use crate::core::render::Updatable;

//=== Timer ===============================================================

/// Frame-driven countdown with a timeout signal.
///
/// Times are milliseconds, matching the game loop's delta time.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use odyssey_engine::core::render::Updatable;
/// use odyssey_engine::core::timer::Timer;
///
/// let fired = Arc::new(AtomicBool::new(false));
/// let mut timer = Timer::new(250.0);
///
/// let flag = Arc::clone(&fired);
/// timer.on_timeout(move || flag.store(true, Ordering::SeqCst));
///
/// timer.reset();
/// timer.update(300.0);
///
/// assert!(fired.load(Ordering::SeqCst));
/// assert!(timer.is_paused());
/// ```
#[derive(Debug)]
pub struct Timer {
    time_left: f64,
    wait_time: f64,
    paused: bool,
    auto_repeat: bool,
    timeout: Event,
}

impl Timer {
    //--- Construction -----------------------------------------------------

    /// Creates a stopped timer. Call [`Timer::reset`] to start it.
    ///
    /// # Panics
    ///
    /// Panics if `wait_time` is negative or not finite.
    pub fn new(wait_time: f64) -> Self {
        assert!(
            wait_time.is_finite() && wait_time >= 0.0,
            "Timer wait time must be a non-negative number, got {}",
            wait_time
        );

        Self {
            time_left: wait_time,
            wait_time,
            paused: true,
            auto_repeat: false,
            timeout: Event::new(),
        }
    }

    /// Restarts the countdown automatically after each timeout.
    pub fn with_auto_repeat(mut self, auto_repeat: bool) -> Self {
        self.auto_repeat = auto_repeat;
        self
    }

    //--- Control ----------------------------------------------------------

    /// Restores the full wait time and starts counting.
    pub fn reset(&mut self) {
        self.time_left = self.wait_time;
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn set_auto_repeat(&mut self, auto_repeat: bool) {
        self.auto_repeat = auto_repeat;
    }

    //--- Signals ----------------------------------------------------------

    pub fn on_timeout<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.timeout.subscribe(move |_| callback())
    }

    /// Timeout channel, for unsubscribing or shared callbacks.
    pub fn timeout(&self) -> &Event {
        &self.timeout
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_auto_repeat(&self) -> bool {
        self.auto_repeat
    }

    pub fn time_left(&self) -> f64 {
        self.time_left
    }

    pub fn wait_time(&self) -> f64 {
        self.wait_time
    }
}

//--- Trait Implementations -----------------------------------------------

impl Updatable for Timer {
    fn update(&mut self, delta_time: f64) {
        if self.paused {
            return;
        }

        self.time_left -= delta_time;
        if self.time_left > 0.0 {
            return;
        }

        self.time_left = 0.0;
        self.timeout.fire();

        if self.auto_repeat {
            self.reset();
        } else {
            self.paused = true;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
