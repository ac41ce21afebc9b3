//! Countdown timer for meditation sessions.
//!
//! The timer does not own a thread or schedule. The caller feeds it time with
//! [`SessionTimer::tick`] (one second) or [`SessionTimer::advance`] (any
//! duration), and it reports through the callbacks given at construction.

use std::fmt;
use std::time::Duration;

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Countdown with tick and completion callbacks.
pub struct SessionTimer {
    duration_secs: u32,
    remaining_secs: u32,
    running: bool,
    /// Time fed through `advance` that has not yet made up a whole second
    carry: Duration,
    on_tick: Box<dyn FnMut(u32)>,
    on_complete: Box<dyn FnMut()>,
}

impl SessionTimer {
    /// Create a stopped timer. `on_tick` receives the seconds remaining after
    /// each tick; `on_complete` fires once when the countdown reaches zero.
    pub fn new(
        duration_minutes: u32,
        on_tick: impl FnMut(u32) + 'static,
        on_complete: impl FnMut() + 'static,
    ) -> Self {
        let duration_secs = duration_minutes.saturating_mul(60);
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            running: false,
            carry: Duration::ZERO,
            on_tick: Box::new(on_tick),
            on_complete: Box::new(on_complete),
        }
    }

    /// Start counting down. Does nothing if already running or finished.
    ///
    /// Returns whether the timer was started by this call.
    pub fn start(&mut self) -> bool {
        if self.running || self.remaining_secs == 0 {
            return false;
        }
        self.running = true;
        tracing::debug!(remaining = self.remaining_secs, "Session timer started");
        true
    }

    /// Stop counting down without touching the remaining time.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(remaining = self.remaining_secs, "Session timer stopped");
        }
        self.running = false;
        self.carry = Duration::ZERO;
    }

    pub fn pause(&mut self) {
        self.stop();
    }

    pub fn resume(&mut self) -> bool {
        self.start()
    }

    /// Stop and restore the full duration, reporting it through `on_tick`.
    pub fn reset(&mut self) {
        self.stop();
        self.remaining_secs = self.duration_secs;
        (self.on_tick)(self.remaining_secs);
    }

    /// One second elapsed. Ignored unless running.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        (self.on_tick)(self.remaining_secs);

        if self.remaining_secs == 0 {
            self.stop();
            tracing::info!(duration = self.duration_secs, "Session timer completed");
            (self.on_complete)();
        }
    }

    /// Feed `elapsed` wall-clock time, firing one tick per whole second.
    ///
    /// Returns the number of ticks fired.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.carry += elapsed;
        let mut fired = 0;
        while self.running && self.carry >= ONE_SECOND {
            self.carry -= ONE_SECOND;
            self.tick();
            fired += 1;
        }
        fired
    }

    pub fn time_remaining(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration(&self) -> u32 {
        self.duration_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_secs == 0
    }
}

impl fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTimer")
            .field("duration_secs", &self.duration_secs)
            .field("remaining_secs", &self.remaining_secs)
            .field("running", &self.running)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        ticks: Rc<RefCell<Vec<u32>>>,
        completions: Rc<RefCell<u32>>,
    }

    fn timer(minutes: u32) -> (SessionTimer, Recorder) {
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let completions = Rc::new(RefCell::new(0));
        let t = ticks.clone();
        let c = completions.clone();
        let timer = SessionTimer::new(
            minutes,
            move |remaining| t.borrow_mut().push(remaining),
            move || *c.borrow_mut() += 1,
        );
        (timer, Recorder { ticks, completions })
    }

    #[test]
    fn test_reset_reports_full_duration_immediately() {
        let (mut timer, recorder) = timer(5);
        timer.reset();
        assert_eq!(*recorder.ticks.borrow(), vec![300]);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_ticks_only_while_running() {
        let (mut timer, recorder) = timer(1);
        timer.tick();
        assert!(recorder.ticks.borrow().is_empty());

        assert!(timer.start());
        timer.tick();
        timer.tick();
        assert_eq!(*recorder.ticks.borrow(), vec![59, 58]);
    }

    #[test]
    fn test_start_is_idempotent() {
        let (mut timer, recorder) = timer(1);
        assert!(timer.start());
        assert!(!timer.start());
        timer.tick();
        assert_eq!(recorder.ticks.borrow().len(), 1);
    }

    #[test]
    fn test_pause_keeps_remaining() {
        let (mut timer, _recorder) = timer(1);
        timer.start();
        timer.advance(Duration::from_secs(10));
        timer.pause();
        assert_eq!(timer.advance(Duration::from_secs(10)), 0);
        assert_eq!(timer.time_remaining(), 50);

        assert!(timer.resume());
        timer.advance(Duration::from_secs(5));
        assert_eq!(timer.time_remaining(), 45);
    }

    #[test]
    fn test_completes_once() {
        let (mut timer, recorder) = timer(1);
        timer.start();
        let fired = timer.advance(Duration::from_secs(90));
        assert_eq!(fired, 60);
        assert_eq!(*recorder.completions.borrow(), 1);
        assert_eq!(recorder.ticks.borrow().last(), Some(&0));
        assert!(timer.is_complete());
        assert!(!timer.is_running());
        assert!(!timer.start());
    }

    #[test]
    fn test_sub_second_advance_accumulates() {
        let (mut timer, _recorder) = timer(1);
        timer.start();
        assert_eq!(timer.advance(Duration::from_millis(600)), 0);
        assert_eq!(timer.advance(Duration::from_millis(600)), 1);
        assert_eq!(timer.time_remaining(), 59);
    }

    #[test]
    fn test_reset_after_completion_allows_restart() {
        let (mut timer, recorder) = timer(1);
        timer.start();
        timer.advance(Duration::from_secs(60));
        timer.reset();
        assert_eq!(timer.time_remaining(), 60);
        assert!(timer.start());
        assert_eq!(*recorder.completions.borrow(), 1);
    }
}
