/// Quiet period for the feed's scroll-top pagination trigger.
pub const SCROLL_TOP_QUIET_MS: f64 = 1000.0;

/// Trailing-edge debounce as an explicit state machine. Each `poke` pushes
/// the deadline out by the quiet window; `fire_due` consumes the deadline
/// once it has passed, so a burst of pokes yields exactly one fire per pause.
///
/// Time is injected as milliseconds, which keeps the machine testable off
/// the browser clock; the component driving it owns the actual timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    quiet_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms,
            deadline: None,
        }
    }

    /// Record activity at `now`, arming (or pushing back) the deadline.
    pub fn poke(&mut self, now: f64) {
        self.deadline = Some(now + self.quiet_ms);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if the quiet window has elapsed. Returns true at
    /// most once per armed window.
    pub fn fire_due(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Disarm without firing (e.g. the sentinel left the viewport).
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_of_pokes_fires_once() {
        let mut debouncer = Debouncer::new(1000.0);
        debouncer.poke(0.0);
        debouncer.poke(200.0);
        debouncer.poke(400.0);

        // Still inside the quiet window of the last poke.
        assert!(!debouncer.fire_due(1000.0));
        assert!(debouncer.fire_due(1400.0));

        // Consumed: no second fire without a new poke.
        assert!(!debouncer.fire_due(5000.0));
        assert!(!debouncer.is_armed());
    }

    #[test]
    fn test_one_more_fire_after_window_elapses() {
        let mut debouncer = Debouncer::new(1000.0);
        debouncer.poke(0.0);
        assert!(debouncer.fire_due(1000.0));

        // Sentinel still visible: a fresh poke arms exactly one more fire.
        debouncer.poke(1000.0);
        assert!(!debouncer.fire_due(1999.0));
        assert!(debouncer.fire_due(2000.0));
        assert!(!debouncer.fire_due(9999.0));
    }

    #[test]
    fn test_cancel_disarms() {
        let mut debouncer = Debouncer::new(1000.0);
        debouncer.poke(0.0);
        debouncer.cancel();
        assert!(!debouncer.fire_due(2000.0));
    }

    #[test]
    fn test_rearm_after_cancel_uses_fresh_window() {
        // Teardown between pages disarms; the next page's poke must open a
        // full new quiet window, not inherit the stale deadline.
        let mut debouncer = Debouncer::new(1000.0);
        debouncer.poke(0.0);
        debouncer.cancel();

        debouncer.poke(500.0);
        assert!(!debouncer.fire_due(1000.0));
        assert!(debouncer.fire_due(1500.0));
    }
}
