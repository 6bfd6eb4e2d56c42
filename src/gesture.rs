/// Hold duration before a press counts as a long-press.
pub const LONG_PRESS_HOLD_MS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PressState {
    Idle,
    Pressed { deadline: f64 },
    Fired,
}

/// Outcome of releasing a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Released before the deadline: a plain tap, long-press cancelled.
    Tap,
    /// The long-press already fired during this press.
    Held,
    /// No press was in progress.
    Ignored,
}

/// Timer-based long-press detection: press-start sets a deadline, release
/// before the deadline cancels, holding past it fires the intent exactly
/// once. The component driving this owns the timeout that calls `expire`.
#[derive(Debug, Clone, PartialEq)]
pub struct LongPress {
    hold_ms: f64,
    state: PressState,
}

impl LongPress {
    pub fn new(hold_ms: f64) -> Self {
        Self {
            hold_ms,
            state: PressState::Idle,
        }
    }

    /// Begin a press at `now`. A second press-start replaces the first.
    pub fn press(&mut self, now: f64) {
        self.state = PressState::Pressed {
            deadline: now + self.hold_ms,
        };
    }

    /// The hold timer elapsed; returns true when the long-press intent
    /// should fire. Never fires twice for one press.
    pub fn expire(&mut self, now: f64) -> bool {
        match self.state {
            PressState::Pressed { deadline } if now >= deadline => {
                self.state = PressState::Fired;
                true
            }
            _ => false,
        }
    }

    pub fn release(&mut self, _now: f64) -> Release {
        let outcome = match self.state {
            PressState::Pressed { .. } => Release::Tap,
            PressState::Fired => Release::Held,
            PressState::Idle => Release::Ignored,
        };
        self.state = PressState::Idle;
        outcome
    }

    /// Pointer left the element mid-press; same cancellation as a release.
    pub fn cancel(&mut self) {
        self.state = PressState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_before_deadline_is_tap() {
        let mut press = LongPress::new(500.0);
        press.press(0.0);
        assert!(!press.expire(300.0));
        assert_eq!(press.release(400.0), Release::Tap);
        // Timer firing late, after release, must not trigger anything.
        assert!(!press.expire(600.0));
    }

    #[test]
    fn test_hold_past_deadline_fires_exactly_once() {
        let mut press = LongPress::new(500.0);
        press.press(0.0);
        assert!(press.expire(500.0));
        assert!(!press.expire(501.0));
        assert_eq!(press.release(700.0), Release::Held);
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let mut press = LongPress::new(500.0);
        press.press(0.0);
        press.cancel();
        assert!(!press.expire(1000.0));
        assert_eq!(press.release(1000.0), Release::Ignored);
    }

    #[test]
    fn test_new_press_resets_deadline() {
        let mut press = LongPress::new(500.0);
        press.press(0.0);
        press.press(400.0);
        assert!(!press.expire(500.0));
        assert!(press.expire(900.0));
    }
}
