use foundation::time::Time;

/// Restartable deferred task: each `schedule` cancels the pending deadline
/// and arms a new one, so only the most recent call in a burst survives.
///
/// Poll-driven on purpose: the host event loop decides when time advances,
/// which keeps the primitive independent of any concurrency runtime and
/// fully deterministic under test.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    delay_s: f64,
    deadline: Option<Time>,
}

impl Debouncer {
    pub fn new(delay_s: f64) -> Self {
        Self {
            delay_s,
            deadline: None,
        }
    }

    pub fn delay_s(&self) -> f64 {
        self.delay_s
    }

    /// Arms (or re-arms) the deadline at `now + delay`. Any pending
    /// deadline is dropped along with whatever it would have done.
    pub fn schedule(&mut self, now: Time) {
        self.deadline = Some(now.offset(self.delay_s));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Reports whether the armed deadline has elapsed. Fires at most once
    /// per armed deadline; once fired the debouncer is idle again.
    pub fn poll(&mut self, now: Time) -> bool {
        match self.deadline {
            Some(deadline) if deadline.0 <= now.0 => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use foundation::time::Time;

    #[test]
    fn fires_once_after_the_delay() {
        let mut d = Debouncer::new(0.01);
        d.schedule(Time(0.0));
        assert!(d.is_pending());
        assert!(!d.poll(Time(0.005)));
        assert!(d.poll(Time(0.01)));
        assert!(!d.is_pending());
        assert!(!d.poll(Time(1.0)));
    }

    #[test]
    fn a_burst_collapses_to_the_last_schedule() {
        let mut d = Debouncer::new(0.01);
        d.schedule(Time(0.0));
        d.schedule(Time(0.004));
        d.schedule(Time(0.008));
        // The first two deadlines never fire.
        assert!(!d.poll(Time(0.012)));
        assert!(d.poll(Time(0.018)));
    }

    #[test]
    fn cancel_drops_the_pending_deadline() {
        let mut d = Debouncer::new(0.01);
        d.schedule(Time(0.0));
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.poll(Time(1.0)));
    }

    #[test]
    fn idle_debouncer_never_fires() {
        let mut d = Debouncer::new(0.01);
        assert!(!d.poll(Time(100.0)));
    }
}
