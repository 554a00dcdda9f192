/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn offset(self, seconds: f64) -> Self {
        Time(self.0 + seconds)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn instant(t: Time) -> Self {
        Self { start: t, end: t }
    }

    pub fn starting_at(start: Time, duration_s: f64) -> Self {
        Self {
            start,
            end: start.offset(duration_s.max(0.0)),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Normalized progress through the span at `now`, clamped to [0, 1].
    ///
    /// A zero-duration span is complete from its start time onward.
    pub fn progress(&self, now: Time) -> f64 {
        if now.0 <= self.start.0 {
            return 0.0;
        }
        let d = self.duration();
        if d <= 0.0 {
            return 1.0;
        }
        ((now.0 - self.start.0) / d).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Time, TimeSpan};

    #[test]
    fn progress_clamps_and_interpolates() {
        let span = TimeSpan::starting_at(Time(1.0), 2.0);
        assert_eq!(span.progress(Time(0.0)), 0.0);
        assert_eq!(span.progress(Time(1.0)), 0.0);
        assert_eq!(span.progress(Time(2.0)), 0.5);
        assert_eq!(span.progress(Time(3.0)), 1.0);
        assert_eq!(span.progress(Time(10.0)), 1.0);
    }

    #[test]
    fn instant_span_completes_immediately() {
        let span = TimeSpan::instant(Time(5.0));
        assert_eq!(span.duration(), 0.0);
        assert_eq!(span.progress(Time(4.9)), 0.0);
        assert_eq!(span.progress(Time(5.1)), 1.0);
    }
}
