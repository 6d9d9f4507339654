use std::time::{Duration, Instant};

/// Self-rescheduling animation timer: a one-off kickoff delay, then a steady
/// interval counted from each firing. Late firings do not catch up.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    next: Instant,
    interval: Duration,
}

impl TickSchedule {
    pub fn new(start: Instant, kickoff: Duration, interval: Duration) -> Self {
        Self {
            next: start + kickoff,
            interval,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Fires at most once per call. On firing, the next deadline is one
    /// interval after `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next = now + self.interval;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KICKOFF: Duration = Duration::from_millis(5);
    const INTERVAL: Duration = Duration::from_millis(20);

    #[test]
    fn first_tick_waits_for_kickoff() {
        let start = Instant::now();
        let mut schedule = TickSchedule::new(start, KICKOFF, INTERVAL);

        assert!(!schedule.fire_if_due(start));
        assert!(!schedule.fire_if_due(start + Duration::from_millis(4)));
        assert!(schedule.fire_if_due(start + KICKOFF));
        assert_eq!(schedule.deadline(), start + KICKOFF + INTERVAL);
    }

    #[test]
    fn steady_interval_after_kickoff() {
        let start = Instant::now();
        let mut schedule = TickSchedule::new(start, KICKOFF, INTERVAL);
        let first = start + KICKOFF;
        assert!(schedule.fire_if_due(first));

        assert!(!schedule.fire_if_due(first + Duration::from_millis(19)));
        assert!(schedule.fire_if_due(first + INTERVAL));
    }

    #[test]
    fn late_firing_does_not_catch_up() {
        let start = Instant::now();
        let mut schedule = TickSchedule::new(start, KICKOFF, INTERVAL);
        let late = start + Duration::from_millis(500);

        assert!(schedule.fire_if_due(late));
        assert!(!schedule.fire_if_due(late));
        assert_eq!(schedule.deadline(), late + INTERVAL);
    }
}
