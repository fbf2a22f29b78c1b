//! Bounded-cadence tick gate for status polling.
//!
//! One `PollSchedule` guards one polled resource. The first tick fires
//! immediately on mount; after that ticks fire only while the resource
//! is active and never while a previous request is still in flight — a
//! slow response causes the next tick to be skipped, not queued.

use std::time::{Duration, Instant};

/// Canonical cadence for run-status/log polling.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Coarser cadence for stats/runs refresh on the dashboard.
pub const STATS_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct PollSchedule {
    interval: Duration,
    in_flight: bool,
    next_due: Option<Instant>,
}

impl PollSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            in_flight: false,
            next_due: None,
        }
    }

    /// Whether a tick should be issued now. The initial fetch fires once
    /// regardless of `active`; subsequent ticks require the resource to
    /// be active and the interval to have elapsed.
    pub fn should_fire(&self, now: Instant, active: bool) -> bool {
        if self.in_flight {
            return false;
        }
        match self.next_due {
            None => true,
            Some(due) => active && now >= due,
        }
    }

    /// Record that a tick's request was issued.
    pub fn mark_started(&mut self, now: Instant) {
        self.in_flight = true;
        self.next_due = Some(now + self.interval);
    }

    /// Record that the in-flight request settled (success or failure).
    pub fn mark_settled(&mut self) {
        self.in_flight = false;
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Forget the schedule so the next evaluation fires an immediate
    /// initial tick again; used when the owning view is remounted.
    pub fn reset(&mut self) {
        self.next_due = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(3);

    /// Drive the schedule over simulated time, issuing a request whenever
    /// it fires and settling each request after `latency`.
    fn run_simulation(
        active: bool,
        total: Duration,
        step: Duration,
        latency: Duration,
    ) -> usize {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(INTERVAL);
        let mut fired = 0usize;
        let mut settle_at: Option<Instant> = None;
        let mut elapsed = Duration::ZERO;
        while elapsed <= total {
            let now = start + elapsed;
            if let Some(at) = settle_at {
                if now >= at {
                    schedule.mark_settled();
                    settle_at = None;
                }
            }
            if schedule.should_fire(now, active) {
                schedule.mark_started(now);
                settle_at = Some(now + latency);
                fired += 1;
            }
            elapsed += step;
        }
        fired
    }

    #[test]
    fn inactive_schedule_only_fires_initial_fetch() {
        let fired = run_simulation(
            false,
            Duration::from_secs(30),
            Duration::from_millis(100),
            Duration::from_millis(50),
        );
        assert_eq!(fired, 1);
    }

    #[test]
    fn active_schedule_fires_once_per_interval() {
        // 0s initial + 3s/6s/9s/12s ticks within 12s.
        let fired = run_simulation(
            true,
            Duration::from_secs(12),
            Duration::from_millis(100),
            Duration::from_millis(50),
        );
        assert_eq!(fired, 5);
    }

    #[test]
    fn slow_response_skips_ticks_instead_of_queuing() {
        // Each request takes 4s against a 3s interval, so ticks fire at
        // 0s, 4s, 8s, 12s: elapsed/latency, not one per interval plus a
        // backlog.
        let fired = run_simulation(
            true,
            Duration::from_secs(12),
            Duration::from_millis(100),
            Duration::from_secs(4),
        );
        assert_eq!(fired, 4);
    }

    #[test]
    fn activation_resumes_polling_after_suspension() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(INTERVAL);
        // Initial fetch fires even while idle.
        assert!(schedule.should_fire(start, false));
        schedule.mark_started(start);
        schedule.mark_settled();
        // Idle: nothing more, however long we wait.
        assert!(!schedule.should_fire(start + Duration::from_secs(60), false));
        // Turning active resumes on the next scheduled tick.
        assert!(schedule.should_fire(start + INTERVAL, true));
        assert!(!schedule.should_fire(start + Duration::from_secs(1), true));
    }

    #[test]
    fn no_tick_while_request_in_flight() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(INTERVAL);
        schedule.mark_started(start);
        assert!(!schedule.should_fire(start + INTERVAL * 3, true));
        schedule.mark_settled();
        assert!(schedule.should_fire(start + INTERVAL * 3, true));
    }

    #[test]
    fn reset_rearms_the_initial_fetch() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(INTERVAL);
        schedule.mark_started(start);
        schedule.mark_settled();
        assert!(!schedule.should_fire(start + Duration::from_secs(1), false));
        schedule.reset();
        assert!(schedule.should_fire(start + Duration::from_secs(1), false));
    }
}
