use std::time::Duration;

/// A repeating interval on a virtual clock.
///
/// A running interval carries the event it emits on every fire. Time only moves
/// through [`Interval::advance`], so the owner decides when and in what order
/// fires are dispatched. Dropping an interval ends its schedule.
#[derive(Debug, Clone)]
pub struct Interval<E> {
    schedule: Option<Schedule<E>>,
}

#[derive(Debug, Clone)]
struct Schedule<E> {
    event: E,
    period: Duration,
    // time accumulated since the last fire, always < period
    elapsed: Duration,
}

impl<E> Interval<E> {
    pub fn new() -> Self {
        Self { schedule: None }
    }

    /// Start firing `event` every `period`. A running schedule is replaced.
    pub fn start(&mut self, event: E, period: Duration) {
        self.stop();
        if period.is_zero() {
            return;
        }
        self.schedule = Some(Schedule {
            event,
            period,
            elapsed: Duration::ZERO,
        });
    }

    pub fn stop(&mut self) {
        self.schedule = None;
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn event(&self) -> Option<&E> {
        self.schedule.as_ref().map(|s| &s.event)
    }

    /// Time left until the next fire, or None when stopped.
    pub fn until_next(&self) -> Option<Duration> {
        self.schedule.as_ref().map(|s| s.period - s.elapsed)
    }

    /// Move the clock forward by `dt` and return how many times the interval fired.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        let Some(schedule) = self.schedule.as_mut() else {
            return 0;
        };

        let total = schedule.elapsed + dt;
        let period = schedule.period.as_nanos();
        let fires = total.as_nanos() / period;
        let rest = total.as_nanos() % period;

        schedule.elapsed = Duration::from_nanos(rest as u64);
        fires.min(u32::MAX as u128) as u32
    }
}

impl<E> Default for Interval<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn stopped_interval_never_fires() {
        let mut interval: Interval<()> = Interval::new();
        assert!(!interval.is_running());
        assert_eq!(interval.advance(ms(10_000)), 0);
        assert_eq!(interval.until_next(), None);
    }

    #[test]
    fn fires_once_per_period_across_uneven_steps() {
        let mut interval = Interval::new();
        interval.start("tick", ms(100));

        let fires: u32 = [30, 30, 30, 30, 250, 25, 5]
            .into_iter()
            .map(|step| interval.advance(ms(step)))
            .sum();

        // 400ms in total
        assert_eq!(fires, 4);
        assert_eq!(interval.until_next(), Some(ms(100)));
    }

    #[test]
    fn restart_replaces_schedule_and_resets_phase() {
        let mut interval = Interval::new();
        interval.start(1, ms(100));
        interval.advance(ms(90));
        assert_eq!(interval.until_next(), Some(ms(10)));

        interval.start(2, ms(1000));
        assert_eq!(interval.event(), Some(&2));
        assert_eq!(interval.until_next(), Some(ms(1000)));
        assert_eq!(interval.advance(ms(999)), 0);
        assert_eq!(interval.advance(ms(1)), 1);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut interval = Interval::new();
        interval.stop();
        interval.start((), ms(50));
        interval.stop();
        interval.stop();
        assert!(!interval.is_running());
        assert_eq!(interval.advance(ms(500)), 0);
    }

    #[test]
    fn zero_period_is_not_scheduled() {
        let mut interval = Interval::new();
        interval.start((), Duration::ZERO);
        assert!(!interval.is_running());
    }
}
