use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, trace};

use crate::node::Node;
use crate::timer::Interval;

/// What a round timer asks the game to do when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Add one step to the round clock
    Elapsed,
    /// Age the clicked node with this index
    Countdown(usize),
    /// Click the node that was expected when the ticker started
    AutoPlay(usize),
}

/// Periods for the three timer families
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerPeriods {
    pub elapsed: Duration,
    pub countdown: Duration,
    pub auto_play: Duration,
}

/// The state the timers are reconciled against
pub struct TimerDemand<'a> {
    pub playing: bool,
    pub nodes: &'a [Node],
    pub next_expected_index: usize,
    pub auto_play_enabled: bool,
}

/// Owned timer handles for one game: the round clock, the auto-play ticker and
/// one countdown per clicked node still on the board.
#[derive(Debug, Default)]
pub struct RoundTimers {
    elapsed: Interval<TimerEvent>,
    auto_play: Interval<TimerEvent>,
    countdowns: BTreeMap<usize, Interval<TimerEvent>>,
}

impl RoundTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start what the demand needs and drop everything else.
    pub fn reconcile(&mut self, demand: TimerDemand<'_>, periods: &TimerPeriods) {
        if !demand.playing {
            self.stop_all();
            return;
        }

        if !self.elapsed.is_running() {
            self.elapsed.start(TimerEvent::Elapsed, periods.elapsed);
        }

        let ticking = |node: &Node| node.clicked && node.active;
        self.countdowns
            .retain(|index, _| demand.nodes.get(*index).is_some_and(ticking));
        for node in demand.nodes.iter().filter(|n| ticking(n)) {
            self.countdowns.entry(node.index).or_insert_with(|| {
                debug!(index = node.index, "node countdown started");
                let mut interval = Interval::new();
                interval.start(TimerEvent::Countdown(node.index), periods.countdown);
                interval
            });
        }

        let wants_auto_play =
            demand.auto_play_enabled && demand.next_expected_index < demand.nodes.len();
        if wants_auto_play {
            let event = TimerEvent::AutoPlay(demand.next_expected_index);
            // a new expected index means a fresh full interval
            if self.auto_play.event() != Some(&event) {
                self.auto_play.start(event, periods.auto_play);
            }
        } else {
            self.auto_play.stop();
        }
    }

    pub fn stop_all(&mut self) {
        if self.running_count() > 0 {
            debug!(running = self.running_count(), "stopping round timers");
        }
        self.elapsed.stop();
        self.auto_play.stop();
        self.countdowns.clear();
    }

    /// Number of live schedules across all families
    pub fn running_count(&self) -> usize {
        usize::from(self.elapsed.is_running())
            + usize::from(self.auto_play.is_running())
            + self.countdowns.len()
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_play.is_running()
    }

    pub fn has_countdown(&self, index: usize) -> bool {
        self.countdowns.contains_key(&index)
    }

    /// Time until the earliest fire of any family
    pub fn until_next(&self) -> Option<Duration> {
        std::iter::once(&self.elapsed)
            .chain(self.countdowns.values())
            .chain(std::iter::once(&self.auto_play))
            .filter_map(Interval::until_next)
            .min()
    }

    /// Advance every family by `dt` and collect the fired events in dispatch
    /// order: round clock, node countdowns by index, then auto-play.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerEvent> {
        let mut fired = Vec::new();
        let families = std::iter::once(&mut self.elapsed)
            .chain(self.countdowns.values_mut())
            .chain(std::iter::once(&mut self.auto_play));

        for interval in families {
            let fires = interval.advance(dt);
            if let Some(event) = interval.event() {
                for _ in 0..fires {
                    trace!(?event, "timer fired");
                    fired.push(*event);
                }
            }
        }
        fired
    }
}
