mod timers;

pub use timers::{RoundTimers, TimerEvent, TimerPeriods};

use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::{self, BoardSize};
use crate::node::{Node, Position};
use timers::TimerDemand;

// countdown values this close to zero count as expired
const EXPIRY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Idle,
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Please enter a valid point value.")]
    InvalidConfiguration { point_count: Option<u32> },
}

/// Result of a click command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No round in progress
    Ignored,
    /// Correct node, round continues
    Advanced,
    /// Correct node and it was the last one
    Won,
    /// Wrong order, absent or already clicked node
    Misclick,
}

/// Tunables for rounds and their timers
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub default_points: u32,
    pub node_lifetime_secs: f64,
    pub node_size: f64,
    pub elapsed_interval: Duration,
    pub countdown_interval: Duration,
    pub auto_play_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_points: 5,
            node_lifetime_secs: 3.0,
            node_size: 50.0,
            elapsed_interval: Duration::from_millis(100),
            countdown_interval: Duration::from_millis(100),
            auto_play_interval: Duration::from_millis(1000),
        }
    }
}

impl GameConfig {
    fn periods(&self) -> TimerPeriods {
        TimerPeriods {
            elapsed: self.elapsed_interval,
            countdown: self.countdown_interval,
            auto_play: self.auto_play_interval,
        }
    }
}

/// Immutable view of the game handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub point_count: Option<u32>,
    pub nodes: Vec<Node>,
    pub next_expected_index: usize,
    pub elapsed_time: f64,
    pub auto_play_enabled: bool,
}

/// The round state machine.
///
/// All mutation goes through the command methods. Every command ends by
/// reconciling the timers, so leaving `Playing` always stops the round clock,
/// the auto-play ticker and every node countdown.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    phase: Phase,
    point_count: Option<u32>,
    nodes: Vec<Node>,
    next_expected_index: usize,
    elapsed_time: f64,
    auto_play_enabled: bool,
    timers: RoundTimers,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic node placement for replays and tests
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            point_count: Some(config.default_points),
            config,
            phase: Phase::Idle,
            nodes: vec![],
            next_expected_index: 0,
            elapsed_time: 0.0,
            auto_play_enabled: false,
            timers: RoundTimers::new(),
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn point_count(&self) -> Option<u32> {
        self.point_count
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn next_expected_index(&self) -> usize {
        self.next_expected_index
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn auto_play_enabled(&self) -> bool {
        self.auto_play_enabled
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn timers(&self) -> &RoundTimers {
        &self.timers
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            point_count: self.point_count,
            nodes: self.nodes.clone(),
            next_expected_index: self.next_expected_index,
            elapsed_time: self.elapsed_time,
            auto_play_enabled: self.auto_play_enabled,
        }
    }

    /// Index of the topmost active node under a board point
    pub fn node_at(&self, point: Position) -> Option<usize> {
        board::node_at(&self.nodes, point, self.config.node_size)
    }

    /// Request a node count for the next round. The running round keeps its nodes.
    pub fn set_point_count(&mut self, point_count: Option<u32>) {
        self.point_count = point_count;
    }

    pub fn start_game(&mut self, board: BoardSize) -> Result<(), GameError> {
        let count = match self.point_count {
            Some(n) if n >= 1 => n,
            other => {
                warn!(point_count = ?other, "refusing to start round");
                return Err(GameError::InvalidConfiguration { point_count: other });
            }
        };

        self.nodes = board::place_nodes(
            count as usize,
            board,
            self.config.node_size,
            self.config.node_lifetime_secs,
            &mut self.rng,
        );
        self.next_expected_index = 0;
        self.elapsed_time = 0.0;
        self.phase = Phase::Playing;
        // a fresh round never inherits handles from the previous one
        self.timers.stop_all();
        info!(count, width = board.width, height = board.height, "round started");

        self.sync_timers();
        Ok(())
    }

    pub fn restart_game(&mut self) {
        self.phase = Phase::Idle;
        self.point_count = Some(self.config.default_points);
        self.nodes.clear();
        self.next_expected_index = 0;
        self.elapsed_time = 0.0;
        self.auto_play_enabled = false;
        debug!("game restarted");

        self.sync_timers();
    }

    pub fn click_node(&mut self, index: usize) -> ClickOutcome {
        if self.phase != Phase::Playing {
            return ClickOutcome::Ignored;
        }

        let hit = index == self.next_expected_index
            && self.nodes.get(index).is_some_and(Node::is_clickable);

        let outcome = if !hit {
            info!(
                index,
                expected = self.next_expected_index,
                elapsed = self.elapsed_time,
                "misclick, round lost"
            );
            self.phase = Phase::Lost;
            self.nodes.clear();
            ClickOutcome::Misclick
        } else {
            self.nodes[index].clicked = true;
            self.next_expected_index += 1;

            if self.next_expected_index == self.nodes.len() {
                info!(elapsed = self.elapsed_time, "all points cleared");
                self.phase = Phase::Won;
                self.nodes.clear();
                self.auto_play_enabled = false;
                ClickOutcome::Won
            } else {
                debug!(index, next = self.next_expected_index, "node hit");
                ClickOutcome::Advanced
            }
        };

        self.sync_timers();
        outcome
    }

    /// Take a node off the board once its countdown is over. Never ends the round.
    pub fn remove_expired_node(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            if node.active {
                node.active = false;
                debug!(index, "node removed");
            }
        }

        self.sync_timers();
    }

    pub fn toggle_auto_play(&mut self) {
        self.auto_play_enabled = !self.auto_play_enabled;
        debug!(enabled = self.auto_play_enabled, "auto play toggled");

        self.sync_timers();
    }

    /// Move the game clock forward, dispatching timer fires in time order.
    pub fn advance(&mut self, dt: Duration) {
        let mut remaining = dt;

        while let Some(next) = self.timers.until_next() {
            if next > remaining {
                self.timers.advance(remaining);
                return;
            }

            remaining -= next;
            for event in self.timers.advance(next) {
                self.dispatch(event);
            }
        }
    }

    fn dispatch(&mut self, event: TimerEvent) {
        if self.phase != Phase::Playing {
            return;
        }

        match event {
            TimerEvent::Elapsed => {
                self.elapsed_time += self.config.elapsed_interval.as_secs_f64();
            }
            TimerEvent::Countdown(index) => self.on_countdown_tick(index),
            TimerEvent::AutoPlay(index) => {
                if self.auto_play_enabled && index == self.next_expected_index {
                    self.click_node(index);
                }
            }
        }
    }

    fn on_countdown_tick(&mut self, index: usize) {
        let step = self.config.countdown_interval.as_secs_f64();
        let Some(node) = self.nodes.get_mut(index) else {
            return;
        };
        if !(node.clicked && node.active) {
            return;
        }

        node.remaining_time -= step;
        if node.remaining_time <= EXPIRY_EPSILON {
            node.remaining_time = 0.0;
            self.remove_expired_node(index);
        }
    }

    fn sync_timers(&mut self) {
        let periods = self.config.periods();
        self.timers.reconcile(
            TimerDemand {
                playing: self.phase == Phase::Playing,
                nodes: &self.nodes,
                next_expected_index: self.next_expected_index,
                auto_play_enabled: self.auto_play_enabled,
            },
            &periods,
        );
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
