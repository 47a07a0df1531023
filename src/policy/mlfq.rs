//! Fixed three-level multi-level feedback queue.

use tracing::{debug, info};

use crate::policy::{Dispatch, RunOutcome, SchedPolicy};
use crate::process::SimProcess;
use crate::queue::{FifoQueue, LevelSet};
use crate::types::{Level, Quantum, Tick};

/// Per-level quanta: 6 ticks, 15 ticks, then run until done or I/O.
pub const MLFQ_QUANTA: [Quantum; 3] = [Quantum::Ticks(6), Quantum::Ticks(15), Quantum::Unbounded];

/// Three FIFO levels with demotion on quantum expiry and a periodic boost
/// of the lowest level back to the top.
#[derive(Debug)]
pub struct Mlfq {
    levels: LevelSet<FifoQueue>,
    boost_threshold: Tick,
    boost_counter: Tick,
}

impl Mlfq {
    pub const DEFAULT_BOOST_THRESHOLD: Tick = 15;

    pub fn new() -> Self {
        Self::with_boost_threshold(Self::DEFAULT_BOOST_THRESHOLD)
    }

    /// MLFQ boosting the lowest level every `boost_threshold` ticks.
    ///
    /// # Panics
    ///
    /// Panics if `boost_threshold` is 0. [`Algorithm::build`](super::Algorithm::build)
    /// reports that case as [`SimError::InvalidTunable`](crate::SimError::InvalidTunable)
    /// instead.
    pub fn with_boost_threshold(boost_threshold: Tick) -> Self {
        assert!(boost_threshold > 0, "boost_threshold must be positive");
        Mlfq {
            levels: LevelSet::new(MLFQ_QUANTA.len()),
            boost_threshold,
            boost_counter: 0,
        }
    }

    pub fn boost_threshold(&self) -> Tick {
        self.boost_threshold
    }

    /// Number of processes waiting at `level`.
    pub fn queued_at(&self, level: Level) -> usize {
        self.levels.len_at(level)
    }
}

impl Default for Mlfq {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedPolicy for Mlfq {
    fn name(&self) -> &'static str {
        "mlfq"
    }

    fn admit(&mut self, process: SimProcess) {
        self.levels.push(Level::TOP, process);
    }

    fn rebalance(&mut self) -> Option<usize> {
        if self.boost_counter < self.boost_threshold {
            return None;
        }
        // Keep the overshoot so boosts stay on a fixed cadence.
        self.boost_counter %= self.boost_threshold;
        let moved = self.levels.migrate(self.levels.lowest(), Level::TOP);
        info!(moved, "BOOST");
        Some(moved)
    }

    fn pick_next(&mut self) -> Option<Dispatch> {
        let (level, process) = self.levels.pop_highest()?;
        Some(Dispatch {
            process,
            level,
            quantum: MLFQ_QUANTA[level.index()],
            yield_on_io: true,
        })
    }

    fn requeue(&mut self, process: SimProcess, level: Level, outcome: RunOutcome) {
        let target = match outcome {
            RunOutcome::Expired => level.demoted(self.levels.lowest()),
            RunOutcome::IoYield => level,
        };
        if target != level {
            info!(task = process.name.as_str(), from = %level, to = %target, "DEMOTE");
        } else {
            debug!(task = process.name.as_str(), %level, ?outcome, "requeue");
        }
        self.levels.push(target, process);
    }

    fn charge(&mut self, ticks: Tick) {
        self.boost_counter += ticks;
    }

    fn nr_queued(&self) -> usize {
        self.levels.len()
    }
}
