//! Multi-level feedback queue with shortest-job-first levels and decaying
//! quanta.
//!
//! The structure and boost follow [`Mlfq`](super::Mlfq), with three changes:
//!
//! - quanta start at `[base, 2 * base, unbounded]` instead of fixed values;
//! - each level is a min-heap on remaining burst rather than a FIFO;
//! - when a selected process has executed a positive multiple of `base`
//!   ticks, the quantum of the level it was taken from shrinks by one tick,
//!   never below `base`. The decay is never undone, boosts included.

use tracing::{debug, info};

use crate::policy::{Dispatch, RunOutcome, SchedPolicy};
use crate::process::SimProcess;
use crate::queue::{BurstHeap, LevelSet};
use crate::types::{Level, Quantum, Tick};

const NR_LEVELS: usize = 3;

#[derive(Debug)]
pub struct DynamicQuantum {
    levels: LevelSet<BurstHeap>,
    quanta: [Quantum; NR_LEVELS],
    base_quantum: Tick,
    boost_threshold: Tick,
    boost_counter: Tick,
}

impl DynamicQuantum {
    pub const DEFAULT_BOOST_THRESHOLD: Tick = 2;
    pub const DEFAULT_BASE_QUANTUM: Tick = 2;

    pub fn new() -> Self {
        Self::with_params(Self::DEFAULT_BOOST_THRESHOLD, Self::DEFAULT_BASE_QUANTUM)
    }

    /// Dynamic-quantum MLFQ with quanta starting at `[base, 2 * base, unbounded]`.
    ///
    /// # Panics
    ///
    /// Panics if either tunable is 0. [`Algorithm::build`](super::Algorithm::build)
    /// reports that case as [`SimError::InvalidTunable`](crate::SimError::InvalidTunable)
    /// instead.
    pub fn with_params(boost_threshold: Tick, base_quantum: Tick) -> Self {
        assert!(boost_threshold > 0, "boost_threshold must be positive");
        assert!(base_quantum > 0, "base_quantum must be positive");
        DynamicQuantum {
            levels: LevelSet::new(NR_LEVELS),
            quanta: [
                Quantum::Ticks(base_quantum),
                Quantum::Ticks(2 * base_quantum),
                Quantum::Unbounded,
            ],
            base_quantum,
            boost_threshold,
            boost_counter: 0,
        }
    }

    /// Current quantum of every level.
    pub fn quanta(&self) -> &[Quantum] {
        &self.quanta
    }

    pub fn base_quantum(&self) -> Tick {
        self.base_quantum
    }

    pub fn boost_threshold(&self) -> Tick {
        self.boost_threshold
    }

    /// Number of processes waiting at `level`.
    pub fn queued_at(&self, level: Level) -> usize {
        self.levels.len_at(level)
    }
}

impl Default for DynamicQuantum {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedPolicy for DynamicQuantum {
    fn name(&self) -> &'static str {
        "dynamic_quantum"
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

        let current = self.quanta[level.index()];
        let quantum = if process.steps > 0 && process.steps % self.base_quantum == 0 {
            current.decayed(self.base_quantum)
        } else {
            current
        };
        if quantum != current {
            debug!(%level, from = %current, to = %quantum, "quantum decay");
            self.quanta[level.index()] = quantum;
        }

        Some(Dispatch {
            process,
            level,
            quantum,
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
