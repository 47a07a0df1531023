//! First-come first-served.

use crate::policy::{Dispatch, RunOutcome, SchedPolicy};
use crate::process::SimProcess;
use crate::queue::{FifoQueue, ReadyQueue};
use crate::types::{Level, Quantum};

/// Runs the earliest arrival to completion before looking at anything else.
///
/// Arrivals are admitted in arrival order (ties in descriptor order), so the
/// head of the FIFO is always the earliest unfinished process.
#[derive(Debug, Default)]
pub struct Fcfs {
    ready: FifoQueue,
}

impl Fcfs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchedPolicy for Fcfs {
    fn name(&self) -> &'static str {
        "fcfs"
    }

    fn admit(&mut self, process: SimProcess) {
        self.ready.push(process);
    }

    fn pick_next(&mut self) -> Option<Dispatch> {
        let process = self.ready.pop()?;
        Some(Dispatch {
            process,
            level: Level::TOP,
            quantum: Quantum::Unbounded,
            yield_on_io: false,
        })
    }

    fn requeue(&mut self, process: SimProcess, _level: Level, _outcome: RunOutcome) {
        // No preemption: an interrupted process keeps its place at the head.
        self.ready.push_front(process);
    }

    fn nr_queued(&self) -> usize {
        self.ready.len()
    }
}
