//! Shortest time to completion first (preemptive SRTF).

use tracing::debug;

use crate::policy::{Dispatch, RunOutcome, SchedPolicy};
use crate::process::SimProcess;
use crate::queue::{BurstHeap, ReadyQueue};
use crate::types::{Level, Quantum};

/// Re-evaluates every tick and runs the process with the least remaining
/// burst. Ties go to the earlier arrival, then the smaller name.
#[derive(Debug, Default)]
pub struct Stcf {
    ready: BurstHeap,
}

impl Stcf {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchedPolicy for Stcf {
    fn name(&self) -> &'static str {
        "stcf"
    }

    fn admit(&mut self, process: SimProcess) {
        self.ready.push(process);
    }

    fn pick_next(&mut self) -> Option<Dispatch> {
        let process = self.ready.pop()?;
        Some(Dispatch {
            process,
            level: Level::TOP,
            quantum: Quantum::Ticks(1),
            yield_on_io: false,
        })
    }

    fn requeue(&mut self, process: SimProcess, _level: Level, _outcome: RunOutcome) {
        debug!(
            task = process.name.as_str(),
            remaining = process.remaining,
            "reinsert"
        );
        self.ready.push(process);
    }

    fn nr_queued(&self) -> usize {
        self.ready.len()
    }
}
