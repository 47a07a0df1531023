//! Time-stepped simulation engine.
//!
//! This is the core of the simulator. It owns the simulated clock and the
//! not-yet-arrived processes, and drives a [`SchedPolicy`] round by round:
//! admit arrivals, let the policy rebalance, pick a process, run it tick by
//! tick until it completes, yields on I/O or exhausts its quantum, then hand
//! it back.

use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, info};

use crate::policy::{Dispatch, RunOutcome, SchedPolicy};
use crate::process::{SimProcess, TickKind};
use crate::trace::{Trace, TraceKind};
use crate::types::{Pid, Tick};
use crate::workload::Workload;

thread_local! {
    static SIM_CLOCK: Cell<Tick> = const { Cell::new(0) };
}

/// Read the simulated clock of the simulation running on this thread.
pub fn sim_clock() -> Tick {
    SIM_CLOCK.with(|c| c.get())
}

/// Update the clock thread-local. Called by the engine before logging so
/// the formatter can stamp events with simulated time.
fn set_sim_clock(now: Tick) {
    SIM_CLOCK.with(|c| c.set(now));
}

/// Errors detected before a simulation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A process descriptor cannot be simulated.
    InvalidProcessDescriptor {
        pid: Pid,
        name: String,
        reason: String,
    },
    /// A policy tunable is out of range.
    InvalidTunable { name: &'static str, value: Tick },
    /// More descriptors than process identifiers.
    TooManyProcesses { count: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidProcessDescriptor { pid, name, reason } => {
                write!(f, "invalid process #{} ({name:?}): {reason}", pid.0)
            }
            SimError::InvalidTunable { name, value } => {
                write!(f, "invalid tunable {name}={value}: must be positive")
            }
            SimError::TooManyProcesses { count } => {
                write!(f, "{count} processes exceed the {} pid limit", u32::MAX)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// The main simulator.
pub struct Simulator<P: SchedPolicy> {
    policy: P,
}

impl<P: SchedPolicy> Simulator<P> {
    pub fn new(policy: P) -> Self {
        Simulator { policy }
    }

    /// The policy, with whatever state the last run left in it.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Run a workload and return the trace.
    ///
    /// Every descriptor is validated first; nothing is simulated if one is
    /// rejected. An empty workload yields an empty trace.
    pub fn run(&mut self, workload: &Workload) -> Result<Trace, SimError> {
        workload.validate()?;
        let defs = workload.processes();

        // Stable sort: simultaneous arrivals keep descriptor order.
        let mut arrivals: Vec<SimProcess> = defs
            .iter()
            .enumerate()
            .map(|(i, def)| {
                Pid::from_index(i)
                    .map(|pid| SimProcess::new(pid, def))
                    .ok_or(SimError::TooManyProcesses { count: defs.len() })
            })
            .collect::<Result<_, _>>()?;
        arrivals.sort_by_key(|p| p.arrival);
        let mut pending: VecDeque<SimProcess> = arrivals.into();

        let mut trace = Trace::new(defs.to_vec());
        let mut clock: Tick = 0;
        set_sim_clock(clock);
        info!(
            policy = self.policy.name(),
            processes = defs.len(),
            "START"
        );

        while !pending.is_empty() || self.policy.nr_queued() > 0 {
            set_sim_clock(clock);
            self.admit_arrivals(clock, &mut pending, &mut trace);

            if let Some(moved) = self.policy.rebalance() {
                trace.record(clock, TraceKind::Boost { moved });
            }

            let used = match self.policy.pick_next() {
                Some(dispatch) => self.run_dispatch(clock, dispatch, &mut trace),
                None => {
                    debug!(waiting = pending.len(), "IDLE");
                    trace.record(clock, TraceKind::Idle);
                    1
                }
            };

            clock += used;
            self.policy.charge(used);
        }

        set_sim_clock(clock);
        info!(ticks = clock, idle = trace.idle_count(), "FINISHED");
        Ok(trace)
    }

    /// Hand every process that has arrived by `now` to the policy.
    fn admit_arrivals(&mut self, now: Tick, pending: &mut VecDeque<SimProcess>, trace: &mut Trace) {
        while pending.front().is_some_and(|p| p.arrival <= now) {
            let Some(process) = pending.pop_front() else {
                break;
            };
            if process.is_complete() {
                // Nothing to run: a zero-length burst retires on arrival.
                trace.record(now, TraceKind::Completed { pid: process.pid });
                info!(task = process.name.as_str(), "COMPLETED (empty burst)");
                continue;
            }
            debug!(
                task = process.name.as_str(),
                burst = process.remaining,
                io = process.io_interval,
                "arrive"
            );
            self.policy.admit(process);
        }
    }

    /// Run one dispatch starting at `start`. Returns the ticks consumed.
    fn run_dispatch(&mut self, start: Tick, dispatch: Dispatch, trace: &mut Trace) -> Tick {
        let Dispatch {
            mut process,
            level,
            quantum,
            yield_on_io,
        } = dispatch;
        let pid = process.pid;

        trace.record(
            start,
            TraceKind::Dispatched {
                pid,
                level,
                quantum,
            },
        );
        debug!(
            task = process.name.as_str(),
            %level,
            %quantum,
            remaining = process.remaining,
            "dispatch"
        );

        let mut used: Tick = 0;
        let outcome = loop {
            set_sim_clock(start + used);
            let kind = process.step();
            let event = match kind {
                TickKind::Exec => TraceKind::Exec { pid },
                TickKind::IoSignal => TraceKind::IoSignal { pid },
            };
            trace.record(start + used, event);
            used += 1;

            if process.is_complete() {
                break None;
            }
            // Signal ticks count toward the quantum: a signal on its last
            // tick is an expiry, not a yield.
            if quantum.is_exhausted(used) {
                break Some(RunOutcome::Expired);
            }
            if kind == TickKind::IoSignal && yield_on_io {
                break Some(RunOutcome::IoYield);
            }
        };

        let now = start + used;
        set_sim_clock(now);
        match outcome {
            None => {
                trace.record(now, TraceKind::Completed { pid });
                info!(task = process.name.as_str(), ran = used, "COMPLETED");
            }
            Some(outcome) => {
                debug!(
                    task = process.name.as_str(),
                    ran = used,
                    remaining = process.remaining,
                    ?outcome,
                    "stopping"
                );
                self.policy.requeue(process, level, outcome);
            }
        }
        used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Fcfs, Mlfq, Stcf};

    #[test]
    fn test_empty_workload_is_empty_trace() {
        let trace = Simulator::new(Fcfs::new())
            .run(&Workload::default())
            .unwrap();
        assert_eq!(trace.render(), "");
        assert!(trace.events().is_empty());
    }

    #[test]
    fn test_invalid_descriptor_rejected_before_running() {
        let workload = Workload::builder()
            .process("ok", 3, 0, 0)
            .process("bad name", 1, 0, 0)
            .build();
        let err = Simulator::new(Fcfs::new()).run(&workload).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidProcessDescriptor {
                pid: Pid(1),
                name: "bad name".into(),
                reason: "name \"bad name\" contains whitespace or ','".into(),
            }
        );
    }

    #[test]
    fn test_late_arrival_emits_idle_ticks() {
        let workload = Workload::builder().process("P", 2, 2, 0).build();
        let trace = Simulator::new(Stcf::new()).run(&workload).unwrap();
        assert_eq!(trace.tokens(), vec!["", "", "P", "P"]);
        assert_eq!(trace.render(), "P P");
        assert_eq!(trace.idle_count(), 2);
        assert_eq!(trace.completion_tick(Pid(0)), Some(4));
    }

    #[test]
    fn test_zero_burst_is_retired_without_tokens() {
        let workload = Workload::builder()
            .process("empty", 0, 0, 0)
            .process("P", 1, 0, 0)
            .build();
        let trace = Simulator::new(Fcfs::new()).run(&workload).unwrap();
        assert_eq!(trace.render(), "P");
        assert_eq!(trace.completion_tick(Pid(0)), Some(0));
    }

    #[test]
    fn test_unsorted_input_is_admitted_by_arrival() {
        let workload = Workload::builder()
            .process("late", 1, 3, 0)
            .process("early", 1, 0, 0)
            .build();
        let trace = Simulator::new(Fcfs::new()).run(&workload).unwrap();
        assert_eq!(trace.tokens(), vec!["early", "", "", "late"]);
    }

    #[test]
    fn test_clock_tracks_simulation_end() {
        let workload = Workload::builder().process("P", 5, 1, 0).build();
        Simulator::new(Mlfq::new()).run(&workload).unwrap();
        assert_eq!(sim_clock(), 6);
    }
}
