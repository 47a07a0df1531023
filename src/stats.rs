//! Per-process and whole-trace statistics.
//!
//! # Metrics Computed
//!
//! - **Turnaround**: completion tick minus arrival
//! - **Response**: first dispatch tick minus arrival
//! - **Waiting**: turnaround minus the ticks the process spent on the CPU
//!   (execution and I/O signal ticks)
//! - **Dispatches**: how often the process was picked

use std::fmt;

use crate::trace::{Trace, TraceKind};
use crate::types::{Pid, Tick};

/// Per-process statistics computed from a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub pid: Pid,
    pub name: String,
    pub arrival: Tick,
    pub burst: Tick,
    /// Ticks that consumed burst.
    pub exec_ticks: Tick,
    /// Ticks spent issuing I/O signals.
    pub io_signals: Tick,
    pub dispatches: usize,
    /// Tick of the first dispatch, if the process ever ran.
    pub first_run: Option<Tick>,
    /// Tick at which the burst was exhausted.
    pub completion: Option<Tick>,
}

impl ProcessStats {
    pub fn turnaround(&self) -> Option<Tick> {
        self.completion.map(|c| c - self.arrival)
    }

    pub fn response(&self) -> Option<Tick> {
        self.first_run.map(|f| f - self.arrival)
    }

    pub fn waiting(&self) -> Option<Tick> {
        self.turnaround()
            .map(|t| t.saturating_sub(self.exec_ticks + self.io_signals))
    }
}

/// Global trace statistics.
#[derive(Debug, Clone, Default)]
pub struct TraceStats {
    /// Per-process statistics, indexed by PID.
    pub processes: Vec<ProcessStats>,
    /// Ticks from 0 until the last process completed.
    pub makespan: Tick,
    pub idle_ticks: Tick,
    pub boosts: usize,
}

impl TraceStats {
    /// Compute statistics from a trace.
    pub fn from_trace(trace: &Trace) -> Self {
        let mut processes: Vec<ProcessStats> = trace
            .processes()
            .iter()
            .enumerate()
            .map_while(|(i, def)| {
                Some(ProcessStats {
                    pid: Pid::from_index(i)?,
                    name: def.name.clone(),
                    arrival: def.arrival,
                    burst: def.burst,
                    ..Default::default()
                })
            })
            .collect();

        let mut stats = TraceStats::default();
        for event in trace.events() {
            let slot = |pid: Pid| pid.0 as usize;
            match event.kind {
                TraceKind::Exec { pid } => processes[slot(pid)].exec_ticks += 1,
                TraceKind::IoSignal { pid } => processes[slot(pid)].io_signals += 1,
                TraceKind::Idle => stats.idle_ticks += 1,
                TraceKind::Dispatched { pid, .. } => {
                    let p = &mut processes[slot(pid)];
                    p.dispatches += 1;
                    p.first_run.get_or_insert(event.tick);
                }
                TraceKind::Completed { pid } => {
                    processes[slot(pid)].completion = Some(event.tick);
                }
                TraceKind::Boost { .. } => stats.boosts += 1,
            }
        }

        stats.makespan = trace.end_tick();
        stats.processes = processes;
        stats
    }

    /// Mean turnaround over the processes that completed.
    pub fn mean_turnaround(&self) -> f64 {
        mean(self.processes.iter().filter_map(|p| p.turnaround()))
    }

    /// Mean waiting time over the processes that completed.
    pub fn mean_waiting(&self) -> f64 {
        mean(self.processes.iter().filter_map(|p| p.waiting()))
    }

    /// Mean response time over the processes that ran.
    pub fn mean_response(&self) -> f64 {
        mean(self.processes.iter().filter_map(|p| p.response()))
    }
}

fn mean(values: impl Iterator<Item = Tick>) -> f64 {
    let (sum, count) = values.fold((0u64, 0u64), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

fn opt(v: Option<Tick>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl fmt::Display for TraceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:>7} {:>5} {:>5} {:>4} {:>5} {:>6} {:>5} {:>5} {:>5}",
            "name", "arrival", "burst", "exec", "io", "disp", "finish", "tat", "wait", "resp"
        )?;
        for p in &self.processes {
            writeln!(
                f,
                "{:<12} {:>7} {:>5} {:>5} {:>4} {:>5} {:>6} {:>5} {:>5} {:>5}",
                p.name,
                p.arrival,
                p.burst,
                p.exec_ticks,
                p.io_signals,
                p.dispatches,
                opt(p.completion),
                opt(p.turnaround()),
                opt(p.waiting()),
                opt(p.response()),
            )?;
        }
        write!(
            f,
            "makespan={} idle={} boosts={} avg_tat={:.2} avg_wait={:.2} avg_resp={:.2}",
            self.makespan,
            self.idle_ticks,
            self.boosts,
            self.mean_turnaround(),
            self.mean_waiting(),
            self.mean_response()
        )
    }
}
