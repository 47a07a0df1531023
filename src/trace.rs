//! Trace event recording for the simulator.
//!
//! Every tick the engine spends (execution, I/O signal or idle) is recorded
//! as a [`TraceEvent`], alongside bookkeeping events (dispatch, completion,
//! priority boost) that do not take time. [`Trace::render`] produces the
//! space-separated token string.

use std::fmt;

use crate::process::ProcessDef;
use crate::types::{Level, Pid, Quantum, Tick};

/// A single trace event produced by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// Simulated time when this event occurred.
    pub tick: Tick,
    /// The kind of event.
    pub kind: TraceKind,
}

/// The type of event recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceKind {
    /// A process consumed one tick of burst.
    Exec { pid: Pid },
    /// A process spent one tick issuing an I/O request.
    IoSignal { pid: Pid },
    /// Nothing was ready to run for one tick.
    Idle,
    /// A process was picked to run.
    Dispatched {
        pid: Pid,
        level: Level,
        quantum: Quantum,
    },
    /// A process finished its burst.
    Completed { pid: Pid },
    /// Processes in the lowest level were moved back to the top level.
    Boost { moved: usize },
}

impl TraceKind {
    /// Whether this event occupies a tick (and renders as a token).
    pub fn is_tick(&self) -> bool {
        matches!(
            self,
            TraceKind::Exec { .. } | TraceKind::IoSignal { .. } | TraceKind::Idle
        )
    }
}

/// A complete simulation trace, containing all events in chronological order.
#[derive(Debug, Clone)]
pub struct Trace {
    processes: Vec<ProcessDef>,
    events: Vec<TraceEvent>,
}

impl Trace {
    pub(crate) fn new(processes: Vec<ProcessDef>) -> Self {
        Self {
            processes,
            events: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, tick: Tick, kind: TraceKind) {
        self.events.push(TraceEvent { tick, kind });
    }

    /// Get all events in chronological order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// The simulated process descriptors, indexed by [`Pid`].
    pub fn processes(&self) -> &[ProcessDef] {
        &self.processes
    }

    /// Name of a process, or `"?"` for an unknown PID.
    pub fn name(&self, pid: Pid) -> &str {
        self.processes
            .get(pid.0 as usize)
            .map_or("?", |d| d.name.as_str())
    }

    /// Look up a PID by process name (first match).
    pub fn pid_of(&self, name: &str) -> Option<Pid> {
        self.processes
            .iter()
            .position(|d| d.name == name)
            .and_then(Pid::from_index)
    }

    /// Tokens in order: process name, `!name` for an I/O signal, or an
    /// empty string for an idle tick.
    pub fn tokens(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e.kind {
                TraceKind::Exec { pid } => Some(self.name(pid).to_string()),
                TraceKind::IoSignal { pid } => Some(format!("!{}", self.name(pid))),
                TraceKind::Idle => Some(String::new()),
                _ => None,
            })
            .collect()
    }

    /// Space-joined tokens with surrounding whitespace trimmed.
    pub fn render(&self) -> String {
        self.tokens().join(" ").trim().to_string()
    }

    /// Number of ticks covered by the trace.
    pub fn end_tick(&self) -> Tick {
        self.events
            .iter()
            .filter(|e| e.kind.is_tick())
            .map(|e| e.tick + 1)
            .max()
            .unwrap_or(0)
    }

    /// Count the executed (burst-consuming) ticks of a process.
    pub fn exec_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Exec { pid: p } if p == pid))
            .count()
    }

    /// Count the I/O signal ticks of a process.
    pub fn signal_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::IoSignal { pid: p } if p == pid))
            .count()
    }

    /// Count the number of times a process was dispatched.
    pub fn dispatch_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Dispatched { pid: p, .. } if p == pid))
            .count()
    }

    /// Count the idle ticks.
    pub fn idle_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Idle))
            .count()
    }

    /// Count the priority boosts performed.
    pub fn boost_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Boost { .. }))
            .count()
    }

    /// Tick at which a process completed (the tick after its last execution).
    pub fn completion_tick(&self, pid: Pid) -> Option<Tick> {
        self.events.iter().find_map(|e| match e.kind {
            TraceKind::Completed { pid: p } if p == pid => Some(e.tick),
            _ => None,
        })
    }

    /// Lengths, in ticks, of each dispatch of a process together with the
    /// level it ran at.
    pub fn runs(&self, pid: Pid) -> Vec<(Level, Tick)> {
        let mut runs = Vec::new();
        let mut current: Option<(Level, Tick)> = None;
        for event in &self.events {
            match event.kind {
                TraceKind::Dispatched { pid: p, level, .. } => {
                    runs.extend(current.take());
                    if p == pid {
                        current = Some((level, 0));
                    }
                }
                TraceKind::Exec { pid: p } | TraceKind::IoSignal { pid: p } if p == pid => {
                    if let Some((_, n)) = current.as_mut() {
                        *n += 1;
                    }
                }
                _ => {}
            }
        }
        runs.extend(current);
        runs
    }

    /// Pretty-print the trace for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            let desc = match &event.kind {
                TraceKind::Exec { pid } => format!("EXEC     {}", self.name(*pid)),
                TraceKind::IoSignal { pid } => format!("IO       {}", self.name(*pid)),
                TraceKind::Idle => "IDLE".to_string(),
                TraceKind::Dispatched {
                    pid,
                    level,
                    quantum,
                } => format!(
                    "DISPATCH {} level={} quantum={}",
                    self.name(*pid),
                    level,
                    quantum
                ),
                TraceKind::Completed { pid } => format!("COMPLETE {}", self.name(*pid)),
                TraceKind::Boost { moved } => format!("BOOST    moved={moved}"),
            };
            eprintln!("[{:>8}] {}", event.tick, desc);
        }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
