//! Process model for the simulator.
//!
//! A [`ProcessDef`] is the immutable descriptor handed in by the caller. The
//! engine turns each one into a [`SimProcess`], which carries the remaining
//! burst and the I/O signalling state and is advanced one tick at a time by
//! [`SimProcess::step`].

use crate::types::{Pid, Tick};

/// Definition of a process for workload creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDef {
    pub name: String,
    /// Total CPU ticks the process needs.
    pub burst: Tick,
    /// When the process first becomes eligible for dispatch.
    pub arrival: Tick,
    /// Executed ticks between I/O signals. 0 means the process never signals.
    pub io_interval: Tick,
}

impl ProcessDef {
    pub fn new(name: impl Into<String>, burst: Tick, arrival: Tick, io_interval: Tick) -> Self {
        ProcessDef {
            name: name.into(),
            burst,
            arrival,
            io_interval,
        }
    }

    /// Check that the name can be rendered as a trace token.
    ///
    /// Returns the reason the descriptor is rejected, if any.
    pub fn check(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("name is empty".into());
        }
        if self.name.starts_with('!') {
            return Err(format!("name {:?} starts with '!'", self.name));
        }
        if self
            .name
            .chars()
            .any(|c| c.is_whitespace() || c == ',')
        {
            return Err(format!(
                "name {:?} contains whitespace or ','",
                self.name
            ));
        }
        Ok(())
    }
}

/// What a process did with one tick of CPU time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Consumed one tick of burst.
    Exec,
    /// Issued an I/O request; no burst consumed.
    IoSignal,
}

/// A simulated process at runtime.
#[derive(Debug, Clone)]
pub struct SimProcess {
    pub pid: Pid,
    pub name: String,
    pub arrival: Tick,
    pub io_interval: Tick,
    /// Burst ticks still owed.
    pub remaining: Tick,
    /// Executed ticks so far.
    pub steps: Tick,
    /// Set by a signal tick, cleared by the next executed tick.
    pub io_pending: bool,
}

impl SimProcess {
    pub fn new(pid: Pid, def: &ProcessDef) -> Self {
        SimProcess {
            pid,
            name: def.name.clone(),
            arrival: def.arrival,
            io_interval: def.io_interval,
            remaining: def.burst,
            steps: 0,
            io_pending: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Advance the process by one tick of CPU time.
    ///
    /// The first tick always executes. After that, whenever `steps` is a
    /// multiple of `io_interval` the process signals once before executing
    /// again, so two signals are never back to back.
    pub fn step(&mut self) -> TickKind {
        debug_assert!(!self.is_complete(), "stepping a completed process");

        let signal = self.io_interval > 0
            && self.steps > 0
            && self.steps % self.io_interval == 0
            && !self.io_pending;

        if signal {
            self.io_pending = true;
            TickKind::IoSignal
        } else {
            self.remaining = self.remaining.saturating_sub(1);
            self.steps += 1;
            self.io_pending = false;
            TickKind::Exec
        }
    }
}
