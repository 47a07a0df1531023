//! Workload definition, builder API and descriptor-file loader.
//!
//! The descriptor file format is line oriented:
//!
//! ```text
//! 3
//! P1,4,0,2
//! P2,6,1,0
//! P3,2,3,1
//! ```
//!
//! The first line is the process count `N`; each of the next `N` lines is
//! `name,burst,arrival,io_interval`. Fields may be padded with whitespace.
//! Trailing blank lines are ignored, and extra lines after the `N`-th
//! descriptor are skipped with a warning.

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::engine::SimError;
use crate::process::ProcessDef;
use crate::types::{Pid, Tick};

/// Errors from loading a descriptor file.
#[derive(Debug)]
pub enum WorkloadError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The count line is missing.
    MissingCount,
    /// The count line is not a non-negative integer.
    InvalidCount(String),
    /// Fewer descriptor lines than the count announced.
    Truncated { expected: usize, found: usize },
    /// A descriptor line could not be parsed.
    Malformed { line: usize, reason: String },
    /// A descriptor parsed but cannot be simulated.
    Invalid(SimError),
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadError::Io(e) => write!(f, "I/O error: {e}"),
            WorkloadError::MissingCount => write!(f, "missing process count on line 1"),
            WorkloadError::InvalidCount(s) => write!(f, "invalid process count: {s:?}"),
            WorkloadError::Truncated { expected, found } => {
                write!(f, "expected {expected} processes, found {found}")
            }
            WorkloadError::Malformed { line, reason } => write!(f, "line {line}: {reason}"),
            WorkloadError::Invalid(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for WorkloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkloadError::Io(e) => Some(e),
            WorkloadError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WorkloadError {
    fn from(e: std::io::Error) -> Self {
        WorkloadError::Io(e)
    }
}

impl From<SimError> for WorkloadError {
    fn from(e: SimError) -> Self {
        WorkloadError::Invalid(e)
    }
}

/// An ordered list of process descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workload {
    processes: Vec<ProcessDef>,
}

impl Workload {
    pub fn new(processes: Vec<ProcessDef>) -> Self {
        Workload { processes }
    }

    /// Create a new workload builder.
    pub fn builder() -> WorkloadBuilder {
        WorkloadBuilder::default()
    }

    pub fn processes(&self) -> &[ProcessDef] {
        &self.processes
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Sum of all burst lengths.
    pub fn total_burst(&self) -> Tick {
        self.processes.iter().map(|p| p.burst).sum()
    }

    /// Check every descriptor without running anything.
    pub fn validate(&self) -> Result<(), SimError> {
        for (i, def) in self.processes.iter().enumerate() {
            let pid = Pid::from_index(i).ok_or(SimError::TooManyProcesses {
                count: self.processes.len(),
            })?;
            def.check()
                .map_err(|reason| SimError::InvalidProcessDescriptor {
                    pid,
                    name: def.name.clone(),
                    reason,
                })?;
        }
        Ok(())
    }
}

impl From<Vec<ProcessDef>> for Workload {
    fn from(processes: Vec<ProcessDef>) -> Self {
        Workload::new(processes)
    }
}

/// Builder for constructing workloads.
#[derive(Debug, Default)]
pub struct WorkloadBuilder {
    processes: Vec<ProcessDef>,
}

impl WorkloadBuilder {
    /// Add a process from its four descriptor fields.
    pub fn process(
        mut self,
        name: &str,
        burst: Tick,
        arrival: Tick,
        io_interval: Tick,
    ) -> Self {
        self.processes
            .push(ProcessDef::new(name, burst, arrival, io_interval));
        self
    }

    /// Add a fully specified process definition.
    pub fn def(mut self, def: ProcessDef) -> Self {
        self.processes.push(def);
        self
    }

    pub fn build(self) -> Workload {
        Workload {
            processes: self.processes,
        }
    }
}

/// Parse one numeric descriptor field.
fn parse_field(line: usize, field: &'static str, raw: &str) -> Result<Tick, WorkloadError> {
    let raw = raw.trim();
    let value: i64 = raw.parse().map_err(|_| WorkloadError::Malformed {
        line,
        reason: format!("{field} {raw:?} is not an integer"),
    })?;
    if value < 0 {
        return Err(WorkloadError::Malformed {
            line,
            reason: format!("{field} must not be negative, got {value}"),
        });
    }
    Ok(value as Tick)
}

/// Parse a `name,burst,arrival,io_interval` line.
fn parse_descriptor(line: usize, text: &str) -> Result<ProcessDef, WorkloadError> {
    let fields: Vec<&str> = text.split(',').collect();
    if fields.len() != 4 {
        return Err(WorkloadError::Malformed {
            line,
            reason: format!("expected 4 comma-separated fields, found {}", fields.len()),
        });
    }
    Ok(ProcessDef {
        name: fields[0].trim().to_string(),
        burst: parse_field(line, "burst", fields[1])?,
        arrival: parse_field(line, "arrival", fields[2])?,
        io_interval: parse_field(line, "io_interval", fields[3])?,
    })
}

/// Parse descriptor-file text into a validated [`Workload`].
pub fn parse_workload(input: &str) -> Result<Workload, WorkloadError> {
    let mut lines = input.lines().enumerate().map(|(i, l)| (i + 1, l));

    let count_line = lines
        .by_ref()
        .find(|(_, l)| !l.trim().is_empty())
        .map(|(_, l)| l.trim())
        .ok_or(WorkloadError::MissingCount)?;
    let count: usize = count_line
        .parse()
        .map_err(|_| WorkloadError::InvalidCount(count_line.to_string()))?;

    let mut processes = Vec::with_capacity(count);
    for (line, text) in lines.by_ref() {
        if processes.len() == count {
            if !text.trim().is_empty() {
                warn!(line, "ignoring descriptor beyond the announced count");
            }
            continue;
        }
        if text.trim().is_empty() {
            continue;
        }
        processes.push(parse_descriptor(line, text)?);
    }

    if processes.len() < count {
        return Err(WorkloadError::Truncated {
            expected: count,
            found: processes.len(),
        });
    }

    let workload = Workload::new(processes);
    workload.validate()?;
    debug!(processes = workload.len(), "parsed workload");
    Ok(workload)
}

/// Read and parse a descriptor file.
pub fn load_workload(path: &Path) -> Result<Workload, WorkloadError> {
    let text = std::fs::read_to_string(path)?;
    parse_workload(&text)
}
