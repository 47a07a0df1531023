//! ticksim - Deterministic unit-tick CPU scheduling simulator.
//!
//! Runs a list of synthetic processes (burst, arrival, I/O interval) on one
//! simulated core and records, tick by tick, which process executed or
//! signalled I/O.
//!
//! # Architecture
//!
//! - **Engine**: Shared time-stepped dispatch loop driving a policy
//! - **Processes**: Burst / I/O-signal state machine per process
//! - **Queues**: FIFO, shortest-burst heap and tiered level sets
//! - **Policies**: FCFS, STCF, MLFQ and dynamic-quantum MLFQ
//! - **Trace**: Recorded events and the rendered token string
//!
//! # Usage
//!
//! ```rust
//! use ticksim::*;
//!
//! let workload = Workload::builder()
//!     .process("P1", 4, 0, 2)
//!     .build();
//!
//! let trace = Simulator::new(Fcfs::new()).run(&workload).unwrap();
//! assert_eq!(trace.render(), "P1 P1 !P1 P1 P1");
//! ```

pub mod config;
pub mod engine;
pub mod fmt;
pub mod policy;
pub mod process;
pub mod queue;
pub mod stats;
pub mod trace;
pub mod types;
pub mod workload;

// Re-export the main public types for convenience.
pub use config::{ConfigError, SimConfig};
pub use engine::{sim_clock, SimError, Simulator};
pub use fmt::{FmtTick, SimFormat};
pub use policy::{
    Algorithm, Dispatch, DynamicQuantum, Fcfs, Mlfq, RunOutcome, SchedPolicy, Stcf, Tunables,
};
pub use process::{ProcessDef, SimProcess, TickKind};
pub use stats::{ProcessStats, TraceStats};
pub use trace::{Trace, TraceEvent, TraceKind};
pub use types::{Level, Pid, Quantum, Tick};
pub use workload::{load_workload, parse_workload, Workload, WorkloadBuilder, WorkloadError};
