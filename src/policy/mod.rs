//! Scheduling policies and the trait the engine drives them through.
//!
//! Each policy owns its ready structures. The engine admits arrivals, asks
//! for the next [`Dispatch`], runs it, and hands unfinished processes back
//! through [`SchedPolicy::requeue`] together with why the run ended.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::SimError;
use crate::process::SimProcess;
use crate::types::{Level, Quantum, Tick};

mod dynamic;
mod fcfs;
mod mlfq;
mod stcf;

pub use dynamic::DynamicQuantum;
pub use fcfs::Fcfs;
pub use mlfq::Mlfq;
pub use stcf::Stcf;

/// A process handed to the engine to run, with its time allotment.
#[derive(Debug)]
pub struct Dispatch {
    pub process: SimProcess,
    /// Level the process was taken from (always the top level for
    /// single-queue policies).
    pub level: Level,
    pub quantum: Quantum,
    /// End the run right after an I/O signal tick.
    pub yield_on_io: bool,
}

/// Why a run ended without the process completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The whole quantum was used.
    Expired,
    /// The process issued an I/O signal before its quantum ran out.
    IoYield,
}

/// Trait that wraps a scheduling policy's selection and feedback rules.
///
/// Default implementations are no-ops for the optional callbacks.
pub trait SchedPolicy {
    /// Short policy name used in logs.
    fn name(&self) -> &'static str;

    /// A process arrived. Insert it into the entry ready structure.
    fn admit(&mut self, process: SimProcess);

    /// Called once per round after admission. Returns the number of
    /// processes moved if a priority boost fired.
    fn rebalance(&mut self) -> Option<usize> {
        None
    }

    /// Remove and return the next process to run, if any is ready.
    fn pick_next(&mut self) -> Option<Dispatch>;

    /// Put back a process whose run ended without completing.
    fn requeue(&mut self, process: SimProcess, level: Level, outcome: RunOutcome);

    /// Simulated time advanced by `ticks` (idle ticks included).
    fn charge(&mut self, _ticks: Tick) {}

    /// Number of processes currently held in ready structures.
    fn nr_queued(&self) -> usize;
}

impl<P: SchedPolicy + ?Sized> SchedPolicy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn admit(&mut self, process: SimProcess) {
        (**self).admit(process)
    }

    fn rebalance(&mut self) -> Option<usize> {
        (**self).rebalance()
    }

    fn pick_next(&mut self) -> Option<Dispatch> {
        (**self).pick_next()
    }

    fn requeue(&mut self, process: SimProcess, level: Level, outcome: RunOutcome) {
        (**self).requeue(process, level, outcome)
    }

    fn charge(&mut self, ticks: Tick) {
        (**self).charge(ticks)
    }

    fn nr_queued(&self) -> usize {
        (**self).nr_queued()
    }
}

/// Tunables for the multi-level policies. `None` keeps the policy default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub boost_threshold: Option<Tick>,
    pub base_quantum: Option<Tick>,
}

/// The available scheduling policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Fcfs,
    Stcf,
    Mlfq,
    DynamicQuantum,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Fcfs,
        Algorithm::Stcf,
        Algorithm::Mlfq,
        Algorithm::DynamicQuantum,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Fcfs => "fcfs",
            Algorithm::Stcf => "stcf",
            Algorithm::Mlfq => "mlfq",
            Algorithm::DynamicQuantum => "dynamic_quantum",
        }
    }

    /// Construct the policy, validating the tunables it uses.
    ///
    /// FCFS and STCF ignore the tunables.
    pub fn build(self, tunables: Tunables) -> Result<Box<dyn SchedPolicy>, SimError> {
        let check = |name: &'static str, value: Option<Tick>| match value {
            Some(0) => Err(SimError::InvalidTunable { name, value: 0 }),
            _ => Ok(value),
        };

        Ok(match self {
            Algorithm::Fcfs => Box::new(Fcfs::new()),
            Algorithm::Stcf => Box::new(Stcf::new()),
            Algorithm::Mlfq => {
                let threshold = check("boost_threshold", tunables.boost_threshold)?
                    .unwrap_or(Mlfq::DEFAULT_BOOST_THRESHOLD);
                Box::new(Mlfq::with_boost_threshold(threshold))
            }
            Algorithm::DynamicQuantum => {
                let threshold = check("boost_threshold", tunables.boost_threshold)?
                    .unwrap_or(DynamicQuantum::DEFAULT_BOOST_THRESHOLD);
                let base = check("base_quantum", tunables.base_quantum)?
                    .unwrap_or(DynamicQuantum::DEFAULT_BASE_QUANTUM);
                Box::new(DynamicQuantum::with_params(threshold, base))
            }
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        match norm.as_str() {
            "fcfs" => Ok(Algorithm::Fcfs),
            "stcf" | "srtf" => Ok(Algorithm::Stcf),
            "mlfq" => Ok(Algorithm::Mlfq),
            "dynamic_quantum" | "dynamic" => Ok(Algorithm::DynamicQuantum),
            _ => Err(format!(
                "unknown algorithm {s:?}; expected one of fcfs, stcf, mlfq, dynamic_quantum"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("FCFS".parse::<Algorithm>().unwrap(), Algorithm::Fcfs);
        assert_eq!("stcf".parse::<Algorithm>().unwrap(), Algorithm::Stcf);
        assert_eq!(
            "dynamic-quantum".parse::<Algorithm>().unwrap(),
            Algorithm::DynamicQuantum
        );
        assert!("round_robin".parse::<Algorithm>().is_err());
        for alg in Algorithm::ALL {
            assert_eq!(alg.as_str().parse::<Algorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn test_algorithm_serde_names() {
        let alg: Algorithm = serde_json::from_str("\"dynamic_quantum\"").unwrap();
        assert_eq!(alg, Algorithm::DynamicQuantum);
        assert_eq!(serde_json::to_string(&Algorithm::Mlfq).unwrap(), "\"mlfq\"");
    }

    #[test]
    fn test_build_rejects_zero_tunables() {
        let zero_boost = Tunables {
            boost_threshold: Some(0),
            base_quantum: None,
        };
        assert!(matches!(
            Algorithm::Mlfq.build(zero_boost),
            Err(SimError::InvalidTunable {
                name: "boost_threshold",
                ..
            })
        ));

        let zero_base = Tunables {
            boost_threshold: None,
            base_quantum: Some(0),
        };
        assert!(Algorithm::DynamicQuantum.build(zero_base).is_err());
        // Tunables are not consulted by the single-queue policies.
        assert!(Algorithm::Fcfs.build(zero_base).is_ok());
    }

    #[test]
    fn test_build_names() {
        for alg in Algorithm::ALL {
            let policy = alg.build(Tunables::default()).unwrap();
            assert_eq!(policy.name(), alg.as_str());
        }
    }
}
