//! Newtype wrappers and type aliases for domain concepts.
//!
//! Newtypes for identifiers (PIDs, priority levels) prevent silent type
//! confusion. Simulated time is a plain alias since it is only ever counted
//! and compared.

use std::fmt;

/// Simulated time in unit ticks.
pub type Tick = u64;

/// Process identifier: the 0-based position of the descriptor in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Pid(pub u32);

impl Pid {
    /// Pid of the descriptor at `index`, or `None` past `u32::MAX`.
    pub fn from_index(index: usize) -> Option<Pid> {
        u32::try_from(index).ok().map(Pid)
    }
}

/// Priority level in a multi-level queue. Level 0 is the highest priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Level(pub u8);

impl Level {
    pub const TOP: Level = Level(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The next lower priority level, saturating at `lowest`.
    pub fn demoted(self, lowest: Level) -> Level {
        if self < lowest {
            Level(self.0 + 1)
        } else {
            lowest
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Maximum number of ticks a process may hold the CPU in one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantum {
    /// Preempt after this many ticks (signal ticks included).
    Ticks(Tick),
    /// Run until the process completes or yields.
    Unbounded,
}

impl Quantum {
    /// Whether `used` ticks consume the whole quantum.
    pub fn is_exhausted(self, used: Tick) -> bool {
        match self {
            Quantum::Ticks(n) => used >= n,
            Quantum::Unbounded => false,
        }
    }

    /// Shrink by one tick without going below `floor`. Unbounded stays unbounded.
    pub fn decayed(self, floor: Tick) -> Quantum {
        match self {
            Quantum::Ticks(n) => Quantum::Ticks(n.saturating_sub(1).max(floor)),
            Quantum::Unbounded => Quantum::Unbounded,
        }
    }
}

impl fmt::Display for Quantum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantum::Ticks(n) => write!(f, "{n}"),
            Quantum::Unbounded => f.write_str("inf"),
        }
    }
}
