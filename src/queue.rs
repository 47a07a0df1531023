//! Ready-structure simulation.
//!
//! Provides the FIFO and shortest-burst-first ready queues the policies hold
//! processes in, and a tiered [`LevelSet`] of either kind for the multi-level
//! feedback policies. Queues own the processes they hold; the engine moves a
//! process out on dispatch and back in on requeue.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use crate::process::SimProcess;
use crate::types::{Level, Tick};

/// Common interface of the ready queues.
pub trait ReadyQueue: Default {
    /// Insert a process.
    fn push(&mut self, process: SimProcess);

    /// Remove the highest-priority process.
    fn pop(&mut self) -> Option<SimProcess>;

    /// Number of queued processes.
    fn len(&self) -> usize;

    /// Whether the queue is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every process, in priority order.
    fn drain_all(&mut self) -> Vec<SimProcess> {
        let mut out = Vec::with_capacity(self.len());
        while let Some(p) = self.pop() {
            out.push(p);
        }
        out
    }
}

/// First-in first-out queue.
#[derive(Debug, Default)]
pub struct FifoQueue {
    entries: VecDeque<SimProcess>,
}

impl FifoQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a process back at the head of the queue.
    pub fn push_front(&mut self, process: SimProcess) {
        self.entries.push_front(process);
    }

    /// Names in queue order, for diagnostics.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|p| p.name.as_str()).collect()
    }
}

impl ReadyQueue for FifoQueue {
    fn push(&mut self, process: SimProcess) {
        self.entries.push_back(process);
    }

    fn pop(&mut self) -> Option<SimProcess> {
        self.entries.pop_front()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Heap entry ordered by `(remaining, arrival, name, pid)`.
///
/// The trailing pid makes the order total even for duplicate names, so
/// the pop order never depends on insertion history.
#[derive(Debug)]
struct ByBurst(SimProcess);

impl ByBurst {
    fn key(&self) -> (Tick, Tick, &str, crate::types::Pid) {
        let p = &self.0;
        (p.remaining, p.arrival, p.name.as_str(), p.pid)
    }
}

impl PartialEq for ByBurst {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ByBurst {}

impl Ord for ByBurst {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for ByBurst {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap popping the process with the least remaining burst.
#[derive(Debug, Default)]
pub struct BurstHeap {
    heap: BinaryHeap<Reverse<ByBurst>>,
}

impl BurstHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining burst of the process that would be popped next.
    pub fn peek_remaining(&self) -> Option<Tick> {
        self.heap.peek().map(|Reverse(e)| e.0.remaining)
    }
}

impl ReadyQueue for BurstHeap {
    fn push(&mut self, process: SimProcess) {
        self.heap.push(Reverse(ByBurst(process)));
    }

    fn pop(&mut self) -> Option<SimProcess> {
        self.heap.pop().map(|Reverse(e)| e.0)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// A fixed number of priority levels, each its own ready queue.
#[derive(Debug)]
pub struct LevelSet<Q: ReadyQueue> {
    levels: Vec<Q>,
}

impl<Q: ReadyQueue> LevelSet<Q> {
    pub fn new(nr_levels: usize) -> Self {
        assert!(nr_levels > 0, "level set needs at least one level");
        LevelSet {
            levels: (0..nr_levels).map(|_| Q::default()).collect(),
        }
    }

    /// The lowest priority level.
    pub fn lowest(&self) -> Level {
        Level((self.levels.len() - 1) as u8)
    }

    pub fn push(&mut self, level: Level, process: SimProcess) {
        self.levels[level.index()].push(process);
    }

    /// Pop from the highest-priority non-empty level.
    pub fn pop_highest(&mut self) -> Option<(Level, SimProcess)> {
        self.levels
            .iter_mut()
            .enumerate()
            .find_map(|(i, q)| q.pop().map(|p| (Level(i as u8), p)))
    }

    /// Move every process in `from` to `to`, preserving `from`'s pop order.
    /// Returns the number of processes moved.
    pub fn migrate(&mut self, from: Level, to: Level) -> usize {
        if from == to {
            return 0;
        }
        let moved = self.levels[from.index()].drain_all();
        let n = moved.len();
        for p in moved {
            self.levels[to.index()].push(p);
        }
        n
    }

    pub fn len_at(&self, level: Level) -> usize {
        self.levels[level.index()].len()
    }

    /// Total number of queued processes across all levels.
    pub fn len(&self) -> usize {
        self.levels.iter().map(|q| q.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(|q| q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessDef;
    use crate::types::Pid;

    fn proc(pid: u32, name: &str, burst: Tick, arrival: Tick) -> SimProcess {
        SimProcess::new(Pid(pid), &ProcessDef::new(name, burst, arrival, 0))
    }

    #[test]
    fn test_fifo_order() {
        let mut q = FifoQueue::new();
        q.push(proc(0, "a", 5, 0));
        q.push(proc(1, "b", 1, 0));
        q.push_front(proc(2, "c", 3, 0));
        assert_eq!(q.names(), vec!["c", "a", "b"]);
        assert_eq!(q.pop().map(|p| p.pid), Some(Pid(2)));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_heap_orders_by_remaining_then_arrival_then_name() {
        let mut h = BurstHeap::new();
        h.push(proc(0, "late", 2, 5));
        h.push(proc(1, "long", 9, 0));
        h.push(proc(2, "early", 2, 1));
        h.push(proc(3, "b", 2, 1));
        assert_eq!(h.peek_remaining(), Some(2));

        let order: Vec<String> = h.drain_all().into_iter().map(|p| p.name).collect();
        assert_eq!(order, vec!["b", "early", "late", "long"]);
    }

    #[test]
    fn test_heap_duplicate_names_fall_back_to_pid() {
        let mut h = BurstHeap::new();
        h.push(proc(7, "dup", 3, 0));
        h.push(proc(2, "dup", 3, 0));
        assert_eq!(h.pop().map(|p| p.pid), Some(Pid(2)));
        assert_eq!(h.pop().map(|p| p.pid), Some(Pid(7)));
        assert!(h.is_empty());
    }

    #[test]
    fn test_level_set_pops_highest_first() {
        let mut set: LevelSet<FifoQueue> = LevelSet::new(3);
        set.push(Level(2), proc(0, "low", 1, 0));
        set.push(Level(1), proc(1, "mid", 1, 0));
        assert_eq!(set.len(), 2);

        let (level, p) = set.pop_highest().unwrap();
        assert_eq!((level, p.name.as_str()), (Level(1), "mid"));
        let (level, p) = set.pop_highest().unwrap();
        assert_eq!((level, p.name.as_str()), (Level(2), "low"));
        assert!(set.pop_highest().is_none());
    }

    #[test]
    fn test_level_set_migrate_appends_in_order() {
        let mut set: LevelSet<FifoQueue> = LevelSet::new(3);
        set.push(Level(0), proc(0, "top", 1, 0));
        set.push(Level(2), proc(1, "x", 1, 0));
        set.push(Level(2), proc(2, "y", 1, 0));

        assert_eq!(set.migrate(Level(2), Level(0)), 2);
        assert_eq!(set.len_at(Level(2)), 0);
        assert_eq!(set.len_at(Level(0)), 3);

        let names: Vec<String> = std::iter::from_fn(|| set.pop_highest())
            .map(|(_, p)| p.name)
            .collect();
        assert_eq!(names, vec!["top", "x", "y"]);
    }
}
