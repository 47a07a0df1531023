//! Invariants shared by every policy, checked over a mixed workload.

use ticksim::*;

mod common;

fn mixed_workload() -> Workload {
    Workload::builder()
        .process("P1", 4, 0, 2)
        .process("P2", 6, 1, 0)
        .process("P3", 3, 2, 1)
        .process("P4", 8, 3, 3)
        .process("P5", 1, 10, 0)
        .process("P6", 5, 40, 2)
        .build()
}

fn run_all(workload: &Workload) -> Vec<(Algorithm, Trace)> {
    Algorithm::ALL
        .iter()
        .map(|&algorithm| {
            let policy = algorithm.build(Tunables::default()).unwrap();
            let trace = Simulator::new(policy).run(workload).unwrap();
            (algorithm, trace)
        })
        .collect()
}

#[test]
fn test_invariants_hold_for_every_policy() {
    common::setup_test();
    for (algorithm, trace) in run_all(&mixed_workload()) {
        tracing::info!(%algorithm, trace = %trace, "checking");
        common::assert_trace_invariants(&trace);
    }
}

#[test]
fn test_every_process_appears() {
    common::setup_test();
    let workload = mixed_workload();
    for (algorithm, trace) in run_all(&workload) {
        for def in workload.processes() {
            assert!(
                !common::tokens_of(&trace, &def.name).is_empty(),
                "{algorithm}: {} missing from the trace",
                def.name
            );
        }
    }
}

/// P6 arrives at tick 40 after everything else is done: the gap is idle.
#[test]
fn test_idle_gap_for_every_policy() {
    common::setup_test();
    let workload = mixed_workload();
    for (algorithm, trace) in run_all(&workload) {
        assert!(trace.idle_count() > 0, "{algorithm}: expected idle ticks");
        let tokens = trace.tokens();
        assert_eq!(tokens.len() as u64, trace.end_tick());
        assert!(tokens[..40].iter().any(String::is_empty));
    }
}

#[test]
fn test_simulation_is_deterministic() {
    common::setup_test();
    let workload = mixed_workload();
    let first: Vec<String> = run_all(&workload).iter().map(|(_, t)| t.render()).collect();
    let second: Vec<String> = run_all(&workload).iter().map(|(_, t)| t.render()).collect();
    assert_eq!(first, second);
}

/// Signal ticks take time but not burst, so a process with I/O occupies
/// more ticks than its burst.
#[test]
fn test_signals_extend_occupancy() {
    common::setup_test();
    let workload = Workload::builder().process("io", 6, 0, 2).build();
    for (algorithm, trace) in run_all(&workload) {
        let tokens = common::tokens_of(&trace, "io");
        assert_eq!(tokens.len(), 8, "{algorithm}: {}", trace.render());
        assert_eq!(trace.signal_count(Pid(0)), 2);
    }
}

#[test]
fn test_zero_burst_never_runs() {
    common::setup_test();
    let workload = Workload::builder()
        .process("empty", 0, 0, 0)
        .process("A", 2, 0, 0)
        .build();
    for (algorithm, trace) in run_all(&workload) {
        assert_eq!(trace.render(), "A A", "{algorithm}");
        assert_eq!(trace.completion_tick(Pid(0)), Some(0));
    }
}

#[test]
fn test_invalid_descriptor_is_rejected() {
    common::setup_test();
    let workload = Workload::builder()
        .process("A", 2, 0, 0)
        .process("bad name", 1, 0, 0)
        .build();
    for algorithm in Algorithm::ALL {
        let policy = algorithm.build(Tunables::default()).unwrap();
        let err = Simulator::new(policy).run(&workload).unwrap_err();
        assert!(
            matches!(err, SimError::InvalidProcessDescriptor { pid: Pid(1), .. }),
            "{algorithm}: {err}"
        );
    }
}

#[test]
fn test_empty_workload_renders_empty() {
    common::setup_test();
    for (_, trace) in run_all(&Workload::default()) {
        assert_eq!(trace.render(), "");
    }
}
