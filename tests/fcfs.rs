use ticksim::*;

mod common;

/// The first tick always executes; the signal comes once `steps` reaches
/// the interval.
#[test]
fn test_single_process_with_io() {
    common::setup_test();
    let workload = Workload::builder().process("P1", 4, 0, 2).build();
    let trace = common::simulate(Fcfs::new(), &workload);

    assert_eq!(trace.render(), "P1 P1 !P1 P1 P1");
    common::assert_trace_invariants(&trace);
}

#[test]
fn test_runs_in_arrival_order() {
    common::setup_test();
    let workload = Workload::builder()
        .process("A", 3, 0, 0)
        .process("B", 2, 1, 0)
        .process("C", 1, 1, 0)
        .build();
    let trace = common::simulate(Fcfs::new(), &workload);

    assert_eq!(trace.render(), "A A A B B C");
    common::assert_trace_invariants(&trace);
}

/// A process keeps the CPU through its own I/O signals.
#[test]
fn test_no_preemption_on_io() {
    common::setup_test();
    let workload = Workload::builder()
        .process("A", 3, 0, 1)
        .process("B", 1, 0, 0)
        .build();
    let trace = common::simulate(Fcfs::new(), &workload);

    assert_eq!(trace.render(), "A !A A !A A B");
    assert_eq!(trace.dispatch_count(Pid(0)), 1);
    common::assert_trace_invariants(&trace);
}

#[test]
fn test_all_of_earlier_arrival_before_later() {
    common::setup_test();
    let workload = Workload::builder()
        .process("late", 2, 4, 0)
        .process("early", 6, 0, 3)
        .build();
    let trace = common::simulate(Fcfs::new(), &workload);

    let tokens = trace.tokens();
    let last_early = tokens.iter().rposition(|t| t.ends_with("early")).unwrap();
    let first_late = tokens.iter().position(|t| t.ends_with("late")).unwrap();
    assert!(last_early < first_late);
    common::assert_trace_invariants(&trace);
}

/// Idle ticks render as empty tokens between the gaps.
#[test]
fn test_idle_gap() {
    common::setup_test();
    let workload = Workload::builder()
        .process("A", 1, 0, 0)
        .process("B", 1, 3, 0)
        .build();
    let trace = common::simulate(Fcfs::new(), &workload);

    assert_eq!(trace.render(), "A   B");
    assert_eq!(trace.idle_count(), 2);
    common::assert_trace_invariants(&trace);
}

#[test]
fn test_leading_idle_is_trimmed() {
    common::setup_test();
    let workload = Workload::builder().process("A", 2, 2, 0).build();
    let trace = common::simulate(Fcfs::new(), &workload);

    assert_eq!(trace.tokens(), vec!["", "", "A", "A"]);
    assert_eq!(trace.render(), "A A");
}
