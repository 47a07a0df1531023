#![allow(dead_code)]

use ticksim::{SchedPolicy, SimFormat, Simulator, Trace, TraceKind, Workload};

/// Initialize tracing from `RUST_LOG`.
///
/// `try_init()` is idempotent: first call in the process succeeds,
/// subsequent calls are silently ignored.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .event_format(SimFormat)
        .try_init();
}

/// Run a workload to completion, dumping the trace for debugging.
pub fn simulate<P: SchedPolicy>(policy: P, workload: &Workload) -> Trace {
    let trace = Simulator::new(policy)
        .run(workload)
        .expect("workload should be valid");
    trace.dump();
    trace
}

/// Tokens of a single process, in trace order.
pub fn tokens_of(trace: &Trace, name: &str) -> Vec<String> {
    let bang = format!("!{name}");
    trace
        .tokens()
        .into_iter()
        .filter(|t| t == name || *t == bang)
        .collect()
}

/// Assert the invariants every policy must uphold.
pub fn assert_trace_invariants(trace: &Trace) {
    // Tick events are contiguous from 0.
    let ticks: Vec<u64> = trace
        .events()
        .iter()
        .filter(|e| e.kind.is_tick())
        .map(|e| e.tick)
        .collect();
    for (i, tick) in ticks.iter().enumerate() {
        assert_eq!(*tick, i as u64, "tick events must be contiguous");
    }

    for (i, def) in trace.processes().iter().enumerate() {
        let pid = ticksim::Pid(i as u32);

        assert_eq!(
            trace.exec_count(pid) as u64,
            def.burst,
            "{}: executed ticks must equal the burst",
            def.name
        );
        if def.io_interval == 0 {
            assert_eq!(trace.signal_count(pid), 0, "{}: signalled without I/O", def.name);
        }

        // No two signals in a row within the process's own token stream.
        let mut last_was_signal = false;
        for event in trace.events() {
            match event.kind {
                TraceKind::IoSignal { pid: p } if p == pid => {
                    assert!(!last_was_signal, "{}: repeated I/O signal", def.name);
                    last_was_signal = true;
                }
                TraceKind::Exec { pid: p } if p == pid => last_was_signal = false,
                _ => {}
            }
        }

        let done = trace
            .completion_tick(pid)
            .unwrap_or_else(|| panic!("{} never completed", def.name));
        for event in trace.events() {
            match event.kind {
                TraceKind::Exec { pid: p } | TraceKind::IoSignal { pid: p } if p == pid => {
                    assert!(event.tick < done, "{} ran after completing", def.name);
                    assert!(event.tick >= def.arrival, "{} ran before arriving", def.name);
                }
                _ => {}
            }
        }
    }
}

/// Ticks at which a priority boost fired.
pub fn boost_ticks(trace: &Trace) -> Vec<u64> {
    trace
        .events()
        .iter()
        .filter(|e| matches!(e.kind, TraceKind::Boost { .. }))
        .map(|e| e.tick)
        .collect()
}
