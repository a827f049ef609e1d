use std::path::PathBuf;

use mess_mem_ctrl::{AccessError, MemCtrlConfig, MessMemCtrl, StateError};

fn fixture_config(window_size: u32) -> MemCtrlConfig {
    let curve_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/bwlat");
    MemCtrlConfig {
        curve_path,
        curve_frequency: 1.0,
        window_size,
        cpu_frequency: 1.0,
        on_core_latency: 0.0,
    }
}

#[test]
fn replays_a_mixed_read_write_trace_without_error() {
    let config = fixture_config(4);
    let mut ctrl = MessMemCtrl::new(&config).unwrap();

    // Matches spec.md §8 scenario 5: 3 reads then 1 write per window closes
    // a window at a 0.75 read ratio, selecting bucket 76.
    let mut cycle = 0u64;
    for _ in 0..20 {
        ctrl.access(cycle, false).unwrap();
        cycle += 1;
        ctrl.access(cycle, false).unwrap();
        cycle += 1;
        ctrl.access(cycle, false).unwrap();
        cycle += 1;
        ctrl.access(cycle, true).unwrap();
        cycle += 1;
    }

    assert!(ctrl.current_latency() >= ctrl.lead_off_latency());
}

#[test]
fn an_all_write_trace_lands_on_bucket_zero() {
    let config = fixture_config(2);
    let mut ctrl = MessMemCtrl::new(&config).unwrap();

    let mut cycle = 0u64;
    for _ in 0..10 {
        ctrl.access(cycle, true).unwrap();
        cycle += 1;
        ctrl.access(cycle, true).unwrap();
        cycle += 1;
    }

    assert!(ctrl.current_latency() >= ctrl.lead_off_latency());
}

#[test]
fn unpopulated_bucket_reports_state_error_via_access() {
    // Bucket 50 (a 50/50 read/write mix) has no fixture file, so a trace
    // that lands exactly on it should surface the gap instead of silently
    // falling back to some other bucket's curve.
    let config = fixture_config(2);
    let mut ctrl = MessMemCtrl::new(&config).unwrap();

    let mut cycle = 0u64;
    ctrl.access(cycle, false).unwrap();
    cycle += 1;
    let result = ctrl.access(cycle, true);

    match result {
        Err(AccessError::State(StateError::EmptyCurve { bucket })) => {
            // bucket field carries the curve-array index (bucket/2), not
            // the raw percentage: a 50% read ratio selects bucket 50,
            // index 25.
            assert_eq!(bucket, 25);
        }
        other => panic!("expected EmptyCurve for bucket index 25, got {other:?}"),
    }
}
