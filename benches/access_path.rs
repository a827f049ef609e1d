use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mess_mem_ctrl::{MemCtrlConfig, MessMemCtrl};
use std::fs;
use std::path::PathBuf;

fn fixture_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("mess-bench-fixture-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("bwlat_100.txt"), "0.0100 200\n0.0050 120\n0.0010 80\n").unwrap();
    dir
}

fn access_path(c: &mut Criterion) {
    let dir = fixture_dir();
    let config = MemCtrlConfig {
        curve_path: dir.clone(),
        curve_frequency: 1.0,
        window_size: 1000,
        cpu_frequency: 1.0,
        on_core_latency: 0.0,
    };
    let mut ctrl = MessMemCtrl::new(&config).unwrap();
    let mut cycle = 0u64;

    c.bench_function("access_read_steady_state", |b| {
        b.iter(|| {
            let latency = ctrl.access(black_box(cycle), false).unwrap();
            cycle += 1;
            black_box(latency)
        })
    });

    let _ = fs::remove_dir_all(&dir);
}

criterion_group!(benches, access_path);
criterion_main!(benches);
