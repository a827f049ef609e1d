use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mess_mem_ctrl::{AccessKind, MemCtrlConfig, MessMemCtrl, TimingEventShim};

#[derive(Parser)]
#[command(name = "mess-bench")]
#[command(about = "Drives a curve-backed memory controller timing model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a synthetic access trace against a curve family and report
    /// achieved latency and bandwidth.
    Run {
        /// Directory holding the bwlat_{0,2,..100}.txt curve family.
        #[arg(short, long)]
        curve_path: PathBuf,

        /// Cycles to pause between each batch of accesses; lower values
        /// drive higher sustained bandwidth.
        #[arg(short, long, default_value = "1000")]
        pause: u64,

        /// Accesses per measurement window.
        #[arg(short, long, default_value = "1000")]
        window_size: u32,

        /// Simulated CPU frequency in GHz.
        #[arg(long, default_value = "1.0")]
        cpu_frequency: f64,

        /// Frequency (GHz) the curve family was characterized at.
        #[arg(long, default_value = "1.0")]
        curve_frequency: f64,

        /// On-core latency (cycles) subtracted from curve values.
        #[arg(long, default_value = "0.0")]
        on_core_latency: f64,

        /// Fraction of accesses that are reads, in [0, 1].
        #[arg(long, default_value = "1.0")]
        read_ratio: f64,

        /// Number of outer simulation loop iterations.
        #[arg(long, default_value = "120000")]
        iterations: u64,

        /// Accesses issued per outer loop iteration, before the pause.
        #[arg(long, default_value = "10")]
        batch_size: u64,
    },
    /// Load a curve family and print its characterized extremes without
    /// running a trace.
    Inspect {
        #[arg(short, long)]
        curve_path: PathBuf,

        #[arg(long, default_value = "1.0")]
        cpu_frequency: f64,

        #[arg(long, default_value = "1.0")]
        curve_frequency: f64,

        #[arg(long, default_value = "0.0")]
        on_core_latency: f64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            curve_path,
            pause,
            window_size,
            cpu_frequency,
            curve_frequency,
            on_core_latency,
            read_ratio,
            iterations,
            batch_size,
        } => run(
            curve_path,
            pause,
            window_size,
            cpu_frequency,
            curve_frequency,
            on_core_latency,
            read_ratio,
            iterations,
            batch_size,
        ),
        Commands::Inspect {
            curve_path,
            cpu_frequency,
            curve_frequency,
            on_core_latency,
        } => inspect(curve_path, cpu_frequency, curve_frequency, on_core_latency),
    }
}

#[allow(clippy::too_many_arguments)]
fn run(
    curve_path: PathBuf,
    pause: u64,
    window_size: u32,
    cpu_frequency: f64,
    curve_frequency: f64,
    on_core_latency: f64,
    read_ratio: f64,
    iterations: u64,
    batch_size: u64,
) -> anyhow::Result<()> {
    let config = MemCtrlConfig {
        curve_path,
        curve_frequency,
        window_size,
        cpu_frequency,
        on_core_latency,
    };
    let ctrl = MessMemCtrl::new(&config)?;
    let mut shim = TimingEventShim::new(ctrl);

    tracing::info!(iterations, batch_size, pause, "starting trace replay");

    let mut cycle = 0u64;
    let mut latency = 0u64;
    let mut served = 0u64;

    let write_every = if read_ratio >= 1.0 {
        u64::MAX
    } else if read_ratio <= 0.0 {
        1
    } else {
        (1.0 / (1.0 - read_ratio)).round() as u64
    };

    for i in 0..iterations {
        for j in 0..batch_size {
            let n = i * batch_size + j;
            let kind = if n % write_every == write_every - 1 {
                AccessKind::Write
            } else {
                AccessKind::Read
            };
            let split = shim.access(cycle, kind)?;
            latency = split.zero_load_latency + split.overflow;
            served += 1;
        }
        cycle += pause;
    }

    if pause != 0 {
        let ns = latency as f64 / cpu_frequency;
        let gbps = batch_size as f64 * cpu_frequency * 64.0 / pause as f64;
        println!("{served} accesses served, final latency {ns:.2} ns, achieved {gbps:.2} GB/s");
    } else {
        println!("{served} accesses served, final latency {latency} cycles");
    }

    Ok(())
}

fn inspect(
    curve_path: PathBuf,
    cpu_frequency: f64,
    curve_frequency: f64,
    on_core_latency: f64,
) -> anyhow::Result<()> {
    let store = mess_mem_ctrl::curve::CurveStore::load(&curve_path, cpu_frequency, curve_frequency, on_core_latency)?;

    println!("lead-off latency: {:.2} cycles", store.lead_off_latency());
    println!("max bandwidth:     {:.6} accesses/cycle", store.max_bandwidth());
    println!("max latency:       {:.2} cycles", store.max_latency());
    println!("buckets:           {}", store.num_buckets());

    for bucket in (0..=100usize).step_by(2) {
        let index = bucket / 2;
        let curve = store.curve(index);
        if curve.is_empty() {
            println!("  bucket {bucket:3}%: (no curve loaded)");
            continue;
        }
        println!(
            "  bucket {bucket:3}%: {} points, max bw {:.6}, max lat {:.2}",
            curve.points().len(),
            store.max_bandwidth_for_bucket(index),
            store.max_latency_for_bucket(index)
        );
    }

    Ok(())
}
