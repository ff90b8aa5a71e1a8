mod capture_loop;
mod cli;
mod signals;
mod throughput_tracker;

use anyhow::Result;
use std::sync::{atomic::AtomicBool, Arc};
use throughput_tracker::ThroughputMonitor;
use tmon_capture::{stats::frame_counts, PacketSource, PcapSource};
use tmon_config::Config;
use tmon_reporter::Reporter;
use tmon_utils::{
    packet_scale::{scale_bits, scale_bytes, scale_packets},
    unix_time::unix_now,
};
use tracing::{error, info, level_filters::LevelFilter};

/// Exit status for capture setup failures.
const EXIT_CAPTURE_FAILED: i32 = 2;

pub fn set_console_logging() -> Result<()> {
    // install global collector configured based on RUST_LOG env var.
    let level = if let Ok(level) = std::env::var("RUST_LOG") {
        match level.to_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            _ => LevelFilter::WARN,
        }
    } else {
        LevelFilter::WARN
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(false)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = cli::parse();
    set_console_logging()?;
    info!("tmond starting");

    let config = Config::load(&args.config)
        .and_then(|config| config.with_overrides(args.filter, args.report_url))
        .map_err(|e| {
            error!("Unable to load configuration: {e}");
            e
        })?;

    let mut source = match PcapSource::open(&args.interface, &config.capture) {
        Ok(source) => source,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            std::process::exit(EXIT_CAPTURE_FAILED);
        }
    };

    let reporter = Reporter::start(&config.reporting)?;

    let running = Arc::new(AtomicBool::new(true));
    signals::spawn_signal_handler(running.clone())?;

    println!("Capturing traffic on {}...", source.interface_name());
    println!("Filter: {}", config.capture.filter);
    match (&config.reporting.base_url, reporter.sender().is_enabled()) {
        (Some(url), true) => println!("Reporting to: {url}"),
        _ => println!("Reporting: disabled"),
    }
    println!("Press Ctrl+C to stop\n");

    let start_second = unix_now()?;
    let mut monitor = ThroughputMonitor::new(
        config.tracking.max_addresses,
        start_second,
        reporter.sender(),
        config.tracking.print_packets,
    );
    capture_loop::run(&mut source, &mut monitor, &running);

    reporter.shutdown();
    print_summary(&monitor);
    Ok(())
}

fn print_summary<S: tmon_reporter::ReportSink>(monitor: &ThroughputMonitor<S>) {
    let (seen, accepted, rejected) = frame_counts();
    let totals = monitor.current_totals();
    println!("\n\nCapture stopped");
    println!(
        "Frames: {} seen, {} accepted, {} rejected",
        scale_packets(seen),
        scale_packets(accepted),
        scale_packets(rejected)
    );
    println!(
        "Traffic: {} total, peak {}, last 40s average {}",
        scale_bytes(totals.global.total),
        scale_bits(totals.global.peak as f32),
        scale_bits(totals.global.avg40)
    );
    println!(
        "{} seconds reported, {} address directions with traffic",
        monitor.snapshots_emitted(),
        totals.addresses.len()
    );
}
