//! # INFLIGHT Demo
//!
//! Headless driver: runs the frame loop against a worker-thread consumer
//! that checksums every vertex stream.
//!
//! ```bash
//! # Defaults
//! ./inflight_demo
//!
//! # Custom config, verbose
//! RUST_LOG=trace ./inflight_demo inflight.toml
//! ```

use std::process::ExitCode;
use std::time::{Duration, Instant};

use inflight::{
    FrameParameters, FrameScheduler, InflightConfig, QueueConsumer, TickError, Vertex,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Frames produced per run.
const TICKS: u64 = 600;

/// How long shutdown waits for the consumer.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Folds every frame's vertex bytes into a running checksum.
#[derive(Debug, Default)]
struct ChecksumExecutor {
    frames: u64,
    vertices: u64,
    checksum: u64,
}

impl ChecksumExecutor {
    fn fold(&mut self, region: &[u8], params: &FrameParameters) {
        let stream = &region[..params.vertex_count * Vertex::SIZE];
        self.checksum = stream
            .iter()
            .fold(self.checksum, |acc, &b| acc.rotate_left(5) ^ u64::from(b));
        self.frames += 1;
        self.vertices += params.vertex_count as u64;
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inflight=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}

fn load_config() -> Result<InflightConfig, inflight::ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading config");
            InflightConfig::from_toml_file(path)
        }
        None => Ok(InflightConfig::default()),
    }
}

fn main() -> ExitCode {
    init_logging();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(%e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut executor = ChecksumExecutor::default();
    let consumer = QueueConsumer::spawn(
        move |region: &[u8], params: &FrameParameters| {
            executor.fold(region, params);
            if params.frame_number == TICKS {
                tracing::info!(
                    frames = executor.frames,
                    vertices = executor.vertices,
                    checksum = executor.checksum,
                    "consumer finished"
                );
            }
        },
        config.frames_in_flight,
    );

    let mut scheduler = match FrameScheduler::from_config(&config, consumer) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            tracing::error!(%e, "failed to build frame scheduler");
            return ExitCode::FAILURE;
        }
    };

    let [width, height] = config.surface;
    let start = Instant::now();
    let mut submitted = 0;
    while submitted < TICKS {
        if submitted == TICKS / 2 && scheduler.stats().resizes == 0 {
            scheduler.on_resize(width * 2, height);
        }
        match scheduler.tick() {
            Ok(_) => submitted += 1,
            Err(TickError::Submit(e)) => tracing::debug!(%e, "frame skipped"),
            Err(e) => {
                tracing::error!(%e, "frame loop aborted");
                return ExitCode::FAILURE;
            }
        }
    }

    let elapsed = start.elapsed();
    let stats = scheduler.stats();
    tracing::info!(
        frames = stats.frames_submitted,
        failures = stats.submission_failures,
        resizes = stats.resizes,
        worst_wait = ?stats.worst_admission_wait,
        ?elapsed,
        "frame loop finished"
    );

    match scheduler.shutdown(DRAIN_TIMEOUT) {
        Ok(consumer) => {
            let completed = consumer.completed();
            drop(consumer.shutdown());
            tracing::info!(completed, "shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(%e, "shutdown failed");
            ExitCode::FAILURE
        }
    }
}
