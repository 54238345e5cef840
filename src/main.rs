//! Pulsetune CLI
//!
//! Heart-rate adaptive music agent.

use clap::{Parser, Subcommand};
use pulsetune::{
    catalog::{BlockingCatalogClient, CatalogConfig},
    config::Config,
    playback::{AudioSink, NullSink, ProcessSink},
    sensor::{SensorConfig, SimulatedSensor},
    stats::create_shared_stats_with_persistence,
    Pipeline, VERSION,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pulsetune")]
#[command(version = VERSION)]
#[command(about = "Heart-rate adaptive music agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the agent against a simulated heart-rate sensor
    Start {
        /// Catalog search API base URL
        #[arg(long)]
        catalog_url: Option<String>,

        /// Maximum candidates per catalog search
        #[arg(long)]
        limit: Option<u32>,

        /// Milliseconds between simulated samples
        #[arg(long)]
        interval_ms: Option<u64>,

        /// External player command (invoked with the stream URL)
        #[arg(long)]
        player: Option<String>,

        /// Seed for track selection (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show cumulative session statistics
    Status,

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            catalog_url,
            limit,
            interval_ms,
            player,
            seed,
        } => {
            cmd_start(catalog_url, limit, interval_ms, player, seed);
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_start(
    catalog_url: Option<String>,
    limit: Option<u32>,
    interval_ms: Option<u64>,
    player: Option<String>,
    seed: Option<u64>,
) {
    println!("Pulsetune v{VERSION}");
    println!();

    let mut config = Config::load().unwrap_or_default();
    if let Some(url) = catalog_url {
        config.catalog_url = url;
    }
    if let Some(limit) = limit {
        config.catalog_limit = limit;
    }
    if let Some(ms) = interval_ms {
        config.sample_interval_ms = ms;
    }
    if let Some(cmd) = player {
        config.player_command = Some(cmd);
    }

    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    println!("Starting agent...");
    println!("  Catalog: {}", config.catalog_url);
    println!("  HRV window: {} samples", config.hrv_window_size);
    println!("  Genre lock: {}s", config.genre_lock.as_secs());
    println!(
        "  Player: {}",
        config.player_command.as_deref().unwrap_or("log-only")
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let catalog = match BlockingCatalogClient::new(CatalogConfig::new(
        config.catalog_url.clone(),
        config.catalog_limit,
    )) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating catalog client: {e}");
            std::process::exit(1);
        }
    };

    let sink: Box<dyn AudioSink> = match config.player_command {
        Some(ref cmd) => Box::new(ProcessSink::new(cmd.clone())),
        None => Box::new(NullSink),
    };

    let stats = create_shared_stats_with_persistence(config.data_path.join("stats.json"));
    println!("Session ID: {}", stats.session_id());

    let mut pipeline = Pipeline::with_settings(
        catalog,
        sink,
        stats.clone(),
        config.hrv_window_size,
        config.initial_hrv_ms,
        chrono::Duration::from_std(config.genre_lock).unwrap_or(chrono::Duration::seconds(30)),
        chrono::Duration::from_std(config.replay_interval).unwrap_or(chrono::Duration::seconds(30)),
    );
    if let Some(seed) = seed {
        pipeline = pipeline.with_seed(seed);
    }

    let mut sensor = SimulatedSensor::new(SensorConfig {
        sample_interval: Duration::from_millis(config.sample_interval_ms),
        ..SensorConfig::default()
    });
    if let Err(e) = sensor.start() {
        eprintln!("Error starting sensor: {e}");
        std::process::exit(1);
    }

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    // Main event loop: one sample at a time, FIFO. A slow catalog fetch or
    // playback start inside process_sample leaves later samples queued in
    // the sensor channel rather than dropped.
    let receiver = sensor.receiver().clone();
    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(sample) => {
                pipeline.process_sample(&sample);
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Sensor disconnected unexpectedly");
                break;
            }
        }
    }

    // Shutdown: stop accepting samples, then stop playback exactly once.
    println!();
    println!("Stopping agent...");
    sensor.stop();
    pipeline.shutdown();

    if let Err(e) = stats.save() {
        eprintln!("Warning: Could not save session stats: {e}");
    }

    println!();
    println!("{}", stats.summary());
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("Pulsetune Status");
    println!("================");
    println!();

    let stats_path = config.data_path.join("stats.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative Statistics:");
                if let Some(samples) = stats.get("samples_processed") {
                    println!("  Samples processed: {samples}");
                }
                if let Some(invalid) = stats.get("invalid_samples") {
                    println!("  Invalid samples dropped: {invalid}");
                }
                if let Some(windows) = stats.get("windows_completed") {
                    println!("  HRV windows completed: {windows}");
                }
                if let Some(switches) = stats.get("genre_switches") {
                    println!("  Genre switches: {switches}");
                }
                if let Some(replays) = stats.get("replays") {
                    println!("  Replays: {replays}");
                }
            }
        }
    } else {
        println!("No previous session data found.");
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}
