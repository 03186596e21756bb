//! devboard - terminal developer dashboard.
//!
//! Usage:
//!   devboard                       # weather for "Pune, In" in °F, refreshed every 15 minutes
//!   devboard "Berlin, DE" C        # weather for Berlin in °C
//!   devboard "Berlin, DE" C 300    # ... refreshed every 5 minutes
//!   devboard "" C                  # offline: canned weather, no network access
//!
//! Environment:
//!   DEVBOARD_LOG       write logs to this file (nothing is logged otherwise)
//!   DEVBOARD_FONT_DIR  directory with FIGlet `.flf` fonts for the clock
//!   RUST_LOG           log filter override

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use devboard::banner::{Banner, FigletBanner};
use devboard::provider::Fetcher;
use devboard::provider::mock::offline_weather;
use devboard::provider::weather::{DegreeType, WeatherQuery, WeatherReport, WttrSource};
use devboard::tui::App;
use devboard::tui::widgets::TodayConfig;

/// Terminal developer dashboard.
#[derive(Parser)]
#[command(name = "devboard", about = "Terminal developer dashboard", version)]
struct Args {
    /// Weather location search string; empty runs offline with canned weather.
    #[arg(value_name = "SEARCH", default_value = "Pune, In")]
    search: String,

    /// Temperature unit (F or C).
    #[arg(value_name = "UNITS", default_value = "F")]
    units: DegreeType,

    /// Weather refresh interval in seconds; 0 disables periodic refresh.
    #[arg(value_name = "INTERVAL", default_value = "900")]
    interval: u64,
}

/// Installs a file logger when `DEVBOARD_LOG` is set.
///
/// The terminal is in raw alternate-screen mode while the dashboard runs, so
/// logs never go to stdout or stderr.
fn init_logging() {
    let Some(path) = std::env::var_os("DEVBOARD_LOG") else {
        return;
    };
    let file = match File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", path, e);
            return;
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devboard=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging();

    let source: Arc<dyn Fetcher<WeatherQuery, WeatherReport>> =
        if args.search.trim().is_empty() {
            info!("no search string, using offline weather");
            Arc::new(offline_weather(args.units))
        } else {
            match WttrSource::new() {
                Ok(s) => Arc::new(s),
                Err(e) => {
                    eprintln!("Error: cannot create weather client: {}", e);
                    std::process::exit(1);
                }
            }
        };

    let banner: Arc<dyn Banner> = match std::env::var_os("DEVBOARD_FONT_DIR") {
        Some(dir) => Arc::new(FigletBanner::from_dir(dir)),
        None => Arc::new(FigletBanner::standard()),
    };

    let config = TodayConfig {
        refresh: Some(Duration::from_secs(args.interval)),
        query: WeatherQuery {
            search: args.search,
            degree_type: args.units,
        },
        ..TodayConfig::default()
    };

    let runtime = match devboard::runtime::build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to build tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    info!(search = %config.query.search, units = %config.query.degree_type, "starting dashboard");
    let result = devboard::runtime::block_on_detached(runtime, async move {
        let app = App::new(config, source, banner);
        app.run().await
    });

    if let Err(e) = result {
        error!(error = %e, "dashboard failed");
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}
