//! Air-quality client - console driver
//!
//! Stands in for the desktop UI: subscribes to the orchestrator's
//! notifications, prints them, and replays a sequence of UI actions given on
//! the command line. Each step waits for its fetches to complete before the
//! next one runs.
//!
//! Usage:
//!   cargo run -- --search krak --station 400 --sensor 2745 --analyze --save
//!   cargo run -- --station 400 --sensor 2745 --historical
//!
//! Environment:
//!   RUST_LOG             - log filter (overrides log_filter in airmon.toml)
//!   AIRMON_API_BASE_URL  - API base URL
//!   AIRMON_CACHE_DIR     - historical cache directory

use airmon_client::config::{self, DEFAULT_CONFIG_PATH};
use airmon_client::{Notification, Orchestrator};
use std::env;
use tracing_subscriber::EnvFilter;

enum Step {
    Search(String),
    Station(i64),
    Sensor(i64),
    Save,
    Historical,
    Analyze,
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} [--config PATH] [--search TEXT] [--station ID] [--sensor ID] [--save] [--historical] [--analyze]",
        program
    );
    std::process::exit(1);
}

fn parse_id(program: &str, flag: &str, value: Option<&String>) -> i64 {
    match value.and_then(|v| v.parse().ok()) {
        Some(id) => id,
        None => {
            eprintln!("Error: {} requires a numeric id", flag);
            usage(program);
        }
    }
}

fn print_notification(notification: &Notification) {
    match notification {
        Notification::StationListUpdated { stations } => {
            println!("📋 {} stations", stations.len());
            for entry in stations.iter().take(20) {
                println!("   [{}] {}", entry.id, entry.label);
            }
            if stations.len() > 20 {
                println!("   … {} more", stations.len() - 20);
            }
        }
        Notification::StationInfoUpdated { info } => println!("🏠 {}", info),
        Notification::SensorListUpdated { sensors } => {
            println!("🔬 {} sensors", sensors.len());
            for entry in sensors {
                println!("   [{}] {}", entry.id, entry.label);
            }
        }
        Notification::MeasurementsUpdated { key, values } => {
            println!("📈 {} — {} values", key, values.len());
            for point in values.iter().take(5) {
                match point.value {
                    Some(v) => println!("   {}  {:.2}", point.date, v),
                    None => println!("   {}  —", point.date),
                }
            }
        }
        Notification::AirQualityUpdated { text, color } => {
            println!("🌫  {} [{}]", text, color.as_str())
        }
        Notification::HistoricalAvailabilityChanged { available } => {
            println!("💾 historical data available: {}", available)
        }
        Notification::AnalysisUpdated { statistics } => {
            for (name, value) in statistics.summary() {
                println!("   {}: {}", name, value);
            }
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("airmon");

    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut steps = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => match args.get(i + 1) {
                Some(path) => {
                    config_path = path.clone();
                    i += 2;
                }
                None => usage(program),
            },
            "--search" => match args.get(i + 1) {
                Some(text) => {
                    steps.push(Step::Search(text.clone()));
                    i += 2;
                }
                None => usage(program),
            },
            "--station" => {
                steps.push(Step::Station(parse_id(program, "--station", args.get(i + 1))));
                i += 2;
            }
            "--sensor" => {
                steps.push(Step::Sensor(parse_id(program, "--sensor", args.get(i + 1))));
                i += 2;
            }
            "--save" => {
                steps.push(Step::Save);
                i += 1;
            }
            "--historical" => {
                steps.push(Step::Historical);
                i += 1;
            }
            "--analyze" => {
                steps.push(Step::Analyze);
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                usage(program);
            }
        }
    }

    let config = match config::load_config_or_default(&config_path) {
        Ok(config) => config.with_env_overrides(),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("🌍 Air Quality Client");
    println!("=====================");
    println!("   API:   {}", config.api_base_url);
    println!("   Cache: {}\n", config.cache_dir().display());

    let mut orchestrator = Orchestrator::from_config(&config);
    orchestrator.subscribe(print_notification);

    orchestrator.refresh_stations();
    orchestrator.run_until_idle();

    for step in steps {
        match step {
            Step::Search(text) => orchestrator.search(&text),
            Step::Station(id) => orchestrator.select_station(id),
            Step::Sensor(id) => orchestrator.select_sensor(id),
            Step::Save => {
                let measurements = orchestrator.save_measurements();
                let air_quality = orchestrator.save_air_quality();
                println!("💾 saved measurements: {}, air quality: {}", measurements, air_quality);
            }
            Step::Historical => orchestrator.toggle_data_source(true),
            Step::Analyze => {
                if let Err(e) = orchestrator.analyze() {
                    println!("📊 {}", e);
                }
            }
        }
        orchestrator.run_until_idle();
    }
}
