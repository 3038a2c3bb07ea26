// Module declarations
pub mod config; // Configuration management
pub mod error; // Protocol and session errors
pub mod goodwe; // GoodWe protocol, schemas and sessions
pub mod options; // Command line options parsing
pub mod prelude; // Common imports and types
pub mod utils; // Utility functions

// Get the package version from Cargo.toml
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::prelude::*;

use serde_json::{Map, Value as Json};
use std::io::Write;

fn init_logging(level: &str) {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

/// Reads one inverter and returns its report.
async fn read_inverter(inverter: &config::Inverter, with_device_info: bool) -> anyhow::Result<Json> {
    let session = Inverter::<UdpTransport>::connect(inverter).await?;
    let mut report = Map::new();

    if with_device_info {
        let info = session.read_device_info().await?;
        report.insert("device_info".to_string(), serde_json::to_value(&info)?);
    }

    let readings = session.read_runtime_data(inverter.include_unknown()).await?;
    info!(
        "{}:{}: {} readings ({:?})",
        inverter.host(),
        inverter.port(),
        readings.len(),
        session.resolution()
    );
    report.insert("runtime_data".to_string(), serde_json::to_value(&readings)?);

    Ok(Json::Object(report))
}

/// Application entry point: one runtime-data read per enabled inverter,
/// printed to stdout as JSON.
pub async fn app() -> anyhow::Result<()> {
    let options = Options::new();

    let config = ConfigWrapper::from_config(Config::new(options.config_file.clone())?);
    init_logging(&config.loglevel());

    info!("goodwe-bridge {} starting with config file: {}", CARGO_PKG_VERSION, options.config_file);
    config.log_summary();

    let inverters = config.enabled_inverters();
    if inverters.is_empty() {
        warn!("no enabled inverters in {}", options.config_file);
    }

    let results = futures::future::join_all(
        inverters
            .iter()
            .map(|inverter| read_inverter(inverter, options.device_info)),
    )
    .await;

    let mut output = Map::new();
    let mut failed = 0;
    for (inverter, result) in inverters.iter().zip(results) {
        let key = format!("{}:{}", inverter.host(), inverter.port());
        match result {
            Ok(report) => {
                output.insert(key, report);
            }
            Err(e) => {
                error!("inverter {}: {}", key, e);
                failed += 1;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&output)?);

    if failed > 0 {
        bail!("{} of {} inverter(s) failed", failed, inverters.len());
    }

    Ok(())
}
