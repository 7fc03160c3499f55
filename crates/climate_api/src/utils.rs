use anyhow::Context;
use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::{error, info, LevelFilter};
use std::{
    env,
    fs::{self, File},
    io::Read,
    path::Path,
};
use time::{
    format_description::{well_known::Iso8601, FormatItem},
    macros::format_description,
    Date, Duration, OffsetDateTime,
};

/// Dates in the store are kept as `YYYY-MM-DD` text
pub const STORE_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Latest observation in the hawaii dataset
pub const DEFAULT_REFERENCE_DATE: &str = "2017-08-23";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;

pub fn create_folder(root_path: &str) {
    let path = Path::new(root_path);

    if !path.exists() || !path.is_dir() {
        // Create the folder if it doesn't exist
        if let Err(err) = fs::create_dir_all(path) {
            error!("error creating folder: {}", err);
        } else {
            info!("folder created: {}", root_path);
        }
    } else {
        info!("folder already exists: {}", root_path);
    }
}

#[derive(Parser, Clone, Debug, Default, serde::Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to Settings.toml file holding the rest of the cli options
    #[arg(short, long)]
    pub config: Option<String>,

    /// Set the log level (default: info)
    #[arg(short, long, env = "CLIMATE_API_LOG_LEVEL")]
    pub level: Option<String>,

    /// Host to listen at (default: 127.0.0.1)
    #[arg(short, long, env = "CLIMATE_API_DOMAIN")]
    pub domain: Option<String>,

    /// Port to listen on (default: 9100)
    #[arg(short, long, env = "CLIMATE_API_PORT")]
    pub port: Option<String>,

    /// Path to the pre-populated climate store (default: ./resources/hawaii.duckdb)
    #[arg(long, env = "CLIMATE_API_DB_PATH")]
    pub db_path: Option<String>,

    /// Date of the latest observation in the store, YYYY-MM-DD (default: 2017-08-23)
    #[arg(short, long, env = "CLIMATE_API_REFERENCE_DATE")]
    pub reference_date: Option<String>,

    /// Days before the reference date covered by the precipitation and tobs routes (default: 365)
    #[arg(long, env = "CLIMATE_API_LOOKBACK_DAYS")]
    pub lookback_days: Option<u32>,
}

impl Cli {
    pub fn db_path(&self) -> String {
        self.db_path
            .clone()
            .unwrap_or(String::from("./resources/hawaii.duckdb"))
    }

    /// First date served by the "last 12 months" routes, derived from configuration only.
    pub fn cutoff_date(&self) -> Result<String, anyhow::Error> {
        let reference = self
            .reference_date
            .as_deref()
            .unwrap_or(DEFAULT_REFERENCE_DATE);
        let lookback = self.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS);
        cutoff_date(reference, lookback)
    }
}

pub fn cutoff_date(reference: &str, lookback_days: u32) -> Result<String, anyhow::Error> {
    let reference = Date::parse(reference, STORE_DATE_FORMAT)
        .with_context(|| format!("invalid reference date `{}`", reference))?;
    // u32 days fit in a Duration without overflow, the date range is checked below
    let cutoff = reference
        .checked_sub(Duration::days(i64::from(lookback_days)))
        .with_context(|| format!("lookback of {} days is out of range", lookback_days))?;
    Ok(cutoff.format(STORE_DATE_FORMAT)?)
}

pub fn get_config_info() -> Result<Cli, anyhow::Error> {
    let cli = Cli::parse();

    match cli.config.as_deref() {
        Some(config_path) => load_config_file(config_path),
        None => Ok(cli),
    }
}

/// Reads the whole option set from a Settings.toml file. A named file that
/// can't be opened is an error rather than a silent fallback to defaults.
pub fn load_config_file(config_path: &str) -> Result<Cli, anyhow::Error> {
    let mut file = File::open(config_path)
        .with_context(|| format!("failed to open config file {}", config_path))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .with_context(|| format!("failed to read config file {}", config_path))?;
    let cli = toml::from_str(&content)
        .with_context(|| format!("failed to deserialize config {}", config_path))?;
    info!("loaded config from {}", config_path);
    Ok(cli)
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level = match cli.level.as_ref() {
        Some(level) => level.to_lowercase(),
        None => env::var("RUST_LOG")
            .unwrap_or_else(|_| String::from(""))
            .to_lowercase(),
    };
    match level.as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let now = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                now,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
