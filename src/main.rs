//! CLI entry point for the bikeshare statistics tool.
//!
//! Provides subcommands for computing trip statistics over a city's data,
//! paging through the raw trips behind them, and listing the known cities.

use anyhow::Result;
use bikeshare_stats::analyzers::CityReport;
use bikeshare_stats::config::Config;
use bikeshare_stats::filter::TimeFilter;
use bikeshare_stats::output::{write_json, write_rows};
use bikeshare_stats::parser::ParsePolicy;
use bikeshare_stats::records::{City, Dataset, weekday_name};
use bikeshare_stats::store::RecordStore;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Descriptive statistics over US bike-share trip data", long_about = None)]
struct Cli {
    /// Directory holding the per-city CSV files (overrides BIKESHARE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Skip malformed rows instead of aborting the load
    #[arg(long, global = true, default_value_t = false)]
    skip_malformed: bool,

    #[command(subcommand)]
    command: Commands,
}

/// City plus the time restriction applied before any statistic is computed.
#[derive(Args)]
struct Selection {
    /// chicago, new york city or washington
    #[arg(value_name = "CITY")]
    city: String,

    /// Month name to restrict to, or "all"
    #[arg(short, long, default_value = "all")]
    month: String,

    /// Weekday name to restrict to, or "all"
    #[arg(short, long, default_value = "all")]
    day: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute time, station, duration and user statistics
    Stats {
        #[command(flatten)]
        selection: Selection,

        /// Print the report as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print raw trip rows as CSV, one window at a time
    Rows {
        #[command(flatten)]
        selection: Selection,

        /// Index of the first row to print
        #[arg(short, long, default_value_t = 0)]
        offset: usize,

        /// Rows per window (defaults to BIKESHARE_PAGE_SIZE, else 5)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Number of successive windows to print
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// List known cities and the optional columns their data carries
    Cities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if cli.skip_malformed {
        config.policy = ParsePolicy::Skip;
    }
    let store = config.store();

    match cli.command {
        Commands::Stats { selection, json } => {
            let (dataset, filter) = select(&store, &selection)?;
            if dataset.is_empty() {
                warn!(city = %dataset.city(), %filter, "No trips match the selected filter");
                return Ok(());
            }

            let report = CityReport::build(&dataset, filter)?;
            if json {
                write_json(std::io::stdout().lock(), &report)?;
            } else {
                log_report(&report);
            }
        }
        Commands::Rows {
            selection,
            offset,
            limit,
            pages,
        } => {
            let (dataset, filter) = select(&store, &selection)?;
            let size = limit.unwrap_or(config.page_size);
            let mut out = std::io::stdout().lock();

            let mut printed = 0;
            for (i, page) in dataset.pages(offset, size).take(pages).enumerate() {
                write_rows(&mut out, page, i == 0)?;
                printed += page.len();
            }
            out.flush()?;

            info!(%filter, offset, size, printed, total = dataset.len(), "Rows printed");
        }
        Commands::Cities => {
            for city in City::ALL {
                let path = store.path_for(city);
                match store.capabilities(city) {
                    Ok(caps) => info!(
                        city = %city,
                        path = %path.display(),
                        has_gender = caps.has_gender,
                        has_birth_year = caps.has_birth_year,
                        "City"
                    ),
                    Err(e) => warn!(city = %city, path = %path.display(), error = %e, "City data unavailable"),
                }
            }
        }
    }

    Ok(())
}

/// Loads the selected city and narrows it to the requested month and weekday.
#[tracing::instrument(skip_all, fields(city = %selection.city, month = %selection.month, day = %selection.day))]
fn select(store: &RecordStore, selection: &Selection) -> Result<(Dataset, TimeFilter)> {
    // Validate the filter before touching the data.
    let filter = TimeFilter::parse(&selection.month, &selection.day)?;
    let loaded = store.load_named(&selection.city)?;
    if !loaded.skipped.is_empty() {
        warn!(skipped = loaded.skipped.len(), "Malformed rows were skipped");
    }
    Ok((filter.apply(&loaded.dataset), filter))
}

fn log_report(report: &CityReport) {
    info!(
        city = %report.city,
        filter = %report.filter,
        trips = report.trips,
        "Selection"
    );
    info!(
        month = report.time.most_common_month_name,
        weekday = weekday_name(report.time.most_common_weekday),
        hour = report.time.most_common_hour,
        "Most frequent times of travel"
    );
    info!(
        start = %report.stations.most_common_start,
        end = %report.stations.most_common_end,
        pair_start = %report.stations.most_common_pair.start,
        pair_end = %report.stations.most_common_pair.end,
        pair_trips = report.stations.most_common_pair.trips,
        "Most popular stations and trip"
    );
    info!(
        total_seconds = report.durations.total_seconds,
        total_hours = report.durations.total_hours(),
        mean_seconds = report.durations.mean_seconds,
        mean_hours = report.durations.mean_hours(),
        "Trip duration"
    );
    for (user_type, count) in &report.users.type_counts {
        info!(user_type = %user_type, count, "User type");
    }
    if let Some(genders) = &report.users.gender_counts {
        for (gender, count) in genders {
            info!(gender = %gender, count, "Gender");
        }
    }
    if let Some(years) = &report.users.birth_years {
        info!(
            earliest = years.earliest_year,
            most_recent = years.most_recent_year,
            most_common = years.most_common_year,
            "Birth year"
        );
    }
}
