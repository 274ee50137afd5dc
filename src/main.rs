//! CLI entry point for the movie report tool.
//!
//! Loads the metadata and ratings CSVs, prints the computed aggregates,
//! and persists selected ones as JSON reports.

use anyhow::Result;
use clap::Parser;
use movie_report::analyzers::aggregate::{
    average_rating_per_movie, genre_counts, releases_per_year, top_rated,
};
use movie_report::loader::{MetadataLoad, dedup_rows, load_metadata, load_ratings};
use movie_report::model::count_identity_duplicates;
use movie_report::output::{
    print_average_ratings, print_genre_counts, print_releases_per_year, print_top_rated,
    print_unique_movies, write_json_report,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "movie_report")]
#[command(about = "Batch reports over movie metadata and ratings CSVs", long_about = None)]
struct Cli {
    /// Path to the movie metadata CSV
    #[arg(long, default_value = "csv/movies_metadata.csv")]
    metadata: PathBuf,

    /// Path to the ratings CSV
    #[arg(long, default_value = "csv/ratings_small.csv")]
    ratings: PathBuf,

    /// Directory JSON reports are written to
    #[arg(short, long, default_value = "json")]
    output_dir: PathBuf,

    /// Number of entries in the top-rated ranking
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Persist all four aggregates instead of only the genre counts
    #[arg(long, default_value_t = false)]
    persist_all: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/movie_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("movie_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "report run failed");
            println!("An error occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Orchestrates one report run: load, dedup, aggregate, print, persist.
fn run(cli: &Cli) -> Result<()> {
    let MetadataLoad { rows, skipped } = load_metadata(&cli.metadata)?;
    info!(rows = rows.len(), skipped, "metadata loaded");

    let movies = dedup_rows(rows);
    debug!(
        identity_duplicates = count_identity_duplicates(&movies),
        "metadata deduplicated"
    );

    print_unique_movies(movies.len());
    if skipped > 0 {
        warn!(skipped, "rows dropped: id column failed numeric coercion");
        println!("Rows skipped (unparseable id): {skipped}");
    }

    let ratings = load_ratings(&cli.ratings)?;
    let averages = average_rating_per_movie(&ratings);
    print_average_ratings(&averages);
    info!(movies = averages.len(), "average ratings computed");

    let top = top_rated(&movies, cli.top);
    print_top_rated(&top);
    info!(entries = top.len(), "top-rated ranking computed");

    let per_year = releases_per_year(&movies);
    print_releases_per_year(&per_year);
    info!(years = per_year.len(), "release counts computed");

    let genres = genre_counts(&movies)?;
    print_genre_counts(&genres);
    info!(genres = genres.len(), "genre counts computed");

    write_json_report(&cli.output_dir, "genres.json", &genres)?;
    if cli.persist_all {
        write_json_report(&cli.output_dir, "averageRatings.json", &averages)?;
        write_json_report(&cli.output_dir, "topFive.json", &top)?;
        write_json_report(&cli.output_dir, "releases.json", &per_year)?;
    }
    info!(
        output_dir = %cli.output_dir.display(),
        persist_all = cli.persist_all,
        "reports persisted"
    );

    Ok(())
}
