//! Report formatting and persistence.
//!
//! Aggregates are printed to stdout in fixed line formats and written as
//! pretty-printed JSON reports under the output directory. Logging stays
//! on stderr and the log file; stdout carries only the report itself.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::TopMovie;
use crate::error::ReportError;

/// Writes `value` as pretty-printed JSON (4-space indent) to `dir/name`.
///
/// Creates the directory if absent and overwrites any existing file of the
/// same name. Not atomic: a crash mid-write leaves a partial file.
pub fn write_json_report(
    dir: &Path,
    name: &str,
    value: &impl Serialize,
) -> Result<(), ReportError> {
    let sink_err = |source: serde_json::Error| ReportError::Sink {
        name: name.to_string(),
        source,
    };

    fs::create_dir_all(dir).map_err(|e| sink_err(serde_json::Error::io(e)))?;
    let path = dir.join(name);
    debug!(path = %path.display(), "writing JSON report");

    let file = File::create(&path).map_err(|e| sink_err(serde_json::Error::io(e)))?;
    let mut serializer = serde_json::Serializer::with_formatter(
        BufWriter::new(file),
        PrettyFormatter::with_indent(b"    "),
    );
    value.serialize(&mut serializer).map_err(sink_err)?;
    serializer.into_inner().flush().map_err(|e| sink_err(serde_json::Error::io(e)))
}

pub fn print_unique_movies(count: usize) {
    println!("\nNumber of Unique Movies in metadata:");
    println!("{count}");
}

pub fn print_average_ratings(averages: &BTreeMap<i64, f64>) {
    println!("\nMovie Ids by Average Rating:");
    for (movie_id, rating) in averages {
        println!("{movie_id} \t\t {rating:.2}");
    }
}

pub fn print_top_rated(top: &[TopMovie]) {
    println!("\nTop {} Rated Movies:", top.len());
    for movie in top {
        println!(
            "ID: {} \t Title: {} \t Vote Average: {:.2}",
            movie.id,
            movie.title,
            movie.vote_average.unwrap_or(0.0)
        );
    }
}

pub fn print_releases_per_year(per_year: &BTreeMap<i32, u64>) {
    println!("\nNumber of Movies Released Each Year:");
    for (year, count) in per_year {
        println!("Year: {year} \t Movies Released: {count}");
    }
}

pub fn print_genre_counts(counts: &IndexMap<String, u64>) {
    println!("\nNumber of Movies in Each Genre:");
    for (genre, count) in counts {
        println!("Genre: {genre} \t Movies: {count}");
    }
}
