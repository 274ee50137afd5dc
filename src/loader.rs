//! Batched CSV ingestion for the two input tables.

use crate::error::ReportError;
use crate::model::{MovieRecord, Rating};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Rows buffered per batch while reading the metadata file.
const METADATA_BATCH: usize = 10_000;
/// Rows buffered per batch while reading the ratings file.
const RATINGS_BATCH: usize = 1_000;

/// Number of columns in the metadata schema.
pub const METADATA_COLUMNS: usize = 24;

/// Result of loading the metadata file: the parsed table plus the number
/// of rows dropped because their id failed numeric coercion.
#[derive(Debug)]
pub struct MetadataLoad {
    pub rows: Vec<MovieRecord>,
    pub skipped: usize,
}

/// Reads the movie metadata CSV into a typed table.
///
/// The header row is skipped and the remaining records must carry exactly
/// [`METADATA_COLUMNS`] columns. Records are buffered in bounded batches,
/// coerced, and appended in file order. Rows whose id column is not
/// numeric are dropped and counted in [`MetadataLoad::skipped`].
pub fn load_metadata(path: &Path) -> Result<MetadataLoad, ReportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| ReportError::Load {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    let mut batch: Vec<StringRecord> = Vec::with_capacity(METADATA_BATCH);

    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|source| ReportError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        if record.len() != METADATA_COLUMNS {
            return Err(ReportError::Schema {
                path: path.to_path_buf(),
                record: index as u64 + 1,
                expected: METADATA_COLUMNS,
                found: record.len(),
            });
        }

        batch.push(record);
        if batch.len() == METADATA_BATCH {
            drain_metadata_batch(&mut batch, &mut rows, &mut skipped);
        }
    }
    drain_metadata_batch(&mut batch, &mut rows, &mut skipped);

    debug!(rows = rows.len(), skipped, "metadata load complete");
    Ok(MetadataLoad { rows, skipped })
}

fn drain_metadata_batch(
    batch: &mut Vec<StringRecord>,
    rows: &mut Vec<MovieRecord>,
    skipped: &mut usize,
) {
    for record in batch.drain(..) {
        match parse_metadata_row(&record) {
            Some(row) => rows.push(row),
            None => *skipped += 1,
        }
    }
}

/// Converts one raw record into a typed row, or `None` when the id column
/// fails numeric coercion.
fn parse_metadata_row(record: &StringRecord) -> Option<MovieRecord> {
    let id = coerce_id(record.get(5).unwrap_or(""))?;
    let field = |i: usize| record.get(i).unwrap_or("").to_string();

    Some(MovieRecord {
        adult: field(0),
        belongs_to_collection: field(1),
        budget: field(2),
        genres: field(3),
        homepage: field(4),
        id,
        imdb_id: field(6),
        original_language: field(7),
        original_title: field(8),
        overview: field(9),
        popularity: field(10),
        poster_path: field(11),
        production_companies: field(12),
        production_countries: field(13),
        release_date: field(14),
        revenue: field(15),
        runtime: field(16),
        spoken_languages: field(17),
        status: field(18),
        tagline: field(19),
        title: field(20),
        video: field(21),
        vote_average: coerce_float(record.get(22).unwrap_or("")),
        vote_count: field(23),
    })
}

/// Numeric coercion for the id column: accepts integer or float text,
/// truncating any fractional part.
fn coerce_id(raw: &str) -> Option<i64> {
    let value = raw.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value as i64)
}

fn coerce_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads the ratings CSV (`userId,movieId,rating,timestamp` schema) in
/// bounded batches. Values are type-checked by deserialization but not
/// range-validated.
pub fn load_ratings(path: &Path) -> Result<Vec<Rating>, ReportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| ReportError::Load {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    let mut batch: Vec<Rating> = Vec::with_capacity(RATINGS_BATCH);

    for result in reader.deserialize() {
        let rating: Rating = result.map_err(|source| ReportError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        batch.push(rating);
        if batch.len() == RATINGS_BATCH {
            rows.append(&mut batch);
        }
    }
    rows.append(&mut batch);

    debug!(rows = rows.len(), "ratings load complete");
    Ok(rows)
}

/// Removes rows that duplicate an earlier row on every column. First
/// occurrence wins and input order is preserved. Idempotent.
pub fn dedup_rows(rows: Vec<MovieRecord>) -> Vec<MovieRecord> {
    let mut seen: HashSet<MovieRecord> = HashSet::with_capacity(rows.len());
    rows.into_iter().filter(|row| seen.insert(row.clone())).collect()
}
