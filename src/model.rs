//! Row types for the two input tables.

use serde::Deserialize;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// One row of the movie metadata table, fields in CSV column order.
///
/// Only the columns the aggregates consume are typed: `id` is coerced to an
/// integer during loading and `vote_average` to a float. Everything else
/// keeps the raw column text, so whole-row comparisons see exactly what the
/// file contained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieRecord {
    pub adult: String,
    pub belongs_to_collection: String,
    pub budget: String,
    pub genres: String,
    pub homepage: String,
    pub id: i64,
    pub imdb_id: String,
    pub original_language: String,
    pub original_title: String,
    pub overview: String,
    pub popularity: String,
    pub poster_path: String,
    pub production_companies: String,
    pub production_countries: String,
    pub release_date: String,
    pub revenue: String,
    pub runtime: String,
    pub spoken_languages: String,
    pub status: String,
    pub tagline: String,
    pub title: String,
    pub video: String,
    pub vote_average: Option<f64>,
    pub vote_count: String,
}

// Loading never produces NaN for vote_average, so equality is total.
impl Eq for MovieRecord {}

impl Hash for MovieRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.adult.hash(state);
        self.belongs_to_collection.hash(state);
        self.budget.hash(state);
        self.genres.hash(state);
        self.homepage.hash(state);
        self.id.hash(state);
        self.imdb_id.hash(state);
        self.original_language.hash(state);
        self.original_title.hash(state);
        self.overview.hash(state);
        self.popularity.hash(state);
        self.poster_path.hash(state);
        self.production_companies.hash(state);
        self.production_countries.hash(state);
        self.release_date.hash(state);
        self.revenue.hash(state);
        self.runtime.hash(state);
        self.spoken_languages.hash(state);
        self.status.hash(state);
        self.tagline.hash(state);
        self.title.hash(state);
        self.video.hash(state);
        self.vote_average.map(f64::to_bits).hash(state);
        self.vote_count.hash(state);
    }
}

impl MovieRecord {
    /// Identity comparison on the `(id, title)` pair.
    ///
    /// Two records can be the same movie while differing in other columns.
    /// Deduplication does NOT use this; it compares whole rows via
    /// `PartialEq`.
    pub fn is_same_movie(&self, other: &Self) -> bool {
        self.id == other.id && self.title == other.title
    }
}

/// Counts rows whose `(id, title)` identity already appeared earlier in the
/// table. Diagnostic only.
pub fn count_identity_duplicates(rows: &[MovieRecord]) -> usize {
    let mut seen: HashSet<(i64, &str)> = HashSet::with_capacity(rows.len());
    rows.iter()
        .filter(|row| !seen.insert((row.id, row.title.as_str())))
        .count()
}

/// One rating event from the ratings table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rating {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub rating: f64,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, title: &str, budget: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            budget: budget.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_identity_ignores_other_columns() {
        let a = record(862, "Toy Story", "30000000");
        let b = record(862, "Toy Story", "0");

        assert!(a.is_same_movie(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_requires_both_id_and_title() {
        let a = record(862, "Toy Story", "");
        let b = record(862, "Jumanji", "");
        let c = record(8844, "Toy Story", "");

        assert!(!a.is_same_movie(&b));
        assert!(!a.is_same_movie(&c));
    }

    #[test]
    fn test_whole_row_equality_covers_vote_average() {
        let mut a = record(1, "A", "");
        let mut b = record(1, "A", "");
        a.vote_average = Some(7.7);
        b.vote_average = Some(6.9);

        assert!(a.is_same_movie(&b));
        assert_ne!(a, b);

        b.vote_average = Some(7.7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_count_identity_duplicates() {
        let rows = vec![
            record(1, "A", "x"),
            record(1, "A", "y"),
            record(2, "B", ""),
            record(1, "A", "z"),
        ];
        assert_eq!(count_identity_duplicates(&rows), 2);
        assert_eq!(count_identity_duplicates(&[]), 0);
    }
}
