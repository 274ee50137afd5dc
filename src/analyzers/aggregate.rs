use crate::analyzers::types::TopMovie;
use crate::error::ReportError;
use crate::model::{MovieRecord, Rating};
use crate::parser::decode_genres;
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Mean rating per movie, keyed and ordered by movie id.
///
/// The key set is exactly the set of movie ids present in the ratings
/// table.
pub fn average_rating_per_movie(ratings: &[Rating]) -> BTreeMap<i64, f64> {
    let mut sums: BTreeMap<i64, (f64, u64)> = BTreeMap::new();
    for rating in ratings {
        let entry = sums.entry(rating.movie_id).or_insert((0.0, 0));
        entry.0 += rating.rating;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(movie_id, (sum, count))| (movie_id, sum / count as f64))
        .collect()
}

/// The `n` highest-rated rows by vote average, descending.
///
/// The sort is stable, so ties keep their input order. A missing vote
/// average ranks below every present one.
pub fn top_rated(rows: &[MovieRecord], n: usize) -> Vec<TopMovie> {
    let mut ranked: Vec<&MovieRecord> = rows.iter().collect();
    ranked.sort_by(|a, b| {
        b.vote_average
            .partial_cmp(&a.vote_average)
            .unwrap_or(Ordering::Equal)
    });

    ranked
        .into_iter()
        .take(n)
        .map(|row| TopMovie {
            id: row.id,
            title: row.title.clone(),
            vote_average: row.vote_average,
        })
        .collect()
}

/// Movies released per calendar year, ascending.
///
/// Rows whose release date does not parse as `YYYY-MM-DD` are left out of
/// the count entirely; there is no "unknown" bucket.
pub fn releases_per_year(rows: &[MovieRecord]) -> BTreeMap<i32, u64> {
    let mut counts = BTreeMap::new();
    for row in rows {
        if let Ok(date) = NaiveDate::parse_from_str(row.release_date.trim(), "%Y-%m-%d") {
            *counts.entry(date.year()).or_insert(0) += 1;
        }
    }
    counts
}

/// Movie count per genre name, in order of first appearance.
///
/// A movie listing several genres counts once under each of them, so the
/// counts sum to the number of (movie, genre) associations. A row with an
/// empty genres field contributes nothing; a malformed field is fatal.
pub fn genre_counts(rows: &[MovieRecord]) -> Result<IndexMap<String, u64>, ReportError> {
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    for row in rows {
        let names = decode_genres(&row.genres).map_err(|source| ReportError::Genres {
            movie_id: row.id,
            source,
        })?;
        for name in names {
            *counts.entry(name).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user_id: i64, movie_id: i64, score: f64) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating: score,
            timestamp: 964982703,
        }
    }

    fn movie(id: i64, title: &str, vote_average: Option<f64>) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            vote_average,
            ..Default::default()
        }
    }

    #[test]
    fn test_average_rating_groups_by_movie() {
        let ratings = vec![
            rating(1, 10, 4.0),
            rating(1, 10, 2.0),
            rating(2, 20, 5.0),
        ];

        let averages = average_rating_per_movie(&ratings);

        assert_eq!(averages.len(), 2);
        assert_eq!(averages[&10], 3.0);
        assert_eq!(averages[&20], 5.0);
    }

    #[test]
    fn test_average_rating_keys_match_ratings_table() {
        let ratings = vec![rating(1, 30, 1.0), rating(2, 10, 2.0), rating(3, 20, 3.0)];

        let averages = average_rating_per_movie(&ratings);
        let keys: Vec<i64> = averages.keys().copied().collect();

        assert_eq!(keys, vec![10, 20, 30]);
    }

    #[test]
    fn test_average_rating_empty() {
        assert!(average_rating_per_movie(&[]).is_empty());
    }

    #[test]
    fn test_top_rated_orders_descending() {
        let rows = vec![
            movie(1, "Seven", Some(7.0)),
            movie(2, "Nine", Some(9.0)),
            movie(3, "Eight", Some(8.0)),
        ];

        let top = top_rated(&rows, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].title, "Nine");
        assert_eq!(top[1].title, "Eight");
    }

    #[test]
    fn test_top_rated_ties_keep_input_order() {
        let rows = vec![
            movie(1, "First", Some(7.7)),
            movie(2, "Second", Some(7.7)),
            movie(3, "Third", Some(9.0)),
        ];

        let top = top_rated(&rows, 3);

        let titles: Vec<&str> = top.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn test_top_rated_missing_vote_average_ranks_last() {
        let rows = vec![
            movie(1, "Unrated", None),
            movie(2, "Rated", Some(1.0)),
        ];

        let top = top_rated(&rows, 2);

        assert_eq!(top[0].title, "Rated");
        assert_eq!(top[1].title, "Unrated");
    }

    #[test]
    fn test_top_rated_short_table_returns_all() {
        let rows = vec![movie(1, "Only", Some(5.0))];
        assert_eq!(top_rated(&rows, 5).len(), 1);
    }

    #[test]
    fn test_top_rated_empty_table() {
        assert!(top_rated(&[], 5).is_empty());
    }

    #[test]
    fn test_releases_per_year_counts_and_excludes_bad_dates() {
        let mut rows = vec![
            movie(1, "A", None),
            movie(2, "B", None),
            movie(3, "C", None),
            movie(4, "D", None),
        ];
        rows[0].release_date = "2010-01-01".to_string();
        rows[1].release_date = "2010-06-01".to_string();
        rows[2].release_date = "bad-date".to_string();
        rows[3].release_date = "2011-03-03".to_string();

        let per_year = releases_per_year(&rows);

        assert_eq!(per_year.len(), 2);
        assert_eq!(per_year[&2010], 2);
        assert_eq!(per_year[&2011], 1);
    }

    #[test]
    fn test_releases_per_year_sorted_ascending() {
        let mut rows = vec![movie(1, "A", None), movie(2, "B", None)];
        rows[0].release_date = "2011-01-01".to_string();
        rows[1].release_date = "1995-10-30".to_string();

        let years: Vec<i32> = releases_per_year(&rows).keys().copied().collect();
        assert_eq!(years, vec![1995, 2011]);
    }

    #[test]
    fn test_genre_counts_with_multiplicity() {
        let mut rows = vec![movie(1, "A", None), movie(2, "B", None)];
        rows[0].genres = "[{'name': 'Action'}]".to_string();
        rows[1].genres = "[{'name': 'Action'}, {'name': 'Drama'}]".to_string();

        let counts = genre_counts(&rows).unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts["Action"], 2);
        assert_eq!(counts["Drama"], 1);
    }

    #[test]
    fn test_genre_counts_insertion_order() {
        let mut rows = vec![movie(1, "A", None), movie(2, "B", None)];
        rows[0].genres = "[{'name': 'Drama'}, {'name': 'Action'}]".to_string();
        rows[1].genres = "[{'name': 'Comedy'}, {'name': 'Action'}]".to_string();

        let counts = genre_counts(&rows).unwrap();
        let names: Vec<&str> = counts.keys().map(String::as_str).collect();

        assert_eq!(names, vec!["Drama", "Action", "Comedy"]);
    }

    #[test]
    fn test_genre_counts_empty_field_contributes_nothing() {
        let mut rows = vec![movie(1, "A", None), movie(2, "B", None)];
        rows[0].genres = "[]".to_string();

        let counts = genre_counts(&rows).unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn test_genre_counts_malformed_field_is_fatal() {
        let mut rows = vec![movie(862, "A", None)];
        rows[0].genres = "[{'name':".to_string();

        match genre_counts(&rows) {
            Err(ReportError::Genres { movie_id, .. }) => assert_eq!(movie_id, 862),
            other => panic!("expected genre decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_yields_empty_aggregates() {
        assert!(top_rated(&[], 5).is_empty());
        assert!(releases_per_year(&[]).is_empty());
        assert!(genre_counts(&[]).unwrap().is_empty());
    }
}
