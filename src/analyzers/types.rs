//! Output types for the report aggregates.

use serde::Serialize;

/// One entry of the top-rated ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMovie {
    pub id: i64,
    pub title: String,
    pub vote_average: Option<f64>,
}
