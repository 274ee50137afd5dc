//! Aggregate computations over the cleaned tables.
//!
//! Each aggregate is an independent, stateless pass: mean rating per
//! movie, top-N by vote average, release counts per year, and movie
//! counts per genre.

pub mod aggregate;
pub mod types;
