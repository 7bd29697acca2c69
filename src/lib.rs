//! Rank alternatives described by numeric criteria using the weighted product model.
//!
//! A [`FeatureTable`] is first scaled column by column into a positive [`Interval`] (see
//! [`scale()`]), then every row is scored as the product of its feature values raised to their
//! weights (see [`score()`]) and the alternatives are ordered by descending score (see [`rank()`]).

pub mod config;
pub mod criteria;
pub mod error;
pub mod num;
pub mod rank;
pub mod scale;
pub mod table;

pub use crate::config::RankConfig;
pub use crate::criteria::{score, Weight, WeightMap};
pub use crate::error::{Error, Result};
pub use crate::num::{Interval, Score};
pub use crate::rank::{rank, Ranking, ScoreResult};
pub use crate::scale::{scale, ColumnRange, DegenerateColumn, ScaledTable};
pub use crate::table::{FeatureTable, Row};
pub use arrayvec::ArrayVec;

/// Scale `table` into the configured interval and rank its rows by their weighted product.
pub fn evaluate<'t>(table: &'t FeatureTable, config: &RankConfig) -> Result<Ranking<'t>> {
    let scaled = scale(table, config.interval)?;
    rank(&scaled, table, &config.weights)
}
