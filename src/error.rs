#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid interval [{lo}, {hi}]: {reason}")]
    InvalidInterval {
        lo: f64,
        hi: f64,
        reason: &'static str,
    },
    #[error("table is empty ({rows} rows, {columns} columns)")]
    EmptyTable { rows: usize, columns: usize },
    #[error("row {row} does not have the same features as row 0")]
    InconsistentRow { row: usize },
    #[error("row {row} has non-finite value {value} for feature {feature:?}")]
    NonFiniteValue {
        row: usize,
        feature: String,
        value: f64,
    },
    #[error("weight {weight} for feature {feature:?} is not finite")]
    InvalidWeight { feature: String, weight: f64 },
    /// `value ** weight` has no real result, e.g. a zero-valued feature with a negative weight.
    #[error("undefined score: {value} ** {weight} for feature {feature:?}")]
    UndefinedScore {
        feature: String,
        value: f64,
        weight: f64,
    },
    #[error("score is not finite ({value})")]
    NonFiniteScore { value: f64 },
    #[error("scaled table has {scaled} rows, original table has {original}")]
    RowCountMismatch { scaled: usize, original: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
