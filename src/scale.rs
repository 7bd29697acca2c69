use std::collections::BTreeMap;

use crate::{FeatureTable, Interval, Result, Row};

/// The minimum and maximum of one feature column, fitted during a single scaling pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    fn fit<Values: IntoIterator<Item = f64>>(values: Values) -> Self {
        values.into_iter().fold(
            Self {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |range, value| Self {
                min: range.min.min(value),
                max: range.max.max(value),
            },
        )
    }

    /// All values of the column are identical.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Map `value` linearly from `[min, max]` onto `interval`. The result is always within
    /// `interval`, `min` maps exactly to `lo` and `max` maps exactly to `hi`. Every value of a
    /// degenerate column maps to `lo`.
    pub fn apply(&self, value: f64, interval: Interval) -> f64 {
        if self.is_degenerate() {
            return interval.lo();
        }
        if value == self.max {
            return interval.hi();
        }
        let span = self.max - self.min;
        let t = if span.is_finite() {
            (value - self.min) / span
        } else {
            // The span of a column reaching towards both ends of f64 overflows, its halves do not.
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        };
        (interval.lo() + t * interval.width()).clamp(interval.lo(), interval.hi())
    }

    /// Inverse of `apply`. A degenerate column inverts to its single value.
    pub fn invert(&self, scaled: f64, interval: Interval) -> f64 {
        if self.is_degenerate() {
            return self.min;
        }
        let t = (scaled - interval.lo()) / interval.width();
        let span = self.max - self.min;
        if span.is_finite() {
            self.min + t * span
        } else {
            2.0 * (self.min / 2.0 + t * (self.max / 2.0 - self.min / 2.0))
        }
    }
}

/// A column whose rows all share the same raw value. Not an error: every scaled value of the column
/// is `lo`, so the feature contributes the same factor to every score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DegenerateColumn<'t> {
    pub feature: &'t str,
    pub value: f64,
}

/// A [`FeatureTable`] with every column mapped into an [`Interval`]. Rows keep the positions they
/// had in the source table.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledTable {
    interval: Interval,
    ranges: BTreeMap<String, ColumnRange>,
    rows: Vec<Row>,
}

impl ScaledTable {
    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.ranges.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The raw range fitted for `feature`.
    pub fn range(&self, feature: &str) -> Option<ColumnRange> {
        self.ranges.get(feature).copied()
    }

    pub fn degenerate_columns(&self) -> impl Iterator<Item = DegenerateColumn<'_>> + '_ {
        self.ranges
            .iter()
            .filter(|(_, range)| range.is_degenerate())
            .map(|(feature, range)| DegenerateColumn {
                feature,
                value: range.min,
            })
    }

    /// Recover the raw value of `feature` that scaled to `scaled`.
    pub fn unscale(&self, feature: &str, scaled: f64) -> Option<f64> {
        self.range(feature)
            .map(|range| range.invert(scaled, self.interval))
    }
}

/// Min-max scale each column of `table` into `interval`, independently of the other columns. The
/// source table is left untouched.
pub fn scale(table: &FeatureTable, interval: Interval) -> Result<ScaledTable> {
    table.ensure_not_empty()?;

    let ranges: BTreeMap<String, ColumnRange> = table
        .columns()
        .iter()
        .map(|feature| (feature.clone(), ColumnRange::fit(table.column(feature))))
        .collect();
    for (feature, range) in ranges.iter().filter(|(_, r)| r.is_degenerate()) {
        tracing::warn!(
            feature = %feature,
            value = range.min,
            lo = interval.lo(),
            "degenerate column, every value scales to lo"
        );
    }

    // Rows and ranges are both ordered by feature name.
    let rows: Vec<Row> = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(ranges.values())
                .map(|((feature, value), range)| (feature, range.apply(value, interval)))
                .collect()
        })
        .collect();

    tracing::debug!(
        rows = rows.len(),
        columns = ranges.len(),
        ?interval,
        "scaled feature table"
    );
    Ok(ScaledTable {
        interval,
        ranges,
        rows,
    })
}
