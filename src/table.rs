use std::collections::BTreeMap;

use crate::{Error, Result};

/// One alternative: its numeric features by name. Categorical features must already be encoded
/// as numbers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row(BTreeMap<String, f64>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(feature.into(), value)
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.0.get(feature).copied()
    }

    /// Features and their values, ordered by feature name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn features(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// An ordered sequence of rows sharing the same set of feature names. The position of a row is its
/// identity, and is kept through scaling and ranking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl FeatureTable {
    /// Fails if any row has a different set of features than the first row, or holds a NaN or
    /// infinite value. A table with no rows is accepted here, but cannot be scaled or ranked.
    pub fn new(rows: Vec<Row>) -> Result<Self> {
        let columns: Vec<String> = rows
            .first()
            .map(|row| row.features().map(str::to_owned).collect())
            .unwrap_or_default();
        for (index, row) in rows.iter().enumerate() {
            if !row.features().eq(columns.iter().map(String::as_str)) {
                return Err(Error::InconsistentRow { row: index });
            }
            if let Some((feature, value)) = row.iter().find(|(_, v)| !v.is_finite()) {
                return Err(Error::NonFiniteValue {
                    row: index,
                    feature: feature.to_owned(),
                    value,
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Feature names, ordered by name.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// All values of one feature, in row order. Empty if the feature does not exist.
    pub fn column<'t>(&'t self, feature: &'t str) -> impl Iterator<Item = f64> + 't {
        self.rows.iter().filter_map(move |row| row.get(feature))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn ensure_not_empty(&self) -> Result<()> {
        if self.rows.is_empty() || self.columns.is_empty() {
            return Err(Error::EmptyTable {
                rows: self.rows.len(),
                columns: self.columns.len(),
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<Row>> for FeatureTable {
    type Error = Error;
    fn try_from(rows: Vec<Row>) -> Result<Self> {
        Self::new(rows)
    }
}

#[cfg(test)]
mod test {
    use super::{FeatureTable, Row};
    use crate::Error;

    fn row<const N: usize>(values: [(&str, f64); N]) -> Row {
        values.into_iter().collect()
    }

    #[test]
    fn columns_follow_first_row() {
        let table = FeatureTable::new(vec![
            row([("price", 300.0), ("area", 70.0)]),
            row([("area", 55.0), ("price", 240.0)]),
        ])
        .unwrap();
        assert_eq!(table.columns(), ["area", "price"]);
        assert_eq!(table.column("price").collect::<Vec<_>>(), [300.0, 240.0]);
        assert_eq!(table.column("floor").count(), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn rows_must_share_features() {
        let missing = FeatureTable::new(vec![
            row([("price", 300.0), ("area", 70.0)]),
            row([("price", 240.0)]),
        ]);
        assert_eq!(missing, Err(Error::InconsistentRow { row: 1 }));

        let renamed = FeatureTable::new(vec![
            row([("price", 300.0), ("area", 70.0)]),
            row([("price", 240.0), ("rooms", 3.0)]),
        ]);
        assert_eq!(renamed, Err(Error::InconsistentRow { row: 1 }));
    }

    #[test]
    fn values_must_be_finite() {
        let result = FeatureTable::new(vec![
            row([("price", 300.0)]),
            row([("price", f64::NAN)]),
        ]);
        assert!(matches!(
            result,
            Err(Error::NonFiniteValue { row: 1, ref feature, .. }) if feature == "price"
        ));
    }

    #[test]
    fn empty_tables() {
        let no_rows = FeatureTable::new(vec![]).unwrap();
        assert_eq!(
            no_rows.ensure_not_empty(),
            Err(Error::EmptyTable { rows: 0, columns: 0 })
        );
        let no_columns = FeatureTable::new(vec![Row::new(), Row::new()]).unwrap();
        assert_eq!(
            no_columns.ensure_not_empty(),
            Err(Error::EmptyTable { rows: 2, columns: 0 })
        );
    }
}
