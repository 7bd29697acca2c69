use std::cmp::Reverse;

use arrayvec::ArrayVec;

use crate::{criteria, Error, FeatureTable, Result, Row, ScaledTable, Score, WeightMap};

/// The score of one alternative, along with its unscaled row for reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreResult<'t> {
    pub row_index: usize,
    pub original: &'t Row,
    pub score: Score,
}

/// Score results, best first. Alternatives with equal scores keep their original row order.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranking<'t>(Vec<ScoreResult<'t>>);

impl<'t> Ranking<'t> {
    pub fn iter(&self) -> std::slice::Iter<'_, ScoreResult<'t>> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ScoreResult<'t>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn best(&self) -> Option<&ScoreResult<'t>> {
        self.0.first()
    }

    /// Up to `LIMIT` of the best alternatives.
    pub fn top<const LIMIT: usize>(&self) -> ArrayVec<&ScoreResult<'t>, LIMIT> {
        self.0.iter().take(LIMIT).collect()
    }

    /// The 0-based rank of the alternative at `row_index` in the source table.
    pub fn position(&self, row_index: usize) -> Option<usize> {
        self.0.iter().position(|r| r.row_index == row_index)
    }

    pub fn into_vec(self) -> Vec<ScoreResult<'t>> {
        self.0
    }
}

impl<'t> IntoIterator for Ranking<'t> {
    type Item = ScoreResult<'t>;
    type IntoIter = std::vec::IntoIter<ScoreResult<'t>>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'r, 't> IntoIterator for &'r Ranking<'t> {
    type Item = &'r ScoreResult<'t>;
    type IntoIter = std::slice::Iter<'r, ScoreResult<'t>>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Score every row of `scaled` and order the alternatives by descending score, pairing each score
/// with the row at the same position in `original`. Scoring is all-or-nothing: the first row that
/// fails to score fails the whole ranking.
pub fn rank<'t>(
    scaled: &ScaledTable,
    original: &'t FeatureTable,
    weights: &WeightMap,
) -> Result<Ranking<'t>> {
    let columns = scaled.columns().count();
    if scaled.is_empty() || columns == 0 {
        return Err(Error::EmptyTable {
            rows: scaled.len(),
            columns,
        });
    }
    if scaled.len() != original.len() {
        return Err(Error::RowCountMismatch {
            scaled: scaled.len(),
            original: original.len(),
        });
    }

    if weights.is_empty() {
        tracing::warn!("no weights given, every alternative scores 1");
    }
    let unweighted: Vec<&str> = weights.unweighted(scaled.columns()).collect();
    if !unweighted.is_empty() {
        tracing::debug!(?unweighted, "features without a weight are excluded from scores");
    }

    let scores = score_rows(scaled.rows(), weights)?;
    let mut results: Vec<ScoreResult<'t>> = scores
        .into_iter()
        .zip(original.rows())
        .enumerate()
        .map(|(row_index, (score, original))| ScoreResult {
            row_index,
            original,
            score,
        })
        .collect();

    let mut order = permutation::sort_unstable_by_key(&results[..], |r: &ScoreResult<'t>| {
        (Reverse(r.score), r.row_index)
    });
    order.apply_slice_in_place(&mut results);

    tracing::debug!(
        alternatives = results.len(),
        weights = weights.len(),
        best = ?results.first().map(|r| (r.row_index, r.score)),
        "ranked alternatives"
    );
    Ok(Ranking(results))
}

#[cfg(not(feature = "rayon"))]
fn score_rows(rows: &[Row], weights: &WeightMap) -> Result<Vec<Score>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| score_row(index, row, weights))
        .collect()
}

// Rows are scored independently, so only the final ordering needs all scores at once.
#[cfg(feature = "rayon")]
fn score_rows(rows: &[Row], weights: &WeightMap) -> Result<Vec<Score>> {
    use rayon::prelude::*;
    rows.par_iter()
        .enumerate()
        .map(|(index, row)| score_row(index, row, weights))
        .collect()
}

fn score_row(index: usize, row: &Row, weights: &WeightMap) -> Result<Score> {
    criteria::score(row, weights)
        .inspect_err(|err| tracing::warn!(row = index, %err, "failed to score alternative"))
}

#[cfg(test)]
mod test {
    use super::rank;
    use crate::{scale, Error, FeatureTable, Interval, Row, WeightMap};

    fn table(rows: &[&[(&str, f64)]]) -> FeatureTable {
        FeatureTable::new(
            rows.iter()
                .map(|row| row.iter().copied().collect::<Row>())
                .collect(),
        )
        .unwrap()
    }

    fn apartments() -> FeatureTable {
        table(&[
            &[("area", 45.0), ("price", 210.0), ("rooms", 2.0)],
            &[("area", 80.0), ("price", 390.0), ("rooms", 4.0)],
            &[("area", 62.0), ("price", 250.0), ("rooms", 3.0)],
        ])
    }

    #[test]
    fn results_keep_original_rows() {
        let table = apartments();
        let scaled = scale(&table, Interval::default()).unwrap();
        let weights = WeightMap::from_pairs([("area", 1.0), ("price", -1.0)]).unwrap();
        let ranking = rank(&scaled, &table, &weights).unwrap();
        assert_eq!(ranking.len(), 3);
        for result in &ranking {
            assert_eq!(Some(result.original), table.row(result.row_index));
        }
        let scores: Vec<f64> = ranking.iter().map(|r| r.score.as_f64()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn cost_criterion_prefers_cheaper() {
        let table = apartments();
        let scaled = scale(&table, Interval::default()).unwrap();
        let weights = WeightMap::from_pairs([("price", -1.0)]).unwrap();
        let ranking = rank(&scaled, &table, &weights).unwrap();
        let order: Vec<usize> = ranking.iter().map(|r| r.row_index).collect();
        assert_eq!(order, [0, 2, 1]);
        assert_eq!(ranking.position(1), Some(2));
        assert_eq!(ranking.position(7), None);
    }

    #[test]
    fn ties_keep_row_order() {
        let table = table(&[
            &[("a", 1.0), ("b", 5.0)],
            &[("a", 3.0), ("b", 5.0)],
            &[("a", 1.0), ("b", 5.0)],
            &[("a", 3.0), ("b", 5.0)],
        ]);
        let scaled = scale(&table, Interval::default()).unwrap();
        let weights = WeightMap::from_pairs([("a", 1.0), ("b", 1.0)]).unwrap();
        let order: Vec<usize> = rank(&scaled, &table, &weights)
            .unwrap()
            .iter()
            .map(|r| r.row_index)
            .collect();
        assert_eq!(order, [1, 3, 0, 2]);
    }

    #[test]
    fn empty_weights_rank_in_row_order() {
        let table = apartments();
        let scaled = scale(&table, Interval::default()).unwrap();
        let ranking = rank(&scaled, &table, &WeightMap::new()).unwrap();
        assert!(ranking.iter().all(|r| r.score.as_f64() == 1.0));
        let order: Vec<usize> = ranking.into_iter().map(|r| r.row_index).collect();
        assert_eq!(order, [0, 1, 2]);
    }

    #[test]
    fn top() {
        let table = apartments();
        let scaled = scale(&table, Interval::default()).unwrap();
        let weights = WeightMap::from_pairs([("rooms", 1.0)]).unwrap();
        let ranking = rank(&scaled, &table, &weights).unwrap();
        let top = ranking.top::<2>();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].row_index, 1);
        assert_eq!(top[1].row_index, 2);
        assert_eq!(ranking.top::<8>().len(), 3);
        assert_eq!(ranking.best().map(|r| r.row_index), Some(1));
    }

    #[test]
    fn row_count_must_match() {
        let table = apartments();
        let scaled = scale(&table, Interval::default()).unwrap();
        let shorter = FeatureTable::new(table.rows()[..2].to_vec()).unwrap();
        assert_eq!(
            rank(&scaled, &shorter, &WeightMap::new()),
            Err(Error::RowCountMismatch {
                scaled: 3,
                original: 2
            })
        );
    }

    #[test]
    fn overflow_fails_the_ranking() {
        let table = apartments();
        let scaled = scale(&table, Interval::default()).unwrap();
        // Row 1 scales to 100 for both, and 100^200 * 100^200 does not fit in an f64.
        let weights = WeightMap::from_pairs([("area", 200.0), ("rooms", 200.0)]).unwrap();
        assert!(matches!(
            rank(&scaled, &table, &weights),
            Err(Error::NonFiniteScore { .. })
        ));
    }
}
