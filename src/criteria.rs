use std::collections::BTreeMap;

use ordered_float::NotNan;
use serde::Deserialize;

use crate::{Error, Result, Row, Score};

/// A finite exponent applied to one criterion. Positive weights mark benefit criteria (higher is
/// better), negative weights mark cost criteria (lower is better).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Weight(NotNan<f64>);

impl Weight {
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        NotNan::new(value).ok().map(Self)
    }

    pub fn as_f64(&self) -> f64 {
        self.0.into_inner()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    pub fn is_cost(&self) -> bool {
        *self.0 < 0.0
    }
}

impl std::fmt::Debug for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weights by feature name. Features without a weight do not contribute to the score, and weights
/// for features a row does not have are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct WeightMap(BTreeMap<String, Weight>);

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, Pairs>(pairs: Pairs) -> Result<Self>
    where
        K: Into<String>,
        Pairs: IntoIterator<Item = (K, f64)>,
    {
        let mut weights = Self::new();
        for (feature, weight) in pairs {
            weights.insert(feature, weight)?;
        }
        Ok(weights)
    }

    /// Returns the previous weight of `feature`, if any.
    pub fn insert(&mut self, feature: impl Into<String>, weight: f64) -> Result<Option<Weight>> {
        let feature = feature.into();
        match Weight::new(weight) {
            Some(weight) => Ok(self.0.insert(feature, weight)),
            None => Err(Error::InvalidWeight { feature, weight }),
        }
    }

    pub fn remove(&mut self, feature: &str) -> Option<Weight> {
        self.0.remove(feature)
    }

    pub fn get(&self, feature: &str) -> Option<Weight> {
        self.0.get(feature).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Weight)> + '_ {
        self.0.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The given features that have no weight, and so are excluded from scoring.
    pub fn unweighted<'a, Features>(&'a self, features: Features) -> impl Iterator<Item = &'a str>
    where
        Features: IntoIterator<Item = &'a str>,
        Features::IntoIter: 'a,
    {
        features
            .into_iter()
            .filter(move |feature| !self.0.contains_key(*feature))
    }
}

impl TryFrom<BTreeMap<String, f64>> for WeightMap {
    type Error = Error;
    fn try_from(weights: BTreeMap<String, f64>) -> Result<Self> {
        Self::from_pairs(weights)
    }
}

/// We use the [weighted product model (WPM)](https://en.wikipedia.org/wiki/Weighted_product_model)
/// to compare alternatives across multiple criteria: the score is the product of each weighted
/// feature value raised to the power of its weight. WPM has the following properties:
/// - One benefit criterion approaching 0 seriously disadvantages an alternative's score.
/// - Raising a benefit criterion's value always raises the score when holding the others
///   constant, and raising a cost criterion's value always lowers it.
///
/// Row values should be scaled into a positive interval first (see [`crate::scale()`]). Fails with
/// [`Error::UndefinedScore`] when a power has no real result, most notably a zero-valued feature
/// under a negative weight, and with [`Error::NonFiniteScore`] if the product itself is not
/// representable. An intermediate power may overflow as long as the whole product fits.
pub fn score(row: &Row, weights: &WeightMap) -> Result<Score> {
    let mut product = 1.0;
    let mut log_product = 0.0;
    let mut positive = true;
    for (feature, value) in row.iter() {
        let Some(weight) = weights.get(feature) else {
            continue;
        };
        product *= power(feature, value, weight)?;
        log_product += weight.as_f64() * value.ln();
        positive &= value > 0.0;
    }
    // With only positive bases, the product of the powers is exp of the sum of the logs.
    let value = if !product.is_finite() && positive {
        log_product.exp()
    } else {
        product
    };
    Score::new(value).ok_or(Error::NonFiniteScore { value })
}

fn power(feature: &str, value: f64, weight: Weight) -> Result<f64> {
    let factor = value.powf(weight.as_f64());
    // 0 ** w for w < 0 is a division by zero, and a negative base under a fractional weight has no
    // real result.
    if (value == 0.0 && weight.is_cost()) || factor.is_nan() {
        return Err(Error::UndefinedScore {
            feature: feature.to_owned(),
            value,
            weight: weight.as_f64(),
        });
    }
    Ok(factor)
}
