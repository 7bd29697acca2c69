use serde::Deserialize;

use crate::{Interval, WeightMap};

/// Everything needed to rank a table: the interval features are scaled into, and the weight of
/// each criterion. Both are validated on deserialization.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankConfig {
    #[serde(default)]
    pub interval: Interval,
    #[serde(default)]
    pub weights: WeightMap,
}

impl RankConfig {
    pub fn new(interval: Interval, weights: WeightMap) -> Self {
        Self { interval, weights }
    }
}

#[cfg(test)]
mod test {
    use super::RankConfig;
    use crate::{Interval, Weight};

    #[test]
    fn from_toml() {
        let config: RankConfig = toml::from_str(
            r#"
            [interval]
            lo = 1.0
            hi = 10.0

            [weights]
            area = 1.0
            price = -1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.interval, Interval::new(1.0, 10.0).unwrap());
        assert_eq!(config.weights.get("price"), Weight::new(-1.5));
        assert_eq!(config.weights.get("floor"), None);
    }

    #[test]
    fn interval_defaults() {
        let config: RankConfig = toml::from_str("[weights]\narea = 2.0").unwrap();
        assert_eq!(config.interval, Interval::DEFAULT);
        assert_eq!(config.weights.len(), 1);
    }

    #[test]
    fn rejects_invalid_values() {
        let zero_lo = "[interval]\nlo = 0.0\nhi = 10.0";
        assert!(toml::from_str::<RankConfig>(zero_lo).is_err());
        let reversed = "[interval]\nlo = 50.0\nhi = 10.0";
        assert!(toml::from_str::<RankConfig>(reversed).is_err());
        assert!(toml::from_str::<RankConfig>("[weights]\narea = inf").is_err());
        assert!(toml::from_str::<RankConfig>("scale = 3").is_err());
    }
}
