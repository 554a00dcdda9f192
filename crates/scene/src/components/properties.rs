/// Merged properties carried by a region node (its name plus the joined
/// record's cells). Pairs keep insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionProperties {
    pairs: Vec<(String, String)>,
}

impl RegionProperties {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Numeric view of a property: NaN when absent or non-numeric.
    pub fn numeric(&self, key: &str) -> f64 {
        self.get(key)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(f64::NAN)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
