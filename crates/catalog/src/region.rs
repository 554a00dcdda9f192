use std::collections::BTreeMap;

/// One row of the data table: string cells keyed by column header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionRecord {
    cells: BTreeMap<String, String>,
}

impl RegionRecord {
    pub fn new(cells: BTreeMap<String, String>) -> Self {
        Self { cells }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(|s| s.as_str())
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Numeric view of a cell: NaN for a missing, empty, or non-numeric
    /// value.
    pub fn numeric(&self, key: &str) -> f64 {
        parse_numeric(self.get(key))
    }
}

/// Numeric view of an optional cell value, NaN on anything non-numeric.
pub fn parse_numeric(cell: Option<&str>) -> f64 {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Region records keyed by the join column's value.
///
/// Join matching is exact string comparison: no trimming, no Unicode
/// normalization. A region name present in geometry but absent here is not
/// an error; its values read as NaN.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionTable {
    records: BTreeMap<String, RegionRecord>,
}

impl RegionTable {
    pub fn from_rows<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>], join_column: &str) -> Self {
        let join_idx = headers.iter().position(|h| h.as_ref() == join_column);

        let mut records = BTreeMap::new();
        let Some(join_idx) = join_idx else {
            return Self { records };
        };

        for row in rows {
            let Some(name) = row.get(join_idx) else {
                continue;
            };
            let cells = headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.as_ref().to_string(), v.clone()))
                .collect();
            // Later rows with a duplicate join key win, matching a
            // keyed-rollup of the input.
            records.insert(name.clone(), RegionRecord::new(cells));
        }

        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, region_name: &str) -> Option<&RegionRecord> {
        self.records.get(region_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{RegionTable, parse_numeric};

    fn table() -> RegionTable {
        let headers = vec![
            "prefecture".to_string(),
            "population".to_string(),
            "note".to_string(),
        ];
        let rows = vec![
            vec!["Aomori".to_string(), "1373339".to_string(), "n/a".to_string()],
            vec!["Iwate".to_string(), "".to_string(), "blank".to_string()],
        ];
        RegionTable::from_rows(&headers, &rows, "prefecture")
    }

    #[test]
    fn joins_by_exact_name() {
        let t = table();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("Aomori").unwrap().get("population"), Some("1373339"));
        // Exact match only: no trimming, no normalization.
        assert!(t.get("aomori").is_none());
        assert!(t.get("Aomori ").is_none());
    }

    #[test]
    fn numeric_degrades_to_nan() {
        let t = table();
        let aomori = t.get("Aomori").unwrap();
        assert_eq!(aomori.numeric("population"), 1373339.0);
        assert!(aomori.numeric("note").is_nan());
        assert!(aomori.numeric("missing-column").is_nan());
        assert!(t.get("Iwate").unwrap().numeric("population").is_nan());
    }

    #[test]
    fn parse_numeric_handles_signs_and_whitespace() {
        assert_eq!(parse_numeric(Some(" -42.5 ")), -42.5);
        assert!(parse_numeric(Some("")).is_nan());
        assert!(parse_numeric(None).is_nan());
    }

    #[test]
    fn missing_join_column_yields_an_empty_table() {
        let headers = vec!["a".to_string()];
        let rows = vec![vec!["x".to_string()]];
        let t = RegionTable::from_rows(&headers, &rows, "name");
        assert!(t.is_empty());
    }
}
