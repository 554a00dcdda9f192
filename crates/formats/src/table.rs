/// A parsed tabular resource: headers in file order plus string-typed rows.
///
/// Cells stay strings; numeric conversion happens at the point of use so a
/// non-numeric cell degrades to NaN instead of failing ingestion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug)]
pub enum TableError {
    Csv(String),
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::Csv(reason) => write!(f, "table parse error: {reason}"),
        }
    }
}

impl std::error::Error for TableError {}

impl DataTable {
    pub fn from_csv_str(payload: &str) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(payload.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| TableError::Csv(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| TableError::Csv(e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::DataTable;

    const FIXTURE: &str = "\
prefecture,population,area
Aomori,1373339,9645
Iwate,1330147,15275
";

    #[test]
    fn headers_keep_file_order() {
        let table = DataTable::from_csv_str(FIXTURE).unwrap();
        assert_eq!(table.headers, vec!["prefecture", "population", "area"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn cell_lookup_by_header_name() {
        let table = DataTable::from_csv_str(FIXTURE).unwrap();
        assert_eq!(table.cell(0, "population"), Some("1373339"));
        assert_eq!(table.cell(1, "prefecture"), Some("Iwate"));
        assert_eq!(table.cell(0, "missing"), None);
    }

    #[test]
    fn empty_input_is_a_valid_empty_table() {
        let table = DataTable::from_csv_str("").unwrap();
        assert!(table.is_empty());
        assert!(table.headers.is_empty());
    }

    #[test]
    fn header_only_input_has_no_rows() {
        let table = DataTable::from_csv_str("prefecture,population\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 2);
    }

    #[test]
    fn short_rows_read_as_missing_cells() {
        let table = DataTable::from_csv_str("a,b,c\n1,2\n").unwrap();
        assert_eq!(table.cell(0, "b"), Some("2"));
        assert_eq!(table.cell(0, "c"), None);
    }
}
