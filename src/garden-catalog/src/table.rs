//! Generic source table reader.
//!
//! Every source category is a CSV file with a header row. Rather than one
//! hand-written reader per category, a [`Table`] holds the raw cells and each
//! record type declares its columns and coercions through [`FromRow`].

use crate::error::{CatalogError, Result, SchemaError};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// One raw source row and the line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: u64,
    pub cells: Vec<String>,
}

/// A parsed CSV source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Parse CSV text from any reader
    pub fn parse<R: Read>(name: &str, reader: R) -> std::result::Result<Self, csv::Error> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            rows.push(Row {
                line,
                cells: record.iter().map(str::to_string).collect(),
            });
        }

        Ok(Table {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    /// Read a table from disk, named after its file stem
    pub fn read(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| CatalogError::io(path, e))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table");
        let table = Self::parse(name, file).map_err(|e| CatalogError::csv(path, e))?;
        tracing::debug!("Loaded {} rows from {}", table.rows.len(), path.display());
        Ok(table)
    }

    /// Write the table back out as CSV with its original header
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| CatalogError::csv(path, e))?;
        writer
            .write_record(&self.headers)
            .map_err(|e| CatalogError::csv(path, e))?;
        for row in &self.rows {
            writer
                .write_record(&row.cells)
                .map_err(|e| CatalogError::csv(path, e))?;
        }
        writer.flush().map_err(|e| CatalogError::io(path, e))?;
        Ok(())
    }

    /// An empty table with the given header
    pub fn with_headers(name: &str, headers: &[&str]) -> Self {
        Table {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a record, laying its cells out in this table's column order
    ///
    /// Columns the record does not know about are left empty.
    pub fn push_record<T: ToRow>(&mut self, record: &T) {
        let cells = self
            .headers
            .iter()
            .map(|column| record.cell(column).unwrap_or_default())
            .collect();
        let line = self.rows.last().map(|r| r.line + 1).unwrap_or(2);
        self.rows.push(Row { line, cells });
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Fail if any of the given columns is absent from the header
    pub fn require(&self, columns: &[&str]) -> std::result::Result<(), SchemaError> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(SchemaError::MissingColumn {
                table: self.name.clone(),
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn views(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(move |row| RowView { table: self, row })
    }

    /// Coerce every row into a typed record
    ///
    /// Required columns are checked up front so a bad header fails before
    /// any row is parsed.
    pub fn records<T: FromRow>(&self) -> std::result::Result<Vec<T>, SchemaError> {
        self.require(T::COLUMNS)?;
        self.views().map(|view| T::from_row(&view)).collect()
    }
}

/// A row paired with the table it belongs to, for by-name cell access
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    row: &'a Row,
}

impl<'a> RowView<'a> {
    pub fn line(&self) -> u64 {
        self.row.line
    }

    /// Raw cell text, `None` when the column does not exist
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        Some(self.row.cells.get(idx).map(String::as_str).unwrap_or(""))
    }

    fn invalid(&self, column: &str, value: &str, expected: &'static str) -> SchemaError {
        SchemaError::InvalidValue {
            table: self.table.name.clone(),
            line: self.row.line,
            column: column.to_string(),
            value: value.to_string(),
            expected,
        }
    }

    fn required(&self, column: &str) -> std::result::Result<&'a str, SchemaError> {
        self.get(column).ok_or_else(|| SchemaError::MissingColumn {
            table: self.table.name.clone(),
            column: column.to_string(),
        })
    }

    pub fn text(&self, column: &str) -> std::result::Result<String, SchemaError> {
        self.required(column).map(str::to_string)
    }

    /// Text of a column that only some tables carry
    pub fn opt_text(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    /// Parse a non-negative integer cell
    pub fn uint<T: FromStr>(&self, column: &str) -> std::result::Result<T, SchemaError> {
        let raw = self.required(column)?;
        raw.parse()
            .map_err(|_| self.invalid(column, raw, "non-negative integer"))
    }

    /// Parse an optional non-negative integer; an absent column or empty cell is `None`
    pub fn opt_uint<T: FromStr>(&self, column: &str) -> std::result::Result<Option<T>, SchemaError> {
        match self.get(column) {
            None | Some("") => Ok(None),
            Some(_) => self.uint(column).map(Some),
        }
    }

    /// Parse a finite floating point cell
    pub fn float(&self, column: &str) -> std::result::Result<f64, SchemaError> {
        let raw = self.required(column)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.invalid(column, raw, "number")),
        }
    }

    /// Reject a value that parsed but is outside what the column allows
    pub fn reject(&self, column: &str, expected: &'static str) -> SchemaError {
        let value = self.get(column).unwrap_or_default();
        self.invalid(column, value, expected)
    }
}

/// A record type that can be built from one source row
pub trait FromRow: Sized {
    /// Columns every table of this shape must have
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &RowView<'_>) -> std::result::Result<Self, SchemaError>;
}

/// A record type that can be written back as one source row
pub trait ToRow {
    /// Header used when the record starts a new table
    const HEADER: &'static [&'static str];

    /// Cell text for a column, `None` for columns the record does not carry
    fn cell(&self, column: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        name: String,
        count: u32,
    }

    impl FromRow for Pair {
        const COLUMNS: &'static [&'static str] = &["name", "count"];

        fn from_row(row: &RowView<'_>) -> std::result::Result<Self, SchemaError> {
            Ok(Pair {
                name: row.text("name")?,
                count: row.uint("count")?,
            })
        }
    }

    impl ToRow for Pair {
        const HEADER: &'static [&'static str] = &["name", "count"];

        fn cell(&self, column: &str) -> Option<String> {
            match column {
                "name" => Some(self.name.clone()),
                "count" => Some(self.count.to_string()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_push_record_follows_header_order() {
        let mut table = Table::parse("pairs", "count,note,name\n1,x,hoe\n".as_bytes()).unwrap();
        table.push_record(&Pair {
            name: "rake".to_string(),
            count: 4,
        });
        assert_eq!(table.rows[1].cells, vec!["4", "", "rake"]);
        assert_eq!(table.rows[1].line, 3);

        let fresh = Table::with_headers("pairs", Pair::HEADER);
        assert_eq!(fresh.headers, vec!["name", "count"]);
    }

    #[test]
    fn test_parse_keeps_line_numbers() {
        let table = Table::parse("pairs", "name,count\nhoe,2\nseed,5\n".as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["name", "count"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].line, 3);
    }

    #[test]
    fn test_records_typed() {
        let table = Table::parse("pairs", "name,count\nhoe,2\n".as_bytes()).unwrap();
        let pairs: Vec<Pair> = table.records().unwrap();
        assert_eq!(pairs[0].name, "hoe");
        assert_eq!(pairs[0].count, 2);
    }

    #[test]
    fn test_missing_column() {
        let table = Table::parse("pairs", "name\nhoe\n".as_bytes()).unwrap();
        let err = table.records::<Pair>().err().unwrap();
        assert_eq!(
            err,
            SchemaError::MissingColumn {
                table: "pairs".to_string(),
                column: "count".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_integer_names_line_and_value() {
        let table = Table::parse("pairs", "name,count\nhoe,2\nseed,-5\n".as_bytes()).unwrap();
        let err = table.records::<Pair>().err().unwrap();
        assert_eq!(
            err,
            SchemaError::InvalidValue {
                table: "pairs".to_string(),
                line: 3,
                column: "count".to_string(),
                value: "-5".to_string(),
                expected: "non-negative integer",
            }
        );
    }

    #[test]
    fn test_float_rejects_nan() {
        let table = Table::parse("rates", "p\nNaN\n0.25\n".as_bytes()).unwrap();
        let views: Vec<_> = table.views().collect();
        assert!(views[0].float("p").is_err());
        assert!((views[1].float("p").unwrap() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_optional_cells() {
        let table = Table::parse("eggs", "id,growTime\na,\nb,30\n".as_bytes()).unwrap();
        let views: Vec<_> = table.views().collect();
        assert_eq!(views[0].opt_uint::<u64>("growTime").unwrap(), None);
        assert_eq!(views[1].opt_uint::<u64>("growTime").unwrap(), Some(30));
        assert_eq!(views[1].opt_uint::<u64>("baseExp").unwrap(), None);
        assert_eq!(views[0].opt_text("transformId"), None);
    }

    #[test]
    fn test_non_ascii_preserved() {
        let table = Table::parse("icons", "name,icon\npineapple,🍍\n".as_bytes()).unwrap();
        let view = table.views().next().unwrap();
        assert_eq!(view.get("icon"), Some("🍍"));
    }

    #[test]
    fn test_write_round_trips_cells() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pairs.csv");
        let table = Table::parse("pairs", "name,count\n\"hoe, big\",2\n".as_bytes()).unwrap();
        table.write(&path).unwrap();
        let reread = Table::read(&path).unwrap();
        assert_eq!(reread.rows[0].cells, vec!["hoe, big", "2"]);
        assert_eq!(reread.name, "pairs");
    }
}
