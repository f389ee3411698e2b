//! CSV export for extracted records
//!
//! Thin delivery collaborator: accepts an ordered sequence of records and
//! writes rows. Fields are quoted RFC 4180 style when they embed separators.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::domain::product::ProductRecord;

const CSV_HEADER: &str = "Product Name,Price";

/// Write records as CSV to any writer, header row first
pub fn write_csv<W: Write>(records: &[ProductRecord], mut writer: W) -> io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for record in records {
        writeln!(writer, "{},{}", escape_field(&record.name), escape_field(&record.price))?;
    }
    writer.flush()
}

/// Write records as CSV to a file path
pub fn write_csv_file(records: &[ProductRecord], path: impl AsRef<Path>) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(records, BufWriter::new(file))
}

/// Quote a field when it contains a comma, quote, or line break
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new("Wireless Mouse", "Rs 1,299"),
            ProductRecord::new("USB Cable, 2m", "Rs 199"),
            ProductRecord::new("Monitor 24\"", "Rs 8,990"),
        ]
    }

    #[test]
    fn header_and_rows_in_order() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Product Name,Price");
        // Thousands separators force the price field into quotes
        assert_eq!(lines[1], "Wireless Mouse,\"Rs 1,299\"");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn fields_with_separators_are_quoted() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"USB Cable, 2m\""));
        assert!(text.contains("\"Monitor 24\"\"\""));
    }

    #[test]
    fn writes_to_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        write_csv_file(&sample(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Product Name,Price"));
    }
}
