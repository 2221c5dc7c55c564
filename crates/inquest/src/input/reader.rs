//! Delimited-file reader with delimiter auto-detection.

use std::fs::File;
use std::io::Read as _;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{InquestError, Result};

use super::source::{SourceInfo, Table};

/// Delimiters tried when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Reader configuration.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Quote character.
    pub quote: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            quote: b'"',
        }
    }
}

/// Reads delimited tabular files into a [`Table`].
pub struct Reader {
    config: ReaderConfig,
}

impl Reader {
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a file and return the table together with source metadata.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceInfo)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| InquestError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| InquestError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let table = self.read_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let info = SourceInfo::new(
            path.to_path_buf(),
            hash,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, info))
    }

    /// Parse bytes directly.
    pub fn read_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.to_string()).collect()
        } else {
            match reader.records().next() {
                Some(Ok(record)) => (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect(),
                Some(Err(e)) => return Err(e.into()),
                None => return Err(InquestError::EmptyData("no data rows found".to_string())),
            }
        };

        if headers.is_empty() {
            return Err(InquestError::EmptyData("no columns found".to_string()));
        }

        // Re-create the reader; header extraction may have consumed records.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            while row.len() < expected_cols {
                row.push(String::new());
            }
            row.truncate(expected_cols);
            rows.push(row);
        }

        Ok(Table::new(headers, rows, delimiter))
    }
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by scoring candidate delimiters over the first lines.
///
/// A candidate that splits every sampled line into the same number of fields
/// wins; ties prefer tab, which rarely occurs inside data.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    if lines.is_empty() {
        return Err(InquestError::EmptyData("no lines to analyze".to_string()));
    }

    let mut best = b',';
    let mut best_score = 0usize;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, delim))
            .collect();

        let first = counts[0];
        if first == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first);
        let score = if consistent {
            first * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first
        };

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    Ok(best)
}

/// Count delimiter occurrences in a line, ignoring quoted sections.
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let delim = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(b"a,b,c\n1,2,3\n").unwrap(), b',');
        assert_eq!(detect_delimiter(b"a\tb\tc\n1\t2\t3\n").unwrap(), b'\t');
        assert_eq!(detect_delimiter(b"a|b|c\n1|2|3\n").unwrap(), b'|');
    }

    #[test]
    fn test_read_csv_bytes() {
        let reader = Reader::new();
        let table = reader
            .read_bytes(b"name,age\nAlice,30\nBob,25\n", b',')
            .unwrap();

        assert_eq!(table.headers, vec!["name", "age"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, 1), Some("25"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let reader = Reader::new();
        let table = reader.read_bytes(b"a,b,c\n1,2\n", b',').unwrap();

        assert_eq!(table.rows[0], vec!["1", "2", ""]);
    }

    #[test]
    fn test_quoted_delimiter_ignored() {
        assert_eq!(count_unquoted("a,\"b,c\",d", b','), 2);
    }
}
